use std::fs::OpenOptions;

use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global tracing subscriber, appending to the configured log file.
///
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
/// `RUST_LOG` directives take precedence over `filter`. Installing twice is a no-op.
pub fn init_tracing(config: &AppConfig, filter: Option<&str>) -> Result<()> {
    let raw = filter.unwrap_or(DEFAULT_LOG_FILTER);
    let directive: Directive = raw
        .parse()
        .with_context(|| format!("invalid log filter '{raw}'"))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .with_context(|| format!("failed to open log file {}", config.log_path().display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rejects_malformed_filter() {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_log_dir(dir.path().to_path_buf()).expect("config");

        assert!(init_tracing(&config, Some("tasklet=loudest")).is_err());
    }

    #[test]
    fn creates_log_file() {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_log_dir(dir.path().to_path_buf()).expect("config");

        init_tracing(&config, Some("debug")).expect("init");
        init_tracing(&config, None).expect("second init is harmless");
        assert!(config.log_path().exists());
    }
}
