pub use tasklet_core::config::*;
pub use tasklet_core::logging::init_tracing;

use crate::cli::Cli;

pub fn from_cli(cli: &Cli) -> anyhow::Result<AppConfig> {
    AppConfig::discover(cli.log_dir.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn log_dir_flag_wins() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join("logs");
        let cli = Cli::try_parse_from(["tasklet", "--log-dir", dir.to_str().expect("utf8 path")])
            .expect("parse");

        let config = from_cli(&cli).expect("config");

        assert_eq!(config.log_dir(), dir.as_path());
        assert!(dir.is_dir());
        assert_eq!(config.log_path(), dir.join("tasklet.log").as_path());
    }
}
