use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use once_cell::sync::Lazy;

static DEFAULT_LOG_NAME: &str = "tasklet.log";
pub static ENV_LOG_DIR: &str = "TASKLET_LOG_DIR";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "tasklet", "tasklet"));

#[derive(Debug, Clone)]
pub struct AppConfig {
    log_dir: PathBuf,
    log_path: PathBuf,
}

impl AppConfig {
    /// Construct [`AppConfig`] by resolving the log directory using the provided override,
    /// environment variables, and platform defaults.
    pub fn discover(log_dir_override: Option<PathBuf>) -> Result<Self> {
        let log_dir = resolve_log_dir(log_dir_override)?;
        if !log_dir.exists() {
            fs::create_dir_all(&log_dir).with_context(|| {
                format!("Failed to create log directory at {}", log_dir.display())
            })?;
        }
        Self::from_log_dir(log_dir)
    }

    /// Construct [`AppConfig`] directly from a resolved log directory.
    pub fn from_log_dir(log_dir: PathBuf) -> Result<Self> {
        let log_path = log_dir.join(DEFAULT_LOG_NAME);
        Ok(Self { log_dir, log_path })
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

fn resolve_log_dir(log_dir_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = log_dir_override {
        return Ok(dir);
    }

    if let Ok(env_dir) = env::var(ENV_LOG_DIR) {
        if !env_dir.trim().is_empty() {
            return Ok(PathBuf::from(env_dir));
        }
    }

    if cfg!(debug_assertions) {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        return Ok(manifest_dir.join("..").join("tmp").join("dev-tasklet"));
    }

    if let Some(project) = &*PROJECT_DIRS {
        return Ok(project.data_local_dir().join("logs"));
    }

    if let Some(base) = BaseDirs::new() {
        return Ok(base.home_dir().join(".tasklet"));
    }

    Ok(env::current_dir()?.join(".tasklet"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn override_wins_and_is_created() {
        let dir = TempDir::new().expect("temp dir");
        let target = dir.path().join("nested").join("logs");

        let config = AppConfig::discover(Some(target.clone())).expect("config");

        assert!(target.is_dir());
        assert_eq!(config.log_dir(), target.as_path());
        assert_eq!(config.log_path(), target.join("tasklet.log").as_path());
    }

    #[test]
    fn env_dir_is_used_unless_blank() {
        let dir = TempDir::new().expect("temp dir");
        let target = dir.path().join("from-env");

        env::set_var(ENV_LOG_DIR, &target);
        let config = AppConfig::discover(None);
        let blank_dir = {
            env::set_var(ENV_LOG_DIR, "   ");
            resolve_log_dir(None)
        };
        env::remove_var(ENV_LOG_DIR);

        let config = config.expect("config");
        assert_eq!(config.log_dir(), target.as_path());
        assert!(target.is_dir());

        let blank_dir = blank_dir.expect("fallback dir");
        assert_ne!(blank_dir, PathBuf::from("   "));
        assert_ne!(blank_dir, target);
    }

    #[test]
    fn from_log_dir_does_not_touch_disk() {
        let dir = TempDir::new().expect("temp dir");
        let target = dir.path().join("missing");

        let config = AppConfig::from_log_dir(target.clone()).expect("config");

        assert!(!target.exists());
        assert_eq!(config.log_path(), target.join("tasklet.log").as_path());
    }
}
