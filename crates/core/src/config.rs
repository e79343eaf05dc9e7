//! Application configuration
//!
//! Loaded from an optional TOML file and passed explicitly to whatever needs
//! it. Every field has a default, so an absent file is not an error.
//!
//! ```toml
//! database_path = "/home/me/.local/share/spendwise/spendwise.db"
//! log_file = "/tmp/spendwise.log"
//! log_level = "debug"
//!
//! [auth]
//! max_failed_attempts = 5
//! lockout_minutes = 30
//! ```

use std::path::{Path, PathBuf};

use chrono::Duration;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DATABASE_FILE: &str = "spendwise.db";
const LOG_FILE: &str = "spendwise.log";

/// Longest accepted lockout window, one year
pub const MAX_LOCKOUT_MINUTES: i64 = 60 * 24 * 365;

/// Lockout rules applied by the authenticator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthPolicy {
    /// Consecutive failures that lock an account
    pub max_failed_attempts: u32,
    /// Length of the lockout window
    pub lockout_minutes: i64,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_minutes: 30,
        }
    }
}

impl AuthPolicy {
    /// `None` when `lockout_minutes` does not fit a [`Duration`]
    pub fn lockout_duration(&self) -> Option<Duration> {
        Duration::try_minutes(self.lockout_minutes)
    }

    /// Reject policies that could never lock or never unlock
    pub fn validate(&self) -> Result<()> {
        if self.max_failed_attempts == 0 {
            return Err(Error::InvalidConfig(
                "auth.max_failed_attempts must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_LOCKOUT_MINUTES).contains(&self.lockout_minutes) {
            return Err(Error::InvalidConfig(format!(
                "auth.lockout_minutes must be between 1 and {}",
                MAX_LOCKOUT_MINUTES
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    pub auth: AuthPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            log_file: None,
            log_level: "info".to_string(),
            auth: AuthPolicy::default(),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.auth.validate()?;
        Ok(config)
    }

    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join(DATABASE_FILE)),
        }
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join(LOG_FILE)),
        }
    }

    fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "onyx", "spendwise").ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.auth.max_failed_attempts, 5);
        assert_eq!(config.auth.lockout_duration(), Some(Duration::minutes(30)));
    }

    #[test]
    fn test_partial_auth_table() {
        let config = Config::from_toml(
            r#"
            log_level = "debug"
            database_path = "/tmp/ledger.db"

            [auth]
            lockout_minutes = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/ledger.db"));
        assert_eq!(config.auth.lockout_minutes, 5);
        assert_eq!(config.auth.max_failed_attempts, 5);
    }

    #[test]
    fn test_malformed_file() {
        let result = Config::from_toml("log_level = [");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_out_of_range_policy() {
        for auth in [
            "max_failed_attempts = 0",
            "lockout_minutes = 0",
            "lockout_minutes = -5",
            "lockout_minutes = 9223372036854775807",
        ] {
            let result = Config::from_toml(&format!("[auth]\n{}\n", auth));
            assert!(
                matches!(result, Err(Error::InvalidConfig(_))),
                "accepted {}",
                auth
            );
        }

        let longest = format!("[auth]\nlockout_minutes = {}\n", MAX_LOCKOUT_MINUTES);
        assert!(Config::from_toml(&longest).is_ok());
    }

    #[test]
    fn test_unrepresentable_lockout_duration() {
        let policy = AuthPolicy {
            max_failed_attempts: 5,
            lockout_minutes: i64::MAX,
        };
        assert_eq!(policy.lockout_duration(), None);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[auth]\nmax_failed_attempts = 3\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.auth.max_failed_attempts, 3);
    }
}
