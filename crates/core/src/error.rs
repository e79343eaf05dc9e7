//! Error types for Spendwise Core

use thiserror::Error;

/// Typed failure reported by the input validators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Username already exists")]
    DuplicateUser,

    /// Shared by unknown users, inactive accounts and wrong passwords
    #[error("Invalid username or password")]
    Authentication,

    #[error("Account is temporarily locked, try again in {} minute(s)", minutes_ceil(.remaining))]
    AccountLocked { remaining: chrono::Duration },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for failures the caller should answer by re-prompting
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::DuplicateUser
                | Error::Authentication
                | Error::AccountLocked { .. }
                | Error::NotFound(_)
        )
    }
}

fn minutes_ceil(remaining: &chrono::Duration) -> i64 {
    let secs = remaining.num_seconds().max(0);
    (secs + 59) / 60
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_message_rounds_minutes_up() {
        let err = Error::AccountLocked {
            remaining: chrono::Duration::seconds(61),
        };
        assert_eq!(
            err.to_string(),
            "Account is temporarily locked, try again in 2 minute(s)"
        );
    }

    #[test]
    fn validation_errors_are_recoverable() {
        let err: Error = ValidationError::OutOfRange("too big".into()).into();
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Out of range: too big");
        assert!(!Error::Hashing("boom".into()).is_recoverable());
    }
}
