//! User model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Numeric user identifier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A local user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub failed_login_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl User {
    /// Stored authentication state of this account
    pub fn state(&self) -> AccountState {
        if !self.is_active {
            return AccountState::Inactive;
        }
        match self.locked_until {
            Some(until) => AccountState::Locked(until),
            None => AccountState::Active,
        }
    }

    /// A user is locked iff the lockout expiry lies in the future
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }
}

/// Per-user authentication state
///
/// `Locked` carries the stored expiry even once it has passed; the lockout is
/// cleared lazily by the next login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    Active,
    Locked(DateTime<Utc>),
    Inactive,
}

/// A user row that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl NewUser {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            created_at: Utc::now(),
            is_active: true,
        }
    }
}

/// Partial update of the login bookkeeping columns
///
/// `None` leaves a column untouched; `locked_until: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub failed_login_attempts: Option<u32>,
    pub locked_until: Option<Option<DateTime<Utc>>>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.failed_login_attempts.is_none()
            && self.locked_until.is_none()
            && self.last_login.is_none()
    }
}

/// Authenticated session for a logged-in user
///
/// Lives only in memory; the ledger scopes every operation to `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: UserId,
    pub username: String,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: UserId, username: String, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            username,
            started_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_user() -> User {
        User {
            id: UserId(1),
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
            last_login: None,
            failed_login_attempts: 0,
            locked_until: None,
            is_active: true,
        }
    }

    #[test]
    fn test_state_transitions() {
        let now = Utc::now();
        let mut user = make_user();
        assert_eq!(user.state(), AccountState::Active);

        user.locked_until = Some(now + Duration::minutes(30));
        assert_eq!(user.state(), AccountState::Locked(now + Duration::minutes(30)));
        assert!(user.is_locked(now));
        assert!(!user.is_locked(now + Duration::minutes(30)));

        user.is_active = false;
        assert_eq!(user.state(), AccountState::Inactive);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_string(&make_user()).unwrap();
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_empty_update() {
        assert!(UserUpdate::default().is_empty());
        let update = UserUpdate {
            locked_until: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
