//! Registration, login and account lockout
//!
//! Each user is `Active`, `Locked(until)` or `Inactive`. Repeated failed
//! logins lock an account for a fixed window; the lock is not lifted by a
//! timer but checked lazily on the next attempt. Every login attempt writes
//! at most one update to the user's row.
//!
//! Unknown usernames, inactive accounts and wrong passwords all fail with the
//! same [`Error::Authentication`], so callers cannot discover which usernames exist.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::config::AuthPolicy;
use crate::error::{Error, Result};
use crate::models::{AccountState, NewUser, Session, UserId, UserUpdate};
use crate::password::{dummy_hash, hash_password, verify_password};
use crate::storage::UserRepository;
use crate::validate::{validate_password, validate_username};

pub struct Authenticator<'a, R: UserRepository + ?Sized> {
    repo: &'a R,
    policy: AuthPolicy,
}

impl<'a, R: UserRepository + ?Sized> Authenticator<'a, R> {
    pub fn new(repo: &'a R, policy: AuthPolicy) -> Self {
        Self { repo, policy }
    }

    /// Create a new active account
    #[instrument(skip(self, password))]
    pub fn register(&self, username: &str, password: &str) -> Result<UserId> {
        let username = validate_username(username)?;
        validate_password(password)?;

        if self.repo.find_user_by_username(&username)?.is_some() {
            debug!("Username already taken");
            return Err(Error::DuplicateUser);
        }

        let password_hash = hash_password(password)?;
        let user_id = self
            .repo
            .insert_user(&NewUser::new(username.clone(), password_hash))?;

        info!(%user_id, %username, "User registered");
        Ok(user_id)
    }

    /// Authenticate against the current time
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        self.login_at(username, password, Utc::now())
    }

    /// Authenticate, evaluating lockout state at `now`
    #[instrument(skip(self, password, now))]
    pub fn login_at(&self, username: &str, password: &str, now: DateTime<Utc>) -> Result<Session> {
        let Ok(username) = validate_username(username) else {
            debug!("Rejected malformed username");
            spend_verify_time(password);
            return Err(Error::Authentication);
        };

        let Some(user) = self.repo.find_user_by_username(&username)? else {
            debug!(%username, "Login for unknown user");
            spend_verify_time(password);
            return Err(Error::Authentication);
        };

        let mut failed_attempts = user.failed_login_attempts;
        let mut lock_expired = false;

        match user.state() {
            AccountState::Inactive => {
                warn!(user_id = %user.id, "Login attempt on inactive account");
                spend_verify_time(password);
                return Err(Error::Authentication);
            }
            AccountState::Locked(until) if now < until => {
                warn!(user_id = %user.id, %until, "Login attempt on locked account");
                return Err(Error::AccountLocked {
                    remaining: until - now,
                });
            }
            AccountState::Locked(until) => {
                info!(user_id = %user.id, %until, "Lockout expired");
                failed_attempts = 0;
                lock_expired = true;
            }
            AccountState::Active => {}
        }

        if !verify_password(password, &user.password_hash) {
            failed_attempts = failed_attempts.saturating_add(1);

            let locked_until = if failed_attempts >= self.policy.max_failed_attempts {
                let until = self
                    .policy
                    .lockout_duration()
                    .and_then(|window| now.checked_add_signed(window))
                    .ok_or_else(|| {
                        Error::InvalidConfig(format!(
                            "lockout of {} minutes cannot be represented",
                            self.policy.lockout_minutes
                        ))
                    })?;
                warn!(user_id = %user.id, failed_attempts, %until, "Account locked");
                Some(Some(until))
            } else if lock_expired {
                Some(None)
            } else {
                None
            };

            self.repo.update_user(
                user.id,
                &UserUpdate {
                    failed_login_attempts: Some(failed_attempts),
                    locked_until,
                    last_login: None,
                },
            )?;

            warn!(user_id = %user.id, failed_attempts, "Failed login");
            return Err(Error::Authentication);
        }

        self.repo.update_user(
            user.id,
            &UserUpdate {
                failed_login_attempts: Some(0),
                locked_until: Some(None),
                last_login: Some(now),
            },
        )?;

        let session = Session::new(user.id, user.username, now);
        info!(user_id = %session.user_id, session_id = %session.id, "User logged in");
        Ok(session)
    }
}

/// Run a full verification against a throwaway hash, so a failure without a
/// stored hash costs as much as a wrong password
fn spend_verify_time(password: &str) {
    let _ = verify_password(password, dummy_hash());
}
