//! User storage operations

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use tracing::instrument;

use super::parse::{parse_datetime, parse_datetime_opt, OptionalExt};
use crate::error::{Error, Result};
use crate::invariants::assert_user_invariants;
use crate::models::{NewUser, User, UserId, UserUpdate};

const USER_COLUMNS: &str = "id, username, password_hash, created_at, last_login, \
     failed_login_attempts, locked_until, is_active";

pub struct UserStore<'a> {
    conn: &'a Connection,
}

impl<'a> UserStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a new user, returning the assigned id
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub fn insert(&self, user: &NewUser) -> Result<UserId> {
        let inserted = self.conn.execute(
            "INSERT INTO users (username, password_hash, created_at, is_active)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user.username,
                user.password_hash,
                user.created_at.to_rfc3339(),
                user.is_active,
            ],
        );

        match inserted {
            Ok(_) => Ok(UserId(self.conn.last_insert_rowid())),
            Err(e) if is_unique_violation(&e) => Err(Error::DuplicateUser),
            Err(e) => Err(e.into()),
        }
    }

    /// Find user by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let user = self
            .conn
            .query_row(&sql, params![id.0], map_user)
            .optional()?;
        Ok(user)
    }

    /// Find user by username
    #[instrument(skip(self))]
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS);
        let user = self
            .conn
            .query_row(&sql, params![username], map_user)
            .optional()?;
        Ok(user)
    }

    /// Apply a partial update to the login bookkeeping columns
    #[instrument(skip(self))]
    pub fn update(&self, id: UserId, update: &UserUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut assignments = Vec::new();
        let mut values = Vec::new();

        if let Some(attempts) = update.failed_login_attempts {
            assignments.push("failed_login_attempts = ?");
            values.push(Value::Integer(i64::from(attempts)));
        }
        if let Some(locked_until) = update.locked_until {
            assignments.push("locked_until = ?");
            values.push(match locked_until {
                Some(until) => Value::Text(until.to_rfc3339()),
                None => Value::Null,
            });
        }
        if let Some(last_login) = update.last_login {
            assignments.push("last_login = ?");
            values.push(Value::Text(last_login.to_rfc3339()));
        }
        values.push(Value::Integer(id.0));

        let sql = format!("UPDATE users SET {} WHERE id = ?", assignments.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(Error::NotFound(format!("user {}", id)));
        }
        Ok(())
    }
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let user = User {
        id: UserId(row.get(0)?),
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?)?,
        last_login: parse_datetime_opt(row.get(4)?)?,
        failed_login_attempts: row.get(5)?,
        locked_until: parse_datetime_opt(row.get(6)?)?,
        is_active: row.get(7)?,
    };
    assert_user_invariants(&user);
    Ok(user)
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::storage::Database;

    fn new_user(username: &str) -> NewUser {
        NewUser::new(username.to_string(), "hash".to_string())
    }

    #[test]
    fn test_insert_and_find() {
        let db = Database::open_in_memory().unwrap();
        let store = UserStore::new(&db.conn);

        let id = store.insert(&new_user("alice")).unwrap();
        let user = store.find_by_username("alice").unwrap().unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.failed_login_attempts, 0);
        assert!(user.locked_until.is_none());
        assert!(user.last_login.is_none());
        assert!(user.is_active);
        assert_eq!(store.find_by_id(id).unwrap().unwrap().username, "alice");
    }

    #[test]
    fn test_duplicate_username() {
        let db = Database::open_in_memory().unwrap();
        let store = UserStore::new(&db.conn);

        store.insert(&new_user("alice")).unwrap();
        let result = store.insert(&new_user("alice"));
        assert!(matches!(result, Err(Error::DuplicateUser)));
    }

    #[test]
    fn test_not_found() {
        let db = Database::open_in_memory().unwrap();
        let store = UserStore::new(&db.conn);

        assert!(store.find_by_username("ghost").unwrap().is_none());
        assert!(store.find_by_id(UserId(42)).unwrap().is_none());
    }

    #[test]
    fn test_partial_update() {
        let db = Database::open_in_memory().unwrap();
        let store = UserStore::new(&db.conn);
        let id = store.insert(&new_user("alice")).unwrap();
        let until = Utc::now() + Duration::minutes(30);

        store
            .update(
                id,
                &UserUpdate {
                    failed_login_attempts: Some(5),
                    locked_until: Some(Some(until)),
                    ..Default::default()
                },
            )
            .unwrap();

        let user = store.find_by_id(id).unwrap().unwrap();
        assert_eq!(user.failed_login_attempts, 5);
        assert_eq!(user.locked_until, Some(until));
        assert!(user.last_login.is_none());

        let login = Utc::now();
        store
            .update(
                id,
                &UserUpdate {
                    failed_login_attempts: Some(0),
                    locked_until: Some(None),
                    last_login: Some(login),
                },
            )
            .unwrap();

        let user = store.find_by_id(id).unwrap().unwrap();
        assert_eq!(user.failed_login_attempts, 0);
        assert!(user.locked_until.is_none());
        assert_eq!(user.last_login, Some(login));
    }

    #[test]
    fn test_update_missing_user() {
        let db = Database::open_in_memory().unwrap();
        let store = UserStore::new(&db.conn);

        let update = UserUpdate {
            failed_login_attempts: Some(1),
            ..Default::default()
        };
        assert!(matches!(store.update(UserId(7), &update), Err(Error::NotFound(_))));
        assert!(store.update(UserId(7), &UserUpdate::default()).is_ok());
    }
}
