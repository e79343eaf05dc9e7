//! Schema migrations
//!
//! Each migration runs in its own transaction together with its
//! `schema_migrations` row, so a failed step leaves the previous version
//! intact.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, info, instrument};

use crate::error::Result;

/// One schema step; versions start at 1 and have no gaps
pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Accounts and their login bookkeeping
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_login TEXT,
                failed_login_attempts INTEGER NOT NULL DEFAULT 0 CHECK(failed_login_attempts >= 0),
                locked_until TEXT,
                is_active INTEGER NOT NULL DEFAULT 1
            );

            -- Expenses table (soft deleted via is_active)
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL CHECK(length(name) > 0),
                amount_cents INTEGER NOT NULL CHECK(amount_cents > 0),
                category TEXT NOT NULL DEFAULT 'General',
                recurring INTEGER NOT NULL DEFAULT 0,
                schedule TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );

            -- Append-only audit trail
            CREATE TABLE IF NOT EXISTS expense_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                expense_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                amount_cents INTEGER NOT NULL CHECK(amount_cents > 0),
                action TEXT NOT NULL CHECK(action IN ('CREATE', 'UPDATE', 'DELETE')),
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (expense_id) REFERENCES expenses(id) ON DELETE CASCADE
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for per-user queries",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_expenses_user_active ON expenses(user_id, is_active);
            CREATE INDEX IF NOT EXISTS idx_history_user ON expense_history(user_id, created_at);
            CREATE INDEX IF NOT EXISTS idx_history_expense ON expense_history(expense_id);
        "#,
    },
];

const VERSION_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    description TEXT NOT NULL,
    applied_at TEXT NOT NULL
)";

/// Highest applied version, 0 for a fresh database
pub(crate) fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| row.get(0))?;
    Ok(version.unwrap_or_default())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        params![migration.version, migration.description, Utc::now().to_rfc3339()],
    )?;
    tx.commit()?;
    Ok(())
}

/// Bring the schema up to the latest version
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(VERSION_TABLE)?;

    let current = get_current_version(conn)?;
    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > current).collect();
    if pending.is_empty() {
        debug!(version = current, "Schema up to date");
        return Ok(());
    }

    for migration in pending {
        apply(conn, migration)?;
        info!(
            version = migration.version,
            description = migration.description,
            "Applied migration"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migrated() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_fresh_database_reaches_latest() {
        let conn = migrated();
        let latest = MIGRATIONS.iter().map(|m| m.version).max().unwrap();
        assert_eq!(get_current_version(&conn).unwrap(), latest);
    }

    #[test]
    fn test_rerun_applies_nothing() {
        let conn = migrated();
        run_migrations(&conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows as usize, MIGRATIONS.len());
    }

    #[test]
    fn test_versions_have_no_gaps() {
        let versions: Vec<u32> = MIGRATIONS.iter().map(|m| m.version).collect();
        let expected: Vec<u32> = (1..=MIGRATIONS.len() as u32).collect();
        assert_eq!(versions, expected);
    }

    #[test]
    fn test_history_action_constraint() {
        let conn = migrated();

        conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES ('bob', 'h', 'now')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO expenses (user_id, name, amount_cents, created_at, updated_at)
             VALUES (1, 'Tea', 300, 'now', 'now')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO expense_history
             (user_id, expense_id, date, amount_cents, action, created_at)
             VALUES (1, 1, '2024-01-01', 300, 'PURGE', 'now')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_failed_attempts_rejected() {
        let conn = migrated();
        let result = conn.execute(
            "INSERT INTO users (username, password_hash, created_at, failed_login_attempts)
             VALUES ('eve', 'h', 'now', -1)",
            [],
        );
        assert!(result.is_err());
    }
}
