//! SQLite storage layer for Spendwise

mod expenses;
mod history;
mod migrations;
mod parse;
mod traits;
mod users;

use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

use crate::error::Result;
use crate::models::{
    Amount, Expense, ExpenseId, HistoryEntry, NewExpense, NewUser, User, UserId, UserUpdate,
};

pub use expenses::ExpenseStore;
pub use history::HistoryStore;
pub use traits::{ExpenseRepository, HistoryRepository, UserRepository};
pub use users::UserStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> Result<u32> {
        migrations::get_current_version(&self.conn)
    }

    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.conn)
    }

    pub fn expenses(&self) -> ExpenseStore<'_> {
        ExpenseStore::new(&self.conn)
    }

    pub fn history(&self) -> HistoryStore<'_> {
        HistoryStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl UserRepository for Database {
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users().find_by_username(username)
    }

    fn find_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        self.users().find_by_id(id)
    }

    fn insert_user(&self, user: &NewUser) -> Result<UserId> {
        self.users().insert(user)
    }

    fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<()> {
        self.users().update(id, update)
    }
}

impl ExpenseRepository for Database {
    fn create_expense(&self, user_id: UserId, expense: &NewExpense) -> Result<ExpenseId> {
        self.expenses().create(user_id, expense)
    }

    fn find_active_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Option<Expense>> {
        self.expenses().find_active(user_id, id)
    }

    fn list_active_expenses(&self, user_id: UserId) -> Result<Vec<Expense>> {
        self.expenses().list_active(user_id)
    }

    fn update_expense(&self, user_id: UserId, id: ExpenseId, expense: &NewExpense) -> Result<()> {
        self.expenses().update(user_id, id, expense)
    }

    fn remove_expense(&self, user_id: UserId, id: ExpenseId) -> Result<()> {
        self.expenses().soft_delete(user_id, id)
    }

    fn total_active_expenses(&self, user_id: UserId) -> Result<Amount> {
        self.expenses().total_active(user_id)
    }
}

impl HistoryRepository for Database {
    fn list_history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>> {
        self.history().list_for_user(user_id)
    }

    fn list_expense_history(
        &self,
        user_id: UserId,
        expense_id: ExpenseId,
    ) -> Result<Vec<HistoryEntry>> {
        self.history().list_for_expense(user_id, expense_id)
    }
}
