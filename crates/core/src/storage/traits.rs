//! Storage repository traits
//!
//! These traits define the storage interface, allowing the authenticator and
//! ledger to run against SQLite or a test double.

use crate::error::Result;
use crate::models::{
    Amount, Expense, ExpenseId, HistoryEntry, NewExpense, NewUser, User, UserId, UserUpdate,
};

/// User record operations
pub trait UserRepository {
    /// Find user by username
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Find user by ID
    fn find_user_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Insert a new user; a taken username fails with `DuplicateUser`
    fn insert_user(&self, user: &NewUser) -> Result<UserId>;

    /// Partially update the login bookkeeping of a user
    fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<()>;
}

/// Expense ledger operations, always scoped to one user
pub trait ExpenseRepository {
    /// Create an expense, recording a CREATE history row
    fn create_expense(&self, user_id: UserId, expense: &NewExpense) -> Result<ExpenseId>;

    /// Find an active expense owned by the user
    fn find_active_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Option<Expense>>;

    /// List active expenses, newest first
    fn list_active_expenses(&self, user_id: UserId) -> Result<Vec<Expense>>;

    /// Update an active expense, recording an UPDATE history row
    fn update_expense(&self, user_id: UserId, id: ExpenseId, expense: &NewExpense) -> Result<()>;

    /// Soft delete an active expense, recording a DELETE history row
    fn remove_expense(&self, user_id: UserId, id: ExpenseId) -> Result<()>;

    /// Sum of active expense amounts
    fn total_active_expenses(&self, user_id: UserId) -> Result<Amount>;
}

/// Read access to the append-only history
pub trait HistoryRepository {
    /// All history rows of a user, newest first
    fn list_history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>>;

    /// History rows of one expense, newest first
    fn list_expense_history(&self, user_id: UserId, expense_id: ExpenseId)
        -> Result<Vec<HistoryEntry>>;
}
