//! Spendwise Core Library
//!
//! Accounts, authentication with lockout, input validation and the expense
//! ledger for the Spendwise command-line tracker.

pub mod auth;
pub mod config;
pub mod error;
pub mod invariants;
pub mod ledger;
pub mod models;
pub mod password;
pub mod storage;
pub mod validate;

pub use auth::Authenticator;
pub use config::{AuthPolicy, Config};
pub use error::{Error, Result, ValidationError};
pub use ledger::Ledger;
pub use models::*;
pub use password::{hash_password, verify_password};
pub use storage::{Database, ExpenseRepository, HistoryRepository, UserRepository};
pub use validate::{
    sanitize_input, validate_amount, validate_category, validate_expense_name, validate_password,
    validate_schedule, validate_username, AmountInput,
};
