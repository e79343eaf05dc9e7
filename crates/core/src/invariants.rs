//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::{Expense, NewExpense, User};

/// Validate that a user's login bookkeeping is consistent
pub fn assert_user_invariants(user: &User) {
    // A lockout is only ever set by a failed attempt
    debug_assert!(
        user.locked_until.is_none() || user.failed_login_attempts > 0,
        "User {} is locked until {:?} with no failed attempts",
        user.id,
        user.locked_until
    );

    debug_assert!(!user.username.trim().is_empty(), "User {} has empty username", user.id);
}

/// Validate a stored expense
pub fn assert_expense_invariants(expense: &Expense) {
    debug_assert!(
        expense.recurring == expense.schedule.is_some(),
        "Expense {} recurring={} but schedule={:?}",
        expense.id,
        expense.recurring,
        expense.schedule
    );

    debug_assert!(
        expense.amount.cents() > 0,
        "Expense {} has non-positive amount {}",
        expense.id,
        expense.amount
    );
}

/// Validate expense fields before they are written
pub fn assert_new_expense_invariants(expense: &NewExpense) {
    debug_assert!(
        expense.recurring == expense.schedule.is_some(),
        "New expense recurring={} but schedule={:?}",
        expense.recurring,
        expense.schedule
    );

    debug_assert!(!expense.name.is_empty(), "New expense has empty name");

    debug_assert!(
        expense.amount.cents() > 0,
        "New expense has non-positive amount {}",
        expense.amount
    );
}
