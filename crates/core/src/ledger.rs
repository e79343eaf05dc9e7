//! Expense ledger scoped to an authenticated session

use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::models::{Amount, Expense, ExpenseId, ExpenseInput, HistoryEntry, Session};
use crate::storage::{ExpenseRepository, HistoryRepository};

/// CRUD over the logged-in user's expenses
///
/// Only constructible from a [`Session`], so every call is implicitly
/// authenticated and can never touch another user's rows.
pub struct Ledger<'a, S: ExpenseRepository + HistoryRepository + ?Sized> {
    store: &'a S,
    session: &'a Session,
}

impl<'a, S: ExpenseRepository + HistoryRepository + ?Sized> Ledger<'a, S> {
    pub fn new(store: &'a S, session: &'a Session) -> Self {
        Self { store, session }
    }

    pub fn session(&self) -> &Session {
        self.session
    }

    #[instrument(skip(self, input), fields(user_id = %self.session.user_id))]
    pub fn add_expense(&self, input: &ExpenseInput) -> Result<ExpenseId> {
        let expense = input.validate()?;
        let id = self.store.create_expense(self.session.user_id, &expense)?;
        info!(expense_id = %id, amount = %expense.amount, "Expense added");
        Ok(id)
    }

    pub fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.store.list_active_expenses(self.session.user_id)
    }

    pub fn get_expense(&self, id: ExpenseId) -> Result<Expense> {
        self.store
            .find_active_expense(self.session.user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {} not found or access denied", id)))
    }

    #[instrument(skip(self, input), fields(user_id = %self.session.user_id))]
    pub fn update_expense(&self, id: ExpenseId, input: &ExpenseInput) -> Result<()> {
        let expense = input.validate()?;
        self.store
            .update_expense(self.session.user_id, id, &expense)?;
        info!(expense_id = %id, "Expense updated");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %self.session.user_id))]
    pub fn remove_expense(&self, id: ExpenseId) -> Result<()> {
        self.store.remove_expense(self.session.user_id, id)?;
        info!(expense_id = %id, "Expense removed");
        Ok(())
    }

    pub fn total(&self) -> Result<Amount> {
        self.store.total_active_expenses(self.session.user_id)
    }

    /// Audit trail, optionally narrowed to one expense
    pub fn history(&self, expense_id: Option<ExpenseId>) -> Result<Vec<HistoryEntry>> {
        match expense_id {
            Some(id) => self.store.list_expense_history(self.session.user_id, id),
            None => self.store.list_history(self.session.user_id),
        }
    }

    /// Active expenses as pretty-printed JSON
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.list_expenses()?)?)
    }
}
