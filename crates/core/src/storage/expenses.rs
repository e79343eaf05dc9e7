//! Expense storage operations
//!
//! Every write appends to the history inside the same transaction, so the
//! audit trail never disagrees with the ledger.

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;

use super::history::HistoryStore;
use super::parse::{parse_datetime, parse_schedule_opt, OptionalExt};
use crate::error::{Error, Result};
use crate::invariants::{assert_expense_invariants, assert_new_expense_invariants};
use crate::models::{Amount, Expense, ExpenseId, HistoryAction, NewExpense, UserId};

const EXPENSE_COLUMNS: &str = "id, user_id, name, amount_cents, category, recurring, schedule, \
     created_at, updated_at, is_active";

pub struct ExpenseStore<'a> {
    conn: &'a Connection,
}

impl<'a> ExpenseStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create an expense and record it in the history
    #[instrument(skip(self, expense), fields(name = %expense.name))]
    pub fn create(&self, user_id: UserId, expense: &NewExpense) -> Result<ExpenseId> {
        assert_new_expense_invariants(expense);
        let now = Utc::now().to_rfc3339();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO expenses
             (user_id, name, amount_cents, category, recurring, schedule,
              created_at, updated_at, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, 1)",
            params![
                user_id.0,
                expense.name,
                expense.amount.cents(),
                expense.category,
                expense.recurring,
                expense.schedule.map(|s| s.as_str()),
                now,
            ],
        )?;
        let id = ExpenseId(tx.last_insert_rowid());

        HistoryStore::new(&tx).record(user_id, id, HistoryAction::Create, expense.amount)?;
        tx.commit()?;

        Ok(id)
    }

    /// Find an active expense owned by `user_id`
    #[instrument(skip(self))]
    pub fn find_active(&self, user_id: UserId, id: ExpenseId) -> Result<Option<Expense>> {
        let sql = format!(
            "SELECT {} FROM expenses WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
            EXPENSE_COLUMNS
        );
        let expense = self
            .conn
            .query_row(&sql, params![id.0, user_id.0], map_expense)
            .optional()?;
        Ok(expense)
    }

    /// List active expenses, newest first
    #[instrument(skip(self))]
    pub fn list_active(&self, user_id: UserId) -> Result<Vec<Expense>> {
        let sql = format!(
            "SELECT {} FROM expenses WHERE user_id = ?1 AND is_active = 1
             ORDER BY created_at DESC, id DESC",
            EXPENSE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(params![user_id.0], map_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Replace the fields of an active expense
    #[instrument(skip(self, expense))]
    pub fn update(&self, user_id: UserId, id: ExpenseId, expense: &NewExpense) -> Result<()> {
        assert_new_expense_invariants(expense);

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE expenses
             SET name = ?1, amount_cents = ?2, category = ?3, recurring = ?4, schedule = ?5,
                 updated_at = ?6
             WHERE id = ?7 AND user_id = ?8 AND is_active = 1",
            params![
                expense.name,
                expense.amount.cents(),
                expense.category,
                expense.recurring,
                expense.schedule.map(|s| s.as_str()),
                Utc::now().to_rfc3339(),
                id.0,
                user_id.0,
            ],
        )?;
        if changed == 0 {
            return Err(not_found(id));
        }

        HistoryStore::new(&tx).record(user_id, id, HistoryAction::Update, expense.amount)?;
        tx.commit()?;
        Ok(())
    }

    /// Soft delete an active expense
    #[instrument(skip(self))]
    pub fn soft_delete(&self, user_id: UserId, id: ExpenseId) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let amount: Option<i64> = tx
            .query_row(
                "SELECT amount_cents FROM expenses
                 WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
                params![id.0, user_id.0],
                |row| row.get(0),
            )
            .optional()?;
        let Some(amount) = amount else {
            return Err(not_found(id));
        };

        tx.execute(
            "UPDATE expenses SET is_active = 0, updated_at = ?1 WHERE id = ?2",
            params![Utc::now().to_rfc3339(), id.0],
        )?;

        HistoryStore::new(&tx).record(
            user_id,
            id,
            HistoryAction::Delete,
            Amount::from_cents(amount),
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Sum of active expense amounts
    pub fn total_active(&self, user_id: UserId) -> Result<Amount> {
        let cents: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM expenses
             WHERE user_id = ?1 AND is_active = 1",
            params![user_id.0],
            |row| row.get(0),
        )?;
        Ok(Amount::from_cents(cents))
    }
}

/// Missing and foreign expenses are reported the same way
fn not_found(id: ExpenseId) -> Error {
    Error::NotFound(format!("Expense {} not found or access denied", id))
}

fn map_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let expense = Expense {
        id: ExpenseId(row.get(0)?),
        user_id: UserId(row.get(1)?),
        name: row.get(2)?,
        amount: Amount::from_cents(row.get(3)?),
        category: row.get(4)?,
        recurring: row.get(5)?,
        schedule: parse_schedule_opt(row.get(6)?)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(8)?)?,
        is_active: row.get(9)?,
    };
    assert_expense_invariants(&expense);
    Ok(expense)
}
