//! Expense history storage
//!
//! Rows are only ever inserted.

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use super::parse::{parse_action, parse_date, parse_datetime};
use crate::error::Result;
use crate::models::{Amount, ExpenseId, HistoryAction, HistoryEntry, UserId};

pub struct HistoryStore<'a> {
    conn: &'a Connection,
}

impl<'a> HistoryStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append a history row
    pub fn record(
        &self,
        user_id: UserId,
        expense_id: ExpenseId,
        action: HistoryAction,
        amount: Amount,
    ) -> Result<i64> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO expense_history
             (user_id, expense_id, date, amount_cents, action, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id.0,
                expense_id.0,
                now.date_naive().format("%Y-%m-%d").to_string(),
                amount.cents(),
                action.as_str(),
                now.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All history rows for a user, newest first
    pub fn list_for_user(&self, user_id: UserId) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, expense_id, date, amount_cents, action, created_at
             FROM expense_history WHERE user_id = ?1
             ORDER BY id DESC",
        )?;
        let entries = stmt
            .query_map(params![user_id.0], map_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// History rows of one expense, newest first
    pub fn list_for_expense(
        &self,
        user_id: UserId,
        expense_id: ExpenseId,
    ) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, expense_id, date, amount_cents, action, created_at
             FROM expense_history WHERE user_id = ?1 AND expense_id = ?2
             ORDER BY id DESC",
        )?;
        let entries = stmt
            .query_map(params![user_id.0, expense_id.0], map_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn map_entry(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        expense_id: ExpenseId(row.get(2)?),
        date: parse_date(&row.get::<_, String>(3)?)?,
        amount: Amount::from_cents(row.get(4)?),
        action: parse_action(&row.get::<_, String>(5)?)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?)?,
    })
}
