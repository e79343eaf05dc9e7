//! Append-only expense audit history

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, ExpenseId, UserId};

/// Kind of change recorded in the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryAction {
    Create,
    Update,
    Delete,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Create => "CREATE",
            HistoryAction::Update => "UPDATE",
            HistoryAction::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for HistoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(HistoryAction::Create),
            "UPDATE" => Ok(HistoryAction::Update),
            "DELETE" => Ok(HistoryAction::Delete),
            other => Err(format!("unknown history action '{}'", other)),
        }
    }
}

/// One row of the audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub user_id: UserId,
    pub expense_id: ExpenseId,
    pub date: NaiveDate,
    pub amount: Amount,
    pub action: HistoryAction,
    pub created_at: DateTime<Utc>,
}
