//! Expense model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;
use crate::error::ValidationError;
use crate::validate::{
    validate_amount, validate_category, validate_expense_name, validate_schedule, AmountInput,
};

/// Numeric expense identifier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExpenseId(pub i64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monetary amount in whole cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    /// Largest accepted amount, 999,999.99
    pub const MAX: Amount = Amount(99_999_999);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let text = format!("{}{}.{:02}", sign, abs / 100, abs % 100);
        f.pad(&text)
    }
}

/// Recurrence schedule of a recurring expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Schedule {
    pub const ALL: [Schedule; 4] = [
        Schedule::Daily,
        Schedule::Weekly,
        Schedule::Monthly,
        Schedule::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Schedule::Daily => "daily",
            Schedule::Weekly => "weekly",
            Schedule::Monthly => "monthly",
            Schedule::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Schedule {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Schedule::Daily),
            "weekly" => Ok(Schedule::Weekly),
            "monthly" => Ok(Schedule::Monthly),
            "yearly" => Ok(Schedule::Yearly),
            other => Err(ValidationError::InvalidFormat(format!(
                "Schedule must be one of daily, weekly, monthly, yearly (got '{}')",
                other
            ))),
        }
    }
}

/// A stored expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub user_id: UserId,
    pub name: String,
    pub amount: Amount,
    pub category: String,
    pub recurring: bool,
    pub schedule: Option<Schedule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Raw, untrusted expense fields as typed by the user
#[derive(Debug, Clone, Default)]
pub struct ExpenseInput {
    pub name: String,
    pub amount: String,
    pub category: Option<String>,
    pub recurring: bool,
    pub schedule: Option<String>,
}

impl ExpenseInput {
    /// Sanitize and validate every field
    pub fn validate(&self) -> Result<NewExpense, ValidationError> {
        let name = validate_expense_name(&self.name)?;
        let amount = validate_amount(AmountInput::Text(&self.amount))?;
        let category = validate_category(self.category.as_deref());
        let schedule = validate_schedule(self.recurring, self.schedule.as_deref())?;

        Ok(NewExpense {
            name,
            amount,
            category,
            recurring: self.recurring,
            schedule,
        })
    }
}

/// Validated expense fields, ready for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub name: String,
    pub amount: Amount,
    pub category: String,
    pub recurring: bool,
    pub schedule: Option<Schedule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_display() {
        assert_eq!(Amount::from_cents(5).to_string(), "0.05");
        assert_eq!(Amount::from_cents(123_456).to_string(), "1234.56");
        assert_eq!(Amount::MAX.to_string(), "999999.99");
        assert_eq!(format!("{:>8}", Amount::from_cents(150)), "    1.50");
    }

    #[test]
    fn test_schedule_parse_case_insensitive() {
        assert_eq!("MONTHLY".parse::<Schedule>().unwrap(), Schedule::Monthly);
        assert_eq!(" Daily ".parse::<Schedule>().unwrap(), Schedule::Daily);
        assert!("fortnightly".parse::<Schedule>().is_err());
    }

    #[test]
    fn test_input_validation() {
        let input = ExpenseInput {
            name: "  <b>Rent</b> ".to_string(),
            amount: "1200.5".to_string(),
            category: Some(String::new()),
            recurring: true,
            schedule: Some("MONTHLY".to_string()),
        };

        let expense = input.validate().unwrap();
        assert_eq!(expense.name, "bRent/b");
        assert_eq!(expense.amount, Amount::from_cents(120_050));
        assert_eq!(expense.category, "General");
        assert_eq!(expense.schedule, Some(Schedule::Monthly));
    }

    #[test]
    fn test_input_rejects_schedule_without_recurring() {
        let input = ExpenseInput {
            name: "Coffee".to_string(),
            amount: "3".to_string(),
            category: None,
            recurring: false,
            schedule: Some("daily".to_string()),
        };

        assert!(matches!(
            input.validate(),
            Err(ValidationError::InvalidFormat(_))
        ));
    }
}
