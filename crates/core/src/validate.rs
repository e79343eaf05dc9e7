//! Input sanitization and validation
//!
//! Every piece of untrusted input passes through here before it reaches a
//! query or the screen. All functions are pure and never panic; malformed
//! input is reported as a [`ValidationError`].
//!
//! [`sanitize_input`] removes, in order:
//! - control characters (U+0000..=U+001F and U+007F..=U+009F)
//! - the characters `<`, `>`, `"`, `'`, `;` and `\`
//! - every `--` sequence, repeatedly, until none is left
//!
//! then keeps at most [`MAX_INPUT_CHARS`] characters and trims surrounding
//! whitespace. Applying it twice gives the same result as applying it once.

use crate::error::ValidationError;
use crate::models::{Amount, Schedule};

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 128;
pub const EXPENSE_NAME_MAX_CHARS: usize = 100;
pub const CATEGORY_MAX_CHARS: usize = 50;
pub const MAX_INPUT_CHARS: usize = 1000;
pub const DEFAULT_CATEGORY: &str = "General";

const DENIED_CHARS: &[char] = &['<', '>', '"', '\'', ';', '\\'];
const SQL_COMMENT: &str = "--";

/// Raw amount as entered: either already numeric or still text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountInput<'a> {
    Number(f64),
    Text(&'a str),
}

impl From<f64> for AmountInput<'_> {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<i64> for AmountInput<'_> {
    fn from(value: i64) -> Self {
        AmountInput::Number(value as f64)
    }
}

impl<'a> From<&'a str> for AmountInput<'a> {
    fn from(value: &'a str) -> Self {
        AmountInput::Text(value)
    }
}

fn is_denied(c: char) -> bool {
    c.is_control() || DENIED_CHARS.contains(&c)
}

/// Strip characters that are dangerous in SQL or display contexts
pub fn sanitize_input(input: &str) -> String {
    let mut cleaned: String = input.chars().filter(|c| !is_denied(*c)).collect();
    while cleaned.contains(SQL_COMMENT) {
        cleaned = cleaned.replace(SQL_COMMENT, "");
    }

    let truncated: String = cleaned.chars().take(MAX_INPUT_CHARS).collect();
    truncated.trim().to_string()
}

/// Validate a username, returning it without surrounding whitespace
pub fn validate_username(username: &str) -> Result<String, ValidationError> {
    let username = username.trim();
    let len = username.chars().count();

    if len < USERNAME_MIN_CHARS {
        return Err(ValidationError::InvalidFormat(format!(
            "Username must be at least {} characters long",
            USERNAME_MIN_CHARS
        )));
    }

    if len > USERNAME_MAX_CHARS {
        return Err(ValidationError::InvalidFormat(format!(
            "Username must be at most {} characters long",
            USERNAME_MAX_CHARS
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ValidationError::InvalidFormat(
            "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
        ));
    }

    Ok(username.to_string())
}

/// Check password strength; the password itself is never altered
pub fn validate_password(password: &str) -> Result<&str, ValidationError> {
    let len = password.chars().count();

    if len < PASSWORD_MIN_CHARS {
        return Err(ValidationError::WeakPassword(format!(
            "Password must be at least {} characters long",
            PASSWORD_MIN_CHARS
        )));
    }

    if len > PASSWORD_MAX_CHARS {
        return Err(ValidationError::WeakPassword(format!(
            "Password must be at most {} characters long",
            PASSWORD_MAX_CHARS
        )));
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::WeakPassword(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ValidationError::WeakPassword(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::WeakPassword(
            "Password must contain at least one digit".to_string(),
        ));
    }

    Ok(password)
}

/// Sanitize an expense name and check its length
pub fn validate_expense_name(name: &str) -> Result<String, ValidationError> {
    let name = sanitize_input(name);
    let len = name.chars().count();

    if len == 0 {
        return Err(ValidationError::InvalidFormat(
            "Expense name cannot be empty".to_string(),
        ));
    }

    if len > EXPENSE_NAME_MAX_CHARS {
        return Err(ValidationError::InvalidFormat(format!(
            "Expense name must be at most {} characters long",
            EXPENSE_NAME_MAX_CHARS
        )));
    }

    Ok(name)
}

/// Parse and range-check an amount, rounding to whole cents
pub fn validate_amount<'a>(amount: impl Into<AmountInput<'a>>) -> Result<Amount, ValidationError> {
    let value = match amount.into() {
        AmountInput::Number(value) => value,
        AmountInput::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(ValidationError::InvalidFormat(
                    "Amount is required".to_string(),
                ));
            }
            text.parse::<f64>().map_err(|_| {
                ValidationError::InvalidFormat("Amount must be a valid number".to_string())
            })?
        }
    };

    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat(
            "Amount must be a valid number".to_string(),
        ));
    }

    if value <= 0.0 {
        return Err(ValidationError::OutOfRange(
            "Amount must be greater than 0".to_string(),
        ));
    }

    if value > Amount::MAX.as_f64() {
        return Err(ValidationError::OutOfRange(format!(
            "Amount cannot exceed {}",
            Amount::MAX
        )));
    }

    let cents = (value * 100.0).round() as i64;
    if cents <= 0 {
        return Err(ValidationError::OutOfRange(
            "Amount must be at least 0.01".to_string(),
        ));
    }

    Ok(Amount::from_cents(cents))
}

/// Sanitize a category; blank input becomes [`DEFAULT_CATEGORY`]
///
/// Categories longer than [`CATEGORY_MAX_CHARS`] are truncated, not rejected.
pub fn validate_category(category: Option<&str>) -> String {
    let cleaned = sanitize_input(category.unwrap_or_default());
    let truncated: String = cleaned.chars().take(CATEGORY_MAX_CHARS).collect();
    let truncated = truncated.trim();

    if truncated.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        truncated.to_string()
    }
}

/// Check that the schedule agrees with the recurring flag
///
/// Only surrounding whitespace and case are forgiven; anything else that is
/// not exactly a known schedule is rejected, never repaired.
pub fn validate_schedule(
    recurring: bool,
    schedule: Option<&str>,
) -> Result<Option<Schedule>, ValidationError> {
    let schedule = schedule.map(str::trim).filter(|s| !s.is_empty());

    match (recurring, schedule) {
        (false, None) => Ok(None),
        (false, Some(_)) => Err(ValidationError::InvalidFormat(
            "Only recurring expenses can have a schedule".to_string(),
        )),
        (true, None) => Err(ValidationError::InvalidFormat(
            "Recurring expenses need a schedule (daily, weekly, monthly, yearly)".to_string(),
        )),
        (true, Some(s)) => s.parse::<Schedule>().map(Some),
    }
}
