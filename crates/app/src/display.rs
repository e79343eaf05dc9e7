//! Plain-text tables for the terminal

use spendwise_core::{Amount, Expense, HistoryEntry};

const RULE_WIDTH: usize = 80;

/// Cut to at most `max` characters
fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

pub fn expense_table(expenses: &[Expense], total: Amount) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let mut out = format!(
        "{:<5} {:<20} {:>11} {:<15} {:<10} {:<10}\n",
        "ID", "Name", "Amount", "Category", "Recurring", "Schedule"
    );
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    for expense in expenses {
        let recurring = if expense.recurring { "Yes" } else { "No" };
        let schedule = expense
            .schedule
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<5} {:<20} {:>11} {:<15} {:<10} {:<10}\n",
            expense.id.to_string(),
            clip(&expense.name, 19),
            format!("${}", expense.amount),
            clip(&expense.category, 15),
            recurring,
            schedule
        ));
    }

    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format!("{:<26} {:>11}", "Total", format!("${}", total)));
    out
}

pub fn history_table(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history recorded.".to_string();
    }

    let mut out = format!(
        "{:<12} {:<8} {:<10} {:>11}\n",
        "Date", "Action", "Expense", "Amount"
    );
    out.push_str(&"-".repeat(44));
    out.push('\n');

    for entry in entries {
        out.push_str(&format!(
            "{:<12} {:<8} {:<10} {:>11}\n",
            entry.date.format("%Y-%m-%d").to_string(),
            entry.action,
            entry.expense_id.to_string(),
            format!("${}", entry.amount)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use spendwise_core::{ExpenseId, HistoryAction, Schedule, UserId};

    fn expense(name: &str, recurring: bool) -> Expense {
        Expense {
            id: ExpenseId(7),
            user_id: UserId(1),
            name: name.to_string(),
            amount: Amount::from_cents(1999),
            category: "Subscriptions".to_string(),
            recurring,
            schedule: recurring.then_some(Schedule::Monthly),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_active: true,
        }
    }

    #[test]
    fn empty_tables() {
        assert_eq!(expense_table(&[], Amount::from_cents(0)), "No expenses found.");
        assert_eq!(history_table(&[]), "No history recorded.");
    }

    #[test]
    fn expense_rows() {
        let table = expense_table(
            &[expense("A very long streaming service name", true)],
            Amount::from_cents(1999),
        );

        assert!(table.contains("A very long streami "));
        assert!(!table.contains("streaming service name"));
        assert!(table.contains("$19.99"));
        assert!(table.contains("monthly"));
        assert!(table.lines().last().unwrap().starts_with("Total"));
    }

    #[test]
    fn non_recurring_shows_dash() {
        let table = expense_table(&[expense("Coffee", false)], Amount::from_cents(1999));
        let row = table.lines().nth(2).unwrap();
        assert!(row.contains("No"));
        assert!(row.trim_end().ends_with('-'));
    }

    #[test]
    fn history_rows() {
        let entry = HistoryEntry {
            id: 1,
            user_id: UserId(1),
            expense_id: ExpenseId(3),
            date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            amount: Amount::from_cents(500),
            action: HistoryAction::Delete,
            created_at: Utc::now(),
        };

        let table = history_table(&[entry]);
        let row = table.lines().nth(2).unwrap();
        assert!(row.starts_with("2024-05-17"));
        assert!(row.contains("DELETE"));
        assert!(row.contains("$5.00"));
    }
}
