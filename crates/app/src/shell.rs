//! Interactive menu loop
//!
//! One operation runs to completion before the next prompt. The session lives
//! only in memory and is dropped on logout or exit.

use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input, Password, Select};
use spendwise_core::{
    validate::{PASSWORD_MIN_CHARS, USERNAME_MAX_CHARS, USERNAME_MIN_CHARS},
    Authenticator, Config, Database, Error, ExpenseId, ExpenseInput, Ledger, Session,
};
use tracing::{error, info, warn};

use crate::display::{expense_table, history_table};

#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    /// The terminal can no longer be read
    #[error("Terminal prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Core(#[from] Error),
}

impl ShellError {
    /// Only a broken terminal ends the loop; the rest is reported and re-prompted
    fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Prompt(_))
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;

enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    db: Database,
    config: Config,
    session: Option<Session>,
}

fn input(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(ShellError::from)
}

fn input_with(prompt: &str, initial: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(ShellError::from)
}

fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(ShellError::from)
}

fn select(prompt: &str, items: &[&str]) -> Result<usize> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(ShellError::from)
}

fn expense_id(prompt: &str) -> Result<Option<ExpenseId>> {
    let raw = input(prompt)?;
    match raw.trim().parse::<i64>() {
        Ok(id) => Ok(Some(ExpenseId(id))),
        Err(_) => {
            println!("\n✗ Invalid expense ID. Please enter a number.");
            Ok(None)
        }
    }
}

impl Shell {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config,
            session: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", "=".repeat(50));
        println!("    SPENDWISE EXPENSE TRACKER");
        println!("{}", "=".repeat(50));

        loop {
            let step = if self.session.is_some() {
                self.ledger_menu()
            } else {
                self.auth_menu()
            };

            match step {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) if e.is_fatal() => {
                    self.logout();
                    return Err(e);
                }
                Err(ShellError::Core(e)) if e.is_recoverable() => println!("\n✗ {}", e),
                Err(ShellError::Core(Error::Io(e))) => {
                    warn!(error = %e, "File operation failed");
                    println!("\n✗ File error: {}", e);
                }
                Err(e) => {
                    error!(error = %e, "Operation failed");
                    println!("\n✗ An unexpected error occurred: {}", e);
                }
            }
        }

        self.logout();
        println!("\nGoodbye!");
        Ok(())
    }

    fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!(user_id = %session.user_id, session_id = %session.id, "User logged out");
        }
    }

    fn auth_menu(&mut self) -> Result<Flow> {
        println!("\n--- Authentication Required ---");
        match select("Choose an option", &["Login", "Register", "Quit"])? {
            0 => self.login()?,
            1 => self.register()?,
            _ => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn login(&mut self) -> Result<()> {
        let username = input("Username")?;
        let password = Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(ShellError::from)?;

        let session = Authenticator::new(&self.db, self.config.auth).login(&username, &password)?;
        println!("\n✓ Welcome back, {}!", session.username);
        self.session = Some(session);
        Ok(())
    }

    fn register(&mut self) -> Result<()> {
        println!("\n--- Create New Account ---");
        println!(
            "Username: {}-{} letters, digits, '_' or '-'",
            USERNAME_MIN_CHARS, USERNAME_MAX_CHARS
        );
        println!("Password requirements:");
        println!("- At least {} characters", PASSWORD_MIN_CHARS);
        println!("- At least one uppercase letter");
        println!("- At least one lowercase letter");
        println!("- At least one digit");
        println!();

        let username = input("Username")?;
        let password = Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(ShellError::from)?;

        let user_id =
            Authenticator::new(&self.db, self.config.auth).register(&username, &password)?;
        println!("\n✓ Account created successfully! User ID: {}", user_id);
        println!("You can now login with your credentials.");
        Ok(())
    }

    fn ledger_menu(&mut self) -> Result<Flow> {
        let Some(session) = self.session.as_ref() else {
            return Ok(Flow::Continue);
        };
        println!("\n--- Logged in as: {} ---", session.username);

        let choice = select(
            "Choose an option",
            &[
                "Add expense",
                "View expenses",
                "Update expense",
                "Remove expense",
                "View history",
                "Export as JSON",
                "Logout",
                "Quit",
            ],
        )?;

        match choice {
            6 => {
                self.logout();
                println!("\n✓ Logged out successfully!");
                return Ok(Flow::Continue);
            }
            7 => return Ok(Flow::Quit),
            _ => {}
        }

        let ledger = Ledger::new(&self.db, session);
        match choice {
            0 => add_expense(&ledger)?,
            1 => view_expenses(&ledger)?,
            2 => update_expense(&ledger)?,
            3 => remove_expense(&ledger)?,
            4 => view_history(&ledger)?,
            _ => export_json(&ledger)?,
        }
        Ok(Flow::Continue)
    }
}

/// Prompt for expense fields, prefilled from `current` when editing
fn read_expense(current: Option<&ExpenseInput>) -> Result<ExpenseInput> {
    let blank = ExpenseInput::default();
    let current = current.unwrap_or(&blank);

    let name = input_with("Expense name", &current.name)?;
    let amount = input_with("Amount ($)", &current.amount)?;
    let category = input_with(
        "Category (optional)",
        current.category.as_deref().unwrap_or_default(),
    )?;
    let recurring = confirm("Is this recurring?", current.recurring)?;
    let schedule = if recurring {
        Some(input_with(
            "Schedule (daily/weekly/monthly/yearly)",
            current.schedule.as_deref().unwrap_or_default(),
        )?)
    } else {
        None
    };

    Ok(ExpenseInput {
        name,
        amount,
        category: Some(category),
        recurring,
        schedule,
    })
}

fn add_expense(ledger: &Ledger<'_, Database>) -> Result<()> {
    println!("\n--- Add New Expense ---");
    let expense = read_expense(None)?;
    let id = ledger.add_expense(&expense)?;
    println!("\n✓ Expense added successfully! ID: {}", id);
    Ok(())
}

fn view_expenses(ledger: &Ledger<'_, Database>) -> Result<()> {
    println!("\n--- Your Expenses ---");
    let expenses = ledger.list_expenses()?;
    println!("{}", expense_table(&expenses, ledger.total()?));
    Ok(())
}

fn update_expense(ledger: &Ledger<'_, Database>) -> Result<()> {
    println!("\n--- Update Expense ---");
    let Some(id) = expense_id("Expense ID to update")? else {
        return Ok(());
    };

    let existing = ledger.get_expense(id)?;
    let current = ExpenseInput {
        name: existing.name,
        amount: existing.amount.to_string(),
        category: Some(existing.category),
        recurring: existing.recurring,
        schedule: existing.schedule.map(|s| s.to_string()),
    };

    let expense = read_expense(Some(&current))?;
    ledger.update_expense(id, &expense)?;
    println!("\n✓ Expense updated successfully!");
    Ok(())
}

fn remove_expense(ledger: &Ledger<'_, Database>) -> Result<()> {
    println!("\n--- Remove Expense ---");
    let Some(id) = expense_id("Expense ID to remove")? else {
        return Ok(());
    };

    if !confirm(&format!("Are you sure you want to remove expense ID {}?", id), false)? {
        println!("\n✗ Operation cancelled.");
        return Ok(());
    }

    ledger.remove_expense(id)?;
    println!("\n✓ Expense removed successfully!");
    Ok(())
}

fn view_history(ledger: &Ledger<'_, Database>) -> Result<()> {
    println!("\n--- Expense History ---");
    let raw = input("Expense ID (blank for all)")?;
    let filter = if raw.trim().is_empty() {
        None
    } else {
        match raw.trim().parse::<i64>() {
            Ok(id) => Some(ExpenseId(id)),
            Err(_) => {
                println!("\n✗ Invalid expense ID. Please enter a number.");
                return Ok(());
            }
        }
    };

    println!("{}", history_table(&ledger.history(filter)?));
    Ok(())
}

fn export_json(ledger: &Ledger<'_, Database>) -> Result<()> {
    let path = PathBuf::from(input_with("Export to file", "expenses.json")?.trim());
    write_export(ledger, &path)?;
    println!("\n✓ Expenses exported to {}", path.display());
    Ok(())
}

fn write_export(ledger: &Ledger<'_, Database>, path: &Path) -> spendwise_core::Result<()> {
    let json = ledger.export_json()?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "Expenses exported");
    Ok(())
}
