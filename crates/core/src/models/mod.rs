//! Data models for Spendwise

mod expense;
mod history;
mod user;

pub use expense::*;
pub use history::*;
pub use user::*;
