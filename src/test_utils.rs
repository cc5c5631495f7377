//! Shared test utilities for the expense tracker.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{budget, expense, user},
    entities,
    errors::Result,
    models::{BudgetReadOnly, ExpenseReadOnly, InsertBudget, InsertExpense, RegisterUser},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait};

/// Plaintext password given to every user made by [`create_test_user`]
pub const TEST_PASSWORD: &str = "P@ssw0rd!";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a registration input for `username` with an e-mail derived from it.
pub fn register_input(username: &str) -> RegisterUser {
    RegisterUser {
        username: Some(username.to_string()),
        email: format!("{username}@example.com"),
        password: TEST_PASSWORD.to_string(),
        first_name: "Test".to_string(),
        last_name: username.to_string(),
    }
}

/// Registers a user and returns the stored row.
///
/// # Defaults
/// * `email`: `<username>@example.com`
/// * `password`: [`TEST_PASSWORD`]
/// * `role`: `RegularUser`
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    let created = user::register(db, register_input(username)).await?;
    let stored = entities::User::find_by_id(created.id).one(db).await?;
    stored.ok_or_else(|| crate::errors::Error::not_found("User", username.to_string()))
}

/// A calendar date for tests.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Builds an expense input dated 2024-01-01.
pub fn expense_input(title: &str, amount: Decimal, category_name: &str) -> InsertExpense {
    InsertExpense {
        title: title.to_string(),
        amount,
        date: date(2024, 1, 1),
        category_name: category_name.to_string(),
    }
}

/// Creates an expense for `user_id` through the expense service.
///
/// # Defaults
/// * `date`: 2024-01-01
pub async fn create_test_expense(
    db: &DatabaseConnection,
    user_id: i64,
    title: &str,
    amount: Decimal,
    category_name: &str,
) -> Result<ExpenseReadOnly> {
    expense::create(db, expense_input(title, amount, category_name), user_id).await
}

/// Creates a January 2024 budget for `user_id` on `category_id`.
///
/// # Defaults
/// * `limit_amount`: 100.00
pub async fn create_test_budget(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
) -> Result<BudgetReadOnly> {
    let input = InsertBudget {
        category_id,
        limit_amount: Decimal::new(10_000, 2),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 31),
    };
    budget::create(db, user_id, input).await
}
