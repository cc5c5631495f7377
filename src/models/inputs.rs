//! Request inputs.
//!
//! Each input carries the structural checks a request schema would enforce
//! (`validate`). Rules that need the store, like uniqueness, live in the services.

use crate::entities::UserRole;
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decimal places allowed on money amounts
pub const AMOUNT_SCALE: u32 = 2;

/// Rejects `amount` unless it is positive and has at most [`AMOUNT_SCALE`] decimals.
fn validate_money(label: &str, amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::invalid_argument(format!(
            "{label} must be positive, got {amount}"
        )));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(Error::invalid_argument(format!(
            "{label} allows at most {AMOUNT_SCALE} decimal places, got {amount}"
        )));
    }
    Ok(())
}

/// Self-service registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    /// Optional login name
    pub username: Option<String>,
    /// E-mail address, also accepted as a login
    pub email: String,
    /// Plaintext password; hashed before it is stored
    pub password: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl RegisterUser {
    /// Checks that e-mail and password are present and a given username is not blank.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(Error::invalid_argument("Email cannot be empty"));
        }
        if self.password.trim().is_empty() {
            return Err(Error::invalid_argument("Password cannot be empty"));
        }
        if self.username.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(Error::invalid_argument("Username cannot be blank when provided"));
        }
        Ok(())
    }
}

/// Login input; `username` may hold either the username or the e-mail address.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    /// Username or e-mail address
    pub username: String,
    /// Plaintext password
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Partial profile update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    /// New e-mail address, re-checked for uniqueness
    pub email: Option<String>,
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
    /// New plaintext password
    pub password: Option<String>,
}

/// Input for recording or replacing an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertExpense {
    /// Short description
    pub title: String,
    /// Positive amount with at most two decimals
    pub amount: Decimal,
    /// Day the money was spent
    pub date: NaiveDate,
    /// Category referenced by name; created on first use
    pub category_name: String,
}

impl InsertExpense {
    /// Checks title and amount. The category name is checked by the service once the
    /// caller is known to exist.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::invalid_argument("Expense title cannot be empty"));
        }
        validate_money("Expense amount", self.amount)
    }
}

/// Input for creating a budget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertBudget {
    /// Existing category to budget
    pub category_id: i64,
    /// Positive spending limit with at most two decimals
    pub limit_amount: Decimal,
    /// First day covered
    pub start_date: NaiveDate,
    /// Last day covered, not before `start_date`
    pub end_date: NaiveDate,
}

impl InsertBudget {
    /// Checks the limit and that the date range is not reversed.
    pub fn validate(&self) -> Result<()> {
        validate_money("Budget limit", self.limit_amount)?;
        if self.end_date < self.start_date {
            return Err(Error::invalid_argument(
                "Budget end date cannot precede its start date",
            ));
        }
        Ok(())
    }
}

/// Optional exact-match filters for user listings, ANDed together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    /// Exact username
    pub username: Option<String>,
    /// Exact e-mail address
    pub email: Option<String>,
    /// Exact role
    pub role: Option<UserRole>,
}

/// Optional filters for a user's expense listing, ANDed together.
///
/// Dates are inclusive; `title` is a substring match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilters {
    /// Only this category
    pub category_id: Option<i64>,
    /// On or after this day
    pub from_date: Option<NaiveDate>,
    /// On or before this day
    pub to_date: Option<NaiveDate>,
    /// At least this amount
    pub min_amount: Option<Decimal>,
    /// At most this amount
    pub max_amount: Option<Decimal>,
    /// Title contains this text
    pub title: Option<String>,
}
