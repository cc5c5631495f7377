//! Read-only projections returned by the services.
//!
//! None of these shapes expose a password hash or soft-delete bookkeeping.

use crate::entities::{UserRole, budget, expense, expense_category, user};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A user as seen by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReadOnly {
    /// User id
    pub id: i64,
    /// Login name, if set
    pub username: Option<String>,
    /// E-mail address
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Authorization role
    pub role: UserRole,
}

impl From<user::Model> for UserReadOnly {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}

/// A category as seen by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReadOnly {
    /// Category id
    pub id: i64,
    /// Category name
    pub name: String,
}

impl From<expense_category::Model> for CategoryReadOnly {
    fn from(category: expense_category::Model) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// An expense with its category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseReadOnly {
    /// Expense id
    pub id: i64,
    /// Short description
    pub title: String,
    /// Amount spent
    pub amount: Decimal,
    /// Day the money was spent
    pub date: NaiveDate,
    /// `None` when the expense no longer references a category
    pub category: Option<CategoryReadOnly>,
}

impl ExpenseReadOnly {
    /// Projects an expense together with its (optional) category row.
    #[must_use]
    pub fn from_parts(
        expense: expense::Model,
        category: Option<expense_category::Model>,
    ) -> Self {
        Self {
            id: expense.id,
            title: expense.title,
            amount: expense.amount,
            date: expense.date,
            category: category.map(Into::into),
        }
    }
}

/// A budget with its category name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReadOnly {
    /// Budget id
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Budgeted category
    pub category_id: i64,
    /// Name of the budgeted category
    pub category_name: String,
    /// Spending limit
    pub limit_amount: Decimal,
    /// Amount spent so far
    pub spent_amount: Option<Decimal>,
    /// First day covered
    pub start_date: NaiveDate,
    /// Last day covered
    pub end_date: NaiveDate,
}

impl BudgetReadOnly {
    /// Projects a budget with the name of its category attached.
    #[must_use]
    pub fn from_parts(budget: budget::Model, category_name: String) -> Self {
        Self {
            id: budget.id,
            user_id: budget.user_id,
            category_id: budget.category_id,
            category_name,
            limit_amount: budget.limit_amount,
            spent_amount: budget.spent_amount,
            start_date: budget.start_date,
            end_date: budget.end_date,
        }
    }
}

/// Issued bearer token plus the identity it was issued for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// Signed JWT
    pub token: String,
    /// Username of the token holder, if set
    pub username: Option<String>,
    /// Role embedded in the token
    pub role: UserRole,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}
