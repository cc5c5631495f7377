//! Expense category entity - A shared, named bucket for expenses.
//!
//! Categories are never created directly by callers: the expense service resolves a
//! category by its trimmed name and inserts it on first use. Names are unique and
//! compared case-sensitively.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Category name (e.g., "Food", "Rent"), stored trimmed
    #[sea_orm(unique)]
    pub name: String,
    /// When the row was inserted
    pub inserted_at: DateTime,
    /// When the row was last modified
    pub modified_at: DateTime,
}

/// Defines relationships between ExpenseCategory and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category is referenced by many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One category anchors many budgets (one per user)
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
