//! Expense entity - A single dated spend recorded by a user.
//!
//! Each expense belongs to exactly one user (removed together with the user) and
//! optionally references an `expense_categories` row. If a category disappears by
//! other means the reference is nulled rather than the expense being removed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short description (e.g., "Coffee")
    pub title: String,
    /// Positive amount with two decimal places
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    /// Day the money was spent
    pub date: Date,
    /// Owning user
    pub user_id: i64,
    /// Referenced category, `None` once the category is gone
    pub category_id: Option<i64>,
    /// When the row was inserted
    pub inserted_at: DateTime,
    /// When the row was last modified
    pub modified_at: DateTime,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// Each expense optionally references one category
    #[sea_orm(
        belongs_to = "super::expense_category::Entity",
        from = "Column::CategoryId",
        to = "super::expense_category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::expense_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
