//! Budget entity - A spending limit for one category over a date range.
//!
//! A user holds at most one budget per category; the composite unique index
//! `IX_budgets_user_category` is created alongside the table in
//! [`crate::config::database::create_tables`]. A category anchoring a budget cannot be
//! deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Maximum allowed spending
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub limit_amount: Decimal,
    /// Amount spent so far, zero on creation
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub spent_amount: Option<Decimal>,
    /// First day covered
    pub start_date: Date,
    /// Last day covered, never before `start_date`
    pub end_date: Date,
    /// Owning user
    pub user_id: i64,
    /// Budgeted category
    pub category_id: i64,
    /// When the row was inserted
    pub inserted_at: DateTime,
    /// When the row was last modified
    pub modified_at: DateTime,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// Each budget covers one category, which it keeps from being deleted
    #[sea_orm(
        belongs_to = "super::expense_category::Entity",
        from = "Column::CategoryId",
        to = "super::expense_category::Column::Id",
        on_delete = "Restrict"
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
