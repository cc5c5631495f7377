//! User entity - Represents a registered account.
//!
//! Users are never physically removed: `is_deleted` marks a row as logically gone and
//! every default read path filters it out. Usernames are optional but unique when set;
//! e-mail addresses are always unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role assigned to a user, stored as its variant name
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum UserRole {
    /// Default role for every self-registered account
    #[sea_orm(string_value = "RegularUser")]
    RegularUser,
    /// Administrative role
    #[sea_orm(string_value = "Admin")]
    Admin,
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Surrogate key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Optional login name, unique when present
    #[sea_orm(unique)]
    pub username: Option<String>,
    /// E-mail address, always unique
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string; never the plaintext
    #[serde(skip_serializing)]
    pub password: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Authorization role
    pub role: UserRole,
    /// Soft delete flag - if true, the user is hidden from every default lookup
    pub is_deleted: bool,
    /// When the user was soft-deleted
    pub deleted_at: Option<DateTime>,
    /// When the row was inserted
    pub inserted_at: DateTime,
    /// When the row was last modified
    pub modified_at: DateTime,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One user has many budgets
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
