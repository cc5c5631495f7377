//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so foreign keys, their delete behaviors and the
//! single-column unique constraints come straight from the entity attributes. The
//! composite budget index cannot be expressed on a column and is created separately.

use crate::entities::{Budget, Expense, ExpenseCategory, User, budget};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Default store used when neither `DATABASE_URL` nor `config.toml` names one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://expense_tracker.sqlite?mode=rwc";

/// Name of the unique index that backs the one-budget-per-category rule.
pub const BUDGET_PAIR_INDEX: &str = "IX_budgets_user_category";

/// Establishes a connection to the database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables, in foreign-key order, plus the composite budget index.
///
/// Every statement is `IF NOT EXISTS`, so running this against an initialized store is a
/// no-op.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    if builder == DatabaseBackend::Sqlite {
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    }

    let user_table = schema.create_table_from_entity(User).if_not_exists().to_owned();
    let category_table = schema
        .create_table_from_entity(ExpenseCategory)
        .if_not_exists()
        .to_owned();
    let expense_table = schema
        .create_table_from_entity(Expense)
        .if_not_exists()
        .to_owned();
    let budget_table = schema
        .create_table_from_entity(Budget)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&category_table)).await?;
    db.execute(builder.build(&expense_table)).await?;
    db.execute(builder.build(&budget_table)).await?;

    let budget_pair_index = Index::create()
        .if_not_exists()
        .name(BUDGET_PAIR_INDEX)
        .table(Budget)
        .col(budget::Column::UserId)
        .col(budget::Column::CategoryId)
        .unique()
        .to_owned();
    db.execute(builder.build(&budget_pair_index)).await?;

    info!("Database schema is up to date");
    Ok(())
}
