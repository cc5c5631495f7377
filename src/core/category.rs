//! Expense category management.
//!
//! Categories are never created directly. They come into existence when an expense first
//! names them and are collected again once the last expense referencing them is deleted.

use crate::{
    entities::expense_category,
    errors::{Error, Result},
    models::CategoryReadOnly,
    repositories::UnitOfWork,
};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, warn};

/// Finds the category called `name` (trimmed, case-sensitive), creating it if absent.
///
/// Runs inside the caller's unit so the category and whatever references it commit
/// together. Concurrent callers converge on the same row.
pub async fn resolve_or_create(uow: &UnitOfWork, name: &str) -> Result<expense_category::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid_argument("Category name cannot be empty"));
    }

    let categories = uow.categories();
    if categories.insert_if_absent(name).await? > 0 {
        debug!(category = name, "Created expense category");
    }
    categories
        .get_by_name(name)
        .await?
        .ok_or_else(|| Error::ServerError {
            message: format!("Category '{name}' vanished after insert"),
        })
}

/// Removes the category if no expense references it any more.
///
/// Best effort: failures, including a budget still anchoring the category, are logged
/// and reported as `false`.
pub async fn collect_if_unused(db: &DatabaseConnection, category_id: i64) -> bool {
    match remove_unused(db, category_id).await {
        Ok(removed) => removed,
        Err(e) => {
            warn!(category_id, "Failed to clean up unused category: {e}");
            false
        }
    }
}

async fn remove_unused(db: &DatabaseConnection, category_id: i64) -> Result<bool> {
    let uow = UnitOfWork::begin(db).await?;
    let categories = uow.categories();

    if categories.is_category_used(category_id).await? {
        return Ok(false);
    }
    let removed = categories.delete(category_id).await?;
    uow.save().await?;

    if removed {
        info!(category_id, "Removed unused expense category");
    }
    Ok(removed)
}

/// All categories ordered by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<CategoryReadOnly>> {
    let uow = UnitOfWork::begin(db).await?;
    let categories = uow.categories().list_by_name().await?;
    Ok(categories.into_iter().map(Into::into).collect())
}
