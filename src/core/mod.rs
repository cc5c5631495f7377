//! Core business logic - framework-agnostic user, expense, category and budget
//! operations.
//!
//! Services are free async functions over a [`sea_orm::DatabaseConnection`]. Each one
//! opens its own [`UnitOfWork`](crate::repositories::UnitOfWork) and commits it before
//! returning, so a failed call leaves the store untouched.

pub mod auth;
pub mod budget;
pub mod category;
pub mod expense;
pub mod user;

use crate::errors::{Error, Result};
use crate::repositories::{UnitOfWork, is_unique_violation};

/// Turns a unique-index violation into [`Error::AlreadyExists`], leaving other errors as
/// they are. Covers the window between an existence check and the insert.
fn unique_violation_as_conflict(
    entity: &'static str,
    message: impl Into<String>,
) -> impl FnOnce(Error) -> Error {
    move |err| match err {
        Error::Database(ref db_err) if is_unique_violation(db_err) => {
            Error::already_exists(entity, message)
        }
        other => other,
    }
}

/// Fails with [`Error::NotFound`] unless a visible user has `user_id`.
async fn ensure_user_exists(uow: &UnitOfWork, user_id: i64) -> Result<()> {
    if uow.users().get(user_id).await?.is_none() {
        return Err(Error::not_found(
            "User",
            format!("User with id {user_id} not found"),
        ));
    }
    Ok(())
}
