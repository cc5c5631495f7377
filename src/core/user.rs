//! User business logic - registration, credential checks, profile updates and
//! soft deletion.
//!
//! Every lookup here goes through the user repository's default scope, so a
//! soft-deleted account behaves as if it did not exist. Uniqueness checks are the one
//! exception: usernames and e-mails stay reserved after a soft delete.

use super::unique_violation_as_conflict;
use crate::{
    entities::{UserRole, user},
    errors::{Error, Result},
    models::{
        LoginCredentials, PageRequest, PaginatedResult, RegisterUser, UpdateUser, UserFilters,
        UserReadOnly,
    },
    repositories::UnitOfWork,
    security::{hash_password, verify_password},
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};
use tracing::{info, instrument, warn};

/// Registers a new account with the `RegularUser` role.
///
/// The username (when given) and the e-mail are checked independently, in that order.
/// The password is stored as an Argon2 hash.
#[instrument(skip(db, input), fields(username = ?input.username, email = %input.email))]
pub async fn register(db: &DatabaseConnection, input: RegisterUser) -> Result<UserReadOnly> {
    input.validate()?;

    let uow = UnitOfWork::begin(db).await?;
    let users = uow.users();

    if let Some(username) = input.username.as_deref() {
        if users.username_exists(username).await? {
            return Err(Error::already_exists(
                "User",
                format!("Username '{username}' is already taken"),
            ));
        }
    }
    if users.email_exists(&input.email).await? {
        return Err(Error::already_exists(
            "User",
            format!("E-mail '{}' is already registered", input.email),
        ));
    }

    let password = hash_password(&input.password)?;
    let now = Utc::now().naive_utc();
    let new_user = user::ActiveModel {
        username: Set(input.username),
        email: Set(input.email),
        password: Set(password),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        role: Set(UserRole::RegularUser),
        is_deleted: Set(false),
        deleted_at: Set(None),
        inserted_at: Set(now),
        modified_at: Set(now),
        ..Default::default()
    };
    let created = users
        .add(new_user)
        .await
        .map_err(unique_violation_as_conflict("User", "Username or e-mail is already taken"))?;

    uow.save().await?;
    info!(user_id = created.id, "Registered user");
    Ok(created.into())
}

/// Checks a username-or-email and password pair.
///
/// Unknown logins and wrong passwords fail the same way, with
/// [`Error::NotAuthorized`].
#[instrument(skip(db, login), fields(login = %login.username))]
pub async fn verify_credentials(
    db: &DatabaseConnection,
    login: &LoginCredentials,
) -> Result<user::Model> {
    let uow = UnitOfWork::begin(db).await?;
    let found = uow.users().get_by_username_or_email(&login.username).await?;
    drop(uow);

    let Some(user) = found else {
        warn!("Login attempt for unknown account");
        return Err(Error::not_authorized("User", "Invalid username or password"));
    };
    if !verify_password(&login.password, &user.password)? {
        warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(Error::not_authorized("User", "Invalid username or password"));
    }
    Ok(user)
}

/// Fetches a visible user by id.
pub async fn get_by_id(db: &DatabaseConnection, user_id: i64) -> Result<UserReadOnly> {
    let uow = UnitOfWork::begin(db).await?;
    uow.users()
        .get(user_id)
        .await?
        .map(Into::into)
        .ok_or_else(|| Error::not_found("User", format!("User with id {user_id} not found")))
}

/// Fetches a visible user by username.
pub async fn get_by_username(db: &DatabaseConnection, username: &str) -> Result<UserReadOnly> {
    let uow = UnitOfWork::begin(db).await?;
    uow.users()
        .get_by_username(username)
        .await?
        .map(Into::into)
        .ok_or_else(|| Error::not_found("User", format!("User '{username}' not found")))
}

/// Applies the `Some` fields of `patch` to the user.
///
/// A changed e-mail is re-checked for uniqueness first; a new password is re-hashed.
#[instrument(skip(db, patch))]
pub async fn update(
    db: &DatabaseConnection,
    user_id: i64,
    patch: UpdateUser,
) -> Result<UserReadOnly> {
    let uow = UnitOfWork::begin(db).await?;
    let users = uow.users();

    let existing = users
        .get(user_id)
        .await?
        .ok_or_else(|| Error::not_found("User", format!("User with id {user_id} not found")))?;

    let mut model: user::ActiveModel = existing.clone().into();

    if let Some(email) = patch.email {
        if email.trim().is_empty() {
            return Err(Error::invalid_argument("Email cannot be empty"));
        }
        if email != existing.email {
            if users.email_exists(&email).await? {
                return Err(Error::already_exists(
                    "User",
                    format!("E-mail '{email}' is already registered"),
                ));
            }
            model.email = Set(email);
        }
    }
    if let Some(first_name) = patch.first_name {
        model.first_name = Set(first_name);
    }
    if let Some(last_name) = patch.last_name {
        model.last_name = Set(last_name);
    }
    if let Some(password) = patch.password {
        if password.trim().is_empty() {
            return Err(Error::invalid_argument("Password cannot be empty"));
        }
        model.password = Set(hash_password(&password)?);
    }
    model.modified_at = Set(Utc::now().naive_utc());

    let updated = users
        .update(model)
        .await
        .map_err(unique_violation_as_conflict("User", "E-mail is already registered"))?;

    uow.save().await?;
    info!(user_id, "Updated user");
    Ok(updated.into())
}

/// Marks the user as deleted. The row stays in place.
#[instrument(skip(db))]
pub async fn soft_delete(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let uow = UnitOfWork::begin(db).await?;
    let users = uow.users();

    let existing = users
        .get(user_id)
        .await?
        .ok_or_else(|| Error::not_found("User", format!("User with id {user_id} not found")))?;

    let now = Utc::now().naive_utc();
    let mut model: user::ActiveModel = existing.into();
    model.is_deleted = Set(true);
    model.deleted_at = Set(Some(now));
    model.modified_at = Set(now);
    users.update(model).await?;

    uow.save().await?;
    info!(user_id, "Soft-deleted user");
    Ok(())
}

/// One page of visible users matching `filters`, ordered by id.
pub async fn list_paginated(
    db: &DatabaseConnection,
    page: PageRequest,
    filters: &UserFilters,
) -> Result<PaginatedResult<UserReadOnly>> {
    page.validate()?;
    let uow = UnitOfWork::begin(db).await?;
    let users = uow.users().list_paginated(filters, page).await?;
    Ok(users.map(Into::into))
}

/// One page of every visible user.
pub async fn list_all(
    db: &DatabaseConnection,
    page: PageRequest,
) -> Result<PaginatedResult<UserReadOnly>> {
    list_paginated(db, page, &UserFilters::default()).await
}
