//! User queries.
//!
//! Soft-deleted users are invisible to every lookup here except the two existence
//! checks, which back the storage-level unique indexes and must see every row.

use super::{ScopedEntity, UserRepository};
use crate::entities::{User, user};
use crate::errors::Result;
use crate::models::{PageRequest, PaginatedResult, UserFilters};
use sea_orm::{Condition, PaginatorTrait, QueryOrder, prelude::*};

impl ScopedEntity for user::Entity {
    fn default_scope() -> Condition {
        Condition::all().add(user::Column::IsDeleted.eq(false))
    }
}

impl UserFilters {
    /// Folds the present filters into one ANDed condition.
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        Condition::all()
            .add_option(
                self.username
                    .clone()
                    .map(|username| user::Column::Username.eq(username)),
            )
            .add_option(self.email.clone().map(|email| user::Column::Email.eq(email)))
            .add_option(self.role.map(|role| user::Column::Role.eq(role)))
    }
}

impl UserRepository<'_> {
    /// Finds a visible user by username.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        User::find()
            .filter(user::Entity::default_scope())
            .filter(user::Column::Username.eq(username))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Finds a visible user whose username or e-mail equals `login`, in one query.
    pub async fn get_by_username_or_email(&self, login: &str) -> Result<Option<user::Model>> {
        User::find()
            .filter(user::Entity::default_scope())
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(login))
                    .add(user::Column::Email.eq(login)),
            )
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Whether any row, soft-deleted or not, already holds `username`.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count = User::find()
            .filter(user::Column::Username.eq(username))
            .count(self.conn())
            .await?;
        Ok(count > 0)
    }

    /// Whether any row, soft-deleted or not, already holds `email`.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = User::find()
            .filter(user::Column::Email.eq(email))
            .count(self.conn())
            .await?;
        Ok(count > 0)
    }

    /// One page of visible users matching `filters`, ordered by id.
    ///
    /// The total is counted on the same filtered query the page is cut from.
    pub async fn list_paginated(
        &self,
        filters: &UserFilters,
        page: PageRequest,
    ) -> Result<PaginatedResult<user::Model>> {
        let paginator = User::find()
            .filter(user::Entity::default_scope())
            .filter(filters.to_condition())
            .order_by_asc(user::Column::Id)
            .paginate(self.conn(), page.page_size);

        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.index()).await?;
        Ok(PaginatedResult::new(data, total, page))
    }
}
