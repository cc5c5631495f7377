//! Expense queries.
//!
//! Listings are read together with the category so projections can carry its name,
//! and are ordered newest first with the id as tie-breaker.

use super::ExpenseRepository;
use crate::entities::{Expense, ExpenseCategory, expense, expense_category};
use crate::errors::Result;
use crate::models::{ExpenseFilters, PageRequest, PaginatedResult};
use rust_decimal::Decimal;
use sea_orm::{
    Condition, PaginatorTrait, QueryOrder, QuerySelect, Select, SelectTwo, prelude::*,
};

/// An expense with its category, `None` when the category reference was cleared
pub type ExpenseWithCategory = (expense::Model, Option<expense_category::Model>);

impl ExpenseFilters {
    /// Folds the present filters into one ANDed condition.
    ///
    /// Date bounds are inclusive; a blank `title` is ignored.
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        Condition::all()
            .add_option(self.category_id.map(|id| expense::Column::CategoryId.eq(id)))
            .add_option(self.from_date.map(|date| expense::Column::Date.gte(date)))
            .add_option(self.to_date.map(|date| expense::Column::Date.lte(date)))
            .add_option(self.min_amount.map(|amount| expense::Column::Amount.gte(amount)))
            .add_option(self.max_amount.map(|amount| expense::Column::Amount.lte(amount)))
            .add_option(
                self.title
                    .as_deref()
                    .map(str::trim)
                    .filter(|title| !title.is_empty())
                    .map(|title| expense::Column::Title.contains(title)),
            )
    }
}

fn owned_by(user_id: i64) -> Select<expense::Entity> {
    Expense::find().filter(expense::Column::UserId.eq(user_id))
}

fn newest_first(
    query: SelectTwo<expense::Entity, expense_category::Entity>,
) -> SelectTwo<expense::Entity, expense_category::Entity> {
    query
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
}

impl ExpenseRepository<'_> {
    /// A single expense with its category.
    pub async fn get_with_category(&self, expense_id: i64) -> Result<Option<ExpenseWithCategory>> {
        Expense::find_by_id(expense_id)
            .find_also_related(ExpenseCategory)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Every expense of the user, newest first.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<ExpenseWithCategory>> {
        newest_first(owned_by(user_id).find_also_related(ExpenseCategory))
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// The user's expenses in one category, newest first.
    pub async fn list_by_user_and_category(
        &self,
        user_id: i64,
        category_id: i64,
    ) -> Result<Vec<ExpenseWithCategory>> {
        let query = owned_by(user_id)
            .filter(expense::Column::CategoryId.eq(category_id))
            .find_also_related(ExpenseCategory);
        newest_first(query)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// One page of the user's expenses matching `filters`.
    ///
    /// The total counts only this user's matching rows and comes from the same query
    /// the page is cut from.
    pub async fn list_paginated(
        &self,
        user_id: i64,
        filters: &ExpenseFilters,
        page: PageRequest,
    ) -> Result<PaginatedResult<ExpenseWithCategory>> {
        let query = owned_by(user_id)
            .filter(filters.to_condition())
            .find_also_related(ExpenseCategory);
        let paginator = newest_first(query).paginate(self.conn(), page.page_size);

        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.index()).await?;
        Ok(PaginatedResult::new(data, total, page))
    }

    /// Sum of the user's expense amounts; zero when there are none.
    pub async fn sum_for_user(&self, user_id: i64) -> Result<Decimal> {
        let total: Option<Option<Decimal>> = owned_by(user_id)
            .select_only()
            .column_as(expense::Column::Amount.sum(), "total")
            .into_tuple()
            .one(self.conn())
            .await?;
        Ok(total.flatten().unwrap_or(Decimal::ZERO).round_dp(2))
    }

    /// The user's expenses whose title contains `term`, newest first.
    ///
    /// Uses SQL `LIKE`, so on `SQLite` the match ignores ASCII case and `%`/`_` in the
    /// term act as wildcards.
    pub async fn search_by_title(
        &self,
        user_id: i64,
        term: &str,
    ) -> Result<Vec<ExpenseWithCategory>> {
        let query = owned_by(user_id)
            .filter(expense::Column::Title.contains(term))
            .find_also_related(ExpenseCategory);
        newest_first(query)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// The user's most recent expense titled exactly `title`.
    pub async fn get_by_title(
        &self,
        user_id: i64,
        title: &str,
    ) -> Result<Option<ExpenseWithCategory>> {
        let query = owned_by(user_id)
            .filter(expense::Column::Title.eq(title))
            .find_also_related(ExpenseCategory);
        newest_first(query)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }
}
