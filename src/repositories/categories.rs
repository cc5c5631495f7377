//! Expense category queries.

use super::CategoryRepository;
use crate::entities::{Expense, ExpenseCategory, expense, expense_category};
use crate::errors::Result;
use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*, sea_query::OnConflict};

impl CategoryRepository<'_> {
    /// Finds a category by its exact (case-sensitive) name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<expense_category::Model>> {
        ExpenseCategory::find()
            .filter(expense_category::Column::Name.eq(name))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Inserts a category named `name` unless one already exists.
    ///
    /// Relies on the unique index on `name` (`ON CONFLICT DO NOTHING`), so concurrent
    /// callers converge on a single row. Returns the number of rows inserted.
    pub async fn insert_if_absent(&self, name: &str) -> Result<u64> {
        let now = Utc::now().naive_utc();
        let category = expense_category::ActiveModel {
            name: Set(name.to_string()),
            inserted_at: Set(now),
            modified_at: Set(now),
            ..Default::default()
        };

        let rows = ExpenseCategory::insert(category)
            .on_conflict(
                OnConflict::column(expense_category::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn())
            .await?;
        self.record_changes(rows);
        Ok(rows)
    }

    /// Whether any expense still references the category.
    pub async fn is_category_used(&self, category_id: i64) -> Result<bool> {
        let count = Expense::find()
            .filter(expense::Column::CategoryId.eq(category_id))
            .count(self.conn())
            .await?;
        Ok(count > 0)
    }

    /// Every category, alphabetically.
    pub async fn list_by_name(&self) -> Result<Vec<expense_category::Model>> {
        ExpenseCategory::find()
            .order_by_asc(expense_category::Column::Name)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }
}
