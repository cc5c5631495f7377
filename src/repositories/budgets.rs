//! Budget queries. Budgets are always read together with their category so the
//! projection can carry the category name.

use super::BudgetRepository;
use crate::entities::{Budget, ExpenseCategory, budget, expense_category};
use crate::errors::Result;
use sea_orm::{QueryOrder, prelude::*};

/// A budget with its category, `None` only if the row was removed underneath it
pub type BudgetWithCategory = (budget::Model, Option<expense_category::Model>);

impl BudgetRepository<'_> {
    /// The user's budget for `category_id`, if any.
    pub async fn get_by_user_and_category(
        &self,
        user_id: i64,
        category_id: i64,
    ) -> Result<Option<budget::Model>> {
        Budget::find()
            .filter(budget::Column::UserId.eq(user_id))
            .filter(budget::Column::CategoryId.eq(category_id))
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// A single budget with its category.
    pub async fn get_with_category(&self, budget_id: i64) -> Result<Option<BudgetWithCategory>> {
        Budget::find_by_id(budget_id)
            .find_also_related(ExpenseCategory)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Every budget of the user with its category, oldest first.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<BudgetWithCategory>> {
        Budget::find()
            .filter(budget::Column::UserId.eq(user_id))
            .find_also_related(ExpenseCategory)
            .order_by_asc(budget::Column::Id)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }
}
