//! Budget business logic - one spending limit per user and category.

use super::{ensure_user_exists, unique_violation_as_conflict};
use crate::{
    entities::budget,
    errors::{Error, Result},
    models::{BudgetReadOnly, InsertBudget},
    repositories::{UnitOfWork, budgets::BudgetWithCategory},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, Set};
use tracing::{info, instrument};

fn project((budget, category): BudgetWithCategory) -> BudgetReadOnly {
    let category_name = category.map(|c| c.name).unwrap_or_default();
    BudgetReadOnly::from_parts(budget, category_name)
}

/// Creates a budget for `user_id` on an existing category, starting with nothing spent.
///
/// # Errors
/// Returns an error if:
/// - The limit is not positive or the end date precedes the start date
/// - The user or the category does not exist
/// - The user already has a budget for that category
#[instrument(skip(db, input), fields(category_id = input.category_id))]
pub async fn create(
    db: &DatabaseConnection,
    user_id: i64,
    input: InsertBudget,
) -> Result<BudgetReadOnly> {
    input.validate()?;

    let uow = UnitOfWork::begin(db).await?;
    ensure_user_exists(&uow, user_id).await?;

    let category = uow.categories().get(input.category_id).await?.ok_or_else(|| {
        Error::not_found(
            "ExpenseCategory",
            format!("Category with id {} not found", input.category_id),
        )
    })?;

    let budgets = uow.budgets();
    if budgets
        .get_by_user_and_category(user_id, category.id)
        .await?
        .is_some()
    {
        return Err(Error::already_exists(
            "Budget",
            format!("A budget for category '{}' already exists", category.name),
        ));
    }

    let now = Utc::now().naive_utc();
    let new_budget = budget::ActiveModel {
        limit_amount: Set(input.limit_amount),
        spent_amount: Set(Some(Decimal::ZERO)),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        user_id: Set(user_id),
        category_id: Set(category.id),
        inserted_at: Set(now),
        modified_at: Set(now),
        ..Default::default()
    };
    let created = budgets.add(new_budget).await.map_err(unique_violation_as_conflict(
        "Budget",
        format!("A budget for category '{}' already exists", category.name),
    ))?;

    uow.save().await?;
    info!(budget_id = created.id, "Created budget");
    Ok(BudgetReadOnly::from_parts(created, category.name))
}

/// Deletes a budget owned by `user_id`.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, budget_id: i64, user_id: i64) -> Result<()> {
    let uow = UnitOfWork::begin(db).await?;
    let budgets = uow.budgets();

    let existing = budgets.get(budget_id).await?.ok_or_else(|| {
        Error::not_found("Budget", format!("Budget with id {budget_id} not found"))
    })?;
    if existing.user_id != user_id {
        return Err(Error::not_authorized(
            "Budget",
            format!("User {user_id} does not own budget {budget_id}"),
        ));
    }

    if !budgets.delete(budget_id).await? {
        return Err(Error::ServerError {
            message: format!("Budget {budget_id} disappeared while being deleted"),
        });
    }
    uow.save().await?;
    info!(budget_id, "Deleted budget");
    Ok(())
}

/// Looks up a budget by id. A missing budget is `None`, not an error.
pub async fn get_by_id(db: &DatabaseConnection, budget_id: i64) -> Result<Option<BudgetReadOnly>> {
    let uow = UnitOfWork::begin(db).await?;
    let found = uow.budgets().get_with_category(budget_id).await?;
    Ok(found.map(project))
}

/// Every budget of the user, with category names.
pub async fn list_by_user(db: &DatabaseConnection, user_id: i64) -> Result<Vec<BudgetReadOnly>> {
    let uow = UnitOfWork::begin(db).await?;
    ensure_user_exists(&uow, user_id).await?;

    let budgets = uow.budgets().list_by_user(user_id).await?;
    Ok(budgets.into_iter().map(project).collect())
}
