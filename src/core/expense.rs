//! Expense business logic - Handles creation, ownership-checked changes and the read
//! side of a user's expenses.
//!
//! Categories are resolved by name inside the same unit as the expense that references
//! them. Deleting the last expense of a category also removes the category, as a
//! best-effort follow-up; updating an expense never does.

use super::{category, ensure_user_exists};
use crate::{
    entities::expense,
    errors::{Error, Result},
    models::{ExpenseFilters, ExpenseReadOnly, InsertExpense, PageRequest, PaginatedResult},
    repositories::{UnitOfWork, expenses::ExpenseWithCategory},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, Set};
use tracing::{info, instrument};

fn project((expense, category): ExpenseWithCategory) -> ExpenseReadOnly {
    ExpenseReadOnly::from_parts(expense, category)
}

/// Records a new expense for `user_id`, creating its category on first use.
#[instrument(skip(db, input), fields(title = %input.title, category = %input.category_name))]
pub async fn create(
    db: &DatabaseConnection,
    input: InsertExpense,
    user_id: i64,
) -> Result<ExpenseReadOnly> {
    input.validate()?;

    let uow = UnitOfWork::begin(db).await?;
    ensure_user_exists(&uow, user_id).await?;

    let category = category::resolve_or_create(&uow, &input.category_name).await?;

    let now = Utc::now().naive_utc();
    let new_expense = expense::ActiveModel {
        title: Set(input.title),
        amount: Set(input.amount),
        date: Set(input.date),
        user_id: Set(user_id),
        category_id: Set(Some(category.id)),
        inserted_at: Set(now),
        modified_at: Set(now),
        ..Default::default()
    };
    let created = uow.expenses().add(new_expense).await?;

    uow.save().await?;
    info!(
        expense_id = created.id,
        category_id = category.id,
        "Created expense"
    );
    Ok(ExpenseReadOnly::from_parts(created, Some(category)))
}

/// Deletes an expense owned by `user_id`.
///
/// If that leaves its category without expenses, the category is removed afterwards in
/// a separate unit. A failure there is logged and does not fail the deletion.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, expense_id: i64, user_id: i64) -> Result<()> {
    let uow = UnitOfWork::begin(db).await?;
    let expenses = uow.expenses();

    let existing = expenses.get(expense_id).await?.ok_or_else(|| {
        Error::not_found("Expense", format!("Expense with id {expense_id} not found"))
    })?;
    if existing.user_id != user_id {
        return Err(Error::not_authorized(
            "Expense",
            format!("User {user_id} does not own expense {expense_id}"),
        ));
    }

    if !expenses.delete(expense_id).await? {
        return Err(Error::ServerError {
            message: format!("Expense {expense_id} disappeared while being deleted"),
        });
    }
    uow.save().await?;
    info!(expense_id, "Deleted expense");

    if let Some(category_id) = existing.category_id {
        category::collect_if_unused(db, category_id).await;
    }
    Ok(())
}

/// Replaces every mutable field of an expense owned by `user_id`.
///
/// The new category is resolved or created as in [`create`]. The previous category is
/// left in place even if nothing references it any more.
#[instrument(skip(db, input), fields(title = %input.title, category = %input.category_name))]
pub async fn update(
    db: &DatabaseConnection,
    user_id: i64,
    expense_id: i64,
    input: InsertExpense,
) -> Result<ExpenseReadOnly> {
    let uow = UnitOfWork::begin(db).await?;

    let existing = uow.expenses().get(expense_id).await?.ok_or_else(|| {
        Error::not_found("Expense", format!("Expense with id {expense_id} not found"))
    })?;
    if existing.user_id != user_id {
        return Err(Error::not_authorized(
            "Expense",
            format!("User {user_id} does not own expense {expense_id}"),
        ));
    }
    input.validate()?;

    let category = category::resolve_or_create(&uow, &input.category_name).await?;

    let mut model: expense::ActiveModel = existing.into();
    model.title = Set(input.title);
    model.amount = Set(input.amount);
    model.date = Set(input.date);
    model.category_id = Set(Some(category.id));
    model.modified_at = Set(Utc::now().naive_utc());
    let updated = uow.expenses().update(model).await?;

    uow.save().await?;
    info!(expense_id, category_id = category.id, "Updated expense");
    Ok(ExpenseReadOnly::from_parts(updated, Some(category)))
}

/// Looks up an expense by id. A missing expense is `None`, not an error.
pub async fn get_by_id(db: &DatabaseConnection, expense_id: i64) -> Result<Option<ExpenseReadOnly>> {
    let uow = UnitOfWork::begin(db).await?;
    let found = uow.expenses().get_with_category(expense_id).await?;
    Ok(found.map(project))
}

/// Every expense of `user_id` in one category, newest first.
pub async fn get_by_category(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
) -> Result<Vec<ExpenseReadOnly>> {
    let uow = UnitOfWork::begin(db).await?;
    ensure_user_exists(&uow, user_id).await?;
    if uow.categories().get(category_id).await?.is_none() {
        return Err(Error::not_found(
            "ExpenseCategory",
            format!("Category with id {category_id} not found"),
        ));
    }

    let expenses = uow
        .expenses()
        .list_by_user_and_category(user_id, category_id)
        .await?;
    Ok(expenses.into_iter().map(project).collect())
}

/// One page of the user's expenses, newest first.
pub async fn list_paginated(
    db: &DatabaseConnection,
    user_id: i64,
    page: PageRequest,
) -> Result<PaginatedResult<ExpenseReadOnly>> {
    list_paginated_filtered(db, user_id, page, &ExpenseFilters::default()).await
}

/// One page of the user's expenses matching every present filter, newest first.
pub async fn list_paginated_filtered(
    db: &DatabaseConnection,
    user_id: i64,
    page: PageRequest,
    filters: &ExpenseFilters,
) -> Result<PaginatedResult<ExpenseReadOnly>> {
    page.validate()?;

    let uow = UnitOfWork::begin(db).await?;
    ensure_user_exists(&uow, user_id).await?;

    let result = uow
        .expenses()
        .list_paginated(user_id, filters, page)
        .await?;
    Ok(result.map(project))
}

/// Every expense of the user, newest first.
pub async fn list_for_user(db: &DatabaseConnection, user_id: i64) -> Result<Vec<ExpenseReadOnly>> {
    let uow = UnitOfWork::begin(db).await?;
    ensure_user_exists(&uow, user_id).await?;

    let expenses = uow.expenses().list_by_user(user_id).await?;
    Ok(expenses.into_iter().map(project).collect())
}

/// The user's most recent expense titled exactly `title`.
pub async fn get_by_title(
    db: &DatabaseConnection,
    user_id: i64,
    title: &str,
) -> Result<Option<ExpenseReadOnly>> {
    let uow = UnitOfWork::begin(db).await?;
    let found = uow.expenses().get_by_title(user_id, title).await?;
    Ok(found.map(project))
}

/// Sum of all the user's expense amounts; zero when there are none.
pub async fn total_for_user(db: &DatabaseConnection, user_id: i64) -> Result<Decimal> {
    let uow = UnitOfWork::begin(db).await?;
    ensure_user_exists(&uow, user_id).await?;
    uow.expenses().sum_for_user(user_id).await
}

/// The user's expenses whose title contains `term`, newest first.
///
/// Matching uses SQL `LIKE`; on `SQLite` that ignores ASCII case.
pub async fn search(
    db: &DatabaseConnection,
    user_id: i64,
    term: &str,
) -> Result<Vec<ExpenseReadOnly>> {
    let uow = UnitOfWork::begin(db).await?;
    ensure_user_exists(&uow, user_id).await?;

    let expenses = uow.expenses().search_by_title(user_id, term).await?;
    Ok(expenses.into_iter().map(project).collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{Expense, ExpenseCategory};
    use crate::test_utils::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, EntityTrait, MockDatabase, PaginatorTrait};

    fn dated(title: &str, amount: Decimal, day: NaiveDate, category_name: &str) -> InsertExpense {
        InsertExpense {
            title: title.to_string(),
            amount,
            date: day,
            category_name: category_name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_expense_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Test blank title validation
        let result = create(&db, expense_input("  ", Decimal::ONE, "Food"), 1).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        // Test zero amount validation
        let result = create(&db, expense_input("Coffee", Decimal::ZERO, "Food"), 1).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        // Test amounts finer than cents
        let result = create(&db, expense_input("Coffee", Decimal::new(3_505, 3), "Food"), 1).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
        let result = create(&db, expense_input("Coffee", Decimal::new(1, 3), "Food"), 1).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        // Test negative amount validation
        let result = create(&db, expense_input("Coffee", Decimal::new(-5, 0), "Food"), 1).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;

        let coffee =
            create_test_expense(&db, alice.id, "Coffee", Decimal::new(350, 2), " Food ").await?;
        assert_eq!(coffee.title, "Coffee");
        assert_eq!(coffee.amount, Decimal::new(350, 2));
        let food = coffee.category.unwrap();
        assert_eq!(food.name, "Food");

        let stored = Expense::find_by_id(coffee.id).one(&db).await?.unwrap();
        assert_eq!(stored.user_id, alice.id);
        assert_eq!(stored.category_id, Some(food.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_for_unknown_user_or_blank_category() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_test_expense(&db, 999, "Coffee", Decimal::ONE, "Food").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        let alice = create_test_user(&db, "alice").await?;
        let result = create_test_expense(&db, alice.id, "Coffee", Decimal::ONE, "   ").await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        assert_eq!(Expense::find().count(&db).await?, 0);
        assert_eq!(ExpenseCategory::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_same_category_name_reuses_category() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;

        let first = create_test_expense(&db, alice.id, "Coffee", Decimal::ONE, "Food").await?;
        let second = create_test_expense(&db, bob.id, "Lunch", Decimal::TEN, "Food").await?;

        assert_eq!(first.category.unwrap().id, second.category.unwrap().id);
        assert_eq!(ExpenseCategory::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_checks_owner_then_collects_category() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;

        let coffee =
            create_test_expense(&db, alice.id, "Coffee", Decimal::new(350, 2), "Food").await?;
        let food_id = coffee.category.unwrap().id;

        let result = delete(&db, coffee.id, bob.id).await;
        assert!(matches!(result, Err(Error::NotAuthorized { .. })));
        assert!(get_by_id(&db, coffee.id).await?.is_some());

        delete(&db, coffee.id, alice.id).await?;
        assert!(get_by_id(&db, coffee.id).await?.is_none());
        assert!(ExpenseCategory::find_by_id(food_id).one(&db).await?.is_none());

        let result = delete(&db, coffee.id, alice.id).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_keeps_category_still_in_use() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;

        let coffee = create_test_expense(&db, alice.id, "Coffee", Decimal::ONE, "Food").await?;
        let lunch = create_test_expense(&db, alice.id, "Lunch", Decimal::TEN, "Food").await?;

        delete(&db, coffee.id, alice.id).await?;

        let food = ExpenseCategory::find_by_id(lunch.category.unwrap().id)
            .one(&db)
            .await?;
        assert_eq!(food.unwrap().name, "Food");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_budget_anchors_category() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;

        let rent = create_test_expense(&db, alice.id, "Rent", Decimal::new(90_000, 2), "Housing")
            .await?;
        let housing_id = rent.category.unwrap().id;
        create_test_budget(&db, alice.id, housing_id).await?;

        delete(&db, rent.id, alice.id).await?;

        assert!(get_by_id(&db, rent.id).await?.is_none());
        assert!(
            ExpenseCategory::find_by_id(housing_id)
                .one(&db)
                .await?
                .is_some()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_old_category() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;

        let coffee = create_test_expense(&db, alice.id, "Coffee", Decimal::ONE, "Food").await?;
        let food_id = coffee.category.unwrap().id;

        let input = dated("Taxi", Decimal::new(1_250, 2), date(2024, 2, 3), "Travel");
        let result = update(&db, bob.id, coffee.id, input.clone()).await;
        assert!(matches!(result, Err(Error::NotAuthorized { .. })));

        let result = update(&db, alice.id, 999, input.clone()).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        let blank = dated("Taxi", Decimal::ONE, date(2024, 2, 3), " ");
        let result = update(&db, alice.id, coffee.id, blank).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        let updated = update(&db, alice.id, coffee.id, input).await?;
        assert_eq!(updated.id, coffee.id);
        assert_eq!(updated.title, "Taxi");
        assert_eq!(updated.amount, Decimal::new(1_250, 2));
        assert_eq!(updated.date, date(2024, 2, 3));
        assert_eq!(updated.category.unwrap().name, "Travel");

        // No expense references "Food" now, but update does not collect it
        assert!(ExpenseCategory::find_by_id(food_id).one(&db).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_paginated_second_page() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;

        for day in 1..=25 {
            let input = dated(&format!("Item {day}"), Decimal::ONE, date(2024, 3, day), "Food");
            create(&db, input, alice.id).await?;
        }
        create_test_expense(&db, bob.id, "Other", Decimal::ONE, "Food").await?;

        let page = list_paginated(&db, alice.id, PageRequest::new(2, 10)?).await?;
        assert_eq!(page.total_records, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page_number, 2);
        let days: Vec<_> = page.data.iter().map(|e| e.date).collect();
        let expected: Vec<_> = (6..=15).rev().map(|day| date(2024, 3, day)).collect();
        assert_eq!(days, expected);

        let last = list_paginated(&db, alice.id, PageRequest::new(3, 10)?).await?;
        assert_eq!(last.data.len(), 5);

        let result = list_paginated(&db, 999, PageRequest::default()).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_same_day_expenses_order_by_id_desc() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;

        let first = create_test_expense(&db, alice.id, "First", Decimal::ONE, "Food").await?;
        let second = create_test_expense(&db, alice.id, "Second", Decimal::ONE, "Food").await?;

        let all = list_for_user(&db, alice.id).await?;
        let ids: Vec<_> = all.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_paginated_filtered() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;

        create(&db, dated("Coffee", Decimal::new(350, 2), date(2024, 1, 5), "Food"), alice.id)
            .await?;
        let lunch = create(
            &db,
            dated("Team lunch", Decimal::new(2_450, 2), date(2024, 1, 10), "Food"),
            alice.id,
        )
        .await?;
        create(&db, dated("Train", Decimal::new(4_000, 2), date(2024, 1, 12), "Travel"), alice.id)
            .await?;
        create(&db, dated("Dinner", Decimal::new(3_000, 2), date(2024, 2, 1), "Food"), alice.id)
            .await?;

        let food_id = lunch.category.unwrap().id;
        let filters = ExpenseFilters {
            category_id: Some(food_id),
            from_date: Some(date(2024, 1, 1)),
            to_date: Some(date(2024, 1, 31)),
            ..Default::default()
        };
        let january_food =
            list_paginated_filtered(&db, alice.id, PageRequest::default(), &filters).await?;
        assert_eq!(january_food.total_records, 2);
        let titles: Vec<_> = january_food.data.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Team lunch", "Coffee"]);

        let filters = ExpenseFilters {
            min_amount: Some(Decimal::new(2_450, 2)),
            max_amount: Some(Decimal::new(3_000, 2)),
            ..Default::default()
        };
        let mid_range =
            list_paginated_filtered(&db, alice.id, PageRequest::default(), &filters).await?;
        let titles: Vec<_> = mid_range.data.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Dinner", "Team lunch"]);

        let filters = ExpenseFilters {
            title: Some("LUNCH".to_string()),
            ..Default::default()
        };
        let by_title =
            list_paginated_filtered(&db, alice.id, PageRequest::default(), &filters).await?;
        assert_eq!(by_title.total_records, 1);
        assert_eq!(by_title.data[0].id, lunch.id);

        let blank_title = ExpenseFilters {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        let everything =
            list_paginated_filtered(&db, alice.id, PageRequest::default(), &blank_title).await?;
        assert_eq!(everything.total_records, 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_by_category() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;

        let coffee = create_test_expense(&db, alice.id, "Coffee", Decimal::ONE, "Food").await?;
        create_test_expense(&db, alice.id, "Train", Decimal::TEN, "Travel").await?;
        create_test_expense(&db, bob.id, "Bagel", Decimal::ONE, "Food").await?;
        let food_id = coffee.category.unwrap().id;

        let food = get_by_category(&db, alice.id, food_id).await?;
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].title, "Coffee");
        assert_eq!(food[0].category.as_ref().unwrap().name, "Food");

        let result = get_by_category(&db, alice.id, 999).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        let result = get_by_category(&db, 999, food_id).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_total_for_user() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;

        assert_eq!(total_for_user(&db, alice.id).await?, Decimal::ZERO);

        create_test_expense(&db, alice.id, "Coffee", Decimal::new(350, 2), "Food").await?;
        create_test_expense(&db, alice.id, "Bagel", Decimal::new(125, 2), "Food").await?;
        create_test_expense(&db, bob.id, "Lunch", Decimal::TEN, "Food").await?;

        assert_eq!(total_for_user(&db, alice.id).await?, Decimal::new(475, 2));

        let result = total_for_user(&db, 999).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_and_get_by_title() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;

        create(&db, dated("Morning coffee", Decimal::ONE, date(2024, 1, 1), "Food"), alice.id)
            .await?;
        create(&db, dated("Coffee beans", Decimal::TEN, date(2024, 1, 2), "Food"), alice.id)
            .await?;
        create(&db, dated("Train", Decimal::TEN, date(2024, 1, 3), "Travel"), alice.id).await?;

        let found = search(&db, alice.id, "coffee").await?;
        let titles: Vec<_> = found.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Coffee beans", "Morning coffee"]);

        assert!(search(&db, alice.id, "tea").await?.is_empty());
        let result = search(&db, 999, "coffee").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        let train = get_by_title(&db, alice.id, "Train").await?.unwrap();
        assert_eq!(train.category.unwrap().name, "Travel");
        assert!(get_by_title(&db, alice.id, "Trai").await?.is_none());
        Ok(())
    }
}
