//! Repositories and the unit of work.
//!
//! A [`UnitOfWork`] wraps one database transaction. Every repository handed out by it
//! reads and writes through that transaction, so a service can stage several changes
//! and commit them together with [`UnitOfWork::save`]. Dropping a unit without saving
//! rolls everything back.
//!
//! [`Repository`] carries the generic CRUD contract for any entity. Entity-specific
//! queries are inherent impls on the concrete instantiations in the sibling modules.

use crate::entities::{budget, expense, expense_category, user};
use crate::errors::Result;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, QueryFilter, SqlErr,
    TransactionTrait,
};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod users;

/// Repository over the `users` table
pub type UserRepository<'a> = Repository<'a, user::Entity>;
/// Repository over the `expenses` table
pub type ExpenseRepository<'a> = Repository<'a, expense::Entity>;
/// Repository over the `expense_categories` table
pub type CategoryRepository<'a> = Repository<'a, expense_category::Entity>;
/// Repository over the `budgets` table
pub type BudgetRepository<'a> = Repository<'a, budget::Entity>;

/// An entity with a filter that every default read applies.
///
/// The generic repository adds [`ScopedEntity::default_scope`] to `get`, `get_all` and
/// `count`; there is no way to opt out through [`Repository`].
pub trait ScopedEntity: EntityTrait {
    /// Condition rows must satisfy to be visible. Everything is visible by default.
    fn default_scope() -> Condition {
        Condition::all()
    }
}

/// Whether `err` is a unique-index violation reported by the store.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// One atomic batch of reads and writes
pub struct UnitOfWork {
    txn: DatabaseTransaction,
    affected: AtomicU64,
}

impl UnitOfWork {
    /// Opens a new unit backed by a fresh transaction on `db`.
    pub async fn begin(db: &DatabaseConnection) -> Result<Self> {
        let txn = db.begin().await?;
        Ok(Self {
            txn,
            affected: AtomicU64::new(0),
        })
    }

    /// Repository over `users`, scoped to live accounts
    pub fn users(&self) -> UserRepository<'_> {
        Repository::new(self)
    }

    /// Repository over `expenses`
    pub fn expenses(&self) -> ExpenseRepository<'_> {
        Repository::new(self)
    }

    /// Repository over `expense_categories`
    pub fn categories(&self) -> CategoryRepository<'_> {
        Repository::new(self)
    }

    /// Repository over `budgets`
    pub fn budgets(&self) -> BudgetRepository<'_> {
        Repository::new(self)
    }

    /// Commits every staged change as one transaction.
    ///
    /// Returns whether any row was inserted, updated or deleted.
    pub async fn save(self) -> Result<bool> {
        let affected = self.affected.load(Ordering::Relaxed);
        self.txn.commit().await?;
        debug!(rows = affected, "Unit of work committed");
        Ok(affected > 0)
    }

    const fn connection(&self) -> &DatabaseTransaction {
        &self.txn
    }

    fn record_changes(&self, rows: u64) {
        self.affected.fetch_add(rows, Ordering::Relaxed);
    }
}

/// Generic data access for entity `E`, bound to a [`UnitOfWork`]
pub struct Repository<'a, E> {
    uow: &'a UnitOfWork,
    entity: PhantomData<E>,
}

impl<'a, E> Repository<'a, E> {
    const fn new(uow: &'a UnitOfWork) -> Self {
        Self {
            uow,
            entity: PhantomData,
        }
    }

    const fn conn(&self) -> &'a DatabaseTransaction {
        self.uow.connection()
    }

    fn record_changes(&self, rows: u64) {
        self.uow.record_changes(rows);
    }
}

impl<E> Repository<'_, E>
where
    E: ScopedEntity,
    E::Model: Send + Sync + 'static,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    /// Finds a visible row by primary key.
    pub async fn get(&self, id: i64) -> Result<Option<E::Model>> {
        E::find_by_id(id)
            .filter(E::default_scope())
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Lists every visible row.
    pub async fn get_all(&self) -> Result<Vec<E::Model>> {
        E::find()
            .filter(E::default_scope())
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Counts visible rows.
    pub async fn count(&self) -> Result<u64> {
        E::find()
            .filter(E::default_scope())
            .count(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Inserts one row and returns it with its generated key.
    pub async fn add<A>(&self, model: A) -> Result<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        let inserted = model.insert(self.conn()).await?;
        self.record_changes(1);
        Ok(inserted)
    }

    /// Inserts several rows in one statement and returns how many were written.
    pub async fn add_range<A>(&self, models: Vec<A>) -> Result<u64>
    where
        A: ActiveModelTrait<Entity = E> + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        if models.is_empty() {
            return Ok(0);
        }
        let rows = E::insert_many(models)
            .exec_without_returning(self.conn())
            .await?;
        self.record_changes(rows);
        Ok(rows)
    }

    /// Writes every column of `model` back to its row.
    ///
    /// All fields are marked dirty first, so the statement replaces the whole row rather
    /// than diffing against what was loaded.
    pub async fn update<A>(&self, model: A) -> Result<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        let updated = model.reset_all().update(self.conn()).await?;
        self.record_changes(1);
        Ok(updated)
    }

    /// Loads the row and removes it. Returns `false` when no visible row had that key.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        if self.get(id).await?.is_none() {
            return Ok(false);
        }
        let result = E::delete_by_id(id).exec(self.conn()).await?;
        self.record_changes(result.rows_affected);
        Ok(result.rows_affected > 0)
    }
}

impl ScopedEntity for expense::Entity {}
impl ScopedEntity for expense_category::Entity {}
impl ScopedEntity for budget::Entity {}
