//! Entity module - `SeaORM` definitions for users, expenses, categories and budgets.
//!
//! Foreign keys and their delete behaviors are declared on the relations, so
//! `create_tables` reproduces them from these definitions alone.

pub mod budget;
pub mod expense;
pub mod expense_category;
pub mod user;

pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use expense_category::{
    Column as ExpenseCategoryColumn, Entity as ExpenseCategory, Model as ExpenseCategoryModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, UserRole};
