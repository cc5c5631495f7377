//! Boundary shapes consumed and produced by the service layer.

pub mod inputs;
pub mod outputs;
pub mod pagination;

pub use inputs::{
    ExpenseFilters, InsertBudget, InsertExpense, LoginCredentials, RegisterUser, UpdateUser,
    UserFilters,
};
pub use outputs::{AccessToken, BudgetReadOnly, CategoryReadOnly, ExpenseReadOnly, UserReadOnly};
pub use pagination::{PageRequest, PaginatedResult};
