//! Database models for per-cargo expenses.

use sqlx::FromRow;

use crate::types::{CargoId, ExpenseCategoryId, ExpenseId};

#[derive(Debug, Clone)]
pub struct ExpenseCreateDBRequest {
    pub cargo_id: CargoId,
    pub expense_category_id: ExpenseCategoryId,
    pub title: String,
    pub amount: f64,
    pub receipt_image: Option<String>,
    pub description: Option<String>,
    pub expense_date: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdateDBRequest {
    pub cargo_id: Option<CargoId>,
    pub expense_category_id: Option<ExpenseCategoryId>,
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub receipt_image: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub expense_date: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ExpenseDBResponse {
    pub id: ExpenseId,
    pub cargo_id: CargoId,
    pub expense_category_id: ExpenseCategoryId,
    pub title: String,
    pub amount: f64,
    pub receipt_image: Option<String>,
    pub description: Option<String>,
    pub expense_date: String,
    // join profile
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpenseFilter {
    pub cargo_id: Option<CargoId>,
    pub expense_category_id: Option<ExpenseCategoryId>,
}
