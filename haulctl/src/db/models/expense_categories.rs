//! Database models for expense categories.

use sqlx::FromRow;

use crate::types::ExpenseCategoryId;

#[derive(Debug, Clone)]
pub struct ExpenseCategoryCreateDBRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseCategoryUpdateDBRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ExpenseCategoryDBResponse {
    pub id: ExpenseCategoryId,
    pub name: String,
}
