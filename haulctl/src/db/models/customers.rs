//! Database models for customers.

use sqlx::FromRow;

use crate::types::CustomerId;

#[derive(Debug, Clone)]
pub struct CustomerCreateDBRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerUpdateDBRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<Option<String>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CustomerDBResponse {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}
