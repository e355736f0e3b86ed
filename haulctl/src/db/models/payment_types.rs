//! Database models for payment types (lookup table, seeded at provisioning).

use sqlx::FromRow;

use crate::types::PaymentTypeId;

#[derive(Debug, Clone)]
pub struct PaymentTypeCreateDBRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentTypeUpdateDBRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PaymentTypeDBResponse {
    pub id: PaymentTypeId,
    pub name: String,
}
