//! Database models for shipping companies.

use sqlx::FromRow;

use crate::types::ShippingCompanyId;

#[derive(Debug, Clone)]
pub struct ShippingCompanyCreateDBRequest {
    pub name: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ShippingCompanyUpdateDBRequest {
    pub name: Option<String>,
    pub phone_number: Option<Option<String>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ShippingCompanyDBResponse {
    pub id: ShippingCompanyId,
    pub name: String,
    pub phone_number: Option<String>,
}
