//! Database models for cargo selling companies.

use sqlx::FromRow;

use crate::types::SellingCompanyId;

#[derive(Debug, Clone)]
pub struct SellingCompanyCreateDBRequest {
    pub name: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SellingCompanyUpdateDBRequest {
    pub name: Option<String>,
    pub phone_number: Option<Option<String>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SellingCompanyDBResponse {
    pub id: SellingCompanyId,
    pub name: String,
    pub phone_number: Option<String>,
}
