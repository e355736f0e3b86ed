//! Database models for cargo types.

use sqlx::FromRow;

use crate::types::CargoTypeId;

#[derive(Debug, Clone)]
pub struct CargoTypeCreateDBRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CargoTypeUpdateDBRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CargoTypeDBResponse {
    pub id: CargoTypeId,
    pub name: String,
}
