//! Database models for vehicles.

use sqlx::FromRow;

use crate::types::VehicleId;

#[derive(Debug, Clone)]
pub struct VehicleCreateDBRequest {
    pub name: String,
    pub smart_card_number: Option<String>,
    pub health_code: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VehicleUpdateDBRequest {
    pub name: Option<String>,
    pub smart_card_number: Option<Option<String>>,
    pub health_code: Option<Option<String>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct VehicleDBResponse {
    pub id: VehicleId,
    pub name: String,
    pub smart_card_number: Option<String>,
    pub health_code: Option<String>,
}
