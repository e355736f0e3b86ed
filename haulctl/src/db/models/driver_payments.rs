//! Database models for driver salary disbursements.

use sqlx::FromRow;

use crate::types::{BankAccountId, CargoId, DriverId, DriverPaymentId};

#[derive(Debug, Clone)]
pub struct DriverPaymentCreateDBRequest {
    pub cargo_id: CargoId,
    pub driver_id: DriverId,
    pub amount: f64,
    pub payment_date: String,
    pub receipt_image: Option<String>,
    pub bank_account_id: Option<BankAccountId>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DriverPaymentUpdateDBRequest {
    pub cargo_id: Option<CargoId>,
    pub driver_id: Option<DriverId>,
    pub amount: Option<f64>,
    pub payment_date: Option<String>,
    pub receipt_image: Option<Option<String>>,
    pub bank_account_id: Option<Option<BankAccountId>>,
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DriverPaymentDBResponse {
    pub id: DriverPaymentId,
    pub cargo_id: CargoId,
    pub driver_id: DriverId,
    pub amount: f64,
    pub payment_date: String,
    pub receipt_image: Option<String>,
    pub bank_account_id: Option<BankAccountId>,
    pub notes: Option<String>,
    // join profile
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub loading_date: Option<String>,
    pub weight_tonnes: Option<f64>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub bank_account_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DriverPaymentFilter {
    pub cargo_id: Option<CargoId>,
    pub driver_id: Option<DriverId>,
}
