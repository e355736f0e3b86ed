//! Database models for payment management records (how a customer payment
//! was made: cash, check, card transfer, ...).

use sqlx::FromRow;

use crate::types::{CargoId, PaymentManagementId, PaymentTypeId};

#[derive(Debug, Clone)]
pub struct PaymentManagementCreateDBRequest {
    pub cargo_id: CargoId,
    pub payment_type_id: PaymentTypeId,
    pub payer_details: Option<String>,
    pub amount: f64,
    pub card_transfer_receipt_image: Option<String>,
    pub check_image: Option<String>,
    pub check_due_date: Option<String>,
    pub transaction_date: String,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentManagementUpdateDBRequest {
    pub cargo_id: Option<CargoId>,
    pub payment_type_id: Option<PaymentTypeId>,
    pub payer_details: Option<Option<String>>,
    pub amount: Option<f64>,
    pub card_transfer_receipt_image: Option<Option<String>>,
    pub check_image: Option<Option<String>>,
    pub check_due_date: Option<Option<String>>,
    pub transaction_date: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PaymentManagementDBResponse {
    pub id: PaymentManagementId,
    pub cargo_id: CargoId,
    pub payment_type_id: PaymentTypeId,
    pub payer_details: Option<String>,
    pub amount: f64,
    pub card_transfer_receipt_image: Option<String>,
    pub check_image: Option<String>,
    pub check_due_date: Option<String>,
    pub transaction_date: String,
    // join profile
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub payment_type_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentManagementFilter {
    pub cargo_id: Option<CargoId>,
}
