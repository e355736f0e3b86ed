//! Database models for receivables (money collected from customers).

use sqlx::FromRow;

use crate::types::{BankAccountId, CargoId, CustomerId, ReceivableId};

#[derive(Debug, Clone)]
pub struct ReceivableCreateDBRequest {
    pub cargo_id: CargoId,
    pub amount: f64,
    pub customer_id: CustomerId,
    pub bank_account_id: Option<BankAccountId>,
    pub receipt_image: Option<String>,
    pub received_date: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReceivableUpdateDBRequest {
    pub cargo_id: Option<CargoId>,
    pub amount: Option<f64>,
    pub customer_id: Option<CustomerId>,
    pub bank_account_id: Option<Option<BankAccountId>>,
    pub receipt_image: Option<Option<String>>,
    pub received_date: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReceivableDBResponse {
    pub id: ReceivableId,
    pub cargo_id: CargoId,
    pub amount: f64,
    pub customer_id: CustomerId,
    pub bank_account_id: Option<BankAccountId>,
    pub receipt_image: Option<String>,
    pub received_date: String,
    // join profile
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_holder: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReceivableFilter {
    pub cargo_id: Option<CargoId>,
    pub customer_id: Option<CustomerId>,
}
