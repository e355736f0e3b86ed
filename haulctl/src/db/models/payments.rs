//! Database models for payments (money paid out to selling companies).

use sqlx::FromRow;

use crate::types::{BankAccountId, CargoId, PaymentId, SellingCompanyId};

#[derive(Debug, Clone)]
pub struct PaymentCreateDBRequest {
    pub cargo_id: CargoId,
    pub amount: f64,
    pub company_id: SellingCompanyId,
    pub bank_account_id: Option<BankAccountId>,
    pub receipt_image: Option<String>,
    pub payment_date: String,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentUpdateDBRequest {
    pub cargo_id: Option<CargoId>,
    pub amount: Option<f64>,
    pub company_id: Option<SellingCompanyId>,
    pub bank_account_id: Option<Option<BankAccountId>>,
    pub receipt_image: Option<Option<String>>,
    pub payment_date: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PaymentDBResponse {
    pub id: PaymentId,
    pub cargo_id: CargoId,
    pub amount: f64,
    pub company_id: SellingCompanyId,
    pub bank_account_id: Option<BankAccountId>,
    pub receipt_image: Option<String>,
    pub payment_date: String,
    // join profile
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub company_name: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_holder: Option<String>,
}

/// Equality filters for the collection read.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentFilter {
    pub cargo_id: Option<CargoId>,
}
