//! Database models for drivers.
//!
//! The credential arrives at the repository already hashed; `password_hash`
//! never leaves the db layer (the API response type has no such field).

use sqlx::FromRow;

use crate::types::{BankAccountId, DriverId};

#[derive(Debug, Clone)]
pub struct DriverCreateDBRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub salary_percentage: Option<f64>,
    pub bank_account_id: Option<BankAccountId>,
    pub national_id: Option<String>,
    pub national_id_card_image: Option<String>,
    pub driver_license_image: Option<String>,
    pub driver_smart_card_image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DriverUpdateDBRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<Option<String>>,
    pub password_hash: Option<String>,
    pub salary_percentage: Option<Option<f64>>,
    pub bank_account_id: Option<Option<BankAccountId>>,
    pub national_id: Option<Option<String>>,
    pub national_id_card_image: Option<Option<String>>,
    pub driver_license_image: Option<Option<String>>,
    pub driver_smart_card_image: Option<Option<String>>,
}

/// Bank account details embedded into a single-driver read.
#[derive(Debug, Clone, FromRow)]
pub struct DriverBankAccountDetails {
    pub bank_name: String,
    pub account_holder_name: String,
    pub card_number: Option<String>,
    pub iban: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DriverDBResponse {
    pub id: DriverId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub salary_percentage: Option<f64>,
    pub bank_account_id: Option<BankAccountId>,
    pub national_id: Option<String>,
    pub national_id_card_image: Option<String>,
    pub driver_license_image: Option<String>,
    pub driver_smart_card_image: Option<String>,
    /// Resolved from `bank_account_id` on single-record reads only.
    #[sqlx(skip)]
    pub bank_account_details: Option<DriverBankAccountDetails>,
}
