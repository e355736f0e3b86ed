//! Database models for bank accounts.

use sqlx::FromRow;

use crate::types::BankAccountId;

#[derive(Debug, Clone)]
pub struct BankAccountCreateDBRequest {
    pub bank_name: String,
    pub account_holder_name: String,
    pub card_number: Option<String>,
    pub iban: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BankAccountUpdateDBRequest {
    pub bank_name: Option<String>,
    pub account_holder_name: Option<String>,
    pub card_number: Option<Option<String>>,
    pub iban: Option<Option<String>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct BankAccountDBResponse {
    pub id: BankAccountId,
    pub bank_name: String,
    pub account_holder_name: String,
    pub card_number: Option<String>,
    pub iban: Option<String>,
}
