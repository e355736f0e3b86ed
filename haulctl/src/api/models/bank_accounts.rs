//! API request/response models for bank accounts.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::require_text,
    db::models::bank_accounts::{BankAccountCreateDBRequest, BankAccountDBResponse, BankAccountUpdateDBRequest},
    errors::Error,
    sanitize,
    types::BankAccountId,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct BankAccountQuery {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BankAccountCreate {
    pub bank_name: Option<String>,
    pub account_holder_name: Option<String>,
    pub card_number: Option<String>,
    pub iban: Option<String>,
}

impl TryFrom<BankAccountCreate> for BankAccountCreateDBRequest {
    type Error = Error;

    fn try_from(create: BankAccountCreate) -> Result<Self, Error> {
        let bank_name = require_text("bank_name", create.bank_name)?;
        let account_holder_name = require_text("account_holder_name", create.account_holder_name)?;
        Ok(Self {
            bank_name: sanitize::clean_text(&bank_name),
            account_holder_name: sanitize::clean_text(&account_holder_name),
            card_number: sanitize::clean_opt(create.card_number),
            iban: sanitize::clean_opt(create.iban),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BankAccountUpdate {
    pub bank_name: Option<String>,
    pub account_holder_name: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub card_number: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub iban: Option<Option<String>>,
}

impl BankAccountUpdate {
    pub fn is_empty(&self) -> bool {
        self.bank_name.is_none() && self.account_holder_name.is_none() && self.card_number.is_none() && self.iban.is_none()
    }
}

impl From<BankAccountUpdate> for BankAccountUpdateDBRequest {
    fn from(update: BankAccountUpdate) -> Self {
        Self {
            bank_name: update.bank_name.map(|v| sanitize::clean_text(&v)),
            account_holder_name: update.account_holder_name.map(|v| sanitize::clean_text(&v)),
            card_number: update.card_number.map(sanitize::clean_opt),
            iban: update.iban.map(sanitize::clean_opt),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BankAccountResponse {
    pub id: BankAccountId,
    pub bank_name: String,
    pub account_holder_name: String,
    pub card_number: Option<String>,
    pub iban: Option<String>,
}

impl From<BankAccountDBResponse> for BankAccountResponse {
    fn from(db: BankAccountDBResponse) -> Self {
        Self {
            id: db.id,
            bank_name: db.bank_name,
            account_holder_name: db.account_holder_name,
            card_number: db.card_number,
            iban: db.iban,
        }
    }
}
