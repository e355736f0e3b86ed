//! API request/response models for receivables.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::{check_amount, require},
    db::models::receivables::{ReceivableCreateDBRequest, ReceivableDBResponse, ReceivableUpdateDBRequest},
    errors::Error,
    sanitize,
    types::{BankAccountId, CargoId, CustomerId, ReceivableId, now_timestamp},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReceivableQuery {
    pub id: Option<i64>,
    pub cargo_id: Option<i64>,
    pub customer_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReceivableCreate {
    pub cargo_id: Option<CargoId>,
    pub amount: Option<f64>,
    pub customer_id: Option<CustomerId>,
    pub bank_account_id: Option<BankAccountId>,
    pub receipt_image: Option<String>,
    /// Defaults to the current timestamp
    pub received_date: Option<String>,
}

impl TryFrom<ReceivableCreate> for ReceivableCreateDBRequest {
    type Error = Error;

    fn try_from(create: ReceivableCreate) -> Result<Self, Error> {
        let cargo_id = require("cargo_id", create.cargo_id)?;
        let amount = check_amount(require("amount", create.amount)?)?;
        let customer_id = require("customer_id", create.customer_id)?;
        Ok(Self {
            cargo_id,
            amount,
            customer_id,
            bank_account_id: create.bank_account_id,
            receipt_image: sanitize::clean_opt(create.receipt_image),
            received_date: create.received_date.map(|v| sanitize::clean_text(&v)).unwrap_or_else(now_timestamp),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReceivableUpdate {
    pub cargo_id: Option<CargoId>,
    pub amount: Option<f64>,
    pub customer_id: Option<CustomerId>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub bank_account_id: Option<Option<BankAccountId>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub receipt_image: Option<Option<String>>,
    pub received_date: Option<String>,
}

impl ReceivableUpdate {
    pub fn is_empty(&self) -> bool {
        self.cargo_id.is_none()
            && self.amount.is_none()
            && self.customer_id.is_none()
            && self.bank_account_id.is_none()
            && self.receipt_image.is_none()
            && self.received_date.is_none()
    }
}

impl TryFrom<ReceivableUpdate> for ReceivableUpdateDBRequest {
    type Error = Error;

    fn try_from(update: ReceivableUpdate) -> Result<Self, Error> {
        let amount = update.amount.map(check_amount).transpose()?;
        Ok(Self {
            cargo_id: update.cargo_id,
            amount,
            customer_id: update.customer_id,
            bank_account_id: update.bank_account_id,
            receipt_image: update.receipt_image.map(sanitize::clean_opt),
            received_date: update.received_date.map(|v| sanitize::clean_text(&v)),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReceivableResponse {
    pub id: ReceivableId,
    pub cargo_id: CargoId,
    pub amount: f64,
    pub customer_id: CustomerId,
    pub bank_account_id: Option<BankAccountId>,
    pub receipt_image: Option<String>,
    pub received_date: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_holder: Option<String>,
}

impl From<ReceivableDBResponse> for ReceivableResponse {
    fn from(db: ReceivableDBResponse) -> Self {
        Self {
            id: db.id,
            cargo_id: db.cargo_id,
            amount: db.amount,
            customer_id: db.customer_id,
            bank_account_id: db.bank_account_id,
            receipt_image: db.receipt_image,
            received_date: db.received_date,
            origin: db.origin,
            destination: db.destination,
            customer_name: db.customer_name,
            customer_phone: db.customer_phone,
            bank_name: db.bank_name,
            bank_account_holder: db.bank_account_holder,
        }
    }
}
