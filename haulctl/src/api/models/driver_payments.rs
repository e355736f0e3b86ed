//! API request/response models for driver salary disbursements.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::{check_amount, require, require_text},
    db::models::driver_payments::{DriverPaymentCreateDBRequest, DriverPaymentDBResponse, DriverPaymentUpdateDBRequest},
    errors::Error,
    sanitize,
    types::{BankAccountId, CargoId, DriverId, DriverPaymentId},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct DriverPaymentQuery {
    pub id: Option<i64>,
    pub cargo_id: Option<i64>,
    pub driver_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DriverPaymentCreate {
    pub cargo_id: Option<CargoId>,
    pub driver_id: Option<DriverId>,
    pub amount: Option<f64>,
    pub payment_date: Option<String>,
    pub receipt_image: Option<String>,
    pub bank_account_id: Option<BankAccountId>,
    pub notes: Option<String>,
}

impl TryFrom<DriverPaymentCreate> for DriverPaymentCreateDBRequest {
    type Error = Error;

    fn try_from(create: DriverPaymentCreate) -> Result<Self, Error> {
        let cargo_id = require("cargo_id", create.cargo_id)?;
        let driver_id = require("driver_id", create.driver_id)?;
        let amount = check_amount(require("amount", create.amount)?)?;
        let payment_date = require_text("payment_date", create.payment_date)?;
        Ok(Self {
            cargo_id,
            driver_id,
            amount,
            payment_date: sanitize::clean_text(&payment_date),
            receipt_image: sanitize::clean_opt(create.receipt_image),
            bank_account_id: create.bank_account_id,
            notes: sanitize::clean_opt(create.notes),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DriverPaymentUpdate {
    pub cargo_id: Option<CargoId>,
    pub driver_id: Option<DriverId>,
    pub amount: Option<f64>,
    pub payment_date: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub receipt_image: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub bank_account_id: Option<Option<BankAccountId>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl DriverPaymentUpdate {
    pub fn is_empty(&self) -> bool {
        self.cargo_id.is_none()
            && self.driver_id.is_none()
            && self.amount.is_none()
            && self.payment_date.is_none()
            && self.receipt_image.is_none()
            && self.bank_account_id.is_none()
            && self.notes.is_none()
    }
}

impl TryFrom<DriverPaymentUpdate> for DriverPaymentUpdateDBRequest {
    type Error = Error;

    fn try_from(update: DriverPaymentUpdate) -> Result<Self, Error> {
        let amount = update.amount.map(check_amount).transpose()?;
        Ok(Self {
            cargo_id: update.cargo_id,
            driver_id: update.driver_id,
            amount,
            payment_date: update.payment_date.map(|v| sanitize::clean_text(&v)),
            receipt_image: update.receipt_image.map(sanitize::clean_opt),
            bank_account_id: update.bank_account_id,
            notes: update.notes.map(sanitize::clean_opt),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DriverPaymentResponse {
    pub id: DriverPaymentId,
    pub cargo_id: CargoId,
    pub driver_id: DriverId,
    pub amount: f64,
    pub payment_date: String,
    pub receipt_image: Option<String>,
    pub bank_account_id: Option<BankAccountId>,
    pub notes: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub loading_date: Option<String>,
    pub weight_tonnes: Option<f64>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub bank_account_name: Option<String>,
}

impl From<DriverPaymentDBResponse> for DriverPaymentResponse {
    fn from(db: DriverPaymentDBResponse) -> Self {
        Self {
            id: db.id,
            cargo_id: db.cargo_id,
            driver_id: db.driver_id,
            amount: db.amount,
            payment_date: db.payment_date,
            receipt_image: db.receipt_image,
            bank_account_id: db.bank_account_id,
            notes: db.notes,
            origin: db.origin,
            destination: db.destination,
            loading_date: db.loading_date,
            weight_tonnes: db.weight_tonnes,
            driver_name: db.driver_name,
            driver_phone: db.driver_phone,
            bank_account_name: db.bank_account_name,
        }
    }
}
