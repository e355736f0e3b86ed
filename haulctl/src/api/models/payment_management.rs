//! API request/response models for payment management records.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::{check_amount, require},
    db::models::payment_management::{PaymentManagementCreateDBRequest, PaymentManagementDBResponse, PaymentManagementUpdateDBRequest},
    errors::Error,
    sanitize,
    types::{CargoId, PaymentManagementId, PaymentTypeId, now_timestamp},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaymentManagementQuery {
    pub id: Option<i64>,
    pub cargo_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentManagementCreate {
    pub cargo_id: Option<CargoId>,
    pub payment_type_id: Option<PaymentTypeId>,
    pub payer_details: Option<String>,
    pub amount: Option<f64>,
    pub card_transfer_receipt_image: Option<String>,
    pub check_image: Option<String>,
    pub check_due_date: Option<String>,
    /// Defaults to the current timestamp
    pub transaction_date: Option<String>,
}

impl TryFrom<PaymentManagementCreate> for PaymentManagementCreateDBRequest {
    type Error = Error;

    fn try_from(create: PaymentManagementCreate) -> Result<Self, Error> {
        let cargo_id = require("cargo_id", create.cargo_id)?;
        let payment_type_id = require("payment_type_id", create.payment_type_id)?;
        let amount = check_amount(require("amount", create.amount)?)?;
        Ok(Self {
            cargo_id,
            payment_type_id,
            payer_details: sanitize::clean_opt(create.payer_details),
            amount,
            card_transfer_receipt_image: sanitize::clean_opt(create.card_transfer_receipt_image),
            check_image: sanitize::clean_opt(create.check_image),
            check_due_date: sanitize::clean_opt(create.check_due_date),
            transaction_date: create.transaction_date.map(|v| sanitize::clean_text(&v)).unwrap_or_else(now_timestamp),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PaymentManagementUpdate {
    pub cargo_id: Option<CargoId>,
    pub payment_type_id: Option<PaymentTypeId>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub payer_details: Option<Option<String>>,
    pub amount: Option<f64>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub card_transfer_receipt_image: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub check_image: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub check_due_date: Option<Option<String>>,
    pub transaction_date: Option<String>,
}

impl PaymentManagementUpdate {
    pub fn is_empty(&self) -> bool {
        self.cargo_id.is_none()
            && self.payment_type_id.is_none()
            && self.payer_details.is_none()
            && self.amount.is_none()
            && self.card_transfer_receipt_image.is_none()
            && self.check_image.is_none()
            && self.check_due_date.is_none()
            && self.transaction_date.is_none()
    }
}

impl TryFrom<PaymentManagementUpdate> for PaymentManagementUpdateDBRequest {
    type Error = Error;

    fn try_from(update: PaymentManagementUpdate) -> Result<Self, Error> {
        let amount = update.amount.map(check_amount).transpose()?;
        Ok(Self {
            cargo_id: update.cargo_id,
            payment_type_id: update.payment_type_id,
            payer_details: update.payer_details.map(sanitize::clean_opt),
            amount,
            card_transfer_receipt_image: update.card_transfer_receipt_image.map(sanitize::clean_opt),
            check_image: update.check_image.map(sanitize::clean_opt),
            check_due_date: update.check_due_date.map(sanitize::clean_opt),
            transaction_date: update.transaction_date.map(|v| sanitize::clean_text(&v)),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentManagementResponse {
    pub id: PaymentManagementId,
    pub cargo_id: CargoId,
    pub payment_type_id: PaymentTypeId,
    pub payer_details: Option<String>,
    pub amount: f64,
    pub card_transfer_receipt_image: Option<String>,
    pub check_image: Option<String>,
    pub check_due_date: Option<String>,
    pub transaction_date: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub payment_type_name: Option<String>,
}

impl From<PaymentManagementDBResponse> for PaymentManagementResponse {
    fn from(db: PaymentManagementDBResponse) -> Self {
        Self {
            id: db.id,
            cargo_id: db.cargo_id,
            payment_type_id: db.payment_type_id,
            payer_details: db.payer_details,
            amount: db.amount,
            card_transfer_receipt_image: db.card_transfer_receipt_image,
            check_image: db.check_image,
            check_due_date: db.check_due_date,
            transaction_date: db.transaction_date,
            origin: db.origin,
            destination: db.destination,
            payment_type_name: db.payment_type_name,
        }
    }
}
