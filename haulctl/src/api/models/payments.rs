//! API request/response models for payments.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::{check_amount, require},
    db::models::payments::{PaymentCreateDBRequest, PaymentDBResponse, PaymentUpdateDBRequest},
    errors::Error,
    sanitize,
    types::{BankAccountId, CargoId, PaymentId, SellingCompanyId, now_timestamp},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaymentQuery {
    pub id: Option<i64>,
    /// Restrict the list to one cargo
    pub cargo_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentCreate {
    pub cargo_id: Option<CargoId>,
    pub amount: Option<f64>,
    pub company_id: Option<SellingCompanyId>,
    pub bank_account_id: Option<BankAccountId>,
    pub receipt_image: Option<String>,
    /// Defaults to the current timestamp
    pub payment_date: Option<String>,
}

impl TryFrom<PaymentCreate> for PaymentCreateDBRequest {
    type Error = Error;

    fn try_from(create: PaymentCreate) -> Result<Self, Error> {
        let cargo_id = require("cargo_id", create.cargo_id)?;
        let amount = check_amount(require("amount", create.amount)?)?;
        let company_id = require("company_id", create.company_id)?;
        Ok(Self {
            cargo_id,
            amount,
            company_id,
            bank_account_id: create.bank_account_id,
            receipt_image: sanitize::clean_opt(create.receipt_image),
            payment_date: create.payment_date.map(|v| sanitize::clean_text(&v)).unwrap_or_else(now_timestamp),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PaymentUpdate {
    pub cargo_id: Option<CargoId>,
    pub amount: Option<f64>,
    pub company_id: Option<SellingCompanyId>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub bank_account_id: Option<Option<BankAccountId>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub receipt_image: Option<Option<String>>,
    pub payment_date: Option<String>,
}

impl PaymentUpdate {
    pub fn is_empty(&self) -> bool {
        self.cargo_id.is_none()
            && self.amount.is_none()
            && self.company_id.is_none()
            && self.bank_account_id.is_none()
            && self.receipt_image.is_none()
            && self.payment_date.is_none()
    }
}

impl TryFrom<PaymentUpdate> for PaymentUpdateDBRequest {
    type Error = Error;

    fn try_from(update: PaymentUpdate) -> Result<Self, Error> {
        let amount = update.amount.map(check_amount).transpose()?;
        Ok(Self {
            cargo_id: update.cargo_id,
            amount,
            company_id: update.company_id,
            bank_account_id: update.bank_account_id,
            receipt_image: update.receipt_image.map(sanitize::clean_opt),
            payment_date: update.payment_date.map(|v| sanitize::clean_text(&v)),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: PaymentId,
    pub cargo_id: CargoId,
    pub amount: f64,
    pub company_id: SellingCompanyId,
    pub bank_account_id: Option<BankAccountId>,
    pub receipt_image: Option<String>,
    pub payment_date: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub company_name: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_holder: Option<String>,
}

impl From<PaymentDBResponse> for PaymentResponse {
    fn from(db: PaymentDBResponse) -> Self {
        Self {
            id: db.id,
            cargo_id: db.cargo_id,
            amount: db.amount,
            company_id: db.company_id,
            bank_account_id: db.bank_account_id,
            receipt_image: db.receipt_image,
            payment_date: db.payment_date,
            origin: db.origin,
            destination: db.destination,
            company_name: db.company_name,
            bank_name: db.bank_name,
            bank_account_holder: db.bank_account_holder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_amount_is_rejected() {
        let create = PaymentCreate {
            cargo_id: Some(1),
            amount: Some(-5.0),
            company_id: Some(1),
            bank_account_id: None,
            receipt_image: None,
            payment_date: None,
        };
        let err = PaymentCreateDBRequest::try_from(create).unwrap_err();
        assert_eq!(err.user_message(), "Invalid amount.");
    }

    #[test]
    fn payment_date_defaults_to_now() {
        let create = PaymentCreate {
            cargo_id: Some(1),
            amount: Some(5.0),
            company_id: Some(1),
            bank_account_id: None,
            receipt_image: None,
            payment_date: None,
        };
        let request = PaymentCreateDBRequest::try_from(create).unwrap();
        assert_eq!(request.payment_date.len(), 19);
    }
}
