//! API request/response models for drivers.
//!
//! The `password` field is write-only: accepted on create (required) and
//! update (optional), hashed by the handler, and absent from every response
//! type in this module.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::require_text,
    db::models::drivers::{DriverBankAccountDetails, DriverCreateDBRequest, DriverDBResponse, DriverUpdateDBRequest},
    errors::Error,
    sanitize,
    types::{BankAccountId, DriverId},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct DriverQuery {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DriverCreate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    /// Plaintext credential; stored only as a one-way hash
    pub password: Option<String>,
    pub salary_percentage: Option<f64>,
    pub bank_account_id: Option<BankAccountId>,
    pub national_id: Option<String>,
    pub national_id_card_image: Option<String>,
    pub driver_license_image: Option<String>,
    pub driver_smart_card_image: Option<String>,
}

impl DriverCreate {
    /// Validate required fields and assemble the db request around an
    /// already-computed credential hash.
    pub fn into_db_request(self, password_hash: String) -> Result<DriverCreateDBRequest, Error> {
        let first_name = require_text("first_name", self.first_name)?;
        let last_name = require_text("last_name", self.last_name)?;
        Ok(DriverCreateDBRequest {
            first_name: sanitize::clean_text(&first_name),
            last_name: sanitize::clean_text(&last_name),
            phone_number: sanitize::clean_opt(self.phone_number),
            password_hash,
            salary_percentage: self.salary_percentage,
            bank_account_id: self.bank_account_id,
            national_id: sanitize::clean_opt(self.national_id),
            national_id_card_image: sanitize::clean_opt(self.national_id_card_image),
            driver_license_image: sanitize::clean_opt(self.driver_license_image),
            driver_smart_card_image: sanitize::clean_opt(self.driver_smart_card_image),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DriverUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone_number: Option<Option<String>>,
    /// New plaintext credential, replaced by its hash before storage
    pub password: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub salary_percentage: Option<Option<f64>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub bank_account_id: Option<Option<BankAccountId>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub national_id: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub national_id_card_image: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub driver_license_image: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub driver_smart_card_image: Option<Option<String>>,
}

impl DriverUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone_number.is_none()
            && self.password.is_none()
            && self.salary_percentage.is_none()
            && self.bank_account_id.is_none()
            && self.national_id.is_none()
            && self.national_id_card_image.is_none()
            && self.driver_license_image.is_none()
            && self.driver_smart_card_image.is_none()
    }

    /// Assemble the db request; `password_hash` is present exactly when the
    /// update carried a new credential.
    pub fn into_db_request(self, password_hash: Option<String>) -> DriverUpdateDBRequest {
        DriverUpdateDBRequest {
            first_name: self.first_name.map(|v| sanitize::clean_text(&v)),
            last_name: self.last_name.map(|v| sanitize::clean_text(&v)),
            phone_number: self.phone_number.map(sanitize::clean_opt),
            password_hash,
            salary_percentage: self.salary_percentage,
            bank_account_id: self.bank_account_id,
            national_id: self.national_id.map(sanitize::clean_opt),
            national_id_card_image: self.national_id_card_image.map(sanitize::clean_opt),
            driver_license_image: self.driver_license_image.map(sanitize::clean_opt),
            driver_smart_card_image: self.driver_smart_card_image.map(sanitize::clean_opt),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BankAccountDetails {
    pub bank_name: String,
    pub account_holder_name: String,
    pub card_number: Option<String>,
    pub iban: Option<String>,
}

impl From<DriverBankAccountDetails> for BankAccountDetails {
    fn from(db: DriverBankAccountDetails) -> Self {
        Self {
            bank_name: db.bank_name,
            account_holder_name: db.account_holder_name,
            card_number: db.card_number,
            iban: db.iban,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DriverResponse {
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
    /// Resolved bank account, single-record reads only
    pub bank_account_details: Option<BankAccountDetails>,
}

impl From<DriverDBResponse> for DriverResponse {
    fn from(db: DriverDBResponse) -> Self {
        Self {
            id: db.id,
            first_name: db.first_name,
            last_name: db.last_name,
            phone_number: db.phone_number,
            salary_percentage: db.salary_percentage,
            bank_account_id: db.bank_account_id,
            national_id: db.national_id,
            national_id_card_image: db.national_id_card_image,
            driver_license_image: db.driver_license_image,
            driver_smart_card_image: db.driver_smart_card_image,
            bank_account_details: db.bank_account_details.map(BankAccountDetails::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_names() {
        let create = DriverCreate {
            first_name: None,
            last_name: Some("Karimi".into()),
            phone_number: None,
            password: Some("secret".into()),
            salary_percentage: None,
            bank_account_id: None,
            national_id: None,
            national_id_card_image: None,
            driver_license_image: None,
            driver_smart_card_image: None,
        };
        let err = create.into_db_request("hash".into()).unwrap_err();
        assert_eq!(err.user_message(), "Missing required field: first_name");
    }

    #[test]
    fn response_has_no_password_surface() {
        let json = serde_json::to_value(DriverResponse {
            id: 1,
            first_name: "Hassan".into(),
            last_name: "Karimi".into(),
            phone_number: None,
            salary_percentage: Some(20.0),
            bank_account_id: None,
            national_id: None,
            national_id_card_image: None,
            driver_license_image: None,
            driver_smart_card_image: None,
            bank_account_details: None,
        })
        .unwrap();
        let rendered = json.to_string();
        assert!(!rendered.contains("password"));
    }
}
