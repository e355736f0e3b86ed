//! API request/response models for customers.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::require_text,
    db::models::customers::{CustomerCreateDBRequest, CustomerDBResponse, CustomerUpdateDBRequest},
    errors::Error,
    sanitize,
    types::CustomerId,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct CustomerQuery {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerCreate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

impl TryFrom<CustomerCreate> for CustomerCreateDBRequest {
    type Error = Error;

    fn try_from(create: CustomerCreate) -> Result<Self, Error> {
        let first_name = require_text("first_name", create.first_name)?;
        let last_name = require_text("last_name", create.last_name)?;
        Ok(Self {
            first_name: sanitize::clean_text(&first_name),
            last_name: sanitize::clean_text(&last_name),
            phone_number: sanitize::clean_opt(create.phone_number),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CustomerUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone_number: Option<Option<String>>,
}

impl CustomerUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone_number.is_none()
    }
}

impl From<CustomerUpdate> for CustomerUpdateDBRequest {
    fn from(update: CustomerUpdate) -> Self {
        Self {
            first_name: update.first_name.map(|v| sanitize::clean_text(&v)),
            last_name: update.last_name.map(|v| sanitize::clean_text(&v)),
            phone_number: update.phone_number.map(sanitize::clean_opt),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

impl From<CustomerDBResponse> for CustomerResponse {
    fn from(db: CustomerDBResponse) -> Self {
        Self {
            id: db.id,
            first_name: db.first_name,
            last_name: db.last_name,
            phone_number: db.phone_number,
        }
    }
}
