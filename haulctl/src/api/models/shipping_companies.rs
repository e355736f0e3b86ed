//! API request/response models for shipping companies.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::require_text,
    db::models::shipping_companies::{ShippingCompanyCreateDBRequest, ShippingCompanyDBResponse, ShippingCompanyUpdateDBRequest},
    errors::Error,
    sanitize,
    types::ShippingCompanyId,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ShippingCompanyQuery {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShippingCompanyCreate {
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

impl TryFrom<ShippingCompanyCreate> for ShippingCompanyCreateDBRequest {
    type Error = Error;

    fn try_from(create: ShippingCompanyCreate) -> Result<Self, Error> {
        let name = require_text("name", create.name)?;
        Ok(Self {
            name: sanitize::clean_text(&name),
            phone_number: sanitize::clean_opt(create.phone_number),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ShippingCompanyUpdate {
    pub name: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone_number: Option<Option<String>>,
}

impl ShippingCompanyUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none()
    }
}

impl From<ShippingCompanyUpdate> for ShippingCompanyUpdateDBRequest {
    fn from(update: ShippingCompanyUpdate) -> Self {
        Self {
            name: update.name.map(|v| sanitize::clean_text(&v)),
            phone_number: update.phone_number.map(sanitize::clean_opt),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShippingCompanyResponse {
    pub id: ShippingCompanyId,
    pub name: String,
    pub phone_number: Option<String>,
}

impl From<ShippingCompanyDBResponse> for ShippingCompanyResponse {
    fn from(db: ShippingCompanyDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            phone_number: db.phone_number,
        }
    }
}
