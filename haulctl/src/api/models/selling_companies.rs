//! API request/response models for cargo selling companies.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::require_text,
    db::models::selling_companies::{SellingCompanyCreateDBRequest, SellingCompanyDBResponse, SellingCompanyUpdateDBRequest},
    errors::Error,
    sanitize,
    types::SellingCompanyId,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SellingCompanyQuery {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SellingCompanyCreate {
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

impl TryFrom<SellingCompanyCreate> for SellingCompanyCreateDBRequest {
    type Error = Error;

    fn try_from(create: SellingCompanyCreate) -> Result<Self, Error> {
        let name = require_text("name", create.name)?;
        Ok(Self {
            name: sanitize::clean_text(&name),
            phone_number: sanitize::clean_opt(create.phone_number),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SellingCompanyUpdate {
    pub name: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone_number: Option<Option<String>>,
}

impl SellingCompanyUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none()
    }
}

impl From<SellingCompanyUpdate> for SellingCompanyUpdateDBRequest {
    fn from(update: SellingCompanyUpdate) -> Self {
        Self {
            name: update.name.map(|v| sanitize::clean_text(&v)),
            phone_number: update.phone_number.map(sanitize::clean_opt),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SellingCompanyResponse {
    pub id: SellingCompanyId,
    pub name: String,
    pub phone_number: Option<String>,
}

impl From<SellingCompanyDBResponse> for SellingCompanyResponse {
    fn from(db: SellingCompanyDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            phone_number: db.phone_number,
        }
    }
}
