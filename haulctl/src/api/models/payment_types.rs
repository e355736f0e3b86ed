//! API request/response models for payment types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::require_text,
    db::models::payment_types::{PaymentTypeCreateDBRequest, PaymentTypeDBResponse, PaymentTypeUpdateDBRequest},
    errors::Error,
    sanitize,
    types::PaymentTypeId,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaymentTypeQuery {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentTypeCreate {
    pub name: Option<String>,
}

impl TryFrom<PaymentTypeCreate> for PaymentTypeCreateDBRequest {
    type Error = Error;

    fn try_from(create: PaymentTypeCreate) -> Result<Self, Error> {
        let name = require_text("name", create.name)?;
        Ok(Self {
            name: sanitize::clean_text(&name),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PaymentTypeUpdate {
    pub name: Option<String>,
}

impl PaymentTypeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

impl From<PaymentTypeUpdate> for PaymentTypeUpdateDBRequest {
    fn from(update: PaymentTypeUpdate) -> Self {
        Self {
            name: update.name.map(|v| sanitize::clean_text(&v)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentTypeResponse {
    pub id: PaymentTypeId,
    pub name: String,
}

impl From<PaymentTypeDBResponse> for PaymentTypeResponse {
    fn from(db: PaymentTypeDBResponse) -> Self {
        Self { id: db.id, name: db.name }
    }
}
