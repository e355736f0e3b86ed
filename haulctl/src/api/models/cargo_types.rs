//! API request/response models for cargo types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::require_text,
    db::models::cargo_types::{CargoTypeCreateDBRequest, CargoTypeDBResponse, CargoTypeUpdateDBRequest},
    errors::Error,
    sanitize,
    types::CargoTypeId,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct CargoTypeQuery {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CargoTypeCreate {
    pub name: Option<String>,
}

impl TryFrom<CargoTypeCreate> for CargoTypeCreateDBRequest {
    type Error = Error;

    fn try_from(create: CargoTypeCreate) -> Result<Self, Error> {
        let name = require_text("name", create.name)?;
        Ok(Self {
            name: sanitize::clean_text(&name),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CargoTypeUpdate {
    pub name: Option<String>,
}

impl CargoTypeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

impl From<CargoTypeUpdate> for CargoTypeUpdateDBRequest {
    fn from(update: CargoTypeUpdate) -> Self {
        Self {
            name: update.name.map(|v| sanitize::clean_text(&v)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CargoTypeResponse {
    pub id: CargoTypeId,
    pub name: String,
}

impl From<CargoTypeDBResponse> for CargoTypeResponse {
    fn from(db: CargoTypeDBResponse) -> Self {
        Self { id: db.id, name: db.name }
    }
}
