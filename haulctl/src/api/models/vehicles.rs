//! API request/response models for vehicles.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::require_text,
    db::models::vehicles::{VehicleCreateDBRequest, VehicleDBResponse, VehicleUpdateDBRequest},
    errors::Error,
    sanitize,
    types::VehicleId,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct VehicleQuery {
    /// Record id; omit to list every vehicle
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VehicleCreate {
    pub name: Option<String>,
    pub smart_card_number: Option<String>,
    pub health_code: Option<String>,
}

impl TryFrom<VehicleCreate> for VehicleCreateDBRequest {
    type Error = Error;

    fn try_from(create: VehicleCreate) -> Result<Self, Error> {
        let name = require_text("name", create.name)?;
        Ok(Self {
            name: sanitize::clean_text(&name),
            smart_card_number: sanitize::clean_opt(create.smart_card_number),
            health_code: sanitize::clean_opt(create.health_code),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct VehicleUpdate {
    pub name: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub smart_card_number: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub health_code: Option<Option<String>>,
}

impl VehicleUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.smart_card_number.is_none() && self.health_code.is_none()
    }
}

impl From<VehicleUpdate> for VehicleUpdateDBRequest {
    fn from(update: VehicleUpdate) -> Self {
        Self {
            name: update.name.map(|v| sanitize::clean_text(&v)),
            smart_card_number: update.smart_card_number.map(sanitize::clean_opt),
            health_code: update.health_code.map(sanitize::clean_opt),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VehicleResponse {
    pub id: VehicleId,
    pub name: String,
    pub smart_card_number: Option<String>,
    pub health_code: Option<String>,
}

impl From<VehicleDBResponse> for VehicleResponse {
    fn from(db: VehicleDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            smart_card_number: db.smart_card_number,
            health_code: db.health_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_a_name() {
        let err = VehicleCreateDBRequest::try_from(VehicleCreate {
            name: None,
            smart_card_number: Some("SC-1".into()),
            health_code: None,
        })
        .unwrap_err();
        assert_eq!(err.user_message(), "Missing required field: name");
    }

    #[test]
    fn create_strips_html() {
        let request = VehicleCreateDBRequest::try_from(VehicleCreate {
            name: Some("<b>Volvo</b>".into()),
            smart_card_number: None,
            health_code: None,
        })
        .unwrap();
        assert_eq!(request.name, "Volvo");
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let update: VehicleUpdate = serde_json::from_str(r#"{"smart_card_number": null}"#).unwrap();
        assert_eq!(update.smart_card_number, Some(None));
        assert!(update.name.is_none());

        let update: VehicleUpdate = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert!(update.smart_card_number.is_none());
    }

    #[test]
    fn unknown_keys_are_silently_dropped() {
        let update: VehicleUpdate = serde_json::from_str(r#"{"bogus": 1}"#).unwrap();
        assert!(update.is_empty());
    }
}
