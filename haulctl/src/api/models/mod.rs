//! API request/response models.
//!
//! Create DTOs carry every field as `Option` so the required-field check can
//! name the first missing field instead of failing opaquely at
//! deserialization. Update DTOs distinguish absent from explicit null with
//! `Option<Option<_>>` where the column is nullable. Unknown body keys are
//! dropped by serde, which is the silent-skip contract of the API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{Error, Result};

pub mod bank_accounts;
pub mod cargo_types;
pub mod cargos;
pub mod customers;
pub mod driver_payments;
pub mod drivers;
pub mod expense_categories;
pub mod expenses;
pub mod payment_management;
pub mod payment_types;
pub mod payments;
pub mod receivables;
pub mod selling_companies;
pub mod shipping_companies;
pub mod uploads;
pub mod vehicles;

/// Success envelope for update/delete operations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Success envelope for create operations: message plus the new row id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

impl CreatedResponse {
    pub fn new(message: impl Into<String>, id: i64) -> Self {
        Self {
            message: message.into(),
            id,
        }
    }
}

/// Required-field check for non-text values: absent and null both count as
/// missing; a present value (including 0) passes.
pub(crate) fn require<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::bad_request(format!("Missing required field: {field}")))
}

/// Required-field check for text: the empty string also counts as missing.
pub(crate) fn require_text(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::bad_request(format!("Missing required field: {field}"))),
    }
}

/// Business floor for money amounts.
pub(crate) fn check_amount(value: f64) -> Result<f64> {
    if value < 0.0 {
        return Err(Error::bad_request("Invalid amount."));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_a_present_value() {
        assert_eq!(require("weight_tonnes", Some(0.0)).unwrap(), 0.0);
    }

    #[test]
    fn empty_text_counts_as_missing() {
        let err = require_text("name", Some(String::new())).unwrap_err();
        assert_eq!(err.user_message(), "Missing required field: name");
        let err = require_text("name", None).unwrap_err();
        assert_eq!(err.user_message(), "Missing required field: name");
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(check_amount(-0.01).is_err());
        assert_eq!(check_amount(0.0).unwrap(), 0.0);
    }
}
