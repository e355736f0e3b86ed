//! Axum handlers, one module per resource plus the upload side-channel.
//!
//! Every resource exposes the same surface on a single path: GET (single by
//! `?id=` or full list), POST (create), PUT (partial update by `?id=`),
//! DELETE (by `?id=`). Mutations open a transaction around the
//! validate-then-mutate sequence and commit at the end.

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

/// Ids must be positive; zero/negative query values read as absent.
pub(crate) fn positive(id: Option<i64>) -> Option<i64> {
    id.filter(|v| *v > 0)
}

pub(crate) fn require_update_id(id: Option<i64>) -> Result<i64> {
    positive(id).ok_or_else(|| Error::bad_request("Missing ID for update."))
}

pub(crate) fn require_delete_id(id: Option<i64>) -> Result<i64> {
    positive(id).ok_or_else(|| Error::bad_request("Missing ID for delete."))
}
