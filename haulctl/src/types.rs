//! Common type definitions.
//!
//! Entity ids are server-assigned `INTEGER PRIMARY KEY` values, exposed as
//! `i64` aliases for readability at API and repository boundaries.

use chrono::Utc;

// Type aliases for IDs
pub type VehicleId = i64;
pub type DriverId = i64;
pub type CustomerId = i64;
pub type CargoTypeId = i64;
pub type ShippingCompanyId = i64;
pub type SellingCompanyId = i64;
pub type BankAccountId = i64;
pub type PaymentTypeId = i64;
pub type ExpenseCategoryId = i64;
pub type CargoId = i64;
pub type PaymentId = i64;
pub type ReceivableId = i64;
pub type PaymentManagementId = i64;
pub type DriverPaymentId = i64;
pub type ExpenseId = i64;

/// Timestamp format used for every date/time column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC time in the storage timestamp format.
pub fn now_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_matches_storage_format() {
        let ts = now_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }
}
