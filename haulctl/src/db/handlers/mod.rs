//! Repository implementations for database access.
//!
//! One repository per resource, each following the same pattern:
//!
//! - Wraps a `&mut SqliteConnection` (plain connection or transaction)
//! - Validates foreign-key references with existence probes before writing
//! - Builds partial updates from typed requests, binding only present fields
//! - Returns domain models from [`crate::db::models`]
//!
//! Mutating handlers are expected to run a repository inside a transaction
//! so the validate-then-mutate sequence is atomic.

use sqlx::SqliteConnection;

use crate::db::errors::{DbError, Result};

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
pub mod repository;
pub mod selling_companies;
pub mod shipping_companies;
pub mod vehicles;

pub use bank_accounts::BankAccounts;
pub use cargo_types::CargoTypes;
pub use cargos::Cargos;
pub use customers::Customers;
pub use driver_payments::DriverPayments;
pub use drivers::Drivers;
pub use expense_categories::ExpenseCategories;
pub use expenses::Expenses;
pub use payment_management::PaymentManagement;
pub use payment_types::PaymentTypes;
pub use payments::Payments;
pub use receivables::Receivables;
pub use repository::{Repository, UpdateOutcome};
pub use selling_companies::SellingCompanies;
pub use shipping_companies::ShippingCompanies;
pub use vehicles::Vehicles;

/// Tables that can be the target of a foreign-key field. The closed set
/// keeps probe SQL away from anything caller-supplied.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RefTable {
    Vehicles,
    Drivers,
    CargoTypes,
    Customers,
    ShippingCompanies,
    SellingCompanies,
    BankAccounts,
    PaymentTypes,
    ExpenseCategories,
    Cargos,
}

impl RefTable {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            RefTable::Vehicles => "vehicles",
            RefTable::Drivers => "drivers",
            RefTable::CargoTypes => "cargo_types",
            RefTable::Customers => "customers",
            RefTable::ShippingCompanies => "shipping_companies",
            RefTable::SellingCompanies => "cargo_selling_companies",
            RefTable::BankAccounts => "bank_accounts",
            RefTable::PaymentTypes => "payment_types",
            RefTable::ExpenseCategories => "expense_categories",
            RefTable::Cargos => "cargos",
        }
    }
}

/// True when a row with this id exists in the given table.
pub(crate) async fn row_exists(conn: &mut SqliteConnection, table: &str, id: i64) -> Result<bool> {
    let found: i64 = sqlx::query_scalar(&format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?)"))
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(found != 0)
}

/// Existence probe for a foreign-key field. Non-positive ids and missing
/// rows both fail, naming the offending field.
pub(crate) async fn ensure_referenced(conn: &mut SqliteConnection, table: RefTable, field: &str, id: i64) -> Result<()> {
    if id > 0 && row_exists(conn, table.as_str(), id).await? {
        return Ok(());
    }
    Err(DbError::ForeignKeyViolation {
        message: format!("Invalid {field}: referenced record does not exist."),
    })
}
