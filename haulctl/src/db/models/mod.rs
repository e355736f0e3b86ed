//! Database request/response models.
//!
//! Each resource has a `*CreateDBRequest` (all fields resolved and
//! sanitized), a `*UpdateDBRequest` (outer `Option` = field present in the
//! request; `Option<Option<_>>` where explicit null must be distinguishable
//! from absent), and a `*DBResponse` (raw columns plus the resource's join
//! profile).

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
pub mod vehicles;
