//! HTTP API surface: one handler module per resource plus uploads, and the
//! request/response models they exchange.

pub mod handlers;
pub mod models;
