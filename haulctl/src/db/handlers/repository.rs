//! Base repository trait for database operations.
//!
//! A repository is the data access layer for one table. Each repository is a
//! thin struct over a `&mut SqliteConnection`, so callers decide whether the
//! operations run on a plain connection or inside a transaction.

use crate::db::errors::Result;

/// Outcome of a partial update, so callers can distinguish a missing row
/// from a row that matched but was left byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// At least one row was modified.
    Changed,
    /// The row exists but the submitted values equal the current ones.
    Unchanged,
    /// No row with the given id.
    NotFound,
}

/// Base repository trait providing the uniform CRUD contract.
///
/// `create` returns the server-assigned row id; reads return the resource's
/// response shape (raw columns plus its join profile where it has one).
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The request type for partial updates
    type UpdateRequest;

    /// The response/DTO type returned by reads
    type Response;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Insert a new row and return its id
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64>;

    /// Get an entity by id, shaped by the resource's join profile
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>>;

    /// List all entities in the resource's natural order
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// Apply a partial update to the row with the given id
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome>;

    /// Delete by id; false when no row matched
    async fn delete(&mut self, id: i64) -> Result<bool>;
}
