//! API request/response models for expense categories.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::require_text,
    db::models::expense_categories::{ExpenseCategoryCreateDBRequest, ExpenseCategoryDBResponse, ExpenseCategoryUpdateDBRequest},
    errors::Error,
    sanitize,
    types::ExpenseCategoryId,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExpenseCategoryQuery {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpenseCategoryCreate {
    pub name: Option<String>,
}

impl TryFrom<ExpenseCategoryCreate> for ExpenseCategoryCreateDBRequest {
    type Error = Error;

    fn try_from(create: ExpenseCategoryCreate) -> Result<Self, Error> {
        let name = require_text("name", create.name)?;
        Ok(Self {
            name: sanitize::clean_text(&name),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ExpenseCategoryUpdate {
    pub name: Option<String>,
}

impl ExpenseCategoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

impl From<ExpenseCategoryUpdate> for ExpenseCategoryUpdateDBRequest {
    fn from(update: ExpenseCategoryUpdate) -> Self {
        Self {
            name: update.name.map(|v| sanitize::clean_text(&v)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpenseCategoryResponse {
    pub id: ExpenseCategoryId,
    pub name: String,
}

impl From<ExpenseCategoryDBResponse> for ExpenseCategoryResponse {
    fn from(db: ExpenseCategoryDBResponse) -> Self {
        Self { id: db.id, name: db.name }
    }
}
