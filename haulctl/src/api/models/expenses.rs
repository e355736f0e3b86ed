//! API request/response models for expenses.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::{check_amount, require, require_text},
    db::models::expenses::{ExpenseCreateDBRequest, ExpenseDBResponse, ExpenseUpdateDBRequest},
    errors::Error,
    sanitize,
    types::{CargoId, ExpenseCategoryId, ExpenseId, now_timestamp},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExpenseQuery {
    pub id: Option<i64>,
    pub cargo_id: Option<i64>,
    pub expense_category_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpenseCreate {
    pub cargo_id: Option<CargoId>,
    pub expense_category_id: Option<ExpenseCategoryId>,
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub receipt_image: Option<String>,
    pub description: Option<String>,
    /// Defaults to the current timestamp
    pub expense_date: Option<String>,
}

impl TryFrom<ExpenseCreate> for ExpenseCreateDBRequest {
    type Error = Error;

    fn try_from(create: ExpenseCreate) -> Result<Self, Error> {
        let cargo_id = require("cargo_id", create.cargo_id)?;
        let expense_category_id = require("expense_category_id", create.expense_category_id)?;
        let title = require_text("title", create.title)?;
        let amount = check_amount(require("amount", create.amount)?)?;
        Ok(Self {
            cargo_id,
            expense_category_id,
            title: sanitize::clean_text(&title),
            amount,
            receipt_image: sanitize::clean_opt(create.receipt_image),
            description: sanitize::clean_opt(create.description),
            expense_date: create.expense_date.map(|v| sanitize::clean_text(&v)).unwrap_or_else(now_timestamp),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ExpenseUpdate {
    pub cargo_id: Option<CargoId>,
    pub expense_category_id: Option<ExpenseCategoryId>,
    pub title: Option<String>,
    pub amount: Option<f64>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub receipt_image: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub expense_date: Option<String>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.cargo_id.is_none()
            && self.expense_category_id.is_none()
            && self.title.is_none()
            && self.amount.is_none()
            && self.receipt_image.is_none()
            && self.description.is_none()
            && self.expense_date.is_none()
    }
}

impl TryFrom<ExpenseUpdate> for ExpenseUpdateDBRequest {
    type Error = Error;

    fn try_from(update: ExpenseUpdate) -> Result<Self, Error> {
        let amount = update.amount.map(check_amount).transpose()?;
        Ok(Self {
            cargo_id: update.cargo_id,
            expense_category_id: update.expense_category_id,
            title: update.title.map(|v| sanitize::clean_text(&v)),
            amount,
            receipt_image: update.receipt_image.map(sanitize::clean_opt),
            description: update.description.map(sanitize::clean_opt),
            expense_date: update.expense_date.map(|v| sanitize::clean_text(&v)),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpenseResponse {
    pub id: ExpenseId,
    pub cargo_id: CargoId,
    pub expense_category_id: ExpenseCategoryId,
    pub title: String,
    pub amount: f64,
    pub receipt_image: Option<String>,
    pub description: Option<String>,
    pub expense_date: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub category_name: Option<String>,
}

impl From<ExpenseDBResponse> for ExpenseResponse {
    fn from(db: ExpenseDBResponse) -> Self {
        Self {
            id: db.id,
            cargo_id: db.cargo_id,
            expense_category_id: db.expense_category_id,
            title: db.title,
            amount: db.amount,
            receipt_image: db.receipt_image,
            description: db.description,
            expense_date: db.expense_date,
            origin: db.origin,
            destination: db.destination,
            category_name: db.category_name,
        }
    }
}
