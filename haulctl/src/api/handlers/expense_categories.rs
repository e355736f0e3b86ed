use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    api::{
        handlers::{positive, require_delete_id, require_update_id},
        models::{
            CreatedResponse, MessageResponse,
            expense_categories::{ExpenseCategoryCreate, ExpenseCategoryQuery, ExpenseCategoryResponse, ExpenseCategoryUpdate},
        },
    },
    db::{
        errors::DbError,
        handlers::{ExpenseCategories, Repository, UpdateOutcome},
        models::expense_categories::{ExpenseCategoryCreateDBRequest, ExpenseCategoryUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/expense_categories",
    tag = "expense_categories",
    summary = "Get one expense category by id, or list all",
    params(ExpenseCategoryQuery),
    responses(
        (status = 200, description = "Single expense category or array", body = ExpenseCategoryResponse),
        (status = 404, description = "Expense category not found")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_expense_categories(State(state): State<AppState>, Query(query): Query<ExpenseCategoryQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = ExpenseCategories::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(category) => Ok(Json(ExpenseCategoryResponse::from(category)).into_response()),
            None => Err(Error::not_found("Expense category", id)),
        },
        None => {
            let categories: Vec<ExpenseCategoryResponse> = repo.list(&()).await?.into_iter().map(ExpenseCategoryResponse::from).collect();
            Ok(Json(categories).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/expense_categories",
    tag = "expense_categories",
    summary = "Create expense category",
    request_body = ExpenseCategoryCreate,
    responses(
        (status = 201, description = "Expense category created", body = CreatedResponse),
        (status = 400, description = "Missing required field"),
        (status = 409, description = "Duplicate name")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_expense_category(
    State(state): State<AppState>,
    Json(create): Json<ExpenseCategoryCreate>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = ExpenseCategoryCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = ExpenseCategories::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Expense category created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/expense_categories",
    tag = "expense_categories",
    summary = "Update expense category",
    params(ExpenseCategoryQuery),
    request_body = ExpenseCategoryUpdate,
    responses(
        (status = 200, description = "Expense category updated", body = MessageResponse),
        (status = 400, description = "Missing id or empty body"),
        (status = 404, description = "Expense category not found"),
        (status = 409, description = "Duplicate name")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_expense_category(
    State(state): State<AppState>,
    Query(query): Query<ExpenseCategoryQuery>,
    Json(update): Json<ExpenseCategoryUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = ExpenseCategoryUpdateDBRequest::from(update);

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = ExpenseCategories::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Expense category updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Expense category found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Expense category", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/expense_categories",
    tag = "expense_categories",
    summary = "Delete expense category",
    params(ExpenseCategoryQuery),
    responses(
        (status = 200, description = "Expense category deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Expense category not found"),
        (status = 409, description = "Expense category still referenced by expenses")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_expense_category(
    State(state): State<AppState>,
    Query(query): Query<ExpenseCategoryQuery>,
) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = match ExpenseCategories::new(&mut tx).delete(id).await {
        Ok(deleted) => deleted,
        Err(DbError::ForeignKeyViolation { .. }) => {
            return Err(Error::conflict("Cannot delete expense category because it is referenced by other data (e.g., in expenses table)."));
        }
        Err(err) => return Err(err.into()),
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Expense category deleted successfully.")))
    } else {
        Err(Error::not_found("Expense category", id))
    }
}
