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
            expenses::{ExpenseCreate, ExpenseQuery, ExpenseResponse, ExpenseUpdate},
        },
    },
    db::{
        handlers::{Expenses, Repository, UpdateOutcome},
        models::expenses::{ExpenseCreateDBRequest, ExpenseFilter, ExpenseUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/expenses",
    tag = "expenses",
    summary = "Get one expense by id, or list (optionally by cargo/category)",
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Single expense or array", body = ExpenseResponse),
        (status = 404, description = "Expense not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_expenses(State(state): State<AppState>, Query(query): Query<ExpenseQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Expenses::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(expense) => Ok(Json(ExpenseResponse::from(expense)).into_response()),
            None => Err(Error::not_found("Expense", id)),
        },
        None => {
            let filter = ExpenseFilter {
                cargo_id: positive(query.cargo_id),
                expense_category_id: positive(query.expense_category_id),
            };
            let expenses: Vec<ExpenseResponse> = repo.list(&filter).await?.into_iter().map(ExpenseResponse::from).collect();
            Ok(Json(expenses).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/expenses",
    tag = "expenses",
    summary = "Create expense",
    request_body = ExpenseCreate,
    responses(
        (status = 201, description = "Expense created", body = CreatedResponse),
        (status = 400, description = "Missing required field, invalid amount, or invalid reference"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_expense(State(state): State<AppState>, Json(create): Json<ExpenseCreate>) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = ExpenseCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = Expenses::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Expense created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/expenses",
    tag = "expenses",
    summary = "Update expense",
    params(ExpenseQuery),
    request_body = ExpenseUpdate,
    responses(
        (status = 200, description = "Expense updated", body = MessageResponse),
        (status = 400, description = "Missing id, empty body, or invalid value"),
        (status = 404, description = "Expense not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_expense(
    State(state): State<AppState>,
    Query(query): Query<ExpenseQuery>,
    Json(update): Json<ExpenseUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = ExpenseUpdateDBRequest::try_from(update)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = Expenses::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Expense updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Expense found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Expense", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/expenses",
    tag = "expenses",
    summary = "Delete expense",
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Expense deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Expense not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_expense(State(state): State<AppState>, Query(query): Query<ExpenseQuery>) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = Expenses::new(&mut tx).delete(id).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Expense deleted successfully.")))
    } else {
        Err(Error::not_found("Expense", id))
    }
}
