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
            receivables::{ReceivableCreate, ReceivableQuery, ReceivableResponse, ReceivableUpdate},
        },
    },
    db::{
        handlers::{Receivables, Repository, UpdateOutcome},
        models::receivables::{ReceivableCreateDBRequest, ReceivableFilter, ReceivableUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/receivables",
    tag = "receivables",
    summary = "Get one receivable by id, or list (optionally by cargo/customer)",
    params(ReceivableQuery),
    responses(
        (status = 200, description = "Single receivable or array", body = ReceivableResponse),
        (status = 404, description = "Receivable not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_receivables(State(state): State<AppState>, Query(query): Query<ReceivableQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Receivables::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(receivable) => Ok(Json(ReceivableResponse::from(receivable)).into_response()),
            None => Err(Error::not_found("Receivable", id)),
        },
        None => {
            let filter = ReceivableFilter {
                cargo_id: positive(query.cargo_id),
                customer_id: positive(query.customer_id),
            };
            let receivables: Vec<ReceivableResponse> = repo.list(&filter).await?.into_iter().map(ReceivableResponse::from).collect();
            Ok(Json(receivables).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/receivables",
    tag = "receivables",
    summary = "Record receivable",
    request_body = ReceivableCreate,
    responses(
        (status = 201, description = "Receivable recorded", body = CreatedResponse),
        (status = 400, description = "Missing required field, invalid amount, or invalid reference"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_receivable(
    State(state): State<AppState>,
    Json(create): Json<ReceivableCreate>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = ReceivableCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = Receivables::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Receivable recorded successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/receivables",
    tag = "receivables",
    summary = "Update receivable",
    params(ReceivableQuery),
    request_body = ReceivableUpdate,
    responses(
        (status = 200, description = "Receivable updated", body = MessageResponse),
        (status = 400, description = "Missing id, empty body, or invalid value"),
        (status = 404, description = "Receivable not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_receivable(
    State(state): State<AppState>,
    Query(query): Query<ReceivableQuery>,
    Json(update): Json<ReceivableUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = ReceivableUpdateDBRequest::try_from(update)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = Receivables::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Receivable updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Receivable found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Receivable", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/receivables",
    tag = "receivables",
    summary = "Delete receivable",
    params(ReceivableQuery),
    responses(
        (status = 200, description = "Receivable deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Receivable not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_receivable(State(state): State<AppState>, Query(query): Query<ReceivableQuery>) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = Receivables::new(&mut tx).delete(id).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Receivable deleted successfully.")))
    } else {
        Err(Error::not_found("Receivable", id))
    }
}
