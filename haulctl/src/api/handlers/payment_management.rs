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
            payment_management::{PaymentManagementCreate, PaymentManagementQuery, PaymentManagementResponse, PaymentManagementUpdate},
        },
    },
    db::{
        handlers::{PaymentManagement, Repository, UpdateOutcome},
        models::payment_management::{PaymentManagementCreateDBRequest, PaymentManagementFilter, PaymentManagementUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/payment_management",
    tag = "payment_management",
    summary = "Get one payment management record by id, or list (optionally by cargo)",
    params(PaymentManagementQuery),
    responses(
        (status = 200, description = "Single record or array", body = PaymentManagementResponse),
        (status = 404, description = "Record not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_payment_management(State(state): State<AppState>, Query(query): Query<PaymentManagementQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = PaymentManagement::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(record) => Ok(Json(PaymentManagementResponse::from(record)).into_response()),
            None => Err(Error::not_found("Payment management record", id)),
        },
        None => {
            let filter = PaymentManagementFilter {
                cargo_id: positive(query.cargo_id),
            };
            let records: Vec<PaymentManagementResponse> = repo.list(&filter).await?.into_iter().map(PaymentManagementResponse::from).collect();
            Ok(Json(records).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/payment_management",
    tag = "payment_management",
    summary = "Create payment management record",
    request_body = PaymentManagementCreate,
    responses(
        (status = 201, description = "Record created", body = CreatedResponse),
        (status = 400, description = "Missing required field, invalid amount, or invalid reference"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_payment_management(
    State(state): State<AppState>,
    Json(create): Json<PaymentManagementCreate>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = PaymentManagementCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = PaymentManagement::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Payment management record created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/payment_management",
    tag = "payment_management",
    summary = "Update payment management record",
    params(PaymentManagementQuery),
    request_body = PaymentManagementUpdate,
    responses(
        (status = 200, description = "Record updated", body = MessageResponse),
        (status = 400, description = "Missing id, empty body, or invalid value"),
        (status = 404, description = "Record not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_payment_management(
    State(state): State<AppState>,
    Query(query): Query<PaymentManagementQuery>,
    Json(update): Json<PaymentManagementUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = PaymentManagementUpdateDBRequest::try_from(update)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = PaymentManagement::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Payment management record updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Record found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Payment management record", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/payment_management",
    tag = "payment_management",
    summary = "Delete payment management record",
    params(PaymentManagementQuery),
    responses(
        (status = 200, description = "Record deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Record not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_payment_management(
    State(state): State<AppState>,
    Query(query): Query<PaymentManagementQuery>,
) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = PaymentManagement::new(&mut tx).delete(id).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Payment management record deleted successfully.")))
    } else {
        Err(Error::not_found("Payment management record", id))
    }
}
