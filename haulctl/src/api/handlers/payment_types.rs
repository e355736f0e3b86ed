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
            payment_types::{PaymentTypeCreate, PaymentTypeQuery, PaymentTypeResponse, PaymentTypeUpdate},
        },
    },
    db::{
        errors::DbError,
        handlers::{PaymentTypes, Repository, UpdateOutcome},
        models::payment_types::{PaymentTypeCreateDBRequest, PaymentTypeUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/payment_types",
    tag = "payment_types",
    summary = "Get one payment type by id, or list all",
    params(PaymentTypeQuery),
    responses(
        (status = 200, description = "Single payment type or array", body = PaymentTypeResponse),
        (status = 404, description = "Payment type not found")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_payment_types(State(state): State<AppState>, Query(query): Query<PaymentTypeQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = PaymentTypes::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(payment_type) => Ok(Json(PaymentTypeResponse::from(payment_type)).into_response()),
            None => Err(Error::not_found("Payment type", id)),
        },
        None => {
            let payment_types: Vec<PaymentTypeResponse> = repo.list(&()).await?.into_iter().map(PaymentTypeResponse::from).collect();
            Ok(Json(payment_types).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/payment_types",
    tag = "payment_types",
    summary = "Create payment type",
    request_body = PaymentTypeCreate,
    responses(
        (status = 201, description = "Payment type created", body = CreatedResponse),
        (status = 400, description = "Missing required field"),
        (status = 409, description = "Duplicate name")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_payment_type(
    State(state): State<AppState>,
    Json(create): Json<PaymentTypeCreate>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = PaymentTypeCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = PaymentTypes::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Payment type created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/payment_types",
    tag = "payment_types",
    summary = "Update payment type",
    params(PaymentTypeQuery),
    request_body = PaymentTypeUpdate,
    responses(
        (status = 200, description = "Payment type updated", body = MessageResponse),
        (status = 400, description = "Missing id or empty body"),
        (status = 404, description = "Payment type not found"),
        (status = 409, description = "Duplicate name")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_payment_type(
    State(state): State<AppState>,
    Query(query): Query<PaymentTypeQuery>,
    Json(update): Json<PaymentTypeUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = PaymentTypeUpdateDBRequest::from(update);

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = PaymentTypes::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Payment type updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Payment type found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Payment type", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/payment_types",
    tag = "payment_types",
    summary = "Delete payment type",
    params(PaymentTypeQuery),
    responses(
        (status = 200, description = "Payment type deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Payment type not found"),
        (status = 409, description = "Payment type still referenced")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_payment_type(State(state): State<AppState>, Query(query): Query<PaymentTypeQuery>) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = match PaymentTypes::new(&mut tx).delete(id).await {
        Ok(deleted) => deleted,
        Err(DbError::ForeignKeyViolation { .. }) => {
            return Err(Error::conflict(
                "Cannot delete payment type because it is referenced by other data (e.g., cargos, payment_management).",
            ));
        }
        Err(err) => return Err(err.into()),
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Payment type deleted successfully.")))
    } else {
        Err(Error::not_found("Payment type", id))
    }
}
