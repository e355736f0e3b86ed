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
            cargo_types::{CargoTypeCreate, CargoTypeQuery, CargoTypeResponse, CargoTypeUpdate},
        },
    },
    db::{
        errors::DbError,
        handlers::{CargoTypes, Repository, UpdateOutcome},
        models::cargo_types::{CargoTypeCreateDBRequest, CargoTypeUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/cargo_types",
    tag = "cargo_types",
    summary = "Get one cargo type by id, or list all",
    params(CargoTypeQuery),
    responses(
        (status = 200, description = "Single cargo type or array", body = CargoTypeResponse),
        (status = 404, description = "Cargo type not found")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_cargo_types(State(state): State<AppState>, Query(query): Query<CargoTypeQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = CargoTypes::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(cargo_type) => Ok(Json(CargoTypeResponse::from(cargo_type)).into_response()),
            None => Err(Error::not_found("Cargo type", id)),
        },
        None => {
            let cargo_types: Vec<CargoTypeResponse> = repo.list(&()).await?.into_iter().map(CargoTypeResponse::from).collect();
            Ok(Json(cargo_types).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/cargo_types",
    tag = "cargo_types",
    summary = "Create cargo type",
    request_body = CargoTypeCreate,
    responses(
        (status = 201, description = "Cargo type created", body = CreatedResponse),
        (status = 400, description = "Missing required field"),
        (status = 409, description = "Duplicate name")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_cargo_type(State(state): State<AppState>, Json(create): Json<CargoTypeCreate>) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = CargoTypeCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = CargoTypes::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Cargo type created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/cargo_types",
    tag = "cargo_types",
    summary = "Update cargo type",
    params(CargoTypeQuery),
    request_body = CargoTypeUpdate,
    responses(
        (status = 200, description = "Cargo type updated", body = MessageResponse),
        (status = 400, description = "Missing id or empty body"),
        (status = 404, description = "Cargo type not found"),
        (status = 409, description = "Duplicate name")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_cargo_type(
    State(state): State<AppState>,
    Query(query): Query<CargoTypeQuery>,
    Json(update): Json<CargoTypeUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = CargoTypeUpdateDBRequest::from(update);

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = CargoTypes::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Cargo type updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Cargo type found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Cargo type", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/cargo_types",
    tag = "cargo_types",
    summary = "Delete cargo type",
    params(CargoTypeQuery),
    responses(
        (status = 200, description = "Cargo type deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Cargo type not found"),
        (status = 409, description = "Cargo type still referenced by cargos")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_cargo_type(State(state): State<AppState>, Query(query): Query<CargoTypeQuery>) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = match CargoTypes::new(&mut tx).delete(id).await {
        Ok(deleted) => deleted,
        Err(DbError::ForeignKeyViolation { .. }) => {
            return Err(Error::conflict("Cannot delete cargo type because it is referenced by other data (e.g., in cargos table)."));
        }
        Err(err) => return Err(err.into()),
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Cargo type deleted successfully.")))
    } else {
        Err(Error::not_found("Cargo type", id))
    }
}
