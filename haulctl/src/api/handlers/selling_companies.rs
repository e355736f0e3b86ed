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
            selling_companies::{SellingCompanyCreate, SellingCompanyQuery, SellingCompanyResponse, SellingCompanyUpdate},
        },
    },
    db::{
        errors::DbError,
        handlers::{Repository, SellingCompanies, UpdateOutcome},
        models::selling_companies::{SellingCompanyCreateDBRequest, SellingCompanyUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/cargo_selling_companies",
    tag = "cargo_selling_companies",
    summary = "Get one selling company by id, or list all",
    params(SellingCompanyQuery),
    responses(
        (status = 200, description = "Single selling company or array", body = SellingCompanyResponse),
        (status = 404, description = "Selling company not found")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_selling_companies(State(state): State<AppState>, Query(query): Query<SellingCompanyQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = SellingCompanies::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(company) => Ok(Json(SellingCompanyResponse::from(company)).into_response()),
            None => Err(Error::not_found("Selling company", id)),
        },
        None => {
            let companies: Vec<SellingCompanyResponse> = repo.list(&()).await?.into_iter().map(SellingCompanyResponse::from).collect();
            Ok(Json(companies).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/cargo_selling_companies",
    tag = "cargo_selling_companies",
    summary = "Create selling company",
    request_body = SellingCompanyCreate,
    responses(
        (status = 201, description = "Selling company created", body = CreatedResponse),
        (status = 400, description = "Missing required field")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_selling_company(
    State(state): State<AppState>,
    Json(create): Json<SellingCompanyCreate>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = SellingCompanyCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = SellingCompanies::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Selling company created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/cargo_selling_companies",
    tag = "cargo_selling_companies",
    summary = "Update selling company",
    params(SellingCompanyQuery),
    request_body = SellingCompanyUpdate,
    responses(
        (status = 200, description = "Selling company updated", body = MessageResponse),
        (status = 400, description = "Missing id or empty body"),
        (status = 404, description = "Selling company not found")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_selling_company(
    State(state): State<AppState>,
    Query(query): Query<SellingCompanyQuery>,
    Json(update): Json<SellingCompanyUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = SellingCompanyUpdateDBRequest::from(update);

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = SellingCompanies::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Selling company updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Selling company found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Selling company", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/cargo_selling_companies",
    tag = "cargo_selling_companies",
    summary = "Delete selling company",
    params(SellingCompanyQuery),
    responses(
        (status = 200, description = "Selling company deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Selling company not found"),
        (status = 409, description = "Selling company still referenced by cargos or payments")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_selling_company(
    State(state): State<AppState>,
    Query(query): Query<SellingCompanyQuery>,
) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = match SellingCompanies::new(&mut tx).delete(id).await {
        Ok(deleted) => deleted,
        Err(DbError::ForeignKeyViolation { .. }) => {
            return Err(Error::conflict(
                "Cannot delete selling company because it is referenced by other data (e.g., cargos, payments).",
            ));
        }
        Err(err) => return Err(err.into()),
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Selling company deleted successfully.")))
    } else {
        Err(Error::not_found("Selling company", id))
    }
}
