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
            shipping_companies::{ShippingCompanyCreate, ShippingCompanyQuery, ShippingCompanyResponse, ShippingCompanyUpdate},
        },
    },
    db::{
        errors::DbError,
        handlers::{Repository, ShippingCompanies, UpdateOutcome},
        models::shipping_companies::{ShippingCompanyCreateDBRequest, ShippingCompanyUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/shipping_companies",
    tag = "shipping_companies",
    summary = "Get one shipping company by id, or list all",
    params(ShippingCompanyQuery),
    responses(
        (status = 200, description = "Single shipping company or array", body = ShippingCompanyResponse),
        (status = 404, description = "Shipping company not found")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_shipping_companies(State(state): State<AppState>, Query(query): Query<ShippingCompanyQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = ShippingCompanies::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(company) => Ok(Json(ShippingCompanyResponse::from(company)).into_response()),
            None => Err(Error::not_found("Shipping company", id)),
        },
        None => {
            let companies: Vec<ShippingCompanyResponse> = repo.list(&()).await?.into_iter().map(ShippingCompanyResponse::from).collect();
            Ok(Json(companies).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/shipping_companies",
    tag = "shipping_companies",
    summary = "Create shipping company",
    request_body = ShippingCompanyCreate,
    responses(
        (status = 201, description = "Shipping company created", body = CreatedResponse),
        (status = 400, description = "Missing required field")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_shipping_company(
    State(state): State<AppState>,
    Json(create): Json<ShippingCompanyCreate>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = ShippingCompanyCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = ShippingCompanies::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Shipping company created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/shipping_companies",
    tag = "shipping_companies",
    summary = "Update shipping company",
    params(ShippingCompanyQuery),
    request_body = ShippingCompanyUpdate,
    responses(
        (status = 200, description = "Shipping company updated", body = MessageResponse),
        (status = 400, description = "Missing id or empty body"),
        (status = 404, description = "Shipping company not found")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_shipping_company(
    State(state): State<AppState>,
    Query(query): Query<ShippingCompanyQuery>,
    Json(update): Json<ShippingCompanyUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = ShippingCompanyUpdateDBRequest::from(update);

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = ShippingCompanies::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Shipping company updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Shipping company found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Shipping company", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/shipping_companies",
    tag = "shipping_companies",
    summary = "Delete shipping company",
    params(ShippingCompanyQuery),
    responses(
        (status = 200, description = "Shipping company deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Shipping company not found"),
        (status = 409, description = "Shipping company still referenced by cargos")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_shipping_company(
    State(state): State<AppState>,
    Query(query): Query<ShippingCompanyQuery>,
) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = match ShippingCompanies::new(&mut tx).delete(id).await {
        Ok(deleted) => deleted,
        Err(DbError::ForeignKeyViolation { .. }) => {
            return Err(Error::conflict(
                "Cannot delete shipping company because it is referenced by other data (e.g., in cargos table).",
            ));
        }
        Err(err) => return Err(err.into()),
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Shipping company deleted successfully.")))
    } else {
        Err(Error::not_found("Shipping company", id))
    }
}
