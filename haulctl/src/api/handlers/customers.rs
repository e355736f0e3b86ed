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
            customers::{CustomerCreate, CustomerQuery, CustomerResponse, CustomerUpdate},
        },
    },
    db::{
        errors::DbError,
        handlers::{Customers, Repository, UpdateOutcome},
        models::customers::{CustomerCreateDBRequest, CustomerUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    summary = "Get one customer by id, or list all",
    params(CustomerQuery),
    responses(
        (status = 200, description = "Single customer or array", body = CustomerResponse),
        (status = 404, description = "Customer not found")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_customers(State(state): State<AppState>, Query(query): Query<CustomerQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Customers::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(customer) => Ok(Json(CustomerResponse::from(customer)).into_response()),
            None => Err(Error::not_found("Customer", id)),
        },
        None => {
            let customers: Vec<CustomerResponse> = repo.list(&()).await?.into_iter().map(CustomerResponse::from).collect();
            Ok(Json(customers).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    summary = "Create customer",
    request_body = CustomerCreate,
    responses(
        (status = 201, description = "Customer created", body = CreatedResponse),
        (status = 400, description = "Missing required field"),
        (status = 409, description = "Duplicate phone number")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_customer(State(state): State<AppState>, Json(create): Json<CustomerCreate>) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = CustomerCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = Customers::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Customer created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/customers",
    tag = "customers",
    summary = "Update customer",
    params(CustomerQuery),
    request_body = CustomerUpdate,
    responses(
        (status = 200, description = "Customer updated", body = MessageResponse),
        (status = 400, description = "Missing id or empty body"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Duplicate phone number")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_customer(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
    Json(update): Json<CustomerUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = CustomerUpdateDBRequest::from(update);

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = Customers::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Customer updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Customer found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Customer", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/customers",
    tag = "customers",
    summary = "Delete customer",
    params(CustomerQuery),
    responses(
        (status = 200, description = "Customer deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Customer still referenced by cargos or receivables")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_customer(State(state): State<AppState>, Query(query): Query<CustomerQuery>) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = match Customers::new(&mut tx).delete(id).await {
        Ok(deleted) => deleted,
        Err(DbError::ForeignKeyViolation { .. }) => {
            return Err(Error::conflict("Cannot delete customer because they are referenced by other data (e.g., cargos, receivables)."));
        }
        Err(err) => return Err(err.into()),
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Customer deleted successfully.")))
    } else {
        Err(Error::not_found("Customer", id))
    }
}
