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
            driver_payments::{DriverPaymentCreate, DriverPaymentQuery, DriverPaymentResponse, DriverPaymentUpdate},
        },
    },
    db::{
        handlers::{DriverPayments, Repository, UpdateOutcome},
        models::driver_payments::{DriverPaymentCreateDBRequest, DriverPaymentFilter, DriverPaymentUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/driver_payments",
    tag = "driver_payments",
    summary = "Get one driver payment by id, or list (optionally by cargo/driver)",
    params(DriverPaymentQuery),
    responses(
        (status = 200, description = "Single driver payment or array", body = DriverPaymentResponse),
        (status = 404, description = "Driver payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_driver_payments(State(state): State<AppState>, Query(query): Query<DriverPaymentQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = DriverPayments::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(record) => Ok(Json(DriverPaymentResponse::from(record)).into_response()),
            None => Err(Error::not_found("Driver payment", id)),
        },
        None => {
            let filter = DriverPaymentFilter {
                cargo_id: positive(query.cargo_id),
                driver_id: positive(query.driver_id),
            };
            let records: Vec<DriverPaymentResponse> = repo.list(&filter).await?.into_iter().map(DriverPaymentResponse::from).collect();
            Ok(Json(records).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/driver_payments",
    tag = "driver_payments",
    summary = "Record driver salary payment",
    request_body = DriverPaymentCreate,
    responses(
        (status = 201, description = "Driver payment created", body = CreatedResponse),
        (status = 400, description = "Missing required field, invalid amount, or invalid reference"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_driver_payment(
    State(state): State<AppState>,
    Json(create): Json<DriverPaymentCreate>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = DriverPaymentCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = DriverPayments::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Driver payment created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/driver_payments",
    tag = "driver_payments",
    summary = "Update driver payment",
    params(DriverPaymentQuery),
    request_body = DriverPaymentUpdate,
    responses(
        (status = 200, description = "Driver payment updated", body = MessageResponse),
        (status = 400, description = "Missing id, empty body, or invalid value"),
        (status = 404, description = "Driver payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_driver_payment(
    State(state): State<AppState>,
    Query(query): Query<DriverPaymentQuery>,
    Json(update): Json<DriverPaymentUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = DriverPaymentUpdateDBRequest::try_from(update)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = DriverPayments::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Driver payment updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Driver payment found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Driver payment", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/driver_payments",
    tag = "driver_payments",
    summary = "Delete driver payment",
    params(DriverPaymentQuery),
    responses(
        (status = 200, description = "Driver payment deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Driver payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_driver_payment(State(state): State<AppState>, Query(query): Query<DriverPaymentQuery>) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = DriverPayments::new(&mut tx).delete(id).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Driver payment deleted successfully.")))
    } else {
        Err(Error::not_found("Driver payment", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, fixtures};
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn payment_date_is_required(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;
        let app = create_test_app(pool).await;

        let response = app
            .post("/driver_payments")
            .json(&json!({"cargo_id": cargo_id, "driver_id": parties.driver_id, "amount": 100.0}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Missing required field: payment_date");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn single_read_returns_an_object_not_an_array(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;
        let app = create_test_app(pool).await;

        let id = app
            .post("/driver_payments")
            .json(&json!({
                "cargo_id": cargo_id,
                "driver_id": parties.driver_id,
                "amount": 100.0,
                "payment_date": "2026-02-01 08:00:00"
            }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        let record: Value = app.get(&format!("/driver_payments?id={id}")).await.json();
        assert!(record.is_object());
        assert_eq!(record["driver_name"], "Hassan Karimi");
    }
}
