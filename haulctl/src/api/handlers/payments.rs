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
            payments::{PaymentCreate, PaymentQuery, PaymentResponse, PaymentUpdate},
        },
    },
    db::{
        handlers::{Payments, Repository, UpdateOutcome},
        models::payments::{PaymentCreateDBRequest, PaymentFilter, PaymentUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    summary = "Get one payment by id, or list (optionally by cargo)",
    params(PaymentQuery),
    responses(
        (status = 200, description = "Single payment or array", body = PaymentResponse),
        (status = 404, description = "Payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_payments(State(state): State<AppState>, Query(query): Query<PaymentQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Payments::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(payment) => Ok(Json(PaymentResponse::from(payment)).into_response()),
            None => Err(Error::not_found("Payment", id)),
        },
        None => {
            let filter = PaymentFilter {
                cargo_id: positive(query.cargo_id),
            };
            let payments: Vec<PaymentResponse> = repo.list(&filter).await?.into_iter().map(PaymentResponse::from).collect();
            Ok(Json(payments).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    summary = "Record payment",
    request_body = PaymentCreate,
    responses(
        (status = 201, description = "Payment recorded", body = CreatedResponse),
        (status = 400, description = "Missing required field, invalid amount, or invalid reference"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_payment(State(state): State<AppState>, Json(create): Json<PaymentCreate>) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = PaymentCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = Payments::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Payment recorded successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/payments",
    tag = "payments",
    summary = "Update payment",
    params(PaymentQuery),
    request_body = PaymentUpdate,
    responses(
        (status = 200, description = "Payment updated", body = MessageResponse),
        (status = 400, description = "Missing id, empty body, or invalid value"),
        (status = 404, description = "Payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_payment(
    State(state): State<AppState>,
    Query(query): Query<PaymentQuery>,
    Json(update): Json<PaymentUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = PaymentUpdateDBRequest::try_from(update)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = Payments::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Payment updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Payment found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Payment", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/payments",
    tag = "payments",
    summary = "Delete payment",
    params(PaymentQuery),
    responses(
        (status = 200, description = "Payment deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Payment not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_payment(State(state): State<AppState>, Query(query): Query<PaymentQuery>) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = Payments::new(&mut tx).delete(id).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Payment deleted successfully.")))
    } else {
        Err(Error::not_found("Payment", id))
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
    async fn negative_amount_is_rejected(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;
        let app = create_test_app(pool).await;

        let response = app
            .post("/payments")
            .json(&json!({"cargo_id": cargo_id, "amount": -1.0, "company_id": parties.selling_company_id}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid amount.");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn cargo_filter_narrows_the_list(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let first_cargo = fixtures::seed_cargo(&pool, &parties).await;
        let second_cargo = fixtures::seed_cargo(&pool, &parties).await;
        fixtures::seed_payment(&pool, first_cargo, parties.selling_company_id).await;
        fixtures::seed_payment(&pool, second_cargo, parties.selling_company_id).await;
        let app = create_test_app(pool).await;

        let all: Vec<Value> = app.get("/payments").await.json();
        assert_eq!(all.len(), 2);

        let filtered: Vec<Value> = app.get(&format!("/payments?cargo_id={first_cargo}")).await.json();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["cargo_id"].as_i64().unwrap(), first_cargo);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn delete_is_unconditional_once_the_id_exists(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;
        let payment_id = fixtures::seed_payment(&pool, cargo_id, parties.selling_company_id).await;
        let app = create_test_app(pool).await;

        app.delete(&format!("/payments?id={payment_id}")).await.assert_status_ok();
        app.delete(&format!("/payments?id={payment_id}")).await.assert_status(StatusCode::NOT_FOUND);
    }
}
