//! Cargo handlers. Reads carry the full join profile plus the derived
//! `total_payment_amount` and `driver_income` fields; deletes are refused
//! while any ledger row still references the cargo.

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
            cargos::{CargoCreate, CargoQuery, CargoResponse, CargoUpdate},
        },
    },
    db::{
        errors::DbError,
        handlers::{Cargos, Repository, UpdateOutcome},
        models::cargos::{CargoCreateDBRequest, CargoUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/cargos",
    tag = "cargos",
    summary = "Get one cargo by id, or list all",
    description = "Rows are enriched with lookup names and the derived driver_income / total_payment_amount fields.",
    params(CargoQuery),
    responses(
        (status = 200, description = "Single cargo or array", body = CargoResponse),
        (status = 404, description = "Cargo not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_cargos(State(state): State<AppState>, Query(query): Query<CargoQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Cargos::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(cargo) => Ok(Json(CargoResponse::from(cargo)).into_response()),
            None => Err(Error::not_found("Cargo", id)),
        },
        None => {
            let cargos: Vec<CargoResponse> = repo.list(&()).await?.into_iter().map(CargoResponse::from).collect();
            Ok(Json(cargos).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/cargos",
    tag = "cargos",
    summary = "Create cargo",
    request_body = CargoCreate,
    responses(
        (status = 201, description = "Cargo created", body = CreatedResponse),
        (status = 400, description = "Missing required field or invalid reference"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_cargo(State(state): State<AppState>, Json(create): Json<CargoCreate>) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = CargoCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = Cargos::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Cargo created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/cargos",
    tag = "cargos",
    summary = "Update cargo",
    params(CargoQuery),
    request_body = CargoUpdate,
    responses(
        (status = 200, description = "Cargo updated", body = MessageResponse),
        (status = 400, description = "Missing id, empty body, or invalid reference"),
        (status = 404, description = "Cargo not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_cargo(
    State(state): State<AppState>,
    Query(query): Query<CargoQuery>,
    Json(update): Json<CargoUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = CargoUpdateDBRequest::from(update);

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = Cargos::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Cargo updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new(
            "Cargo found, but no changes were made (or invalid data type resulted in no change).",
        ))),
        UpdateOutcome::NotFound => Err(Error::not_found("Cargo", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/cargos",
    tag = "cargos",
    summary = "Delete cargo",
    description = "Probes payments, receivables, payment_management, driver_payments and expenses first; any dependent row blocks the delete.",
    params(CargoQuery),
    responses(
        (status = 200, description = "Cargo deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Cargo not found"),
        (status = 409, description = "Cargo referenced by a dependent table"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_cargo(State(state): State<AppState>, Query(query): Query<CargoQuery>) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = match Cargos::new(&mut tx).delete(id).await {
        Ok(deleted) => deleted,
        // the repo names the dependent table in its message
        Err(DbError::ForeignKeyViolation { message }) => return Err(Error::conflict(message)),
        Err(err) => return Err(err.into()),
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Cargo deleted successfully.")))
    } else {
        Err(Error::not_found("Cargo", id))
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
    async fn read_includes_join_profile_and_derived_fields(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let app = create_test_app(pool).await;

        let response = app
            .post("/cargos")
            .json(&json!({
                "vehicle_id": parties.vehicle_id,
                "driver_id": parties.driver_id,
                "cargo_type_id": parties.cargo_type_id,
                "customer_id": parties.customer_id,
                "shipping_company_id": parties.shipping_company_id,
                "selling_company_id": parties.selling_company_id,
                "origin": "Tehran",
                "destination": "Bandar Abbas",
                "weight_tonnes": 10.0,
                "price_per_tonne": 500.0,
                "transport_cost_per_tonne": 100.0,
                "waybill_amount": 200.0
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let id = response.json::<Value>()["id"].as_i64().unwrap();

        let cargo: Value = app.get(&format!("/cargos?id={id}")).await.json();
        assert_eq!(cargo["driver_name"], "Hassan Karimi");
        assert_eq!(cargo["customer_payment_status_name"], "Not Received");
        assert_eq!(cargo["total_payment_amount"], 5000.0);
        // (10 * 100 - 200) * 20% = 160
        assert_eq!(cargo["driver_income"], 160.0);
        // stored as 0/1, surfaced as a real boolean
        assert_eq!(cargo["seller_payment_status"], Value::Bool(false));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn invalid_foreign_key_names_the_field(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let app = create_test_app(pool).await;

        let response = app
            .post("/cargos")
            .json(&json!({
                "vehicle_id": 9999,
                "driver_id": parties.driver_id,
                "cargo_type_id": parties.cargo_type_id,
                "customer_id": parties.customer_id,
                "shipping_company_id": parties.shipping_company_id,
                "selling_company_id": parties.selling_company_id,
                "origin": "Tehran",
                "destination": "Bandar Abbas",
                "weight_tonnes": 10.0,
                "price_per_tonne": 500.0,
                "transport_cost_per_tonne": 100.0
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("vehicle_id"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn delete_blocked_by_payment_leaves_both_rows(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;
        let payment_id = fixtures::seed_payment(&pool, cargo_id, parties.selling_company_id).await;
        let app = create_test_app(pool).await;

        let response = app.delete(&format!("/cargos?id={cargo_id}")).await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("payments"));

        app.get(&format!("/cargos?id={cargo_id}")).await.assert_status_ok();
        app.get(&format!("/payments?id={payment_id}")).await.assert_status_ok();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn delete_without_dependents_then_404(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;
        let app = create_test_app(pool).await;

        app.delete(&format!("/cargos?id={cargo_id}")).await.assert_status_ok();
        app.get(&format!("/cargos?id={cargo_id}")).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn explicit_null_clears_the_customer_bank_account(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;
        let app = create_test_app(pool).await;

        app.put(&format!("/cargos?id={cargo_id}"))
            .json(&json!({"customer_bank_account_id": null}))
            .await
            .assert_status_ok();

        let cargo: Value = app.get(&format!("/cargos?id={cargo_id}")).await.json();
        assert_eq!(cargo["customer_bank_account_id"], Value::Null);
    }
}
