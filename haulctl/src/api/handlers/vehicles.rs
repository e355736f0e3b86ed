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
            vehicles::{VehicleCreate, VehicleQuery, VehicleResponse, VehicleUpdate},
        },
    },
    db::{
        errors::DbError,
        handlers::{Repository, UpdateOutcome, Vehicles},
        models::vehicles::{VehicleCreateDBRequest, VehicleUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "vehicles",
    summary = "Get one vehicle by id, or list all",
    params(VehicleQuery),
    responses(
        (status = 200, description = "Single vehicle or array of vehicles", body = VehicleResponse),
        (status = 404, description = "Vehicle not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_vehicles(State(state): State<AppState>, Query(query): Query<VehicleQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Vehicles::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(vehicle) => Ok(Json(VehicleResponse::from(vehicle)).into_response()),
            None => Err(Error::not_found("Vehicle", id)),
        },
        None => {
            let vehicles: Vec<VehicleResponse> = repo.list(&()).await?.into_iter().map(VehicleResponse::from).collect();
            Ok(Json(vehicles).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/vehicles",
    tag = "vehicles",
    summary = "Create vehicle",
    request_body = VehicleCreate,
    responses(
        (status = 201, description = "Vehicle created", body = CreatedResponse),
        (status = 400, description = "Missing required field"),
        (status = 409, description = "Duplicate smart card number"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_vehicle(State(state): State<AppState>, Json(create): Json<VehicleCreate>) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = VehicleCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = Vehicles::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Vehicle created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/vehicles",
    tag = "vehicles",
    summary = "Update vehicle",
    params(VehicleQuery),
    request_body = VehicleUpdate,
    responses(
        (status = 200, description = "Vehicle updated", body = MessageResponse),
        (status = 400, description = "Missing id or empty body"),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "Duplicate smart card number"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Query(query): Query<VehicleQuery>,
    Json(update): Json<VehicleUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = VehicleUpdateDBRequest::from(update);

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = Vehicles::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Vehicle updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Vehicle found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Vehicle", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/vehicles",
    tag = "vehicles",
    summary = "Delete vehicle",
    params(VehicleQuery),
    responses(
        (status = 200, description = "Vehicle deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "Vehicle still referenced by cargos"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_vehicle(State(state): State<AppState>, Query(query): Query<VehicleQuery>) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = match Vehicles::new(&mut tx).delete(id).await {
        Ok(deleted) => deleted,
        Err(DbError::ForeignKeyViolation { .. }) => {
            return Err(Error::conflict("Cannot delete vehicle because it is referenced by other data (e.g., in cargos table)."));
        }
        Err(err) => return Err(err.into()),
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Vehicle deleted successfully.")))
    } else {
        Err(Error::not_found("Vehicle", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::create_test_app;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn crud_round_trip(pool: SqlitePool) {
        let app = create_test_app(pool).await;

        let response = app.post("/vehicles").json(&json!({"name": "Volvo FH16", "smart_card_number": "SC-9"})).await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        let id = created["id"].as_i64().unwrap();
        assert!(id > 0);

        let response = app.get(&format!("/vehicles?id={id}")).await;
        response.assert_status_ok();
        let vehicle: Value = response.json();
        assert_eq!(vehicle["name"], "Volvo FH16");
        assert_eq!(vehicle["smart_card_number"], "SC-9");

        let response = app.put(&format!("/vehicles?id={id}")).json(&json!({"name": "Volvo FH17"})).await;
        response.assert_status_ok();

        let response = app.delete(&format!("/vehicles?id={id}")).await;
        response.assert_status_ok();

        let response = app.get(&format!("/vehicles?id={id}")).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn missing_name_names_the_field(pool: SqlitePool) {
        let app = create_test_app(pool).await;

        let response = app.post("/vehicles").json(&json!({"health_code": "HC-1"})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Missing required field: name");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn empty_update_body_is_rejected(pool: SqlitePool) {
        let app = create_test_app(pool).await;

        let response = app.put("/vehicles?id=5").json(&json!({})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "No data provided for update.");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn missing_id_is_rejected_before_the_body(pool: SqlitePool) {
        let app = create_test_app(pool).await;

        let response = app.put("/vehicles").json(&json!({"name": "x"})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Missing ID for update.");

        let response = app.delete("/vehicles").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Missing ID for delete.");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn second_identical_put_reports_no_changes(pool: SqlitePool) {
        let app = create_test_app(pool).await;

        let response = app.post("/vehicles").json(&json!({"name": "Scania"})).await;
        let id = response.json::<Value>()["id"].as_i64().unwrap();

        let body = json!({"name": "Scania R450"});
        app.put(&format!("/vehicles?id={id}")).json(&body).await.assert_status_ok();

        let response = app.put(&format!("/vehicles?id={id}")).json(&body).await;
        response.assert_status_ok();

        // the record is unchanged after both calls
        let vehicle: Value = app.get(&format!("/vehicles?id={id}")).await.json();
        assert_eq!(vehicle["name"], "Scania R450");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn unsupported_verb_is_405(pool: SqlitePool) {
        let app = create_test_app(pool).await;
        let response = app.patch("/vehicles").json(&json!({})).await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }
}
