//! Driver handlers. The one resource with a credential: `password` is
//! required on create, optional on update, trimmed (never HTML-stripped)
//! and hashed before it reaches the repository.

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
            CreatedResponse, MessageResponse, require_text,
            drivers::{DriverCreate, DriverQuery, DriverResponse, DriverUpdate},
        },
    },
    db::{
        errors::DbError,
        handlers::{Drivers, Repository, UpdateOutcome},
    },
    errors::{Error, Result},
    password, sanitize,
};

#[utoipa::path(
    get,
    path = "/drivers",
    tag = "drivers",
    summary = "Get one driver by id, or list all",
    description = "Single reads embed the referenced bank account details. The credential hash is never returned.",
    params(DriverQuery),
    responses(
        (status = 200, description = "Single driver or array", body = DriverResponse),
        (status = 404, description = "Driver not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_drivers(State(state): State<AppState>, Query(query): Query<DriverQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Drivers::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(driver) => Ok(Json(DriverResponse::from(driver)).into_response()),
            None => Err(Error::not_found("Driver", id)),
        },
        None => {
            let drivers: Vec<DriverResponse> = repo.list(&()).await?.into_iter().map(DriverResponse::from).collect();
            Ok(Json(drivers).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/drivers",
    tag = "drivers",
    summary = "Create driver",
    request_body = DriverCreate,
    responses(
        (status = 201, description = "Driver created", body = CreatedResponse),
        (status = 400, description = "Missing required field or invalid bank account"),
        (status = 409, description = "Duplicate phone number or national id"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_driver(State(state): State<AppState>, Json(create): Json<DriverCreate>) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let plaintext = require_text("password", create.password.clone())?;
    let password_hash = password::hash_credential(&sanitize::trim_credential(&plaintext), state.config.password)?;
    let request = create.into_db_request(password_hash)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = Drivers::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Driver created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/drivers",
    tag = "drivers",
    summary = "Update driver",
    params(DriverQuery),
    request_body = DriverUpdate,
    responses(
        (status = 200, description = "Driver updated", body = MessageResponse),
        (status = 400, description = "Missing id, empty body, or invalid bank account"),
        (status = 404, description = "Driver not found"),
        (status = 409, description = "Duplicate phone number or national id"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_driver(
    State(state): State<AppState>,
    Query(query): Query<DriverQuery>,
    Json(update): Json<DriverUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }

    let password_hash = match &update.password {
        Some(plaintext) => Some(password::hash_credential(&sanitize::trim_credential(plaintext), state.config.password)?),
        None => None,
    };
    let request = update.into_db_request(password_hash);

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = Drivers::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Driver updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Driver found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Driver", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/drivers",
    tag = "drivers",
    summary = "Delete driver",
    params(DriverQuery),
    responses(
        (status = 200, description = "Driver deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Driver not found"),
        (status = 409, description = "Driver still referenced by cargos or driver payments"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_driver(State(state): State<AppState>, Query(query): Query<DriverQuery>) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = match Drivers::new(&mut tx).delete(id).await {
        Ok(deleted) => deleted,
        Err(DbError::ForeignKeyViolation { .. }) => {
            return Err(Error::conflict("Cannot delete driver because they are referenced by other data (e.g., in cargos table)."));
        }
        Err(err) => return Err(err.into()),
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Driver deleted successfully.")))
    } else {
        Err(Error::not_found("Driver", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::{db::handlers::Drivers, password, test_utils::create_test_app};
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn password_is_hashed_and_never_returned(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;

        let response = app
            .post("/drivers")
            .json(&json!({"first_name": "Hassan", "last_name": "Karimi", "password": "s3cret-pass"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let id = response.json::<Value>()["id"].as_i64().unwrap();

        // stored value is an argon2 hash that verifies against the plaintext
        let mut conn = pool.acquire().await.unwrap();
        let hash = Drivers::new(&mut conn).password_hash(id).await.unwrap().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(password::verify_credential("s3cret-pass", &hash).unwrap());

        // neither the hash nor the plaintext appears in any read
        let single = app.get(&format!("/drivers?id={id}")).await.text();
        assert!(!single.contains("password"));
        assert!(!single.contains("s3cret-pass"));
        let listed = app.get("/drivers").await.text();
        assert!(!listed.contains("password"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn password_is_required_on_create(pool: SqlitePool) {
        let app = create_test_app(pool).await;

        let response = app.post("/drivers").json(&json!({"first_name": "Hassan", "last_name": "Karimi"})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Missing required field: password");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn update_can_rotate_the_credential(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;

        let id = app
            .post("/drivers")
            .json(&json!({"first_name": "Hassan", "last_name": "Karimi", "password": "old-pass"}))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        app.put(&format!("/drivers?id={id}"))
            .json(&json!({"password": "new-pass"}))
            .await
            .assert_status_ok();

        let mut conn = pool.acquire().await.unwrap();
        let hash = Drivers::new(&mut conn).password_hash(id).await.unwrap().unwrap();
        assert!(password::verify_credential("new-pass", &hash).unwrap());
        assert!(!password::verify_credential("old-pass", &hash).unwrap());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn invalid_bank_account_is_a_bad_request(pool: SqlitePool) {
        let app = create_test_app(pool).await;

        let response = app
            .post("/drivers")
            .json(&json!({
                "first_name": "Hassan",
                "last_name": "Karimi",
                "password": "s3cret",
                "bank_account_id": 42
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("bank_account_id"));
    }
}
