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
            bank_accounts::{BankAccountCreate, BankAccountQuery, BankAccountResponse, BankAccountUpdate},
        },
    },
    db::{
        errors::DbError,
        handlers::{BankAccounts, Repository, UpdateOutcome},
        models::bank_accounts::{BankAccountCreateDBRequest, BankAccountUpdateDBRequest},
    },
    errors::{Error, Result},
};

#[utoipa::path(
    get,
    path = "/bank_accounts",
    tag = "bank_accounts",
    summary = "Get one bank account by id, or list all",
    params(BankAccountQuery),
    responses(
        (status = 200, description = "Single bank account or array", body = BankAccountResponse),
        (status = 404, description = "Bank account not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn read_bank_accounts(State(state): State<AppState>, Query(query): Query<BankAccountQuery>) -> Result<Response> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = BankAccounts::new(&mut conn);

    match positive(query.id) {
        Some(id) => match repo.get_by_id(id).await? {
            Some(account) => Ok(Json(BankAccountResponse::from(account)).into_response()),
            None => Err(Error::not_found("Bank account", id)),
        },
        None => {
            let accounts: Vec<BankAccountResponse> = repo.list(&()).await?.into_iter().map(BankAccountResponse::from).collect();
            Ok(Json(accounts).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/bank_accounts",
    tag = "bank_accounts",
    summary = "Create bank account",
    request_body = BankAccountCreate,
    responses(
        (status = 201, description = "Bank account created", body = CreatedResponse),
        (status = 400, description = "Missing required field"),
        (status = 409, description = "Duplicate card number or IBAN"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_bank_account(
    State(state): State<AppState>,
    Json(create): Json<BankAccountCreate>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let request = BankAccountCreateDBRequest::try_from(create)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let id = BankAccounts::new(&mut tx).create(&request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse::new("Bank account created successfully.", id))))
}

#[utoipa::path(
    put,
    path = "/bank_accounts",
    tag = "bank_accounts",
    summary = "Update bank account",
    params(BankAccountQuery),
    request_body = BankAccountUpdate,
    responses(
        (status = 200, description = "Bank account updated", body = MessageResponse),
        (status = 400, description = "Missing id or empty body"),
        (status = 404, description = "Bank account not found"),
        (status = 409, description = "Duplicate card number or IBAN"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_bank_account(
    State(state): State<AppState>,
    Query(query): Query<BankAccountQuery>,
    Json(update): Json<BankAccountUpdate>,
) -> Result<Json<MessageResponse>> {
    let id = require_update_id(query.id)?;
    if update.is_empty() {
        return Err(Error::bad_request("No data provided for update."));
    }
    let request = BankAccountUpdateDBRequest::from(update);

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let outcome = BankAccounts::new(&mut tx).update(id, &request).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    match outcome {
        UpdateOutcome::Changed => Ok(Json(MessageResponse::new("Bank account updated successfully."))),
        UpdateOutcome::Unchanged => Ok(Json(MessageResponse::new("Bank account found, but no changes were made."))),
        UpdateOutcome::NotFound => Err(Error::not_found("Bank account", id)),
    }
}

#[utoipa::path(
    delete,
    path = "/bank_accounts",
    tag = "bank_accounts",
    summary = "Delete bank account",
    params(BankAccountQuery),
    responses(
        (status = 200, description = "Bank account deleted", body = MessageResponse),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Bank account not found"),
        (status = 409, description = "Bank account still referenced"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_bank_account(State(state): State<AppState>, Query(query): Query<BankAccountQuery>) -> Result<Json<MessageResponse>> {
    let id = require_delete_id(query.id)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = match BankAccounts::new(&mut tx).delete(id).await {
        Ok(deleted) => deleted,
        Err(DbError::ForeignKeyViolation { .. }) => {
            return Err(Error::conflict(
                "Cannot delete bank account because it is referenced by other data (e.g., drivers, payments, receivables). \
                 Consider setting related foreign keys to NULL instead.",
            ));
        }
        Err(err) => return Err(err.into()),
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    if deleted {
        Ok(Json(MessageResponse::new("Bank account deleted successfully.")))
    } else {
        Err(Error::not_found("Bank account", id))
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
    async fn minimal_create_succeeds(pool: SqlitePool) {
        let app = create_test_app(pool).await;

        let response = app
            .post("/bank_accounts")
            .json(&json!({"bank_name": "Acme Bank", "account_holder_name": "J. Doe"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        assert_eq!(created["id"].as_i64().unwrap(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn duplicate_card_number_returns_conflict_naming_the_field(pool: SqlitePool) {
        let app = create_test_app(pool).await;

        let body = json!({
            "bank_name": "Acme Bank",
            "account_holder_name": "J. Doe",
            "card_number": "1234567890123456"
        });
        app.post("/bank_accounts").json(&body).await.assert_status(StatusCode::CREATED);

        let response = app.post("/bank_accounts").json(&body).await;
        response.assert_status(StatusCode::CONFLICT);
        let error: Value = response.json();
        assert!(
            error["message"].as_str().unwrap().contains("card number"),
            "conflict message should mention the card number, got: {}",
            error["message"]
        );

        // no second row appeared
        let all: Vec<Value> = app.get("/bank_accounts").await.json();
        assert_eq!(all.len(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn delete_referenced_by_a_driver_conflicts(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;

        let account: Value = app
            .post("/bank_accounts")
            .json(&json!({"bank_name": "Acme Bank", "account_holder_name": "J. Doe"}))
            .await
            .json();
        let account_id = account["id"].as_i64().unwrap();

        app.post("/drivers")
            .json(&json!({
                "first_name": "Hassan",
                "last_name": "Karimi",
                "password": "s3cret",
                "bank_account_id": account_id
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = app.delete(&format!("/bank_accounts?id={account_id}")).await;
        response.assert_status(StatusCode::CONFLICT);
    }
}
