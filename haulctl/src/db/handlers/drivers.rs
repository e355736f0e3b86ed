//! Database repository for drivers.
//!
//! Reads never select `password_hash`. A single-driver read resolves the
//! referenced bank account into `bank_account_details`; the list read leaves
//! it unresolved, one probe per row being too chatty there.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        RefTable, ensure_referenced,
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::drivers::{DriverBankAccountDetails, DriverCreateDBRequest, DriverDBResponse, DriverUpdateDBRequest},
};

const COLUMNS: &str = "id, first_name, last_name, phone_number, salary_percentage, bank_account_id, \
                       national_id, national_id_card_image, driver_license_image, driver_smart_card_image";

pub struct Drivers<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Drivers<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Stored credential hash, for verification flows. Not part of any read
    /// response.
    #[instrument(skip(self), err)]
    pub async fn password_hash(&mut self, id: i64) -> Result<Option<String>> {
        let hash = sqlx::query_scalar("SELECT password_hash FROM drivers WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(hash)
    }

    async fn bank_details(&mut self, bank_account_id: i64) -> Result<Option<DriverBankAccountDetails>> {
        let details = sqlx::query_as("SELECT bank_name, account_holder_name, card_number, iban FROM bank_accounts WHERE id = ?")
            .bind(bank_account_id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(details)
    }
}

#[async_trait::async_trait]
impl Repository for Drivers<'_> {
    type CreateRequest = DriverCreateDBRequest;
    type UpdateRequest = DriverUpdateDBRequest;
    type Response = DriverDBResponse;
    type Filter = ();

    #[instrument(skip(self, request), fields(last_name = %request.last_name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        if let Some(bank_account_id) = request.bank_account_id {
            ensure_referenced(&mut *self.db, RefTable::BankAccounts, "bank_account_id", bank_account_id).await?;
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO drivers (first_name, last_name, phone_number, password_hash, salary_percentage, bank_account_id, \
             national_id, national_id_card_image, driver_license_image, driver_smart_card_image) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.phone_number)
        .bind(&request.password_hash)
        .bind(request.salary_percentage)
        .bind(request.bank_account_id)
        .bind(&request.national_id)
        .bind(&request.national_id_card_image)
        .bind(&request.driver_license_image)
        .bind(&request.driver_smart_card_image)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let driver: Option<DriverDBResponse> = sqlx::query_as(&format!("SELECT {COLUMNS} FROM drivers WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        let Some(mut driver) = driver else { return Ok(None) };
        if let Some(bank_account_id) = driver.bank_account_id {
            driver.bank_account_details = self.bank_details(bank_account_id).await?;
        }
        Ok(Some(driver))
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &()) -> Result<Vec<Self::Response>> {
        let drivers = sqlx::query_as(&format!("SELECT {COLUMNS} FROM drivers ORDER BY last_name ASC, first_name ASC"))
            .fetch_all(&mut *self.db)
            .await?;
        Ok(drivers)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        // Clearing the bank account (explicit null) skips the probe.
        if let Some(Some(bank_account_id)) = request.bank_account_id {
            ensure_referenced(&mut *self.db, RefTable::BankAccounts, "bank_account_id", bank_account_id).await?;
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE drivers SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(value) = &request.first_name {
                fields.push("first_name = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.last_name {
                fields.push("last_name = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.phone_number {
                fields.push("phone_number = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.password_hash {
                fields.push("password_hash = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.salary_percentage {
                fields.push("salary_percentage = ").push_bind_unseparated(*value);
            }
            if let Some(value) = &request.bank_account_id {
                fields.push("bank_account_id = ").push_bind_unseparated(*value);
            }
            if let Some(value) = &request.national_id {
                fields.push("national_id = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.national_id_card_image {
                fields.push("national_id_card_image = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.driver_license_image {
                fields.push("driver_license_image = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.driver_smart_card_image {
                fields.push("driver_smart_card_image = ").push_bind_unseparated(value.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "drivers", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = ?").bind(id).execute(&mut *self.db).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        errors::DbError,
        handlers::{BankAccounts, Repository},
        models::bank_accounts::BankAccountCreateDBRequest,
    };
    use sqlx::SqlitePool;

    fn driver(first: &str, last: &str) -> DriverCreateDBRequest {
        DriverCreateDBRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone_number: None,
            password_hash: "$argon2id$fake$hash".to_string(),
            salary_percentage: None,
            bank_account_id: None,
            national_id: None,
            national_id_card_image: None,
            driver_license_image: None,
            driver_smart_card_image: None,
        }
    }

    async fn create_bank_account(pool: &SqlitePool) -> i64 {
        let mut conn = pool.acquire().await.unwrap();
        BankAccounts::new(&mut conn)
            .create(&BankAccountCreateDBRequest {
                bank_name: "Acme Bank".to_string(),
                account_holder_name: "J. Doe".to_string(),
                card_number: None,
                iban: None,
            })
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn missing_bank_account_fails_the_create(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Drivers::new(&mut conn);

        let mut request = driver("Hassan", "Karimi");
        request.bank_account_id = Some(999);
        let err = repo.create(&request).await.unwrap_err();
        match err {
            DbError::ForeignKeyViolation { message } => assert!(message.contains("bank_account_id")),
            other => panic!("expected FK violation, got {other:?}"),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn single_read_embeds_bank_details(pool: SqlitePool) {
        let bank_account_id = create_bank_account(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Drivers::new(&mut conn);

        let mut request = driver("Hassan", "Karimi");
        request.bank_account_id = Some(bank_account_id);
        let id = repo.create(&request).await.unwrap();

        let single = repo.get_by_id(id).await.unwrap().unwrap();
        let details = single.bank_account_details.expect("bank details should be embedded");
        assert_eq!(details.bank_name, "Acme Bank");

        let listed = repo.list(&()).await.unwrap();
        assert!(listed[0].bank_account_details.is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn explicit_null_clears_the_bank_account(pool: SqlitePool) {
        let bank_account_id = create_bank_account(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Drivers::new(&mut conn);

        let mut request = driver("Hassan", "Karimi");
        request.bank_account_id = Some(bank_account_id);
        let id = repo.create(&request).await.unwrap();

        repo.update(
            id,
            &DriverUpdateDBRequest {
                bank_account_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let updated = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(updated.bank_account_id, None);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn duplicate_national_id_conflicts(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Drivers::new(&mut conn);

        let mut first = driver("Hassan", "Karimi");
        first.national_id = Some("0012345678".to_string());
        repo.create(&first).await.unwrap();

        let mut second = driver("Ali", "Ahmadi");
        second.national_id = Some("0012345678".to_string());
        let err = repo.create(&second).await.unwrap_err();
        match err {
            DbError::UniqueViolation { column, .. } => assert_eq!(column.as_deref(), Some("national_id")),
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn password_hash_is_reachable_only_explicitly(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Drivers::new(&mut conn);

        let id = repo.create(&driver("Hassan", "Karimi")).await.unwrap();
        let hash = repo.password_hash(id).await.unwrap().unwrap();
        assert_eq!(hash, "$argon2id$fake$hash");
    }
}
