//! Database repository for bank accounts.
//!
//! Card number and IBAN carry unique indexes; duplicate inserts surface as
//! [`DbError::UniqueViolation`] with the violated column attributed.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::bank_accounts::{BankAccountCreateDBRequest, BankAccountDBResponse, BankAccountUpdateDBRequest},
};

const COLUMNS: &str = "id, bank_name, account_holder_name, card_number, iban";

pub struct BankAccounts<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> BankAccounts<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for BankAccounts<'_> {
    type CreateRequest = BankAccountCreateDBRequest;
    type UpdateRequest = BankAccountUpdateDBRequest;
    type Response = BankAccountDBResponse;
    type Filter = ();

    #[instrument(skip(self, request), fields(bank = %request.bank_name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO bank_accounts (bank_name, account_holder_name, card_number, iban) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&request.bank_name)
        .bind(&request.account_holder_name)
        .bind(&request.card_number)
        .bind(&request.iban)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let account = sqlx::query_as(&format!("SELECT {COLUMNS} FROM bank_accounts WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(account)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &()) -> Result<Vec<Self::Response>> {
        let accounts = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM bank_accounts ORDER BY bank_name ASC, account_holder_name ASC"
        ))
        .fetch_all(&mut *self.db)
        .await?;
        Ok(accounts)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE bank_accounts SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(value) = &request.bank_name {
                fields.push("bank_name = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.account_holder_name {
                fields.push("account_holder_name = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.card_number {
                fields.push("card_number = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.iban {
                fields.push("iban = ").push_bind_unseparated(value.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "bank_accounts", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bank_accounts WHERE id = ?").bind(id).execute(&mut *self.db).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use sqlx::SqlitePool;

    fn account(bank: &str, holder: &str, card: Option<&str>, iban: Option<&str>) -> BankAccountCreateDBRequest {
        BankAccountCreateDBRequest {
            bank_name: bank.to_string(),
            account_holder_name: holder.to_string(),
            card_number: card.map(String::from),
            iban: iban.map(String::from),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn duplicate_card_number_is_attributed(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = BankAccounts::new(&mut conn);

        repo.create(&account("Acme Bank", "J. Doe", Some("1234567890123456"), None))
            .await
            .unwrap();
        let err = repo
            .create(&account("Other Bank", "K. Roe", Some("1234567890123456"), None))
            .await
            .unwrap_err();

        match err {
            DbError::UniqueViolation { table, column, .. } => {
                assert_eq!(table.as_deref(), Some("bank_accounts"));
                assert_eq!(column.as_deref(), Some("card_number"));
            }
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn duplicate_iban_is_attributed(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = BankAccounts::new(&mut conn);

        repo.create(&account("Acme Bank", "J. Doe", None, Some("IR000000000000000000000001")))
            .await
            .unwrap();
        let err = repo
            .create(&account("Other Bank", "K. Roe", None, Some("IR000000000000000000000001")))
            .await
            .unwrap_err();

        match err {
            DbError::UniqueViolation { column, .. } => assert_eq!(column.as_deref(), Some("iban")),
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn unique_update_collision_conflicts(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = BankAccounts::new(&mut conn);

        repo.create(&account("Acme Bank", "J. Doe", Some("1111222233334444"), None))
            .await
            .unwrap();
        let second = repo.create(&account("Acme Bank", "K. Roe", Some("5555666677778888"), None)).await.unwrap();

        let err = repo
            .update(
                second,
                &BankAccountUpdateDBRequest {
                    card_number: Some(Some("1111222233334444".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn two_null_card_numbers_do_not_collide(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = BankAccounts::new(&mut conn);

        repo.create(&account("Acme Bank", "J. Doe", None, None)).await.unwrap();
        repo.create(&account("Acme Bank", "K. Roe", None, None)).await.unwrap();
        assert_eq!(repo.list(&()).await.unwrap().len(), 2);
    }
}
