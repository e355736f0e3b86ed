//! Database repository for customers.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::customers::{CustomerCreateDBRequest, CustomerDBResponse, CustomerUpdateDBRequest},
};

const COLUMNS: &str = "id, first_name, last_name, phone_number";

pub struct Customers<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Customers<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Customers<'_> {
    type CreateRequest = CustomerCreateDBRequest;
    type UpdateRequest = CustomerUpdateDBRequest;
    type Response = CustomerDBResponse;
    type Filter = ();

    #[instrument(skip(self, request), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>("INSERT INTO customers (first_name, last_name, phone_number) VALUES (?, ?, ?) RETURNING id")
            .bind(&request.first_name)
            .bind(&request.last_name)
            .bind(&request.phone_number)
            .fetch_one(&mut *self.db)
            .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let customer = sqlx::query_as(&format!("SELECT {COLUMNS} FROM customers WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(customer)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &()) -> Result<Vec<Self::Response>> {
        let customers = sqlx::query_as(&format!("SELECT {COLUMNS} FROM customers ORDER BY last_name ASC, first_name ASC"))
            .fetch_all(&mut *self.db)
            .await?;
        Ok(customers)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE customers SET ");
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
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "customers", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?").bind(id).execute(&mut *self.db).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use sqlx::SqlitePool;

    fn customer(first: &str, last: &str, phone: Option<&str>) -> CustomerCreateDBRequest {
        CustomerCreateDBRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone_number: phone.map(String::from),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn list_orders_by_last_then_first_name(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Customers::new(&mut conn);

        repo.create(&customer("Sara", "Moradi", None)).await.unwrap();
        repo.create(&customer("Ali", "Ahmadi", None)).await.unwrap();
        repo.create(&customer("Reza", "Ahmadi", None)).await.unwrap();

        let all = repo.list(&()).await.unwrap();
        let names: Vec<(String, String)> = all.into_iter().map(|c| (c.last_name, c.first_name)).collect();
        assert_eq!(
            names,
            vec![
                ("Ahmadi".to_string(), "Ali".to_string()),
                ("Ahmadi".to_string(), "Reza".to_string()),
                ("Moradi".to_string(), "Sara".to_string()),
            ]
        );
    }

    #[sqlx::test]
    #[test_log::test]
    async fn duplicate_phone_number_conflicts(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Customers::new(&mut conn);

        repo.create(&customer("Ali", "Ahmadi", Some("0912000"))).await.unwrap();
        let err = repo.create(&customer("Reza", "Karimi", Some("0912000"))).await.unwrap_err();
        match err {
            DbError::UniqueViolation { column, .. } => assert_eq!(column.as_deref(), Some("phone_number")),
            other => panic!("expected unique violation, got {other:?}"),
        }
    }
}
