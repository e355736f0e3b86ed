//! Database repository for shipping companies.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::shipping_companies::{ShippingCompanyCreateDBRequest, ShippingCompanyDBResponse, ShippingCompanyUpdateDBRequest},
};

const COLUMNS: &str = "id, name, phone_number";

pub struct ShippingCompanies<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> ShippingCompanies<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for ShippingCompanies<'_> {
    type CreateRequest = ShippingCompanyCreateDBRequest;
    type UpdateRequest = ShippingCompanyUpdateDBRequest;
    type Response = ShippingCompanyDBResponse;
    type Filter = ();

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>("INSERT INTO shipping_companies (name, phone_number) VALUES (?, ?) RETURNING id")
            .bind(&request.name)
            .bind(&request.phone_number)
            .fetch_one(&mut *self.db)
            .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let company = sqlx::query_as(&format!("SELECT {COLUMNS} FROM shipping_companies WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(company)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &()) -> Result<Vec<Self::Response>> {
        let companies = sqlx::query_as(&format!("SELECT {COLUMNS} FROM shipping_companies ORDER BY name ASC"))
            .fetch_all(&mut *self.db)
            .await?;
        Ok(companies)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE shipping_companies SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(value) = &request.name {
                fields.push("name = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.phone_number {
                fields.push("phone_number = ").push_bind_unseparated(value.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "shipping_companies", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shipping_companies WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
