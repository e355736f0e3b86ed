//! Database repository for cargo types.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::cargo_types::{CargoTypeCreateDBRequest, CargoTypeDBResponse, CargoTypeUpdateDBRequest},
};

pub struct CargoTypes<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> CargoTypes<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for CargoTypes<'_> {
    type CreateRequest = CargoTypeCreateDBRequest;
    type UpdateRequest = CargoTypeUpdateDBRequest;
    type Response = CargoTypeDBResponse;
    type Filter = ();

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>("INSERT INTO cargo_types (name) VALUES (?) RETURNING id")
            .bind(&request.name)
            .fetch_one(&mut *self.db)
            .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let row = sqlx::query_as("SELECT id, name FROM cargo_types WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(row)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &()) -> Result<Vec<Self::Response>> {
        let rows = sqlx::query_as("SELECT id, name FROM cargo_types ORDER BY name ASC")
            .fetch_all(&mut *self.db)
            .await?;
        Ok(rows)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE cargo_types SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(name) = &request.name {
                fields.push("name = ").push_bind_unseparated(name.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "cargo_types", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cargo_types WHERE id = ?").bind(id).execute(&mut *self.db).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn names_are_unique_and_listed_alphabetically(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = CargoTypes::new(&mut conn);

        repo.create(&CargoTypeCreateDBRequest { name: "Wheat".into() }).await.unwrap();
        repo.create(&CargoTypeCreateDBRequest { name: "Cement".into() }).await.unwrap();

        let err = repo.create(&CargoTypeCreateDBRequest { name: "Wheat".into() }).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        let all = repo.list(&()).await.unwrap();
        assert_eq!(all.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), vec!["Cement", "Wheat"]);
    }
}
