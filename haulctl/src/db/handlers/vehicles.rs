//! Database repository for vehicles.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::vehicles::{VehicleCreateDBRequest, VehicleDBResponse, VehicleUpdateDBRequest},
};

const COLUMNS: &str = "id, name, smart_card_number, health_code";

pub struct Vehicles<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Vehicles<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Vehicles<'_> {
    type CreateRequest = VehicleCreateDBRequest;
    type UpdateRequest = VehicleUpdateDBRequest;
    type Response = VehicleDBResponse;
    type Filter = ();

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>("INSERT INTO vehicles (name, smart_card_number, health_code) VALUES (?, ?, ?) RETURNING id")
            .bind(&request.name)
            .bind(&request.smart_card_number)
            .bind(&request.health_code)
            .fetch_one(&mut *self.db)
            .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let vehicle = sqlx::query_as(&format!("SELECT {COLUMNS} FROM vehicles WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(vehicle)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &()) -> Result<Vec<Self::Response>> {
        let vehicles = sqlx::query_as(&format!("SELECT {COLUMNS} FROM vehicles ORDER BY id DESC"))
            .fetch_all(&mut *self.db)
            .await?;
        Ok(vehicles)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE vehicles SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(name) = &request.name {
                fields.push("name = ").push_bind_unseparated(name.clone());
            }
            if let Some(value) = &request.smart_card_number {
                fields.push("smart_card_number = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.health_code {
                fields.push("health_code = ").push_bind_unseparated(value.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "vehicles", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = ?").bind(id).execute(&mut *self.db).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use sqlx::SqlitePool;

    fn truck(name: &str, card: Option<&str>) -> VehicleCreateDBRequest {
        VehicleCreateDBRequest {
            name: name.to_string(),
            smart_card_number: card.map(String::from),
            health_code: None,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn create_then_get_round_trips(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Vehicles::new(&mut conn);

        let id = repo.create(&truck("Volvo FH16", Some("SC-100"))).await.unwrap();
        assert!(id > 0);

        let vehicle = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(vehicle.name, "Volvo FH16");
        assert_eq!(vehicle.smart_card_number.as_deref(), Some("SC-100"));
        assert_eq!(vehicle.health_code, None);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn ids_are_strictly_increasing(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Vehicles::new(&mut conn);

        let first = repo.create(&truck("A", None)).await.unwrap();
        let second = repo.create(&truck("B", None)).await.unwrap();
        assert!(second > first);

        // AUTOINCREMENT: a deleted id is never handed out again
        assert!(repo.delete(second).await.unwrap());
        let third = repo.create(&truck("C", None)).await.unwrap();
        assert!(third > second);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn list_is_newest_first(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Vehicles::new(&mut conn);

        repo.create(&truck("old", None)).await.unwrap();
        repo.create(&truck("new", None)).await.unwrap();

        let all = repo.list(&()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "new");
        assert_eq!(all[1].name, "old");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn duplicate_smart_card_is_a_unique_violation(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Vehicles::new(&mut conn);

        repo.create(&truck("first", Some("SC-1"))).await.unwrap();
        let err = repo.create(&truck("second", Some("SC-1"))).await.unwrap_err();
        match err {
            DbError::UniqueViolation { column, .. } => assert_eq!(column.as_deref(), Some("smart_card_number")),
            other => panic!("expected unique violation, got {other:?}"),
        }

        // no new row was inserted
        assert_eq!(repo.list(&()).await.unwrap().len(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn partial_update_touches_only_present_fields(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Vehicles::new(&mut conn);

        let id = repo.create(&truck("Scania", Some("SC-2"))).await.unwrap();

        let outcome = repo
            .update(
                id,
                &VehicleUpdateDBRequest {
                    name: Some("Scania R450".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Changed);

        let vehicle = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(vehicle.name, "Scania R450");
        assert_eq!(vehicle.smart_card_number.as_deref(), Some("SC-2"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn explicit_null_clears_a_nullable_field(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Vehicles::new(&mut conn);

        let id = repo.create(&truck("Scania", Some("SC-3"))).await.unwrap();
        repo.update(
            id,
            &VehicleUpdateDBRequest {
                smart_card_number: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let vehicle = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(vehicle.smart_card_number, None);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn update_of_missing_row_reports_not_found(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Vehicles::new(&mut conn);

        let outcome = repo
            .update(
                999,
                &VehicleUpdateDBRequest {
                    name: Some("ghost".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn delete_missing_row_is_false(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Vehicles::new(&mut conn);
        assert!(!repo.delete(42).await.unwrap());
    }
}
