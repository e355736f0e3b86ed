//! Database repository for expense categories.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::expense_categories::{ExpenseCategoryCreateDBRequest, ExpenseCategoryDBResponse, ExpenseCategoryUpdateDBRequest},
};

pub struct ExpenseCategories<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> ExpenseCategories<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for ExpenseCategories<'_> {
    type CreateRequest = ExpenseCategoryCreateDBRequest;
    type UpdateRequest = ExpenseCategoryUpdateDBRequest;
    type Response = ExpenseCategoryDBResponse;
    type Filter = ();

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>("INSERT INTO expense_categories (name) VALUES (?) RETURNING id")
            .bind(&request.name)
            .fetch_one(&mut *self.db)
            .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let row = sqlx::query_as("SELECT id, name FROM expense_categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(row)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &()) -> Result<Vec<Self::Response>> {
        let rows = sqlx::query_as("SELECT id, name FROM expense_categories ORDER BY name ASC")
            .fetch_all(&mut *self.db)
            .await?;
        Ok(rows)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE expense_categories SET ");
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
        } else if row_exists(&mut *self.db, "expense_categories", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expense_categories WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
