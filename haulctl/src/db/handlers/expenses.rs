//! Database repository for per-cargo expenses.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        RefTable, ensure_referenced,
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::expenses::{ExpenseCreateDBRequest, ExpenseDBResponse, ExpenseFilter, ExpenseUpdateDBRequest},
};

const SELECT: &str = "\
    SELECT e.id, e.cargo_id, e.expense_category_id, e.title, e.amount, e.receipt_image, e.description, e.expense_date, \
           c.origin, c.destination, ec.name AS category_name \
    FROM expenses e \
    LEFT JOIN cargos c ON e.cargo_id = c.id \
    LEFT JOIN expense_categories ec ON e.expense_category_id = ec.id";

pub struct Expenses<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Expenses<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Expenses<'_> {
    type CreateRequest = ExpenseCreateDBRequest;
    type UpdateRequest = ExpenseUpdateDBRequest;
    type Response = ExpenseDBResponse;
    type Filter = ExpenseFilter;

    #[instrument(skip(self, request), fields(cargo_id = request.cargo_id, title = %request.title), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        ensure_referenced(&mut *self.db, RefTable::Cargos, "cargo_id", request.cargo_id).await?;
        ensure_referenced(&mut *self.db, RefTable::ExpenseCategories, "expense_category_id", request.expense_category_id).await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO expenses (cargo_id, expense_category_id, title, amount, receipt_image, description, expense_date) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(request.cargo_id)
        .bind(request.expense_category_id)
        .bind(&request.title)
        .bind(request.amount)
        .bind(&request.receipt_image)
        .bind(&request.description)
        .bind(&request.expense_date)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let expense = sqlx::query_as(&format!("{SELECT} WHERE e.id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(expense)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT);
        let mut prefix = " WHERE ";
        if let Some(cargo_id) = filter.cargo_id {
            qb.push(prefix).push("e.cargo_id = ").push_bind(cargo_id);
            prefix = " AND ";
        }
        if let Some(category_id) = filter.expense_category_id {
            qb.push(prefix).push("e.expense_category_id = ").push_bind(category_id);
        }
        qb.push(" ORDER BY e.expense_date DESC, e.id DESC");

        let expenses = qb.build_query_as().fetch_all(&mut *self.db).await?;
        Ok(expenses)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        if let Some(cargo_id) = request.cargo_id {
            ensure_referenced(&mut *self.db, RefTable::Cargos, "cargo_id", cargo_id).await?;
        }
        if let Some(category_id) = request.expense_category_id {
            ensure_referenced(&mut *self.db, RefTable::ExpenseCategories, "expense_category_id", category_id).await?;
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE expenses SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(value) = request.cargo_id {
                fields.push("cargo_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.expense_category_id {
                fields.push("expense_category_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = &request.title {
                fields.push("title = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = request.amount {
                fields.push("amount = ").push_bind_unseparated(value);
            }
            if let Some(value) = &request.receipt_image {
                fields.push("receipt_image = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.description {
                fields.push("description = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.expense_date {
                fields.push("expense_date = ").push_bind_unseparated(value.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "expenses", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?").bind(id).execute(&mut *self.db).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn category_name_is_joined_and_filter_applies(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Expenses::new(&mut conn);

        let id = repo
            .create(&ExpenseCreateDBRequest {
                cargo_id,
                expense_category_id: parties.expense_category_id,
                title: "Tolls".to_string(),
                amount: 35.0,
                receipt_image: None,
                description: None,
                expense_date: "2026-01-03 10:00:00".to_string(),
            })
            .await
            .unwrap();

        let expense = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(expense.category_name.as_deref(), Some("Road"));

        let filtered = repo
            .list(&ExpenseFilter {
                expense_category_id: Some(parties.expense_category_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
    }
}
