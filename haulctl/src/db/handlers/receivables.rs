//! Database repository for receivables.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        RefTable, ensure_referenced,
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::receivables::{ReceivableCreateDBRequest, ReceivableDBResponse, ReceivableFilter, ReceivableUpdateDBRequest},
};

const SELECT: &str = "\
    SELECT r.id, r.cargo_id, r.amount, r.customer_id, r.bank_account_id, r.receipt_image, r.received_date, \
           c.origin, c.destination, \
           cust.first_name || ' ' || cust.last_name AS customer_name, cust.phone_number AS customer_phone, \
           ba.bank_name, ba.account_holder_name AS bank_account_holder \
    FROM receivables r \
    LEFT JOIN cargos c ON r.cargo_id = c.id \
    LEFT JOIN customers cust ON r.customer_id = cust.id \
    LEFT JOIN bank_accounts ba ON r.bank_account_id = ba.id";

pub struct Receivables<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Receivables<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Receivables<'_> {
    type CreateRequest = ReceivableCreateDBRequest;
    type UpdateRequest = ReceivableUpdateDBRequest;
    type Response = ReceivableDBResponse;
    type Filter = ReceivableFilter;

    #[instrument(skip(self, request), fields(cargo_id = request.cargo_id, amount = request.amount), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        ensure_referenced(&mut *self.db, RefTable::Cargos, "cargo_id", request.cargo_id).await?;
        ensure_referenced(&mut *self.db, RefTable::Customers, "customer_id", request.customer_id).await?;
        if let Some(bank_account_id) = request.bank_account_id {
            ensure_referenced(&mut *self.db, RefTable::BankAccounts, "bank_account_id", bank_account_id).await?;
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO receivables (cargo_id, amount, customer_id, bank_account_id, receipt_image, received_date) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(request.cargo_id)
        .bind(request.amount)
        .bind(request.customer_id)
        .bind(request.bank_account_id)
        .bind(&request.receipt_image)
        .bind(&request.received_date)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let receivable = sqlx::query_as(&format!("{SELECT} WHERE r.id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(receivable)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT);
        let mut prefix = " WHERE ";
        if let Some(cargo_id) = filter.cargo_id {
            qb.push(prefix).push("r.cargo_id = ").push_bind(cargo_id);
            prefix = " AND ";
        }
        if let Some(customer_id) = filter.customer_id {
            qb.push(prefix).push("r.customer_id = ").push_bind(customer_id);
        }
        qb.push(" ORDER BY r.received_date DESC, r.id DESC");

        let receivables = qb.build_query_as().fetch_all(&mut *self.db).await?;
        Ok(receivables)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        if let Some(cargo_id) = request.cargo_id {
            ensure_referenced(&mut *self.db, RefTable::Cargos, "cargo_id", cargo_id).await?;
        }
        if let Some(customer_id) = request.customer_id {
            ensure_referenced(&mut *self.db, RefTable::Customers, "customer_id", customer_id).await?;
        }
        if let Some(Some(bank_account_id)) = request.bank_account_id {
            ensure_referenced(&mut *self.db, RefTable::BankAccounts, "bank_account_id", bank_account_id).await?;
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE receivables SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(value) = request.cargo_id {
                fields.push("cargo_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.amount {
                fields.push("amount = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.customer_id {
                fields.push("customer_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = &request.bank_account_id {
                fields.push("bank_account_id = ").push_bind_unseparated(*value);
            }
            if let Some(value) = &request.receipt_image {
                fields.push("receipt_image = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.received_date {
                fields.push("received_date = ").push_bind_unseparated(value.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "receivables", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM receivables WHERE id = ?").bind(id).execute(&mut *self.db).await?;
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
    async fn filters_compose_with_and(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;
        let other_cargo = fixtures::seed_cargo(&pool, &parties).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Receivables::new(&mut conn);

        for cargo in [cargo_id, cargo_id, other_cargo] {
            repo.create(&ReceivableCreateDBRequest {
                cargo_id: cargo,
                amount: 10.0,
                customer_id: parties.customer_id,
                bank_account_id: None,
                receipt_image: None,
                received_date: "2026-01-01 00:00:00".to_string(),
            })
            .await
            .unwrap();
        }

        let both = repo
            .list(&ReceivableFilter {
                cargo_id: Some(cargo_id),
                customer_id: Some(parties.customer_id),
            })
            .await
            .unwrap();
        assert_eq!(both.len(), 2);

        let none = repo
            .list(&ReceivableFilter {
                cargo_id: Some(cargo_id),
                customer_id: Some(parties.customer_id + 10),
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
