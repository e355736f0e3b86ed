//! Database repository for payment management records.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        RefTable, ensure_referenced,
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::payment_management::{
        PaymentManagementCreateDBRequest, PaymentManagementDBResponse, PaymentManagementFilter, PaymentManagementUpdateDBRequest,
    },
};

const SELECT: &str = "\
    SELECT pm.id, pm.cargo_id, pm.payment_type_id, pm.payer_details, pm.amount, \
           pm.card_transfer_receipt_image, pm.check_image, pm.check_due_date, pm.transaction_date, \
           c.origin, c.destination, pt.name AS payment_type_name \
    FROM payment_management pm \
    LEFT JOIN cargos c ON pm.cargo_id = c.id \
    LEFT JOIN payment_types pt ON pm.payment_type_id = pt.id";

pub struct PaymentManagement<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> PaymentManagement<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for PaymentManagement<'_> {
    type CreateRequest = PaymentManagementCreateDBRequest;
    type UpdateRequest = PaymentManagementUpdateDBRequest;
    type Response = PaymentManagementDBResponse;
    type Filter = PaymentManagementFilter;

    #[instrument(skip(self, request), fields(cargo_id = request.cargo_id, amount = request.amount), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        ensure_referenced(&mut *self.db, RefTable::Cargos, "cargo_id", request.cargo_id).await?;
        ensure_referenced(&mut *self.db, RefTable::PaymentTypes, "payment_type_id", request.payment_type_id).await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO payment_management (cargo_id, payment_type_id, payer_details, amount, \
             card_transfer_receipt_image, check_image, check_due_date, transaction_date) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(request.cargo_id)
        .bind(request.payment_type_id)
        .bind(&request.payer_details)
        .bind(request.amount)
        .bind(&request.card_transfer_receipt_image)
        .bind(&request.check_image)
        .bind(&request.check_due_date)
        .bind(&request.transaction_date)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let record = sqlx::query_as(&format!("{SELECT} WHERE pm.id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(record)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT);
        if let Some(cargo_id) = filter.cargo_id {
            qb.push(" WHERE pm.cargo_id = ").push_bind(cargo_id);
        }
        qb.push(" ORDER BY pm.transaction_date DESC, pm.id DESC");

        let records = qb.build_query_as().fetch_all(&mut *self.db).await?;
        Ok(records)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        if let Some(cargo_id) = request.cargo_id {
            ensure_referenced(&mut *self.db, RefTable::Cargos, "cargo_id", cargo_id).await?;
        }
        if let Some(payment_type_id) = request.payment_type_id {
            ensure_referenced(&mut *self.db, RefTable::PaymentTypes, "payment_type_id", payment_type_id).await?;
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE payment_management SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(value) = request.cargo_id {
                fields.push("cargo_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.payment_type_id {
                fields.push("payment_type_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = &request.payer_details {
                fields.push("payer_details = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = request.amount {
                fields.push("amount = ").push_bind_unseparated(value);
            }
            if let Some(value) = &request.card_transfer_receipt_image {
                fields.push("card_transfer_receipt_image = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.check_image {
                fields.push("check_image = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.check_due_date {
                fields.push("check_due_date = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.transaction_date {
                fields.push("transaction_date = ").push_bind_unseparated(value.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "payment_management", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM payment_management WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;
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
    async fn payment_type_name_is_joined(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = PaymentManagement::new(&mut conn);

        let id = repo
            .create(&PaymentManagementCreateDBRequest {
                cargo_id,
                payment_type_id: parties.cash_payment_type_id,
                payer_details: Some("paid at office".to_string()),
                amount: 250.0,
                card_transfer_receipt_image: None,
                check_image: None,
                check_due_date: None,
                transaction_date: "2026-01-05 12:00:00".to_string(),
            })
            .await
            .unwrap();

        let record = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.payment_type_name.as_deref(), Some("Cash"));
        assert_eq!(record.origin.as_deref(), Some("Tehran"));
    }
}
