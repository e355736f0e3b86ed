//! Database repository for driver salary disbursements.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        RefTable, ensure_referenced,
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::driver_payments::{DriverPaymentCreateDBRequest, DriverPaymentDBResponse, DriverPaymentFilter, DriverPaymentUpdateDBRequest},
};

const SELECT: &str = "\
    SELECT dp.id, dp.cargo_id, dp.driver_id, dp.amount, dp.payment_date, dp.receipt_image, dp.bank_account_id, dp.notes, \
           c.origin, c.destination, c.loading_date, c.weight_tonnes, \
           d.first_name || ' ' || d.last_name AS driver_name, d.phone_number AS driver_phone, \
           ba.bank_name || ' - ' || ba.account_holder_name AS bank_account_name \
    FROM driver_payments dp \
    LEFT JOIN cargos c ON dp.cargo_id = c.id \
    LEFT JOIN drivers d ON dp.driver_id = d.id \
    LEFT JOIN bank_accounts ba ON dp.bank_account_id = ba.id";

pub struct DriverPayments<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> DriverPayments<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for DriverPayments<'_> {
    type CreateRequest = DriverPaymentCreateDBRequest;
    type UpdateRequest = DriverPaymentUpdateDBRequest;
    type Response = DriverPaymentDBResponse;
    type Filter = DriverPaymentFilter;

    #[instrument(skip(self, request), fields(cargo_id = request.cargo_id, driver_id = request.driver_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        ensure_referenced(&mut *self.db, RefTable::Cargos, "cargo_id", request.cargo_id).await?;
        ensure_referenced(&mut *self.db, RefTable::Drivers, "driver_id", request.driver_id).await?;
        if let Some(bank_account_id) = request.bank_account_id {
            ensure_referenced(&mut *self.db, RefTable::BankAccounts, "bank_account_id", bank_account_id).await?;
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO driver_payments (cargo_id, driver_id, amount, payment_date, receipt_image, bank_account_id, notes) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(request.cargo_id)
        .bind(request.driver_id)
        .bind(request.amount)
        .bind(&request.payment_date)
        .bind(&request.receipt_image)
        .bind(request.bank_account_id)
        .bind(&request.notes)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let record = sqlx::query_as(&format!("{SELECT} WHERE dp.id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(record)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT);
        let mut prefix = " WHERE ";
        if let Some(cargo_id) = filter.cargo_id {
            qb.push(prefix).push("dp.cargo_id = ").push_bind(cargo_id);
            prefix = " AND ";
        }
        if let Some(driver_id) = filter.driver_id {
            qb.push(prefix).push("dp.driver_id = ").push_bind(driver_id);
        }
        qb.push(" ORDER BY dp.payment_date DESC, dp.id DESC");

        let records = qb.build_query_as().fetch_all(&mut *self.db).await?;
        Ok(records)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        if let Some(cargo_id) = request.cargo_id {
            ensure_referenced(&mut *self.db, RefTable::Cargos, "cargo_id", cargo_id).await?;
        }
        if let Some(driver_id) = request.driver_id {
            ensure_referenced(&mut *self.db, RefTable::Drivers, "driver_id", driver_id).await?;
        }
        if let Some(Some(bank_account_id)) = request.bank_account_id {
            ensure_referenced(&mut *self.db, RefTable::BankAccounts, "bank_account_id", bank_account_id).await?;
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE driver_payments SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(value) = request.cargo_id {
                fields.push("cargo_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.driver_id {
                fields.push("driver_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.amount {
                fields.push("amount = ").push_bind_unseparated(value);
            }
            if let Some(value) = &request.payment_date {
                fields.push("payment_date = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.receipt_image {
                fields.push("receipt_image = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.bank_account_id {
                fields.push("bank_account_id = ").push_bind_unseparated(*value);
            }
            if let Some(value) = &request.notes {
                fields.push("notes = ").push_bind_unseparated(value.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "driver_payments", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM driver_payments WHERE id = ?")
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
    async fn driver_filter_narrows_the_list(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;
        let second_driver = fixtures::seed_driver(&pool, "Ali", "Ahmadi").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = DriverPayments::new(&mut conn);

        for driver_id in [parties.driver_id, second_driver] {
            repo.create(&DriverPaymentCreateDBRequest {
                cargo_id,
                driver_id,
                amount: 120.0,
                payment_date: "2026-01-20 08:00:00".to_string(),
                receipt_image: None,
                bank_account_id: None,
                notes: None,
            })
            .await
            .unwrap();
        }

        let only_second = repo
            .list(&DriverPaymentFilter {
                driver_id: Some(second_driver),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(only_second.len(), 1);
        assert_eq!(only_second[0].driver_name.as_deref(), Some("Ali Ahmadi"));
        assert_eq!(only_second[0].weight_tonnes, Some(10.0));
    }
}
