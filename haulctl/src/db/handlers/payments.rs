//! Database repository for payments.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::{
        RefTable, ensure_referenced,
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::payments::{PaymentCreateDBRequest, PaymentDBResponse, PaymentFilter, PaymentUpdateDBRequest},
};

const SELECT: &str = "\
    SELECT p.id, p.cargo_id, p.amount, p.company_id, p.bank_account_id, p.receipt_image, p.payment_date, \
           c.origin, c.destination, csc.name AS company_name, \
           ba.bank_name, ba.account_holder_name AS bank_account_holder \
    FROM payments p \
    LEFT JOIN cargos c ON p.cargo_id = c.id \
    LEFT JOIN cargo_selling_companies csc ON p.company_id = csc.id \
    LEFT JOIN bank_accounts ba ON p.bank_account_id = ba.id";

pub struct Payments<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Payments<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Payments<'_> {
    type CreateRequest = PaymentCreateDBRequest;
    type UpdateRequest = PaymentUpdateDBRequest;
    type Response = PaymentDBResponse;
    type Filter = PaymentFilter;

    #[instrument(skip(self, request), fields(cargo_id = request.cargo_id, amount = request.amount), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        ensure_referenced(&mut *self.db, RefTable::Cargos, "cargo_id", request.cargo_id).await?;
        ensure_referenced(&mut *self.db, RefTable::SellingCompanies, "company_id", request.company_id).await?;
        if let Some(bank_account_id) = request.bank_account_id {
            ensure_referenced(&mut *self.db, RefTable::BankAccounts, "bank_account_id", bank_account_id).await?;
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO payments (cargo_id, amount, company_id, bank_account_id, receipt_image, payment_date) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(request.cargo_id)
        .bind(request.amount)
        .bind(request.company_id)
        .bind(request.bank_account_id)
        .bind(&request.receipt_image)
        .bind(&request.payment_date)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let payment = sqlx::query_as(&format!("{SELECT} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(payment)
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT);
        if let Some(cargo_id) = filter.cargo_id {
            qb.push(" WHERE p.cargo_id = ").push_bind(cargo_id);
        }
        qb.push(" ORDER BY p.payment_date DESC, p.id DESC");

        let payments = qb.build_query_as().fetch_all(&mut *self.db).await?;
        Ok(payments)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        if let Some(cargo_id) = request.cargo_id {
            ensure_referenced(&mut *self.db, RefTable::Cargos, "cargo_id", cargo_id).await?;
        }
        if let Some(company_id) = request.company_id {
            ensure_referenced(&mut *self.db, RefTable::SellingCompanies, "company_id", company_id).await?;
        }
        if let Some(Some(bank_account_id)) = request.bank_account_id {
            ensure_referenced(&mut *self.db, RefTable::BankAccounts, "bank_account_id", bank_account_id).await?;
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE payments SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(value) = request.cargo_id {
                fields.push("cargo_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.amount {
                fields.push("amount = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.company_id {
                fields.push("company_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = &request.bank_account_id {
                fields.push("bank_account_id = ").push_bind_unseparated(*value);
            }
            if let Some(value) = &request.receipt_image {
                fields.push("receipt_image = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.payment_date {
                fields.push("payment_date = ").push_bind_unseparated(value.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "payments", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    // No dependent tables; delete is unconditional once the id matches.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?").bind(id).execute(&mut *self.db).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use crate::test_utils::fixtures;
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn create_requires_an_existing_cargo(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Payments::new(&mut conn);

        let err = repo
            .create(&PaymentCreateDBRequest {
                cargo_id: 777,
                amount: 100.0,
                company_id: parties.selling_company_id,
                bank_account_id: None,
                receipt_image: None,
                payment_date: "2026-01-10 09:00:00".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn list_filters_by_cargo_and_orders_by_date(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let first_cargo = fixtures::seed_cargo(&pool, &parties).await;
        let second_cargo = fixtures::seed_cargo(&pool, &parties).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Payments::new(&mut conn);

        for (cargo_id, date) in [
            (first_cargo, "2026-01-10 09:00:00"),
            (first_cargo, "2026-02-15 09:00:00"),
            (second_cargo, "2026-03-01 09:00:00"),
        ] {
            repo.create(&PaymentCreateDBRequest {
                cargo_id,
                amount: 50.0,
                company_id: parties.selling_company_id,
                bank_account_id: None,
                receipt_image: None,
                payment_date: date.to_string(),
            })
            .await
            .unwrap();
        }

        let filtered = repo
            .list(&PaymentFilter {
                cargo_id: Some(first_cargo),
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].payment_date, "2026-02-15 09:00:00");

        let all = repo.list(&PaymentFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].payment_date, "2026-03-01 09:00:00");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn join_profile_resolves_company_and_route(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;
        let payment_id = fixtures::seed_payment(&pool, cargo_id, parties.selling_company_id).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Payments::new(&mut conn);

        let payment = repo.get_by_id(payment_id).await.unwrap().unwrap();
        assert_eq!(payment.company_name.as_deref(), Some("GrainCo"));
        assert_eq!(payment.origin.as_deref(), Some("Tehran"));
        assert_eq!(payment.destination.as_deref(), Some("Bandar Abbas"));
    }
}
