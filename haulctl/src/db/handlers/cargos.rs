//! Database repository for cargos.
//!
//! Reads resolve the full join profile (names from eight lookup tables) and
//! feed [`CargoDBResponse`], which recomputes the derived money fields.
//! Deletes probe every dependent ledger table first and refuse while any
//! row still references the cargo.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::{DbError, Result},
    handlers::{
        PaymentTypes, RefTable, ensure_referenced,
        repository::{Repository, UpdateOutcome},
        row_exists,
    },
    models::cargos::{CargoCreateDBRequest, CargoDBResponse, CargoRow, CargoUpdateDBRequest},
};

/// Ledger tables holding rows that block a cargo delete.
const DEPENDENT_TABLES: &[&str] = &["payments", "receivables", "payment_management", "driver_payments", "expenses"];

const SELECT: &str = "\
    SELECT c.id, c.vehicle_id, c.driver_id, c.cargo_type_id, c.customer_id, c.shipping_company_id, \
           c.selling_company_id, c.origin, c.destination, c.loading_date, c.unloading_date, \
           c.weight_tonnes, c.price_per_tonne, c.transport_cost_per_tonne, c.customer_payment_status_id, \
           c.seller_payment_status, c.waybill_amount, c.waybill_image, c.customer_bank_account_id, \
           v.name AS vehicle_name, v.smart_card_number AS vehicle_smart_card, \
           d.first_name || ' ' || d.last_name AS driver_name, d.phone_number AS driver_phone, \
           d.salary_percentage AS driver_salary_percentage, \
           ct.name AS cargo_type_name, \
           cust.first_name || ' ' || cust.last_name AS customer_name, cust.phone_number AS customer_phone, \
           sc.name AS shipping_company_name, csc.name AS selling_company_name, \
           pt.name AS customer_payment_status_name, \
           ba.bank_name || ' - ' || ba.account_holder_name AS customer_bank_account_name \
    FROM cargos c \
    LEFT JOIN vehicles v ON c.vehicle_id = v.id \
    LEFT JOIN drivers d ON c.driver_id = d.id \
    LEFT JOIN cargo_types ct ON c.cargo_type_id = ct.id \
    LEFT JOIN customers cust ON c.customer_id = cust.id \
    LEFT JOIN shipping_companies sc ON c.shipping_company_id = sc.id \
    LEFT JOIN cargo_selling_companies csc ON c.selling_company_id = csc.id \
    LEFT JOIN payment_types pt ON c.customer_payment_status_id = pt.id \
    LEFT JOIN bank_accounts ba ON c.customer_bank_account_id = ba.id";

pub struct Cargos<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Cargos<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    async fn check_required_references(&mut self, request: &CargoCreateDBRequest) -> Result<()> {
        ensure_referenced(&mut *self.db, RefTable::Vehicles, "vehicle_id", request.vehicle_id).await?;
        ensure_referenced(&mut *self.db, RefTable::Drivers, "driver_id", request.driver_id).await?;
        ensure_referenced(&mut *self.db, RefTable::CargoTypes, "cargo_type_id", request.cargo_type_id).await?;
        ensure_referenced(&mut *self.db, RefTable::Customers, "customer_id", request.customer_id).await?;
        ensure_referenced(&mut *self.db, RefTable::ShippingCompanies, "shipping_company_id", request.shipping_company_id).await?;
        ensure_referenced(&mut *self.db, RefTable::SellingCompanies, "selling_company_id", request.selling_company_id).await?;
        Ok(())
    }

    /// First dependent table (if any) still referencing this cargo.
    #[instrument(skip(self), err)]
    pub async fn blocking_dependent(&mut self, id: i64) -> Result<Option<&'static str>> {
        for table in DEPENDENT_TABLES {
            let found: i64 = sqlx::query_scalar(&format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE cargo_id = ?)"))
                .bind(id)
                .fetch_one(&mut *self.db)
                .await?;
            if found != 0 {
                return Ok(Some(table));
            }
        }
        Ok(None)
    }
}

#[async_trait::async_trait]
impl Repository for Cargos<'_> {
    type CreateRequest = CargoCreateDBRequest;
    type UpdateRequest = CargoUpdateDBRequest;
    type Response = CargoDBResponse;
    type Filter = ();

    #[instrument(skip(self, request), fields(origin = %request.origin, destination = %request.destination), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<i64> {
        self.check_required_references(request).await?;
        if let Some(status_id) = request.customer_payment_status_id {
            ensure_referenced(&mut *self.db, RefTable::PaymentTypes, "customer_payment_status_id", status_id).await?;
        }
        if let Some(bank_account_id) = request.customer_bank_account_id {
            ensure_referenced(&mut *self.db, RefTable::BankAccounts, "customer_bank_account_id", bank_account_id).await?;
        }

        let customer_payment_status_id = match request.customer_payment_status_id {
            Some(id) => id,
            None => PaymentTypes::new(&mut *self.db).default_status_id().await?,
        };

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO cargos (vehicle_id, driver_id, cargo_type_id, customer_id, shipping_company_id, selling_company_id, \
             origin, destination, loading_date, unloading_date, weight_tonnes, price_per_tonne, transport_cost_per_tonne, \
             customer_payment_status_id, seller_payment_status, waybill_amount, waybill_image, customer_bank_account_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(request.vehicle_id)
        .bind(request.driver_id)
        .bind(request.cargo_type_id)
        .bind(request.customer_id)
        .bind(request.shipping_company_id)
        .bind(request.selling_company_id)
        .bind(&request.origin)
        .bind(&request.destination)
        .bind(&request.loading_date)
        .bind(&request.unloading_date)
        .bind(request.weight_tonnes)
        .bind(request.price_per_tonne)
        .bind(request.transport_cost_per_tonne)
        .bind(customer_payment_status_id)
        .bind(request.seller_payment_status)
        .bind(request.waybill_amount)
        .bind(&request.waybill_image)
        .bind(request.customer_bank_account_id)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: i64) -> Result<Option<Self::Response>> {
        let row: Option<CargoRow> = sqlx::query_as(&format!("{SELECT} WHERE c.id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(row.map(CargoDBResponse::from))
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self, _filter: &()) -> Result<Vec<Self::Response>> {
        let rows: Vec<CargoRow> = sqlx::query_as(&format!("{SELECT} ORDER BY c.loading_date DESC, c.id DESC"))
            .fetch_all(&mut *self.db)
            .await?;
        Ok(rows.into_iter().map(CargoDBResponse::from).collect())
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: i64, request: &Self::UpdateRequest) -> Result<UpdateOutcome> {
        if let Some(vehicle_id) = request.vehicle_id {
            ensure_referenced(&mut *self.db, RefTable::Vehicles, "vehicle_id", vehicle_id).await?;
        }
        if let Some(driver_id) = request.driver_id {
            ensure_referenced(&mut *self.db, RefTable::Drivers, "driver_id", driver_id).await?;
        }
        if let Some(cargo_type_id) = request.cargo_type_id {
            ensure_referenced(&mut *self.db, RefTable::CargoTypes, "cargo_type_id", cargo_type_id).await?;
        }
        if let Some(customer_id) = request.customer_id {
            ensure_referenced(&mut *self.db, RefTable::Customers, "customer_id", customer_id).await?;
        }
        if let Some(shipping_company_id) = request.shipping_company_id {
            ensure_referenced(&mut *self.db, RefTable::ShippingCompanies, "shipping_company_id", shipping_company_id).await?;
        }
        if let Some(selling_company_id) = request.selling_company_id {
            ensure_referenced(&mut *self.db, RefTable::SellingCompanies, "selling_company_id", selling_company_id).await?;
        }
        if let Some(status_id) = request.customer_payment_status_id {
            ensure_referenced(&mut *self.db, RefTable::PaymentTypes, "customer_payment_status_id", status_id).await?;
        }
        if let Some(Some(bank_account_id)) = request.customer_bank_account_id {
            ensure_referenced(&mut *self.db, RefTable::BankAccounts, "customer_bank_account_id", bank_account_id).await?;
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE cargos SET ");
        {
            let mut fields = qb.separated(", ");
            if let Some(value) = request.vehicle_id {
                fields.push("vehicle_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.driver_id {
                fields.push("driver_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.cargo_type_id {
                fields.push("cargo_type_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.customer_id {
                fields.push("customer_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.shipping_company_id {
                fields.push("shipping_company_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.selling_company_id {
                fields.push("selling_company_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = &request.origin {
                fields.push("origin = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.destination {
                fields.push("destination = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.loading_date {
                fields.push("loading_date = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.unloading_date {
                fields.push("unloading_date = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = request.weight_tonnes {
                fields.push("weight_tonnes = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.price_per_tonne {
                fields.push("price_per_tonne = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.transport_cost_per_tonne {
                fields.push("transport_cost_per_tonne = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.customer_payment_status_id {
                fields.push("customer_payment_status_id = ").push_bind_unseparated(value);
            }
            if let Some(value) = request.seller_payment_status {
                fields.push("seller_payment_status = ").push_bind_unseparated(value);
            }
            if let Some(value) = &request.waybill_amount {
                fields.push("waybill_amount = ").push_bind_unseparated(*value);
            }
            if let Some(value) = &request.waybill_image {
                fields.push("waybill_image = ").push_bind_unseparated(value.clone());
            }
            if let Some(value) = &request.customer_bank_account_id {
                fields.push("customer_bank_account_id = ").push_bind_unseparated(*value);
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&mut *self.db).await?;
        if result.rows_affected() > 0 {
            Ok(UpdateOutcome::Changed)
        } else if row_exists(&mut *self.db, "cargos", id).await? {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    /// Delete refuses while dependents exist; the caller turns the
    /// [`DbError::ForeignKeyViolation`] into a 409 naming the table.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: i64) -> Result<bool> {
        if let Some(table) = self.blocking_dependent(id).await? {
            return Err(DbError::ForeignKeyViolation {
                message: format!("Cannot delete cargo because it is referenced in the '{table}' table. Delete related records first."),
            });
        }

        let result = sqlx::query("DELETE FROM cargos WHERE id = ?").bind(id).execute(&mut *self.db).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::Repository;
    use crate::test_utils::fixtures;
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn create_rejects_a_dangling_vehicle(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Cargos::new(&mut conn);

        let mut request = fixtures::cargo_request(&parties);
        request.vehicle_id = 9999;
        let err = repo.create(&request).await.unwrap_err();
        match err {
            DbError::ForeignKeyViolation { message } => assert!(message.contains("vehicle_id")),
            other => panic!("expected FK violation, got {other:?}"),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn payment_status_defaults_to_not_received(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Cargos::new(&mut conn);

        let mut request = fixtures::cargo_request(&parties);
        request.customer_payment_status_id = None;
        let id = repo.create(&request).await.unwrap();

        let cargo = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(cargo.row.customer_payment_status_name.as_deref(), Some("Not Received"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn join_profile_resolves_names(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Cargos::new(&mut conn);

        let id = repo.create(&fixtures::cargo_request(&parties)).await.unwrap();
        let cargo = repo.get_by_id(id).await.unwrap().unwrap();

        assert_eq!(cargo.row.vehicle_name.as_deref(), Some("Volvo FH16"));
        assert_eq!(cargo.row.driver_name.as_deref(), Some("Hassan Karimi"));
        assert_eq!(cargo.row.customer_name.as_deref(), Some("Ali Ahmadi"));
        assert_eq!(cargo.row.cargo_type_name.as_deref(), Some("Wheat"));
        assert_eq!(cargo.row.shipping_company_name.as_deref(), Some("FastFreight"));
        assert_eq!(cargo.row.selling_company_name.as_deref(), Some("GrainCo"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn derived_fields_are_computed_on_read(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Cargos::new(&mut conn);

        // driver salary 20%, weight 10t, transport cost 100, waybill 200
        let mut request = fixtures::cargo_request(&parties);
        request.weight_tonnes = 10.0;
        request.price_per_tonne = 500.0;
        request.transport_cost_per_tonne = 100.0;
        request.waybill_amount = Some(200.0);
        let id = repo.create(&request).await.unwrap();

        let cargo = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(cargo.total_payment_amount, 5000.0);
        assert_eq!(cargo.driver_income, Some(160.0));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn delete_is_blocked_by_a_payment(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;
        fixtures::seed_payment(&pool, cargo_id, parties.selling_company_id).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Cargos::new(&mut conn);

        let err = repo.delete(cargo_id).await.unwrap_err();
        match err {
            DbError::ForeignKeyViolation { message } => assert!(message.contains("payments")),
            other => panic!("expected dependency conflict, got {other:?}"),
        }

        // both rows intact
        assert!(repo.get_by_id(cargo_id).await.unwrap().is_some());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn delete_without_dependents_succeeds(pool: SqlitePool) {
        let parties = fixtures::seed_parties(&pool).await;
        let cargo_id = fixtures::seed_cargo(&pool, &parties).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Cargos::new(&mut conn);

        assert!(repo.delete(cargo_id).await.unwrap());
        assert!(repo.get_by_id(cargo_id).await.unwrap().is_none());
    }
}
