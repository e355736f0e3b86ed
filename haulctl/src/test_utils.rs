//! Test-only constructors: an in-process test server over the real router,
//! and shared database fixtures.

use axum_test::TestServer;
use sqlx::SqlitePool;

use crate::{AppState, Config, build_router, password::Argon2Params};

/// Test server over a migrated pool (provided by `#[sqlx::test]`).
pub async fn create_test_app(pool: SqlitePool) -> TestServer {
    create_test_app_with_config(pool).await.0
}

/// Same, returning the generated config (for upload-directory assertions).
pub async fn create_test_app_with_config(pool: SqlitePool) -> (TestServer, Config) {
    let mut config = Config::default();
    config.uploads.dir = std::env::temp_dir().join(format!("haulctl-test-{}", uuid::Uuid::new_v4()));
    // small cap so the oversize test stays cheap
    config.uploads.max_file_size = 64 * 1024;
    // fast argon2 parameters; production defaults would dominate test time
    config.password = Argon2Params {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    };

    let state = AppState::builder().db(pool).config(config.clone()).build();
    let server = TestServer::new(build_router(state)).expect("Failed to create test server");
    (server, config)
}

pub mod fixtures {
    //! One row of every party a cargo references, seeded directly through
    //! the repositories.

    use sqlx::SqlitePool;

    use crate::db::{
        handlers::{
            BankAccounts, Cargos, Customers, Payments, Repository, SellingCompanies, ShippingCompanies, Vehicles,
        },
        models::{
            bank_accounts::BankAccountCreateDBRequest,
            cargos::CargoCreateDBRequest,
            customers::CustomerCreateDBRequest,
            payments::PaymentCreateDBRequest,
            selling_companies::SellingCompanyCreateDBRequest,
            shipping_companies::ShippingCompanyCreateDBRequest,
            vehicles::VehicleCreateDBRequest,
        },
    };

    pub struct Parties {
        pub vehicle_id: i64,
        pub driver_id: i64,
        pub cargo_type_id: i64,
        pub customer_id: i64,
        pub shipping_company_id: i64,
        pub selling_company_id: i64,
        pub bank_account_id: i64,
        pub expense_category_id: i64,
        pub cash_payment_type_id: i64,
    }

    /// Insert a driver with fast fixed hash data; salary percentage 20.
    pub async fn seed_driver(pool: &SqlitePool, first: &str, last: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO drivers (first_name, last_name, password_hash, salary_percentage) VALUES (?, ?, ?, 20.0) RETURNING id",
        )
        .bind(first)
        .bind(last)
        .bind("$argon2id$fixture$hash")
        .fetch_one(pool)
        .await
        .unwrap()
    }

    pub async fn seed_parties(pool: &SqlitePool) -> Parties {
        let mut conn = pool.acquire().await.unwrap();

        let vehicle_id = Vehicles::new(&mut conn)
            .create(&VehicleCreateDBRequest {
                name: "Volvo FH16".to_string(),
                smart_card_number: None,
                health_code: None,
            })
            .await
            .unwrap();

        let customer_id = Customers::new(&mut conn)
            .create(&CustomerCreateDBRequest {
                first_name: "Ali".to_string(),
                last_name: "Ahmadi".to_string(),
                phone_number: None,
            })
            .await
            .unwrap();

        let shipping_company_id = ShippingCompanies::new(&mut conn)
            .create(&ShippingCompanyCreateDBRequest {
                name: "FastFreight".to_string(),
                phone_number: None,
            })
            .await
            .unwrap();

        let selling_company_id = SellingCompanies::new(&mut conn)
            .create(&SellingCompanyCreateDBRequest {
                name: "GrainCo".to_string(),
                phone_number: None,
            })
            .await
            .unwrap();

        let bank_account_id = BankAccounts::new(&mut conn)
            .create(&BankAccountCreateDBRequest {
                bank_name: "Acme Bank".to_string(),
                account_holder_name: "J. Doe".to_string(),
                card_number: None,
                iban: None,
            })
            .await
            .unwrap();

        let cargo_type_id: i64 = sqlx::query_scalar("INSERT INTO cargo_types (name) VALUES ('Wheat') RETURNING id")
            .fetch_one(&mut *conn)
            .await
            .unwrap();

        let expense_category_id: i64 = sqlx::query_scalar("INSERT INTO expense_categories (name) VALUES ('Road') RETURNING id")
            .fetch_one(&mut *conn)
            .await
            .unwrap();

        let cash_payment_type_id: i64 = sqlx::query_scalar("SELECT id FROM payment_types WHERE name = 'Cash'")
            .fetch_one(&mut *conn)
            .await
            .unwrap();

        drop(conn);
        let driver_id = seed_driver(pool, "Hassan", "Karimi").await;

        Parties {
            vehicle_id,
            driver_id,
            cargo_type_id,
            customer_id,
            shipping_company_id,
            selling_company_id,
            bank_account_id,
            expense_category_id,
            cash_payment_type_id,
        }
    }

    /// A valid cargo create request for the seeded parties: Tehran to
    /// Bandar Abbas, 10 t at 500/t, transport cost 100/t.
    pub fn cargo_request(parties: &Parties) -> CargoCreateDBRequest {
        CargoCreateDBRequest {
            vehicle_id: parties.vehicle_id,
            driver_id: parties.driver_id,
            cargo_type_id: parties.cargo_type_id,
            customer_id: parties.customer_id,
            shipping_company_id: parties.shipping_company_id,
            selling_company_id: parties.selling_company_id,
            origin: "Tehran".to_string(),
            destination: "Bandar Abbas".to_string(),
            loading_date: Some("2026-01-01 08:00:00".to_string()),
            unloading_date: None,
            weight_tonnes: 10.0,
            price_per_tonne: 500.0,
            transport_cost_per_tonne: 100.0,
            customer_payment_status_id: None,
            seller_payment_status: false,
            waybill_amount: None,
            waybill_image: None,
            customer_bank_account_id: None,
        }
    }

    pub async fn seed_cargo(pool: &SqlitePool, parties: &Parties) -> i64 {
        let mut conn = pool.acquire().await.unwrap();
        Cargos::new(&mut conn).create(&cargo_request(parties)).await.unwrap()
    }

    pub async fn seed_payment(pool: &SqlitePool, cargo_id: i64, company_id: i64) -> i64 {
        let mut conn = pool.acquire().await.unwrap();
        Payments::new(&mut conn)
            .create(&PaymentCreateDBRequest {
                cargo_id,
                amount: 150.0,
                company_id,
                bank_account_id: None,
                receipt_image: None,
                payment_date: "2026-01-15 09:00:00".to_string(),
            })
            .await
            .unwrap()
    }
}
