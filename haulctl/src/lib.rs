//! # haulctl: Accounting Backend for Freight Logistics
//!
//! `haulctl` tracks cargo shipments, the parties involved (drivers,
//! customers, shipping and selling companies), and the money flows around
//! them (payments, receivables, driver salary disbursements, expenses).
//! Every resource is exposed through the same REST-ish CRUD surface backed
//! by a relational schema.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses SQLite (via sqlx) for persistence. Migrations run
//! automatically on startup, including one-time seeding of the payment-type
//! lookup table.
//!
//! ### Request Flow
//!
//! Each resource lives on a single path and dispatches on the verb: GET
//! reads (single record via `?id=`, full list otherwise, both shaped by the
//! resource's join profile), POST creates, PUT applies a typed partial
//! update, DELETE removes - blocked with a 409 while dependent rows still
//! reference the record. Handlers validate, then open a transaction around
//! the foreign-key probes and the mutation so the check-then-act sequence is
//! atomic, and map database constraint violations onto the HTTP error
//! taxonomy (400/404/409/500, always a JSON `{"message"}` envelope).
//!
//! The **database layer** ([`db`]) uses the repository pattern: each table
//! has a repository struct over a `&mut SqliteConnection` implementing the
//! [`db::handlers::Repository`] trait. The **API layer** ([`api`]) holds the
//! axum handlers and their request/response DTOs.
//!
//! Image uploads are a side-channel: `POST /upload` validates and stores a
//! file, returning the URL that clients later write into image/receipt
//! fields; the files are served back under `/uploads/`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use haulctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = haulctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     haulctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod password;
pub mod sanitize;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, Method, header},
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::openapi::ApiDoc;

/// Application state shared across all request handlers: the connection
/// pool and the loaded configuration. Cloned per request; connections are
/// acquired scoped to each call.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
}

/// Get the haulctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// CORS policy for the whole surface: any origin, the five CRUD verbs, and
/// the fixed request-header set. Preflight OPTIONS is answered here.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
}

/// Build the application router: one route per resource carrying all four
/// verbs, the upload side-channel, static serving of uploaded files, API
/// docs, CORS, and request tracing.
pub fn build_router(state: AppState) -> Router {
    use api::handlers::{
        bank_accounts, cargo_types, cargos, customers, driver_payments, drivers, expense_categories, expenses, payment_management,
        payment_types, payments, receivables, selling_companies, shipping_companies, uploads, vehicles,
    };

    let uploads_dir = state.config.uploads.dir.clone();
    // multipart framing overhead on top of the file itself
    let upload_body_limit = (state.config.uploads.max_file_size + 1024 * 1024) as usize;

    let resource_routes = Router::new()
        .route(
            "/vehicles",
            get(vehicles::read_vehicles)
                .post(vehicles::create_vehicle)
                .put(vehicles::update_vehicle)
                .delete(vehicles::delete_vehicle),
        )
        .route(
            "/drivers",
            get(drivers::read_drivers).post(drivers::create_driver).put(drivers::update_driver).delete(drivers::delete_driver),
        )
        .route(
            "/customers",
            get(customers::read_customers)
                .post(customers::create_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route(
            "/cargo_types",
            get(cargo_types::read_cargo_types)
                .post(cargo_types::create_cargo_type)
                .put(cargo_types::update_cargo_type)
                .delete(cargo_types::delete_cargo_type),
        )
        .route(
            "/shipping_companies",
            get(shipping_companies::read_shipping_companies)
                .post(shipping_companies::create_shipping_company)
                .put(shipping_companies::update_shipping_company)
                .delete(shipping_companies::delete_shipping_company),
        )
        .route(
            "/cargo_selling_companies",
            get(selling_companies::read_selling_companies)
                .post(selling_companies::create_selling_company)
                .put(selling_companies::update_selling_company)
                .delete(selling_companies::delete_selling_company),
        )
        .route(
            "/bank_accounts",
            get(bank_accounts::read_bank_accounts)
                .post(bank_accounts::create_bank_account)
                .put(bank_accounts::update_bank_account)
                .delete(bank_accounts::delete_bank_account),
        )
        .route(
            "/payment_types",
            get(payment_types::read_payment_types)
                .post(payment_types::create_payment_type)
                .put(payment_types::update_payment_type)
                .delete(payment_types::delete_payment_type),
        )
        .route(
            "/expense_categories",
            get(expense_categories::read_expense_categories)
                .post(expense_categories::create_expense_category)
                .put(expense_categories::update_expense_category)
                .delete(expense_categories::delete_expense_category),
        )
        .route(
            "/cargos",
            get(cargos::read_cargos).post(cargos::create_cargo).put(cargos::update_cargo).delete(cargos::delete_cargo),
        )
        .route(
            "/payments",
            get(payments::read_payments)
                .post(payments::create_payment)
                .put(payments::update_payment)
                .delete(payments::delete_payment),
        )
        .route(
            "/receivables",
            get(receivables::read_receivables)
                .post(receivables::create_receivable)
                .put(receivables::update_receivable)
                .delete(receivables::delete_receivable),
        )
        .route(
            "/payment_management",
            get(payment_management::read_payment_management)
                .post(payment_management::create_payment_management)
                .put(payment_management::update_payment_management)
                .delete(payment_management::delete_payment_management),
        )
        .route(
            "/driver_payments",
            get(driver_payments::read_driver_payments)
                .post(driver_payments::create_driver_payment)
                .put(driver_payments::update_driver_payment)
                .delete(driver_payments::delete_driver_payment),
        )
        .route(
            "/expenses",
            get(expenses::read_expenses)
                .post(expenses::create_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        )
        .route(
            "/upload",
            post(uploads::upload_image).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .with_state(state);

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(resource_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(create_cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] opens the pool and runs migrations
/// 2. **Serve**: [`Application::serve`] binds the TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: SqlitePool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = db::connect(&config.database.url, config.database.max_connections).await?;
        migrator().run(&pool).await?;

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state);

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("Haul control layer listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
