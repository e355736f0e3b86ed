//! OpenAPI documentation for the management API, served at `/docs`.

use utoipa::OpenApi;

use crate::api::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "haulctl",
        description = "Accounting backend for freight logistics: cargos, the parties involved, and the money flows around them."
    ),
    paths(
        handlers::vehicles::read_vehicles,
        handlers::vehicles::create_vehicle,
        handlers::vehicles::update_vehicle,
        handlers::vehicles::delete_vehicle,
        handlers::drivers::read_drivers,
        handlers::drivers::create_driver,
        handlers::drivers::update_driver,
        handlers::drivers::delete_driver,
        handlers::customers::read_customers,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::cargo_types::read_cargo_types,
        handlers::cargo_types::create_cargo_type,
        handlers::cargo_types::update_cargo_type,
        handlers::cargo_types::delete_cargo_type,
        handlers::shipping_companies::read_shipping_companies,
        handlers::shipping_companies::create_shipping_company,
        handlers::shipping_companies::update_shipping_company,
        handlers::shipping_companies::delete_shipping_company,
        handlers::selling_companies::read_selling_companies,
        handlers::selling_companies::create_selling_company,
        handlers::selling_companies::update_selling_company,
        handlers::selling_companies::delete_selling_company,
        handlers::bank_accounts::read_bank_accounts,
        handlers::bank_accounts::create_bank_account,
        handlers::bank_accounts::update_bank_account,
        handlers::bank_accounts::delete_bank_account,
        handlers::payment_types::read_payment_types,
        handlers::payment_types::create_payment_type,
        handlers::payment_types::update_payment_type,
        handlers::payment_types::delete_payment_type,
        handlers::expense_categories::read_expense_categories,
        handlers::expense_categories::create_expense_category,
        handlers::expense_categories::update_expense_category,
        handlers::expense_categories::delete_expense_category,
        handlers::cargos::read_cargos,
        handlers::cargos::create_cargo,
        handlers::cargos::update_cargo,
        handlers::cargos::delete_cargo,
        handlers::payments::read_payments,
        handlers::payments::create_payment,
        handlers::payments::update_payment,
        handlers::payments::delete_payment,
        handlers::receivables::read_receivables,
        handlers::receivables::create_receivable,
        handlers::receivables::update_receivable,
        handlers::receivables::delete_receivable,
        handlers::payment_management::read_payment_management,
        handlers::payment_management::create_payment_management,
        handlers::payment_management::update_payment_management,
        handlers::payment_management::delete_payment_management,
        handlers::driver_payments::read_driver_payments,
        handlers::driver_payments::create_driver_payment,
        handlers::driver_payments::update_driver_payment,
        handlers::driver_payments::delete_driver_payment,
        handlers::expenses::read_expenses,
        handlers::expenses::create_expense,
        handlers::expenses::update_expense,
        handlers::expenses::delete_expense,
        handlers::uploads::upload_image,
    )
)]
pub struct ApiDoc;
