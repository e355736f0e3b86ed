//! API request/response models for cargos.

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::models::{require, require_text},
    db::models::cargos::{CargoCreateDBRequest, CargoDBResponse, CargoUpdateDBRequest},
    errors::Error,
    sanitize,
    types::{BankAccountId, CargoId, CargoTypeId, CustomerId, DriverId, PaymentTypeId, SellingCompanyId, ShippingCompanyId, VehicleId},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct CargoQuery {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CargoCreate {
    pub vehicle_id: Option<VehicleId>,
    pub driver_id: Option<DriverId>,
    pub cargo_type_id: Option<CargoTypeId>,
    pub customer_id: Option<CustomerId>,
    pub shipping_company_id: Option<ShippingCompanyId>,
    pub selling_company_id: Option<SellingCompanyId>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub loading_date: Option<String>,
    pub unloading_date: Option<String>,
    pub weight_tonnes: Option<f64>,
    pub price_per_tonne: Option<f64>,
    pub transport_cost_per_tonne: Option<f64>,
    /// Defaults to the "Not Received" payment type when absent
    pub customer_payment_status_id: Option<PaymentTypeId>,
    /// Defaults to false
    pub seller_payment_status: Option<bool>,
    pub waybill_amount: Option<f64>,
    pub waybill_image: Option<String>,
    pub customer_bank_account_id: Option<BankAccountId>,
}

impl TryFrom<CargoCreate> for CargoCreateDBRequest {
    type Error = Error;

    fn try_from(create: CargoCreate) -> Result<Self, Error> {
        let vehicle_id = require("vehicle_id", create.vehicle_id)?;
        let driver_id = require("driver_id", create.driver_id)?;
        let cargo_type_id = require("cargo_type_id", create.cargo_type_id)?;
        let customer_id = require("customer_id", create.customer_id)?;
        let shipping_company_id = require("shipping_company_id", create.shipping_company_id)?;
        let selling_company_id = require("selling_company_id", create.selling_company_id)?;
        let origin = require_text("origin", create.origin)?;
        let destination = require_text("destination", create.destination)?;
        let weight_tonnes = require("weight_tonnes", create.weight_tonnes)?;
        let price_per_tonne = require("price_per_tonne", create.price_per_tonne)?;
        let transport_cost_per_tonne = require("transport_cost_per_tonne", create.transport_cost_per_tonne)?;

        Ok(Self {
            vehicle_id,
            driver_id,
            cargo_type_id,
            customer_id,
            shipping_company_id,
            selling_company_id,
            origin: sanitize::clean_text(&origin),
            destination: sanitize::clean_text(&destination),
            loading_date: sanitize::clean_opt(create.loading_date),
            unloading_date: sanitize::clean_opt(create.unloading_date),
            weight_tonnes,
            price_per_tonne,
            transport_cost_per_tonne,
            customer_payment_status_id: create.customer_payment_status_id,
            seller_payment_status: create.seller_payment_status.unwrap_or(false),
            waybill_amount: create.waybill_amount,
            waybill_image: sanitize::clean_opt(create.waybill_image),
            customer_bank_account_id: create.customer_bank_account_id,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CargoUpdate {
    pub vehicle_id: Option<VehicleId>,
    pub driver_id: Option<DriverId>,
    pub cargo_type_id: Option<CargoTypeId>,
    pub customer_id: Option<CustomerId>,
    pub shipping_company_id: Option<ShippingCompanyId>,
    pub selling_company_id: Option<SellingCompanyId>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub loading_date: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub unloading_date: Option<Option<String>>,
    pub weight_tonnes: Option<f64>,
    pub price_per_tonne: Option<f64>,
    pub transport_cost_per_tonne: Option<f64>,
    pub customer_payment_status_id: Option<PaymentTypeId>,
    pub seller_payment_status: Option<bool>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub waybill_amount: Option<Option<f64>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub waybill_image: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub customer_bank_account_id: Option<Option<BankAccountId>>,
}

impl CargoUpdate {
    pub fn is_empty(&self) -> bool {
        self.vehicle_id.is_none()
            && self.driver_id.is_none()
            && self.cargo_type_id.is_none()
            && self.customer_id.is_none()
            && self.shipping_company_id.is_none()
            && self.selling_company_id.is_none()
            && self.origin.is_none()
            && self.destination.is_none()
            && self.loading_date.is_none()
            && self.unloading_date.is_none()
            && self.weight_tonnes.is_none()
            && self.price_per_tonne.is_none()
            && self.transport_cost_per_tonne.is_none()
            && self.customer_payment_status_id.is_none()
            && self.seller_payment_status.is_none()
            && self.waybill_amount.is_none()
            && self.waybill_image.is_none()
            && self.customer_bank_account_id.is_none()
    }
}

impl From<CargoUpdate> for CargoUpdateDBRequest {
    fn from(update: CargoUpdate) -> Self {
        Self {
            vehicle_id: update.vehicle_id,
            driver_id: update.driver_id,
            cargo_type_id: update.cargo_type_id,
            customer_id: update.customer_id,
            shipping_company_id: update.shipping_company_id,
            selling_company_id: update.selling_company_id,
            origin: update.origin.map(|v| sanitize::clean_text(&v)),
            destination: update.destination.map(|v| sanitize::clean_text(&v)),
            loading_date: update.loading_date.map(sanitize::clean_opt),
            unloading_date: update.unloading_date.map(sanitize::clean_opt),
            weight_tonnes: update.weight_tonnes,
            price_per_tonne: update.price_per_tonne,
            transport_cost_per_tonne: update.transport_cost_per_tonne,
            customer_payment_status_id: update.customer_payment_status_id,
            seller_payment_status: update.seller_payment_status,
            waybill_amount: update.waybill_amount,
            waybill_image: update.waybill_image.map(sanitize::clean_opt),
            customer_bank_account_id: update.customer_bank_account_id,
        }
    }
}

/// Full cargo read shape: raw columns, join profile, derived fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CargoResponse {
    pub id: CargoId,
    pub vehicle_id: VehicleId,
    pub driver_id: DriverId,
    pub cargo_type_id: CargoTypeId,
    pub customer_id: CustomerId,
    pub shipping_company_id: ShippingCompanyId,
    pub selling_company_id: SellingCompanyId,
    pub origin: String,
    pub destination: String,
    pub loading_date: Option<String>,
    pub unloading_date: Option<String>,
    pub weight_tonnes: f64,
    pub price_per_tonne: f64,
    pub transport_cost_per_tonne: f64,
    pub customer_payment_status_id: Option<PaymentTypeId>,
    pub seller_payment_status: bool,
    pub waybill_amount: Option<f64>,
    pub waybill_image: Option<String>,
    pub customer_bank_account_id: Option<BankAccountId>,
    pub vehicle_name: Option<String>,
    pub vehicle_smart_card: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub driver_salary_percentage: Option<f64>,
    pub cargo_type_name: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub shipping_company_name: Option<String>,
    pub selling_company_name: Option<String>,
    pub customer_payment_status_name: Option<String>,
    pub customer_bank_account_name: Option<String>,
    /// weight_tonnes * transport cost minus waybill, times the driver's
    /// salary percentage; null when the driver has none
    pub driver_income: Option<f64>,
    /// weight_tonnes * price_per_tonne
    pub total_payment_amount: f64,
}

impl From<CargoDBResponse> for CargoResponse {
    fn from(db: CargoDBResponse) -> Self {
        let row = db.row;
        Self {
            id: row.id,
            vehicle_id: row.vehicle_id,
            driver_id: row.driver_id,
            cargo_type_id: row.cargo_type_id,
            customer_id: row.customer_id,
            shipping_company_id: row.shipping_company_id,
            selling_company_id: row.selling_company_id,
            origin: row.origin,
            destination: row.destination,
            loading_date: row.loading_date,
            unloading_date: row.unloading_date,
            weight_tonnes: row.weight_tonnes,
            price_per_tonne: row.price_per_tonne,
            transport_cost_per_tonne: row.transport_cost_per_tonne,
            customer_payment_status_id: row.customer_payment_status_id,
            seller_payment_status: row.seller_payment_status,
            waybill_amount: row.waybill_amount,
            waybill_image: row.waybill_image,
            customer_bank_account_id: row.customer_bank_account_id,
            vehicle_name: row.vehicle_name,
            vehicle_smart_card: row.vehicle_smart_card,
            driver_name: row.driver_name,
            driver_phone: row.driver_phone,
            driver_salary_percentage: row.driver_salary_percentage,
            cargo_type_name: row.cargo_type_name,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            shipping_company_name: row.shipping_company_name,
            selling_company_name: row.selling_company_name,
            customer_payment_status_name: row.customer_payment_status_name,
            customer_bank_account_name: row.customer_bank_account_name,
            driver_income: db.driver_income,
            total_payment_amount: db.total_payment_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_missing_field_is_named_in_declaration_order() {
        let create = CargoCreate {
            vehicle_id: Some(1),
            driver_id: None,
            cargo_type_id: None,
            customer_id: None,
            shipping_company_id: None,
            selling_company_id: None,
            origin: None,
            destination: None,
            loading_date: None,
            unloading_date: None,
            weight_tonnes: None,
            price_per_tonne: None,
            transport_cost_per_tonne: None,
            customer_payment_status_id: None,
            seller_payment_status: None,
            waybill_amount: None,
            waybill_image: None,
            customer_bank_account_id: None,
        };
        let err = CargoCreateDBRequest::try_from(create).unwrap_err();
        assert_eq!(err.user_message(), "Missing required field: driver_id");
    }

    #[test]
    fn zero_weight_passes_the_required_check() {
        let create = CargoCreate {
            vehicle_id: Some(1),
            driver_id: Some(1),
            cargo_type_id: Some(1),
            customer_id: Some(1),
            shipping_company_id: Some(1),
            selling_company_id: Some(1),
            origin: Some("A".into()),
            destination: Some("B".into()),
            loading_date: None,
            unloading_date: None,
            weight_tonnes: Some(0.0),
            price_per_tonne: Some(10.0),
            transport_cost_per_tonne: Some(5.0),
            customer_payment_status_id: None,
            seller_payment_status: None,
            waybill_amount: None,
            waybill_image: None,
            customer_bank_account_id: None,
        };
        let request = CargoCreateDBRequest::try_from(create).unwrap();
        assert_eq!(request.weight_tonnes, 0.0);
        assert!(!request.seller_payment_status);
    }
}
