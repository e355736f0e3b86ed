//! Database models for cargos.
//!
//! The read shape is the widest in the system: raw columns, the join
//! profile resolved from eight lookup tables, and two derived money fields
//! recomputed on every read (never stored).

use sqlx::FromRow;

use crate::types::{
    BankAccountId, CargoId, CargoTypeId, CustomerId, DriverId, PaymentTypeId, SellingCompanyId, ShippingCompanyId, VehicleId,
};

#[derive(Debug, Clone)]
pub struct CargoCreateDBRequest {
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
    /// None = resolve the default ("Not Received") at create time.
    pub customer_payment_status_id: Option<PaymentTypeId>,
    pub seller_payment_status: bool,
    pub waybill_amount: Option<f64>,
    pub waybill_image: Option<String>,
    pub customer_bank_account_id: Option<BankAccountId>,
}

#[derive(Debug, Clone, Default)]
pub struct CargoUpdateDBRequest {
    pub vehicle_id: Option<VehicleId>,
    pub driver_id: Option<DriverId>,
    pub cargo_type_id: Option<CargoTypeId>,
    pub customer_id: Option<CustomerId>,
    pub shipping_company_id: Option<ShippingCompanyId>,
    pub selling_company_id: Option<SellingCompanyId>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub loading_date: Option<Option<String>>,
    pub unloading_date: Option<Option<String>>,
    pub weight_tonnes: Option<f64>,
    pub price_per_tonne: Option<f64>,
    pub transport_cost_per_tonne: Option<f64>,
    pub customer_payment_status_id: Option<PaymentTypeId>,
    pub seller_payment_status: Option<bool>,
    pub waybill_amount: Option<Option<f64>>,
    pub waybill_image: Option<Option<String>>,
    pub customer_bank_account_id: Option<Option<BankAccountId>>,
}

/// Raw row produced by the cargo read query: base columns plus the
/// left-outer join profile.
#[derive(Debug, Clone, FromRow)]
pub struct CargoRow {
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
}

/// Cargo read shape: the row plus derived fields.
#[derive(Debug, Clone)]
pub struct CargoDBResponse {
    pub row: CargoRow,
    pub total_payment_amount: f64,
    pub driver_income: Option<f64>,
}

impl From<CargoRow> for CargoDBResponse {
    fn from(row: CargoRow) -> Self {
        let total_payment_amount = row.weight_tonnes * row.price_per_tonne;
        let driver_income = driver_income(
            row.weight_tonnes,
            row.transport_cost_per_tonne,
            row.waybill_amount,
            row.driver_salary_percentage,
        );
        Self {
            row,
            total_payment_amount,
            driver_income,
        }
    }
}

/// Driver income for one cargo. A positive waybill amount is deducted from
/// gross transport revenue before the salary percentage is applied; without
/// a salary percentage there is no income figure.
pub fn driver_income(weight_tonnes: f64, transport_cost_per_tonne: f64, waybill_amount: Option<f64>, salary_percentage: Option<f64>) -> Option<f64> {
    let pct = salary_percentage?;
    let gross = weight_tonnes * transport_cost_per_tonne;
    let base = match waybill_amount {
        Some(waybill) if waybill > 0.0 => gross - waybill,
        _ => gross,
    };
    Some(base * pct / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waybill_is_deducted_before_the_percentage() {
        // (10 * 100 - 200) * 20 / 100 = 160
        assert_eq!(driver_income(10.0, 100.0, Some(200.0), Some(20.0)), Some(160.0));
    }

    #[test]
    fn non_positive_waybill_is_ignored() {
        assert_eq!(driver_income(10.0, 100.0, None, Some(20.0)), Some(200.0));
        assert_eq!(driver_income(10.0, 100.0, Some(0.0), Some(20.0)), Some(200.0));
        assert_eq!(driver_income(10.0, 100.0, Some(-5.0), Some(20.0)), Some(200.0));
    }

    #[test]
    fn no_salary_percentage_means_no_income() {
        assert_eq!(driver_income(10.0, 100.0, Some(200.0), None), None);
    }
}
