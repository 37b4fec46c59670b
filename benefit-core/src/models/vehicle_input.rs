use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Propulsion;

/// Immutable description of one vehicle option.
///
/// Built by an external collaborator (a form, a vehicle-lookup mapper, a CSV
/// loader). The calculators only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleInput {
    /// List price used for the benefit value.
    pub purchase_price: Decimal,
    /// Price actually paid; drives leasing and financing math.
    pub actual_price: Decimal,

    pub is_electric: bool,
    pub is_plugin_hybrid: bool,
    /// Only meaningful for plug-in hybrids.
    pub electric_range_km: Option<Decimal>,

    pub registered_after_cutoff_date: bool,
    pub vehicle_tax_annual: Decimal,
    pub extra_equipment_value: Decimal,
    pub service_distance_km_per_year: Decimal,

    // Financing
    pub is_leasing: bool,
    pub interest_rate_percent: Decimal,
    pub leasing_period_months: i32,
    pub residual_value_percent: Decimal,
    /// Externally supplied lease cost. Used as-is when present.
    pub annual_leasing_cost: Option<Decimal>,
    pub insurance_included_in_lease: bool,
    pub maintenance_included_in_lease: bool,

    /// Personal annual driving distance.
    pub annual_distance_km: Decimal,
}

impl VehicleInput {
    pub fn propulsion(&self) -> Propulsion {
        Propulsion::from_flags(self.is_electric, self.is_plugin_hybrid)
    }
}

impl Default for VehicleInput {
    fn default() -> Self {
        Self {
            purchase_price: Decimal::ZERO,
            actual_price: Decimal::ZERO,
            is_electric: false,
            is_plugin_hybrid: false,
            electric_range_km: None,
            registered_after_cutoff_date: true,
            vehicle_tax_annual: Decimal::ZERO,
            extra_equipment_value: Decimal::ZERO,
            service_distance_km_per_year: Decimal::ZERO,
            is_leasing: false,
            interest_rate_percent: Decimal::ZERO,
            leasing_period_months: 36,
            residual_value_percent: Decimal::ZERO,
            annual_leasing_cost: None,
            insurance_included_in_lease: false,
            maintenance_included_in_lease: false,
            annual_distance_km: Decimal::ZERO,
        }
    }
}
