//! Ownership cost of a vehicle seen from two stakeholders.
//!
//! The private total cost of ownership and the employer's budget-frame cost
//! use the same inputs but answer different questions, so they are kept as
//! two separate calculations with separate results.
//!
//! # Private Total Cost of Ownership
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Depreciation: purchase price × 20 % |
//! | 2    | Insurance: purchase price × 1.5 % |
//! | 3    | Maintenance: purchase price × 0.5 % |
//! | 4    | Fuel: annual distance × per-km rate by propulsion |
//! | 5    | Flat vehicle tax by propulsion |
//! | 6    | Total: round(lines 1–5) |
//!
//! # Employer Budget-Frame Cost
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Lease cost (× 0.9 when service distance ≥ 1 000 km) or depreciation |
//! | 2    | Insurance, unless included in the lease |
//! | 3    | Maintenance, unless included in the lease |
//! | 4    | Flat vehicle tax by propulsion |
//! | 5    | Operating cost: lines 1–4 (fuel is never charged to this budget) |
//! | 6    | Tax on benefit: benefit value × standard marginal rate |
//! | 7    | Gross for tax: line 6 / (1 − standard marginal rate) |
//! | 8    | Payroll overhead: line 7 × employer social fee rate |
//! | 9    | Total: round(lines 5 + 6 + 8) |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::round_whole;
use crate::models::VehicleInput;
use crate::rules::{RuleSetError, TaxRuleSet};

/// Errors that can occur during ownership cost calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OwnershipCostError {
    /// The rule set failed validation.
    #[error("invalid rule set: {0}")]
    InvalidRuleSet(#[from] RuleSetError),

    /// An input amount that must be non-negative was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// Breakdown of the private total cost of ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateOwnershipCost {
    pub depreciation: Decimal,
    pub insurance: Decimal,
    pub maintenance: Decimal,
    pub fuel: Decimal,
    pub vehicle_tax: Decimal,
    /// Sum of all lines, rounded to whole kronor.
    pub total_annual: Decimal,
}

/// Breakdown of the employer's budget-frame cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerCost {
    /// Lease cost after the VAT adjustment, when the lease branch applied.
    pub lease_cost: Option<Decimal>,

    /// Whether half of the lease VAT was reclaimed.
    pub vat_adjustment_applied: bool,

    /// Flat depreciation; zero when the lease branch applied.
    pub depreciation: Decimal,

    pub insurance: Decimal,
    pub maintenance: Decimal,
    pub vehicle_tax: Decimal,

    /// Car operating cost (lines 1–4). Not rounded.
    pub operating_cost: Decimal,

    /// Compensation for the employee's tax on the benefit value.
    pub tax_on_benefit: Decimal,

    /// Tax compensation grossed up to salary.
    pub gross_for_tax: Decimal,

    /// Employer social fees on the grossed-up compensation.
    pub payroll_overhead: Decimal,

    /// Total budget-frame cost in whole kronor.
    pub total_annual: Decimal,
}

/// Calculator for both ownership cost views.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use benefit_core::calculations::OwnershipCostCalculator;
/// use benefit_core::rules::sweden_2025;
/// use benefit_core::VehicleInput;
///
/// let rules = sweden_2025();
/// let calculator = OwnershipCostCalculator::new(&rules);
/// let vehicle = VehicleInput {
///     purchase_price: dec!(400000),
///     annual_distance_km: dec!(15000),
///     ..VehicleInput::default()
/// };
///
/// let private = calculator.private_total_cost(&vehicle).unwrap();
/// // 80 000 + 6 000 + 2 000 + 22 500 + 6 000
/// assert_eq!(private.total_annual, dec!(116500));
///
/// let employer = calculator.employer_cost(&vehicle, dec!(59842)).unwrap();
/// assert_eq!(employer.total_annual, dec!(142723));
/// ```
#[derive(Debug, Clone)]
pub struct OwnershipCostCalculator<'a> {
    rules: &'a TaxRuleSet,
}

impl<'a> OwnershipCostCalculator<'a> {
    pub fn new(rules: &'a TaxRuleSet) -> Self {
        Self { rules }
    }

    /// Calculates the private total cost of ownership.
    ///
    /// # Errors
    ///
    /// Returns [`OwnershipCostError`] if the rule set is invalid or the
    /// purchase price or annual distance is negative.
    pub fn private_total_cost(
        &self,
        vehicle: &VehicleInput,
    ) -> Result<PrivateOwnershipCost, OwnershipCostError> {
        self.rules.validate()?;
        check_non_negative("purchase_price", vehicle.purchase_price)?;
        check_non_negative("annual_distance_km", vehicle.annual_distance_km)?;

        let propulsion = vehicle.propulsion();
        let depreciation = self.depreciation(vehicle.purchase_price);
        let insurance = self.insurance(vehicle.purchase_price);
        let maintenance = self.maintenance(vehicle.purchase_price);
        let fuel = vehicle.annual_distance_km * self.rules.fuel_cost_per_km.for_propulsion(propulsion);
        let vehicle_tax = self.rules.flat_vehicle_tax.for_propulsion(propulsion);

        let total_annual =
            round_whole(depreciation + insurance + maintenance + fuel + vehicle_tax);

        Ok(PrivateOwnershipCost {
            depreciation,
            insurance,
            maintenance,
            fuel,
            vehicle_tax,
            total_annual,
        })
    }

    /// Calculates the employer's budget-frame cost for a benefit value.
    ///
    /// The lease branch applies when the vehicle is leased and an annual
    /// lease cost is present, zero included; otherwise the vehicle is costed
    /// as a purchase.
    ///
    /// # Errors
    ///
    /// Returns [`OwnershipCostError`] if the rule set is invalid or the
    /// purchase price, lease cost or benefit value is negative.
    pub fn employer_cost(
        &self,
        vehicle: &VehicleInput,
        benefit_value: Decimal,
    ) -> Result<EmployerCost, OwnershipCostError> {
        self.rules.validate()?;
        check_non_negative("purchase_price", vehicle.purchase_price)?;
        check_non_negative("benefit_value", benefit_value)?;

        let lease = if vehicle.is_leasing {
            vehicle.annual_leasing_cost
        } else {
            None
        };
        if let Some(cost) = lease {
            check_non_negative("annual_leasing_cost", cost)?;
        }

        let (lease_cost, vat_adjustment_applied, depreciation) = match lease {
            Some(cost) => {
                let (adjusted, vat_applied) =
                    self.vat_adjusted_lease_cost(cost, vehicle.service_distance_km_per_year);
                (Some(adjusted), vat_applied, Decimal::ZERO)
            }
            None => (None, false, self.depreciation(vehicle.purchase_price)),
        };

        let insurance = if vehicle.is_leasing && vehicle.insurance_included_in_lease {
            Decimal::ZERO
        } else {
            self.insurance(vehicle.purchase_price)
        };
        let maintenance = if vehicle.is_leasing && vehicle.maintenance_included_in_lease {
            Decimal::ZERO
        } else {
            self.maintenance(vehicle.purchase_price)
        };
        let vehicle_tax = self
            .rules
            .flat_vehicle_tax
            .for_propulsion(vehicle.propulsion());

        let operating_cost = lease_cost.unwrap_or(Decimal::ZERO)
            + depreciation
            + insurance
            + maintenance
            + vehicle_tax;

        let tax_on_benefit = self.tax_on_benefit(benefit_value);
        let gross_for_tax = self.gross_for_tax(tax_on_benefit);
        let payroll_overhead = gross_for_tax * self.rules.employer_social_fee_rate;

        let total_annual = round_whole(operating_cost + tax_on_benefit + payroll_overhead);

        Ok(EmployerCost {
            lease_cost,
            vat_adjustment_applied,
            depreciation,
            insurance,
            maintenance,
            vehicle_tax,
            operating_cost,
            tax_on_benefit,
            gross_for_tax,
            payroll_overhead,
            total_annual,
        })
    }

    fn depreciation(
        &self,
        purchase_price: Decimal,
    ) -> Decimal {
        purchase_price * self.rules.depreciation_rate
    }

    fn insurance(
        &self,
        purchase_price: Decimal,
    ) -> Decimal {
        purchase_price * self.rules.insurance_rate
    }

    fn maintenance(
        &self,
        purchase_price: Decimal,
    ) -> Decimal {
        purchase_price * self.rules.maintenance_rate
    }

    /// Half of the 25 % lease VAT is reclaimable once business driving
    /// reaches the threshold. The step is deliberate: below the threshold
    /// the full lease cost applies.
    fn vat_adjusted_lease_cost(
        &self,
        annual_lease_cost: Decimal,
        service_distance_km: Decimal,
    ) -> (Decimal, bool) {
        if service_distance_km >= self.rules.vat_threshold_km {
            debug!(
                service_distance_km = %service_distance_km,
                threshold_km = %self.rules.vat_threshold_km,
                "reclaiming half of lease VAT"
            );
            (annual_lease_cost * self.rules.vat_lease_factor, true)
        } else {
            (annual_lease_cost, false)
        }
    }

    fn tax_on_benefit(
        &self,
        benefit_value: Decimal,
    ) -> Decimal {
        benefit_value * self.rules.standard_marginal_tax_rate
    }

    /// `standard_marginal_tax_rate < 1` is guaranteed by rule-set validation.
    fn gross_for_tax(
        &self,
        tax_on_benefit: Decimal,
    ) -> Decimal {
        tax_on_benefit / (Decimal::ONE - self.rules.standard_marginal_tax_rate)
    }
}

fn check_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), OwnershipCostError> {
    if value < Decimal::ZERO {
        return Err(OwnershipCostError::NegativeAmount { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::rules::sweden_2025;

    fn purchased_vehicle() -> VehicleInput {
        VehicleInput {
            purchase_price: dec!(400000),
            actual_price: dec!(380000),
            vehicle_tax_annual: dec!(5292),
            service_distance_km_per_year: dec!(5000),
            annual_distance_km: dec!(15000),
            ..VehicleInput::default()
        }
    }

    fn leased_vehicle() -> VehicleInput {
        VehicleInput {
            is_leasing: true,
            annual_leasing_cost: Some(dec!(60000)),
            ..purchased_vehicle()
        }
    }

    // =========================================================================
    // private_total_cost tests
    // =========================================================================

    #[test]
    fn private_cost_conventional() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);

        let result = calculator.private_total_cost(&purchased_vehicle()).unwrap();

        assert_eq!(result.depreciation, dec!(80000));
        assert_eq!(result.insurance, dec!(6000));
        assert_eq!(result.maintenance, dec!(2000));
        assert_eq!(result.fuel, dec!(22500));
        assert_eq!(result.vehicle_tax, dec!(6000));
        assert_eq!(result.total_annual, dec!(116500));
    }

    #[test]
    fn private_cost_electric_uses_electric_rates() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);
        let vehicle = VehicleInput {
            is_electric: true,
            ..purchased_vehicle()
        };

        let result = calculator.private_total_cost(&vehicle).unwrap();

        assert_eq!(result.fuel, dec!(6000));
        assert_eq!(result.vehicle_tax, dec!(0));
        assert_eq!(result.total_annual, dec!(94000));
    }

    #[test]
    fn private_cost_plugin_hybrid_uses_hybrid_rates() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);
        let vehicle = VehicleInput {
            is_plugin_hybrid: true,
            ..purchased_vehicle()
        };

        let result = calculator.private_total_cost(&vehicle).unwrap();

        assert_eq!(result.fuel, dec!(15000));
        assert_eq!(result.vehicle_tax, dec!(3000));
        assert_eq!(result.total_annual, dec!(106000));
    }

    #[test]
    fn private_cost_rounds_only_the_total() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);
        let vehicle = VehicleInput {
            purchase_price: dec!(123457),
            annual_distance_km: dec!(1001),
            ..VehicleInput::default()
        };

        let result = calculator.private_total_cost(&vehicle).unwrap();

        assert_eq!(result.depreciation, dec!(24691.4));
        assert_eq!(result.insurance, dec!(1851.855));
        assert_eq!(result.maintenance, dec!(617.285));
        assert_eq!(result.fuel, dec!(1501.5));
        // 24691.4 + 1851.855 + 617.285 + 1501.5 + 6000 = 34662.04
        assert_eq!(result.total_annual, dec!(34662));
    }

    #[test]
    fn private_cost_rejects_negative_distance() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);
        let vehicle = VehicleInput {
            annual_distance_km: dec!(-1),
            ..purchased_vehicle()
        };

        let result = calculator.private_total_cost(&vehicle);

        assert_eq!(
            result,
            Err(OwnershipCostError::NegativeAmount {
                field: "annual_distance_km",
                value: dec!(-1),
            })
        );
    }

    // =========================================================================
    // employer_cost tests
    // =========================================================================

    #[test]
    fn employer_cost_purchase_uses_depreciation() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);

        let result = calculator
            .employer_cost(&purchased_vehicle(), dec!(59842))
            .unwrap();

        assert_eq!(result.lease_cost, None);
        assert_eq!(result.depreciation, dec!(80000));
        assert_eq!(result.operating_cost, dec!(94000));
        assert_eq!(result.tax_on_benefit, dec!(29921));
        assert_eq!(result.gross_for_tax, dec!(59842));
        assert_eq!(result.payroll_overhead, dec!(18802.3564));
        // 94000 + 29921 + 18802.3564 = 142723.3564
        assert_eq!(result.total_annual, dec!(142723));
    }

    #[test]
    fn employer_cost_excludes_fuel() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);
        let far_driver = VehicleInput {
            annual_distance_km: dec!(90000),
            ..purchased_vehicle()
        };

        let near = calculator
            .employer_cost(&purchased_vehicle(), dec!(59842))
            .unwrap();
        let far = calculator.employer_cost(&far_driver, dec!(59842)).unwrap();

        assert_eq!(near.total_annual, far.total_annual);
    }

    #[test]
    fn employer_cost_lease_applies_vat_adjustment() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);

        let result = calculator
            .employer_cost(&leased_vehicle(), dec!(59842))
            .unwrap();

        assert_eq!(result.lease_cost, Some(dec!(54000)));
        assert!(result.vat_adjustment_applied);
        assert_eq!(result.depreciation, dec!(0));
        // 54000 + 6000 + 2000 + 6000
        assert_eq!(result.operating_cost, dec!(68000));
        assert_eq!(result.total_annual, dec!(116723));
    }

    #[test]
    fn employer_cost_vat_step_is_exactly_ten_percent() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);
        let below = VehicleInput {
            service_distance_km_per_year: dec!(999),
            ..leased_vehicle()
        };
        let at = VehicleInput {
            service_distance_km_per_year: dec!(1000),
            ..leased_vehicle()
        };

        let below_result = calculator.employer_cost(&below, dec!(59842)).unwrap();
        let at_result = calculator.employer_cost(&at, dec!(59842)).unwrap();

        assert_eq!(below_result.lease_cost, Some(dec!(60000)));
        assert!(!below_result.vat_adjustment_applied);
        assert_eq!(
            below_result.operating_cost - at_result.operating_cost,
            dec!(60000) * dec!(0.1)
        );
    }

    #[test]
    fn employer_cost_skips_costs_included_in_lease() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);
        let vehicle = VehicleInput {
            insurance_included_in_lease: true,
            maintenance_included_in_lease: true,
            ..leased_vehicle()
        };

        let result = calculator.employer_cost(&vehicle, dec!(59842)).unwrap();

        assert_eq!(result.insurance, dec!(0));
        assert_eq!(result.maintenance, dec!(0));
        assert_eq!(result.operating_cost, dec!(60000));
    }

    #[test]
    fn employer_cost_included_flags_ignored_when_purchased() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);
        let vehicle = VehicleInput {
            insurance_included_in_lease: true,
            maintenance_included_in_lease: true,
            ..purchased_vehicle()
        };

        let result = calculator.employer_cost(&vehicle, dec!(0)).unwrap();

        assert_eq!(result.insurance, dec!(6000));
        assert_eq!(result.maintenance, dec!(2000));
    }

    #[test]
    fn employer_cost_lease_without_known_cost_falls_back_to_depreciation() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);
        let vehicle = VehicleInput {
            annual_leasing_cost: None,
            ..leased_vehicle()
        };

        let result = calculator.employer_cost(&vehicle, dec!(0)).unwrap();

        assert_eq!(result.lease_cost, None);
        assert_eq!(result.depreciation, dec!(80000));
    }

    #[test]
    fn employer_cost_zero_lease_cost_is_used_as_given() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);
        let vehicle = VehicleInput {
            annual_leasing_cost: Some(dec!(0)),
            ..leased_vehicle()
        };

        let result = calculator.employer_cost(&vehicle, dec!(0)).unwrap();

        assert_eq!(result.lease_cost, Some(dec!(0)));
        assert_eq!(result.depreciation, dec!(0));
        // insurance 6 000 + maintenance 2 000 + vehicle tax 6 000
        assert_eq!(result.operating_cost, dec!(14000));
    }

    #[test]
    fn employer_cost_rejects_negative_lease_cost() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);
        let vehicle = VehicleInput {
            annual_leasing_cost: Some(dec!(-100)),
            ..leased_vehicle()
        };

        let result = calculator.employer_cost(&vehicle, dec!(0));

        assert_eq!(
            result,
            Err(OwnershipCostError::NegativeAmount {
                field: "annual_leasing_cost",
                value: dec!(-100),
            })
        );
    }

    #[test]
    fn employer_cost_zero_benefit_has_no_tax_compensation() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);

        let result = calculator
            .employer_cost(&purchased_vehicle(), dec!(0))
            .unwrap();

        assert_eq!(result.tax_on_benefit, dec!(0));
        assert_eq!(result.payroll_overhead, dec!(0));
        assert_eq!(result.total_annual, dec!(94000));
    }

    #[test]
    fn employer_cost_rejects_negative_benefit() {
        let rules = sweden_2025();
        let calculator = OwnershipCostCalculator::new(&rules);

        let result = calculator.employer_cost(&purchased_vehicle(), dec!(-1));

        assert_eq!(
            result,
            Err(OwnershipCostError::NegativeAmount {
                field: "benefit_value",
                value: dec!(-1),
            })
        );
    }
}
