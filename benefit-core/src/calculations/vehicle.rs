//! End-to-end calculation for one vehicle option.
//!
//! Chains the individual calculators in the order the figures depend on each
//! other: benefit value, lease cost, ownership costs, salary equivalent and
//! cost per distance unit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::{
    BenefitValueCalculator, BenefitValueError, BenefitValueResult, EmployerCost, LeasePaymentError,
    LeasePaymentResult, LeaseTerms, NetSalaryEquivalent, OwnershipCostCalculator,
    OwnershipCostError, PrivateOwnershipCost, SalaryEquivalentCalculator, SalaryEquivalentError,
};
use crate::rules::{RuleSetError, TaxRuleSet};
use crate::{CalculationResult, UserTaxContext, VehicleInput};

/// Errors that can occur while calculating a vehicle option.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error(transparent)]
    RuleSet(#[from] RuleSetError),

    #[error("benefit value: {0}")]
    BenefitValue(#[from] BenefitValueError),

    #[error("lease payment: {0}")]
    LeasePayment(#[from] LeasePaymentError),

    #[error("ownership cost: {0}")]
    OwnershipCost(#[from] OwnershipCostError),

    #[error("salary equivalent: {0}")]
    SalaryEquivalent(#[from] SalaryEquivalentError),
}

/// Headline figures plus every intermediate breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationReport {
    pub result: CalculationResult,
    pub benefit_value: BenefitValueResult,

    /// Lease payment computed from the terms, when no lease cost was given.
    pub lease_payment: Option<LeasePaymentResult>,

    /// Annual lease cost after resolution; `None` for a purchase.
    pub resolved_annual_leasing_cost: Option<Decimal>,

    pub private_cost: PrivateOwnershipCost,
    pub employer_cost: EmployerCost,
    pub salary_equivalent: NetSalaryEquivalent,
}

/// Runs all calculators for a vehicle against one rule set.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use benefit_core::calculations::VehicleCalculator;
/// use benefit_core::rules::sweden_2025;
/// use benefit_core::{UserTaxContext, VehicleInput};
///
/// let rules = sweden_2025();
/// let calculator = VehicleCalculator::new(&rules).unwrap();
/// let vehicle = VehicleInput {
///     purchase_price: dec!(400000),
///     actual_price: dec!(380000),
///     vehicle_tax_annual: dec!(5292),
///     service_distance_km_per_year: dec!(5000),
///     is_leasing: true,
///     annual_leasing_cost: Some(dec!(60000)),
///     annual_distance_km: dec!(15000),
///     ..VehicleInput::default()
/// };
///
/// let report = calculator
///     .calculate(&vehicle, &UserTaxContext::new(dec!(0.32)))
///     .unwrap();
/// assert_eq!(report.result.benefit_value_annual, dec!(59842));
/// assert_eq!(report.result.net_salary_equivalent_annual, dec!(40774));
/// assert_eq!(report.result.cost_per_distance_unit, Some(dec!(27.18)));
/// ```
#[derive(Debug, Clone)]
pub struct VehicleCalculator<'a> {
    rules: &'a TaxRuleSet,
}

impl<'a> VehicleCalculator<'a> {
    /// Creates a calculator after validating the rule set.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::RuleSet`] if the rule set is invalid.
    pub fn new(rules: &'a TaxRuleSet) -> Result<Self, CalculationError> {
        rules.validate()?;
        Ok(Self { rules })
    }

    /// Calculates every figure for one vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] if any calculator rejects its input. A
    /// non-positive annual distance is not an error: the cost per distance
    /// unit is `None` instead.
    pub fn calculate(
        &self,
        vehicle: &VehicleInput,
        tax: &UserTaxContext,
    ) -> Result<CalculationReport, CalculationError> {
        let benefit_value = BenefitValueCalculator::new(self.rules).calculate(vehicle)?;

        let lease_payment = self.lease_payment(vehicle)?;
        let resolved_annual_leasing_cost = if vehicle.is_leasing {
            vehicle
                .annual_leasing_cost
                .or(lease_payment.as_ref().map(|p| p.annual_payment))
        } else {
            None
        };
        let costed = VehicleInput {
            annual_leasing_cost: resolved_annual_leasing_cost,
            ..vehicle.clone()
        };

        let ownership = OwnershipCostCalculator::new(self.rules);
        let private_cost = ownership.private_total_cost(&costed)?;
        let employer_cost =
            ownership.employer_cost(&costed, benefit_value.benefit_value_annual)?;

        // A purchase is costed by the same depreciation the employer budget uses.
        let annual_vehicle_cost = match resolved_annual_leasing_cost {
            Some(lease_cost) => lease_cost,
            None => employer_cost.depreciation,
        };

        let salary = SalaryEquivalentCalculator::new(self.rules);
        let salary_equivalent = salary.net_salary_equivalent(
            annual_vehicle_cost,
            benefit_value.benefit_value_annual,
            tax.marginal_tax_rate,
        )?;

        let cost_per_distance_unit = match salary.cost_per_distance_unit(
            salary_equivalent.net_salary_equivalent,
            vehicle.annual_distance_km,
        ) {
            Ok(cost) => Some(cost),
            Err(SalaryEquivalentError::NonPositiveDistance(distance)) => {
                warn!(
                    annual_distance_km = %distance,
                    "no annual distance given, cost per distance unit unavailable"
                );
                None
            }
            Err(e) => return Err(e.into()),
        };

        let result = CalculationResult {
            benefit_value_annual: benefit_value.benefit_value_annual,
            benefit_value_monthly: benefit_value.benefit_value_monthly,
            total_owner_cost_annual: private_cost.total_annual,
            total_employer_cost_annual: employer_cost.total_annual,
            net_salary_equivalent_annual: salary_equivalent.net_salary_equivalent,
            cost_per_distance_unit,
        };

        debug!(
            tax_year = self.rules.tax_year,
            benefit_value = %result.benefit_value_annual,
            employer_cost = %result.total_employer_cost_annual,
            "vehicle calculated"
        );

        Ok(CalculationReport {
            result,
            benefit_value,
            lease_payment,
            resolved_annual_leasing_cost,
            private_cost,
            employer_cost,
            salary_equivalent,
        })
    }

    /// The lease payment for a leased vehicle whose lease cost was not
    /// supplied.
    fn lease_payment(
        &self,
        vehicle: &VehicleInput,
    ) -> Result<Option<LeasePaymentResult>, LeasePaymentError> {
        if !vehicle.is_leasing || vehicle.annual_leasing_cost.is_some() {
            return Ok(None);
        }
        LeaseTerms::from_vehicle(vehicle).payment().map(Some)
    }
}
