//! Net salary equivalent and cost per distance unit.
//!
//! Expresses the vehicle's cost to the employer as the net cash salary the
//! same money would have bought, then spreads it over the distance driven.
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Employer fees on benefit: benefit value × social fee rate |
//! | 2    | Total employer cost: annual lease cost + line 1 |
//! | 3    | Gross salary equivalent: line 2 / (1 + social fee rate) |
//! | 4    | Net salary equivalent: round(line 3 × (1 − marginal rate)) |
//! | 5    | Cost per distance unit: round2(line 4 / (distance / 10)) |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{round_half_up, round_whole};
use crate::rules::{RuleSetError, TaxRuleSet};

/// Errors that can occur during salary-equivalent calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SalaryEquivalentError {
    /// The rule set failed validation.
    #[error("invalid rule set: {0}")]
    InvalidRuleSet(#[from] RuleSetError),

    /// The marginal tax rate was outside `[0, 1]`.
    #[error("marginal tax rate must be between 0 and 1, got {0}")]
    InvalidMarginalTaxRate(Decimal),

    /// Annual distance was zero or negative, so there is nothing to divide by.
    #[error("annual distance must be positive, got {0} km")]
    NonPositiveDistance(Decimal),
}

/// Breakdown of the net salary equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetSalaryEquivalent {
    pub employer_fees_on_benefit: Decimal,
    pub total_employer_cost: Decimal,
    pub gross_salary_equivalent: Decimal,
    /// Whole kronor.
    pub net_salary_equivalent: Decimal,
}

/// Salary-equivalent calculator bound to a rule set.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use benefit_core::calculations::SalaryEquivalentCalculator;
/// use benefit_core::rules::sweden_2025;
///
/// let rules = sweden_2025();
/// let calculator = SalaryEquivalentCalculator::new(&rules);
///
/// let net = calculator
///     .net_salary_equivalent(dec!(60000), dec!(59842), dec!(0.32))
///     .unwrap();
/// assert_eq!(net.net_salary_equivalent, dec!(40774));
///
/// let per_mil = calculator
///     .cost_per_distance_unit(net.net_salary_equivalent, dec!(15000))
///     .unwrap();
/// assert_eq!(per_mil, dec!(27.18));
/// ```
#[derive(Debug, Clone)]
pub struct SalaryEquivalentCalculator<'a> {
    rules: &'a TaxRuleSet,
}

impl<'a> SalaryEquivalentCalculator<'a> {
    pub fn new(rules: &'a TaxRuleSet) -> Self {
        Self { rules }
    }

    /// Calculates the net salary the employer's vehicle cost corresponds to.
    ///
    /// # Errors
    ///
    /// Returns [`SalaryEquivalentError`] if the rule set is invalid or the
    /// marginal tax rate is outside `[0, 1]`.
    pub fn net_salary_equivalent(
        &self,
        annual_lease_cost: Decimal,
        benefit_value: Decimal,
        marginal_tax_rate: Decimal,
    ) -> Result<NetSalaryEquivalent, SalaryEquivalentError> {
        self.rules.validate()?;
        if marginal_tax_rate < Decimal::ZERO || marginal_tax_rate > Decimal::ONE {
            return Err(SalaryEquivalentError::InvalidMarginalTaxRate(
                marginal_tax_rate,
            ));
        }

        let fee_rate = self.rules.employer_social_fee_rate;
        let employer_fees_on_benefit = benefit_value * fee_rate;
        let total_employer_cost = annual_lease_cost + employer_fees_on_benefit;
        let gross_salary_equivalent = total_employer_cost / (Decimal::ONE + fee_rate);
        let net_salary_equivalent =
            round_whole(gross_salary_equivalent * (Decimal::ONE - marginal_tax_rate));

        Ok(NetSalaryEquivalent {
            employer_fees_on_benefit,
            total_employer_cost,
            gross_salary_equivalent,
            net_salary_equivalent,
        })
    }

    /// Spreads the net salary equivalent over the annual distance, per
    /// distance unit (mil), rounded to two decimals.
    ///
    /// # Errors
    ///
    /// Returns [`SalaryEquivalentError::NonPositiveDistance`] when
    /// `annual_distance_km` is zero or negative, or
    /// [`SalaryEquivalentError::InvalidRuleSet`] if the rule set is invalid.
    pub fn cost_per_distance_unit(
        &self,
        net_salary_equivalent: Decimal,
        annual_distance_km: Decimal,
    ) -> Result<Decimal, SalaryEquivalentError> {
        self.rules.validate()?;
        if annual_distance_km <= Decimal::ZERO {
            return Err(SalaryEquivalentError::NonPositiveDistance(
                annual_distance_km,
            ));
        }

        let units = annual_distance_km / self.rules.km_per_distance_unit;
        Ok(round_half_up(net_salary_equivalent / units))
    }
}
