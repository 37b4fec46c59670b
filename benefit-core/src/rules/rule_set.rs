//! Versioned statutory and policy constants.
//!
//! Every number the calculators use is carried by a [`TaxRuleSet`], one per
//! tax year. Calculators never hard-code rates; they receive a rule set (or a
//! config derived from one) at construction time.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{IncomeTaxBracket, Propulsion};
use crate::rules::RuleSetError;

/// A value that differs by propulsion type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropulsionRates {
    pub conventional: Decimal,
    pub electric: Decimal,
    pub plugin_hybrid: Decimal,
}

impl PropulsionRates {
    pub fn for_propulsion(
        &self,
        propulsion: Propulsion,
    ) -> Decimal {
        match propulsion {
            Propulsion::Conventional => self.conventional,
            Propulsion::Electric => self.electric,
            Propulsion::PluginHybrid => self.plugin_hybrid,
        }
    }
}

/// One step of the plug-in-hybrid reduction table.
///
/// A hybrid whose electric range is at least `min_range_km` receives
/// `factor × electric_reduction_per_year`. This table is an approximation and
/// not taken from statute text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeReductionStep {
    pub min_range_km: Decimal,
    pub factor: Decimal,
}

/// Statutory and policy constants for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRuleSet {
    pub tax_year: i32,

    /// Vehicles registered on or after this date use their actual vehicle tax
    /// in the benefit formula.
    pub registration_cutoff: NaiveDate,

    // Benefit value
    pub base_amount: Decimal,
    pub service_distance_threshold_km: Decimal,
    pub service_distance_base_factor: Decimal,
    pub price_rate: Decimal,
    pub interest_rate_factor: Decimal,
    /// Flat stand-in for the tax component of vehicles registered before the cutoff.
    pub running_costs: Decimal,
    pub electric_reduction_per_year: Decimal,
    pub max_reduction_fraction: Decimal,
    /// Sorted by `min_range_km`, highest first.
    pub plugin_hybrid_range_steps: Vec<RangeReductionStep>,
    /// Factor used when the range is known but below every step.
    pub plugin_hybrid_fallback_factor: Decimal,
    /// Factor used when the range is unknown.
    pub plugin_hybrid_default_factor: Decimal,

    // Ownership cost
    pub depreciation_rate: Decimal,
    pub insurance_rate: Decimal,
    pub maintenance_rate: Decimal,
    pub fuel_cost_per_km: PropulsionRates,
    pub flat_vehicle_tax: PropulsionRates,

    // Employer policy
    pub vat_threshold_km: Decimal,
    pub vat_lease_factor: Decimal,
    pub standard_marginal_tax_rate: Decimal,
    pub employer_social_fee_rate: Decimal,

    pub km_per_distance_unit: Decimal,

    #[serde(default)]
    pub income_tax_brackets: Vec<IncomeTaxBracket>,
}

impl TaxRuleSet {
    /// Returns `true` when a vehicle registered on `registration_date` falls
    /// under the post-cutoff formula branch. The cutoff day itself counts as
    /// "after".
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use benefit_core::rules::sweden_2025;
    ///
    /// let rules = sweden_2025();
    /// let before = NaiveDate::from_ymd_opt(2022, 6, 30).unwrap();
    /// let on = NaiveDate::from_ymd_opt(2022, 7, 1).unwrap();
    ///
    /// assert!(!rules.is_registered_after_cutoff(before));
    /// assert!(rules.is_registered_after_cutoff(on));
    /// ```
    pub fn is_registered_after_cutoff(
        &self,
        registration_date: NaiveDate,
    ) -> bool {
        registration_date >= self.registration_cutoff
    }

    /// Checks that every rate and amount is inside its valid range.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleSetError`] found:
    /// - a rate or factor outside `[0, 1]`
    /// - `standard_marginal_tax_rate` equal to 1 (the gross-up divides by `1 - rate`)
    /// - a negative amount or threshold
    /// - a non-positive distance unit
    /// - range steps not sorted by descending `min_range_km`
    /// - income brackets not sorted by ascending `min_income`
    pub fn validate(&self) -> Result<(), RuleSetError> {
        let fractions = [
            ("service_distance_base_factor", self.service_distance_base_factor),
            ("price_rate", self.price_rate),
            ("interest_rate_factor", self.interest_rate_factor),
            ("max_reduction_fraction", self.max_reduction_fraction),
            ("plugin_hybrid_fallback_factor", self.plugin_hybrid_fallback_factor),
            ("plugin_hybrid_default_factor", self.plugin_hybrid_default_factor),
            ("depreciation_rate", self.depreciation_rate),
            ("insurance_rate", self.insurance_rate),
            ("maintenance_rate", self.maintenance_rate),
            ("vat_lease_factor", self.vat_lease_factor),
            ("standard_marginal_tax_rate", self.standard_marginal_tax_rate),
            ("employer_social_fee_rate", self.employer_social_fee_rate),
        ];
        for (field, value) in fractions {
            check_fraction(field, value)?;
        }
        if self.standard_marginal_tax_rate == Decimal::ONE {
            return Err(RuleSetError::RateOutOfRange {
                field: "standard_marginal_tax_rate",
                value: self.standard_marginal_tax_rate,
            });
        }

        let amounts = [
            ("base_amount", self.base_amount),
            ("service_distance_threshold_km", self.service_distance_threshold_km),
            ("running_costs", self.running_costs),
            ("electric_reduction_per_year", self.electric_reduction_per_year),
            ("fuel_cost_per_km.conventional", self.fuel_cost_per_km.conventional),
            ("fuel_cost_per_km.electric", self.fuel_cost_per_km.electric),
            ("fuel_cost_per_km.plugin_hybrid", self.fuel_cost_per_km.plugin_hybrid),
            ("flat_vehicle_tax.conventional", self.flat_vehicle_tax.conventional),
            ("flat_vehicle_tax.electric", self.flat_vehicle_tax.electric),
            ("flat_vehicle_tax.plugin_hybrid", self.flat_vehicle_tax.plugin_hybrid),
            ("vat_threshold_km", self.vat_threshold_km),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(RuleSetError::NegativeAmount { field, value });
            }
        }

        if self.km_per_distance_unit <= Decimal::ZERO {
            return Err(RuleSetError::NonPositiveDistanceUnit(
                self.km_per_distance_unit,
            ));
        }

        for step in &self.plugin_hybrid_range_steps {
            check_fraction("plugin_hybrid_range_steps.factor", step.factor)?;
        }
        let steps_descending = self
            .plugin_hybrid_range_steps
            .windows(2)
            .all(|pair| pair[0].min_range_km > pair[1].min_range_km);
        if !steps_descending {
            return Err(RuleSetError::UnorderedRangeSteps);
        }

        for bracket in &self.income_tax_brackets {
            check_fraction("income_tax_brackets.marginal_rate", bracket.marginal_rate)?;
        }
        let brackets_ascending = self
            .income_tax_brackets
            .windows(2)
            .all(|pair| pair[0].min_income < pair[1].min_income);
        if !brackets_ascending {
            return Err(RuleSetError::UnorderedIncomeBrackets);
        }

        Ok(())
    }
}

fn check_fraction(
    field: &'static str,
    value: Decimal,
) -> Result<(), RuleSetError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RuleSetError::RateOutOfRange { field, value });
    }
    Ok(())
}
