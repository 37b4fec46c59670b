//! Statutory benefit value (förmånsvärde) of a company car.
//!
//! # Formula Structure
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Base amount; × 75 % when service distance ≥ 30 000 km |
//! | 2    | Price base: purchase price + extra equipment |
//! | 3    | Price component: price base × price rate (9 %) |
//! | 4    | Interest component: price base × interest factor (1.96 %) |
//! | 5    | Vehicle tax (registered on/after cutoff) or flat running costs |
//! | 6    | Raw value: steps 1 + 3 + 4 + 5 |
//! | 7    | Environmental reduction (electric, plug-in hybrid), capped at 50 % of step 6 |
//! | 8    | Benefit value: round(step 6 − step 7) |
//!
//! # Plug-in Hybrids
//!
//! The plug-in-hybrid reduction is a range-based step function
//! (see [`TaxRuleSet::plugin_hybrid_range_steps`]). It approximates the
//! statute rather than reproducing it and is kept as is until the rules are
//! confirmed.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use benefit_core::calculations::BenefitValueCalculator;
//! use benefit_core::rules::sweden_2025;
//! use benefit_core::VehicleInput;
//!
//! let rules = sweden_2025();
//! let calculator = BenefitValueCalculator::new(&rules);
//!
//! let vehicle = VehicleInput {
//!     purchase_price: dec!(400000),
//!     vehicle_tax_annual: dec!(5292),
//!     registered_after_cutoff_date: true,
//!     service_distance_km_per_year: dec!(5000),
//!     ..VehicleInput::default()
//! };
//!
//! let result = calculator.calculate(&vehicle).unwrap();
//!
//! // 10 710 + 36 000 + 7 840 + 5 292
//! assert_eq!(result.benefit_value_annual, dec!(59842));
//! assert_eq!(result.benefit_value_monthly, dec!(4987));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{max, round_whole};
use crate::models::{Propulsion, VehicleInput};
use crate::rules::{RuleSetError, TaxRuleSet};

/// Errors that can occur during benefit value calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BenefitValueError {
    /// The rule set failed validation.
    #[error("invalid rule set: {0}")]
    InvalidRuleSet(#[from] RuleSetError),

    /// Extra equipment cannot lower the price base.
    #[error("extra equipment value must be non-negative, got {0}")]
    NegativeExtraEquipment(Decimal),

    /// A plug-in hybrid's electric range cannot be negative.
    #[error("electric range must be non-negative, got {0}")]
    NegativeElectricRange(Decimal),
}

/// Step-by-step breakdown of a benefit value calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitValueResult {
    /// Base amount after the service-distance reduction (step 1).
    pub base_amount: Decimal,

    /// Whether the service distance crossed the reduction threshold.
    pub service_reduction_applied: bool,

    /// Purchase price plus extra equipment (step 2).
    pub price_base: Decimal,

    /// Step 3.
    pub price_component: Decimal,

    /// Step 4.
    pub interest_component: Decimal,

    /// Actual vehicle tax or flat running costs (step 5).
    pub tax_or_running_component: Decimal,

    /// Value before environmental reduction (step 6). Not rounded.
    pub raw_value: Decimal,

    /// Environmental reduction (step 7). Not rounded.
    pub environmental_reduction: Decimal,

    /// Annual benefit value in whole kronor (step 8).
    pub benefit_value_annual: Decimal,

    /// Annual value / 12, in whole kronor.
    pub benefit_value_monthly: Decimal,

    /// `true` when the purchase price was zero or negative and the
    /// calculation short-circuited to zero.
    pub price_guard_applied: bool,
}

impl BenefitValueResult {
    /// Creates a zero-valued result for a missing or non-positive price.
    fn price_guard() -> Self {
        Self {
            base_amount: Decimal::ZERO,
            service_reduction_applied: false,
            price_base: Decimal::ZERO,
            price_component: Decimal::ZERO,
            interest_component: Decimal::ZERO,
            tax_or_running_component: Decimal::ZERO,
            raw_value: Decimal::ZERO,
            environmental_reduction: Decimal::ZERO,
            benefit_value_annual: Decimal::ZERO,
            benefit_value_monthly: Decimal::ZERO,
            price_guard_applied: true,
        }
    }
}

/// Calculator for the statutory benefit value.
#[derive(Debug, Clone)]
pub struct BenefitValueCalculator<'a> {
    rules: &'a TaxRuleSet,
}

impl<'a> BenefitValueCalculator<'a> {
    pub fn new(rules: &'a TaxRuleSet) -> Self {
        Self { rules }
    }

    /// Calculates the benefit value of `vehicle`.
    ///
    /// A purchase price of zero or less returns a zero-valued result with
    /// `price_guard_applied` set instead of an error.
    ///
    /// # Errors
    ///
    /// Returns [`BenefitValueError`] if the rule set is invalid, or if the
    /// extra equipment value or electric range is negative.
    pub fn calculate(
        &self,
        vehicle: &VehicleInput,
    ) -> Result<BenefitValueResult, BenefitValueError> {
        self.rules.validate()?;

        if vehicle.purchase_price <= Decimal::ZERO {
            warn!(
                purchase_price = %vehicle.purchase_price,
                "purchase price is zero or negative; benefit value is zero"
            );
            return Ok(BenefitValueResult::price_guard());
        }
        if vehicle.extra_equipment_value < Decimal::ZERO {
            return Err(BenefitValueError::NegativeExtraEquipment(
                vehicle.extra_equipment_value,
            ));
        }
        if let Some(range) = vehicle.electric_range_km {
            if range < Decimal::ZERO {
                return Err(BenefitValueError::NegativeElectricRange(range));
            }
        }

        // Step 1
        let (base_amount, service_reduction_applied) =
            self.base_component(vehicle.service_distance_km_per_year);

        // Step 2
        let price_base = self.price_base(vehicle.purchase_price, vehicle.extra_equipment_value);

        // Steps 3 and 4
        let price_component = self.price_component(price_base);
        let interest_component = self.interest_component(price_base);

        // Step 5
        let tax_or_running_component = self.tax_or_running_component(
            vehicle.registered_after_cutoff_date,
            vehicle.vehicle_tax_annual,
        );

        // Step 6
        let raw_value =
            base_amount + price_component + interest_component + tax_or_running_component;

        // Step 7
        let environmental_reduction = self.environmental_reduction(
            vehicle.propulsion(),
            vehicle.electric_range_km,
            raw_value,
        );

        // Step 8
        let benefit_value_annual =
            max(round_whole(raw_value - environmental_reduction), Decimal::ZERO);
        let benefit_value_monthly = self.monthly_value(benefit_value_annual);

        Ok(BenefitValueResult {
            base_amount,
            service_reduction_applied,
            price_base,
            price_component,
            interest_component,
            tax_or_running_component,
            raw_value,
            environmental_reduction,
            benefit_value_annual,
            benefit_value_monthly,
            price_guard_applied: false,
        })
    }

    /// Base amount, reduced when business driving reaches the threshold.
    fn base_component(
        &self,
        service_distance_km: Decimal,
    ) -> (Decimal, bool) {
        if service_distance_km >= self.rules.service_distance_threshold_km {
            debug!(
                service_distance_km = %service_distance_km,
                threshold_km = %self.rules.service_distance_threshold_km,
                "service distance threshold reached; reducing base amount"
            );
            (
                self.rules.base_amount * self.rules.service_distance_base_factor,
                true,
            )
        } else {
            (self.rules.base_amount, false)
        }
    }

    fn price_base(
        &self,
        purchase_price: Decimal,
        extra_equipment_value: Decimal,
    ) -> Decimal {
        purchase_price + extra_equipment_value
    }

    fn price_component(
        &self,
        price_base: Decimal,
    ) -> Decimal {
        price_base * self.rules.price_rate
    }

    fn interest_component(
        &self,
        price_base: Decimal,
    ) -> Decimal {
        price_base * self.rules.interest_rate_factor
    }

    /// Post-cutoff vehicles carry their actual tax; older ones the flat
    /// running-cost stand-in, whatever their actual tax is.
    fn tax_or_running_component(
        &self,
        registered_after_cutoff: bool,
        vehicle_tax_annual: Decimal,
    ) -> Decimal {
        if registered_after_cutoff {
            vehicle_tax_annual
        } else {
            self.rules.running_costs
        }
    }

    fn environmental_reduction(
        &self,
        propulsion: Propulsion,
        electric_range_km: Option<Decimal>,
        raw_value: Decimal,
    ) -> Decimal {
        let factor = match propulsion {
            Propulsion::Conventional => return Decimal::ZERO,
            Propulsion::Electric => Decimal::ONE,
            Propulsion::PluginHybrid => self.plugin_hybrid_factor(electric_range_km),
        };

        let uncapped = self.rules.electric_reduction_per_year * factor;
        let cap = max(raw_value * self.rules.max_reduction_fraction, Decimal::ZERO);

        if uncapped > cap {
            debug!(
                uncapped = %uncapped,
                cap = %cap,
                "environmental reduction capped"
            );
        }

        uncapped.min(cap)
    }

    /// Share of the per-year reduction a plug-in hybrid receives.
    fn plugin_hybrid_factor(
        &self,
        electric_range_km: Option<Decimal>,
    ) -> Decimal {
        let Some(range) = electric_range_km else {
            debug!(
                factor = %self.rules.plugin_hybrid_default_factor,
                "electric range unknown; using default plug-in hybrid factor"
            );
            return self.rules.plugin_hybrid_default_factor;
        };

        self.rules
            .plugin_hybrid_range_steps
            .iter()
            .find(|step| range >= step.min_range_km)
            .map(|step| step.factor)
            .unwrap_or(self.rules.plugin_hybrid_fallback_factor)
    }

    fn monthly_value(
        &self,
        annual: Decimal,
    ) -> Decimal {
        round_whole(annual / Decimal::from(12))
    }
}
