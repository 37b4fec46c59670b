use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::models::IncomeTaxBracket;
use crate::rules::{PropulsionRates, RangeReductionStep, TaxRuleSet};

/// Rule set for the 2025 tax year.
///
/// Benefit constants follow the 9 % price rate and 1.96 % interest factor
/// variant. The 13 % / 2.785 % variant is a historical configuration and can
/// be loaded from a TOML file when needed.
pub fn sweden_2025() -> TaxRuleSet {
    TaxRuleSet {
        tax_year: 2025,
        registration_cutoff: NaiveDate::from_ymd_opt(2022, 7, 1).expect("2022-07-01 is a valid date"),

        base_amount: dec!(10710),
        service_distance_threshold_km: dec!(30000),
        service_distance_base_factor: dec!(0.75),
        price_rate: dec!(0.09),
        interest_rate_factor: dec!(0.0196),
        running_costs: dec!(5000),
        electric_reduction_per_year: dec!(10000),
        max_reduction_fraction: dec!(0.50),
        plugin_hybrid_range_steps: vec![
            RangeReductionStep {
                min_range_km: dec!(60),
                factor: dec!(0.8),
            },
            RangeReductionStep {
                min_range_km: dec!(45),
                factor: dec!(0.6),
            },
            RangeReductionStep {
                min_range_km: dec!(30),
                factor: dec!(0.4),
            },
        ],
        plugin_hybrid_fallback_factor: dec!(0.2),
        plugin_hybrid_default_factor: dec!(0.5),

        depreciation_rate: dec!(0.20),
        insurance_rate: dec!(0.015),
        maintenance_rate: dec!(0.005),
        fuel_cost_per_km: PropulsionRates {
            conventional: dec!(1.5),
            electric: dec!(0.4),
            plugin_hybrid: dec!(1.0),
        },
        flat_vehicle_tax: PropulsionRates {
            conventional: dec!(6000),
            electric: dec!(0),
            plugin_hybrid: dec!(3000),
        },

        vat_threshold_km: dec!(1000),
        vat_lease_factor: dec!(0.9),
        standard_marginal_tax_rate: dec!(0.50),
        employer_social_fee_rate: dec!(0.3142),

        km_per_distance_unit: dec!(10),

        income_tax_brackets: vec![
            IncomeTaxBracket {
                min_income: dec!(0),
                max_income: Some(dec!(643100)),
                marginal_rate: dec!(0.32),
            },
            IncomeTaxBracket {
                min_income: dec!(643100),
                max_income: None,
                marginal_rate: dec!(0.52),
            },
        ],
    }
}
