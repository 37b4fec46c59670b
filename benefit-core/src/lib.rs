pub mod calculations;
pub mod models;
pub mod rules;

pub use calculations::{CalculationError, CalculationReport, VehicleCalculator};
pub use models::*;
pub use rules::{RuleSetError, RuleSetRegistry, TaxRuleSet};
