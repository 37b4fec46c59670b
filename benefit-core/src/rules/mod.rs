//! Tax-year rule sets and the registry that serves them.

mod builtin;
mod registry;
mod rule_set;

use rust_decimal::Decimal;
use thiserror::Error;

pub use builtin::sweden_2025;
pub use registry::RuleSetRegistry;
pub use rule_set::{PropulsionRates, RangeReductionStep, TaxRuleSet};

/// Errors raised while validating or looking up rule sets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleSetError {
    /// A rate or factor is outside `[0, 1]`.
    #[error("{field} must be between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },

    /// An amount or threshold is negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// The kilometres-per-distance-unit divisor must be positive.
    #[error("km per distance unit must be positive, got {0}")]
    NonPositiveDistanceUnit(Decimal),

    /// Plug-in-hybrid range steps must be sorted by descending minimum range.
    #[error("plug-in hybrid range steps must be sorted by descending minimum range")]
    UnorderedRangeSteps,

    /// Income tax brackets must be sorted by ascending minimum income.
    #[error("income tax brackets must be sorted by ascending minimum income")]
    UnorderedIncomeBrackets,

    /// No rule set is registered for the requested year.
    #[error("no rule set for tax year {year}; available: {available:?}")]
    UnknownTaxYear { year: i32, available: Vec<i32> },
}
