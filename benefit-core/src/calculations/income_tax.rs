//! Marginal income tax rate lookup from a gross annual salary.
//!
//! The rate normally comes from the user's settings. This lookup offers a
//! simplified default for callers that only know the salary.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use benefit_core::calculations::marginal_tax_rate_for_salary;
//! use benefit_core::rules::sweden_2025;
//!
//! let rules = sweden_2025();
//! let rate = marginal_tax_rate_for_salary(dec!(720000), &rules.income_tax_brackets).unwrap();
//! assert_eq!(rate, dec!(0.52));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::IncomeTaxBracket;

/// Errors that can occur during the bracket lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IncomeTaxError {
    /// No brackets were provided.
    #[error("no income tax brackets provided")]
    NoBrackets,

    /// No bracket covers the salary.
    #[error("no income tax bracket found for salary {0}")]
    NoMatchingBracket(Decimal),
}

/// Returns the marginal rate of the bracket covering `gross_annual_salary`.
///
/// Brackets cover `(min_income, max_income]`. A salary of zero or less maps
/// to the first bracket.
///
/// # Errors
///
/// Returns [`IncomeTaxError`] if `brackets` is empty or no bracket covers
/// the salary.
pub fn marginal_tax_rate_for_salary(
    gross_annual_salary: Decimal,
    brackets: &[IncomeTaxBracket],
) -> Result<Decimal, IncomeTaxError> {
    let first = brackets.first().ok_or(IncomeTaxError::NoBrackets)?;

    if gross_annual_salary <= Decimal::ZERO {
        return Ok(first.marginal_rate);
    }

    brackets
        .iter()
        .find(|b| {
            gross_annual_salary > b.min_income
                && b.max_income.is_none_or(|max| gross_annual_salary <= max)
        })
        .map(|b| b.marginal_rate)
        .ok_or(IncomeTaxError::NoMatchingBracket(gross_annual_salary))
}
