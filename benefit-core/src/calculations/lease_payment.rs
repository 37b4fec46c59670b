//! Lease payment as an annuity with a residual (balloon) value.
//!
//! The lessee pays down the price minus the present value of the residual
//! over the lease term; the residual itself is settled at the end.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Residual: price × residual fraction |
//! | 2    | Monthly rate r: annual interest % / 12 / 100 |
//! | 3    | r = 0: monthly payment = (price − residual) / months |
//! | 4    | r > 0: financed = price − residual / (1 + r)^n |
//! | 5    | r > 0: monthly payment = financed × r × (1 + r)^n / ((1 + r)^n − 1) |
//! | 6    | Annual payment: monthly × 12 |

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::VehicleInput;
use crate::calculations::common::percent_to_fraction;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Errors that can occur during lease payment calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeasePaymentError {
    /// Negative interest rates are not accepted.
    #[error("interest rate must be non-negative, got {0}%")]
    NegativeInterestRate(Decimal),

    /// The residual value fraction was outside `[0, 1]`.
    #[error("residual value fraction must be between 0 and 1, got {0}")]
    ResidualOutOfRange(Decimal),

    /// `(1 + r)^n` or the payment itself does not fit in a `Decimal`.
    #[error("lease payment calculation overflowed")]
    Overflow,
}

/// Terms of a lease or financed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseTerms {
    pub price: Decimal,
    /// Nominal annual interest in percent, e.g. `4.5`.
    pub interest_rate_percent: Decimal,
    pub months: i32,
    /// Residual value as a fraction of the price, e.g. `0.5`.
    pub residual_value_fraction: Decimal,
}

/// Breakdown of a lease payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeasePaymentResult {
    pub residual_value: Decimal,
    pub monthly_rate: Decimal,
    pub present_value_of_residual: Decimal,
    pub financed_amount: Decimal,
    pub monthly_payment: Decimal,
    pub annual_payment: Decimal,
}

impl LeasePaymentResult {
    fn zero() -> Self {
        Self {
            residual_value: Decimal::ZERO,
            monthly_rate: Decimal::ZERO,
            present_value_of_residual: Decimal::ZERO,
            financed_amount: Decimal::ZERO,
            monthly_payment: Decimal::ZERO,
            annual_payment: Decimal::ZERO,
        }
    }
}

impl LeaseTerms {
    /// Terms for financing the vehicle's actual price.
    pub fn from_vehicle(vehicle: &VehicleInput) -> Self {
        Self {
            price: vehicle.actual_price,
            interest_rate_percent: vehicle.interest_rate_percent,
            months: vehicle.leasing_period_months,
            residual_value_fraction: percent_to_fraction(vehicle.residual_value_percent),
        }
    }

    /// Calculates the monthly and annual payment for these terms.
    ///
    /// A zero or negative price or term yields an all-zero result. Negative
    /// interest rates are rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use benefit_core::calculations::LeaseTerms;
    ///
    /// let terms = LeaseTerms {
    ///     price: dec!(300000),
    ///     interest_rate_percent: dec!(0),
    ///     months: 36,
    ///     residual_value_fraction: dec!(0.5),
    /// };
    ///
    /// let payment = terms.payment().unwrap();
    /// assert_eq!(payment.annual_payment.round_dp(2), dec!(50000));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`LeasePaymentError`] if the interest rate is negative, the
    /// residual fraction is outside `[0, 1]`, or the arithmetic overflows.
    pub fn payment(&self) -> Result<LeasePaymentResult, LeasePaymentError> {
        if self.interest_rate_percent < Decimal::ZERO {
            return Err(LeasePaymentError::NegativeInterestRate(
                self.interest_rate_percent,
            ));
        }
        if self.residual_value_fraction < Decimal::ZERO
            || self.residual_value_fraction > Decimal::ONE
        {
            return Err(LeasePaymentError::ResidualOutOfRange(
                self.residual_value_fraction,
            ));
        }

        if self.price <= Decimal::ZERO || self.months <= 0 {
            warn!(
                price = %self.price,
                months = self.months,
                "degenerate lease terms, payment is zero"
            );
            return Ok(LeasePaymentResult::zero());
        }

        let months = Decimal::from(self.months);
        let residual_value = self.price * self.residual_value_fraction;
        let monthly_rate = self.monthly_rate();

        let (present_value_of_residual, financed_amount, monthly_payment) =
            if monthly_rate.is_zero() {
                let financed = self.price - residual_value;
                (residual_value, financed, financed / months)
            } else {
                self.annuity(residual_value, monthly_rate)?
            };

        let annual_payment = monthly_payment
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or(LeasePaymentError::Overflow)?;

        Ok(LeasePaymentResult {
            residual_value,
            monthly_rate,
            present_value_of_residual,
            financed_amount,
            monthly_payment,
            annual_payment,
        })
    }

    fn monthly_rate(&self) -> Decimal {
        percent_to_fraction(self.interest_rate_percent) / MONTHS_PER_YEAR
    }

    /// Returns `(present value of residual, financed amount, monthly payment)`.
    fn annuity(
        &self,
        residual_value: Decimal,
        monthly_rate: Decimal,
    ) -> Result<(Decimal, Decimal, Decimal), LeasePaymentError> {
        // months > 0 was checked by the caller
        let growth = (Decimal::ONE + monthly_rate)
            .checked_powu(self.months.unsigned_abs().into())
            .ok_or(LeasePaymentError::Overflow)?;

        let present_value_of_residual = residual_value / growth;
        let financed_amount = self.price - present_value_of_residual;
        let monthly_payment = financed_amount
            .checked_mul(monthly_rate)
            .and_then(|v| v.checked_mul(growth))
            .and_then(|v| v.checked_div(growth - Decimal::ONE))
            .ok_or(LeasePaymentError::Overflow)?;

        Ok((present_value_of_residual, financed_amount, monthly_payment))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_half_up;

    fn terms(
        price: Decimal,
        interest_rate_percent: Decimal,
        months: i32,
        residual_value_fraction: Decimal,
    ) -> LeaseTerms {
        LeaseTerms {
            price,
            interest_rate_percent,
            months,
            residual_value_fraction,
        }
    }

    // =========================================================================
    // from_vehicle tests
    // =========================================================================

    #[test]
    fn from_vehicle_uses_actual_price_and_percent_residual() {
        let vehicle = VehicleInput {
            purchase_price: dec!(400000),
            actual_price: dec!(380000),
            interest_rate_percent: dec!(4.5),
            leasing_period_months: 48,
            residual_value_percent: dec!(40),
            ..VehicleInput::default()
        };

        let terms = LeaseTerms::from_vehicle(&vehicle);

        assert_eq!(terms.price, dec!(380000));
        assert_eq!(terms.interest_rate_percent, dec!(4.5));
        assert_eq!(terms.months, 48);
        assert_eq!(terms.residual_value_fraction, dec!(0.4));
    }

    // =========================================================================
    // payment tests
    // =========================================================================

    #[test]
    fn zero_interest_is_straight_line() {
        let result = terms(dec!(300000), dec!(0), 36, dec!(0.5))
            .payment()
            .unwrap();

        assert_eq!(result.residual_value, dec!(150000));
        assert_eq!(result.financed_amount, dec!(150000));
        assert_eq!(round_half_up(result.monthly_payment), dec!(4166.67));
        assert_eq!(round_half_up(result.annual_payment), dec!(50000));
    }

    #[test]
    fn plain_annuity_without_residual() {
        let result = terms(dec!(100000), dec!(12), 12, dec!(0))
            .payment()
            .unwrap();

        assert_eq!(result.monthly_rate, dec!(0.01));
        assert_eq!(result.present_value_of_residual, dec!(0));
        assert_eq!(round_half_up(result.monthly_payment), dec!(8884.88));
        assert_eq!(round_half_up(result.annual_payment), dec!(106618.55));
    }

    #[test]
    fn annuity_with_residual() {
        let result = terms(dec!(300000), dec!(12), 36, dec!(0.5))
            .payment()
            .unwrap();

        assert_eq!(round_half_up(result.annual_payment), dec!(77785.76));
    }

    #[test]
    fn payment_increases_with_interest_rate() {
        let payments: Vec<Decimal> = [dec!(0), dec!(1), dec!(4.5), dec!(8), dec!(15)]
            .into_iter()
            .map(|rate| {
                terms(dec!(380000), rate, 36, dec!(0.5))
                    .payment()
                    .unwrap()
                    .annual_payment
            })
            .collect();

        assert!(payments.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn full_residual_at_zero_interest_costs_nothing() {
        let result = terms(dec!(300000), dec!(0), 36, dec!(1))
            .payment()
            .unwrap();

        assert_eq!(result.annual_payment, dec!(0));
    }

    #[test]
    fn zero_price_yields_zero() {
        let result = terms(dec!(0), dec!(4.5), 36, dec!(0.5)).payment();

        assert_eq!(result, Ok(LeasePaymentResult::zero()));
    }

    #[test]
    fn zero_months_yields_zero() {
        let result = terms(dec!(300000), dec!(4.5), 0, dec!(0.5)).payment();

        assert_eq!(result, Ok(LeasePaymentResult::zero()));
    }

    #[test]
    fn negative_interest_is_rejected() {
        let result = terms(dec!(300000), dec!(-1), 36, dec!(0.5)).payment();

        assert_eq!(result, Err(LeasePaymentError::NegativeInterestRate(dec!(-1))));
    }

    #[test]
    fn residual_above_one_is_rejected() {
        let result = terms(dec!(300000), dec!(4.5), 36, dec!(1.5)).payment();

        assert_eq!(result, Err(LeasePaymentError::ResidualOutOfRange(dec!(1.5))));
    }

    #[test]
    fn runaway_growth_reports_overflow() {
        let result = terms(dec!(300000), dec!(1200), 1200, dec!(0)).payment();

        assert_eq!(result, Err(LeasePaymentError::Overflow));
    }
}
