//! Calculators for company-car benefit value and vehicle costs.
//!
//! Each calculator is a small struct bound to a [`TaxRuleSet`](crate::rules::TaxRuleSet)
//! that returns a breakdown of every intermediate figure.
//! [`VehicleCalculator`] chains them for one vehicle option.

pub mod benefit_value;
pub mod common;
pub mod income_tax;
pub mod lease_payment;
pub mod ownership;
pub mod salary_equivalent;
pub mod vehicle;

pub use benefit_value::{BenefitValueCalculator, BenefitValueError, BenefitValueResult};
pub use income_tax::{IncomeTaxError, marginal_tax_rate_for_salary};
pub use lease_payment::{LeasePaymentError, LeasePaymentResult, LeaseTerms};
pub use ownership::{EmployerCost, OwnershipCostCalculator, OwnershipCostError, PrivateOwnershipCost};
pub use salary_equivalent::{NetSalaryEquivalent, SalaryEquivalentCalculator, SalaryEquivalentError};
pub use vehicle::{CalculationError, CalculationReport, VehicleCalculator};
