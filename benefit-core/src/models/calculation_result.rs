use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline figures for one vehicle option.
///
/// Always derived from a [`VehicleInput`](super::VehicleInput), a
/// [`UserTaxContext`](super::UserTaxContext) and a rule set; callers may cache
/// it but it is never a source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub benefit_value_annual: Decimal,
    pub benefit_value_monthly: Decimal,

    /// Private total cost of ownership.
    pub total_owner_cost_annual: Decimal,

    /// Budget-frame cost charged to the employee's compensation budget.
    pub total_employer_cost_annual: Decimal,

    pub net_salary_equivalent_annual: Decimal,

    /// Net salary equivalent per distance unit (mil).
    ///
    /// `None` when the annual distance is zero or negative; callers should
    /// ask the user for a distance instead of displaying a number.
    pub cost_per_distance_unit: Option<Decimal>,
}
