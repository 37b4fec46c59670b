use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the simplified salary-to-marginal-rate table.
///
/// A bracket covers gross annual salaries in `(min_income, max_income]`;
/// `max_income` of `None` marks the open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub marginal_rate: Decimal,
}
