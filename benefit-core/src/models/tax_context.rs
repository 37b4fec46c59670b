use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-user tax parameters supplied by a settings provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTaxContext {
    /// Marginal income tax rate as a fraction in `[0, 1]`.
    pub marginal_tax_rate: Decimal,
}

impl UserTaxContext {
    pub fn new(marginal_tax_rate: Decimal) -> Self {
        Self { marginal_tax_rate }
    }
}
