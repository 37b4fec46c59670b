use std::collections::HashMap;

use super::{RuleSetError, TaxRuleSet, sweden_2025};

/// Registry of [`TaxRuleSet`] instances, keyed by tax year.
///
/// Typical lifetime:
/// 1. Create with `RuleSetRegistry::with_builtin()` (or `new()` for an empty one).
/// 2. Call `register` for every rule set loaded from configuration.
/// 3. Call `get` whenever a calculator needs the constants for a year.
#[derive(Debug, Clone)]
pub struct RuleSetRegistry {
    rule_sets: HashMap<i32, TaxRuleSet>,
}

impl RuleSetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            rule_sets: HashMap::new(),
        }
    }

    /// Create a registry holding every rule set shipped with the crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.rule_sets.insert(2025, sweden_2025());
        registry
    }

    /// Register a rule set after validating it.
    ///
    /// If a rule set for the same tax year is already present it is replaced.
    ///
    /// # Errors
    /// Any [`RuleSetError`] returned by [`TaxRuleSet::validate`].
    pub fn register(
        &mut self,
        rule_set: TaxRuleSet,
    ) -> Result<(), RuleSetError> {
        rule_set.validate()?;
        self.rule_sets.insert(rule_set.tax_year, rule_set);
        Ok(())
    }

    /// Every registered tax year, sorted ascending.
    pub fn available_years(&self) -> Vec<i32> {
        let mut years: Vec<_> = self.rule_sets.keys().copied().collect();
        years.sort_unstable();
        years
    }

    /// Look up the rule set for `tax_year`.
    ///
    /// # Errors
    /// * [`RuleSetError::UnknownTaxYear`] if nothing is registered for that year.
    pub fn get(
        &self,
        tax_year: i32,
    ) -> Result<&TaxRuleSet, RuleSetError> {
        self.rule_sets
            .get(&tax_year)
            .ok_or_else(|| RuleSetError::UnknownTaxYear {
                year: tax_year,
                available: self.available_years(),
            })
    }
}

impl Default for RuleSetRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// tests
// ─────────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn rule_set_for(year: i32) -> TaxRuleSet {
        TaxRuleSet {
            tax_year: year,
            ..sweden_2025()
        }
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = RuleSetRegistry::new();

        assert!(registry.available_years().is_empty());
    }

    #[test]
    fn builtin_registry_contains_2025() {
        let registry = RuleSetRegistry::with_builtin();

        assert_eq!(registry.available_years(), vec![2025]);
        assert_eq!(registry.get(2025).map(|r| r.tax_year), Ok(2025));
    }

    #[test]
    fn available_years_are_sorted() {
        let mut registry = RuleSetRegistry::new();
        registry.register(rule_set_for(2026)).unwrap();
        registry.register(rule_set_for(2023)).unwrap();
        registry.register(rule_set_for(2024)).unwrap();

        assert_eq!(registry.available_years(), vec![2023, 2024, 2026]);
    }

    #[test]
    fn register_replaces_existing_year() {
        let mut registry = RuleSetRegistry::with_builtin();
        let replacement = TaxRuleSet {
            price_rate: dec!(0.13),
            interest_rate_factor: dec!(0.02785),
            ..sweden_2025()
        };

        registry.register(replacement).unwrap();

        assert_eq!(registry.available_years(), vec![2025]);
        assert_eq!(registry.get(2025).unwrap().price_rate, dec!(0.13));
    }

    #[test]
    fn register_rejects_invalid_rule_set() {
        let mut registry = RuleSetRegistry::new();
        let invalid = TaxRuleSet {
            employer_social_fee_rate: dec!(-0.1),
            ..rule_set_for(2024)
        };

        let result = registry.register(invalid);

        assert_eq!(
            result,
            Err(RuleSetError::RateOutOfRange {
                field: "employer_social_fee_rate",
                value: dec!(-0.1),
            })
        );
        assert!(registry.available_years().is_empty());
    }

    #[test]
    fn get_unknown_year_lists_available() {
        let registry = RuleSetRegistry::with_builtin();

        let result = registry.get(1999);

        assert_eq!(
            result,
            Err(RuleSetError::UnknownTaxYear {
                year: 1999,
                available: vec![2025],
            })
        );
    }
}
