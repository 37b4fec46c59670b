//! TOML loader for tax rule sets.
//!
//! A rule-set file holds every field of [`TaxRuleSet`] at the top level, with
//! the per-propulsion tables and lists as TOML tables and arrays of tables:
//!
//! ```toml
//! tax_year = 2024
//! registration_cutoff = "2022-07-01"
//! base_amount = "10500"
//! # ...
//!
//! [fuel_cost_per_km]
//! conventional = "1.5"
//! electric = "0.4"
//! plugin_hybrid = "1.0"
//!
//! [[plugin_hybrid_range_steps]]
//! min_range_km = "60"
//! factor = "0.8"
//! ```
//!
//! Decimals are written as strings so they keep their exact value.

use std::path::{Path, PathBuf};

use benefit_core::{RuleSetError, RuleSetRegistry, TaxRuleSet};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading a rule set.
#[derive(Debug, Error)]
pub enum RuleSetLoaderError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid rule set: {0}")]
    Invalid(#[from] RuleSetError),
}

/// Loader for [`TaxRuleSet`] files.
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// Parses and validates a rule set from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetLoaderError::Parse`] for malformed TOML or missing
    /// fields and [`RuleSetLoaderError::Invalid`] when validation fails.
    pub fn parse(input: &str) -> Result<TaxRuleSet, RuleSetLoaderError> {
        let rule_set: TaxRuleSet = toml::from_str(input)?;
        rule_set.validate()?;
        Ok(rule_set)
    }

    /// Reads a TOML file from disk and delegates to [`RuleSetLoader::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetLoaderError::Io`] when the file cannot be read,
    /// otherwise any error from [`RuleSetLoader::parse`].
    pub fn load_from_file(path: &Path) -> Result<TaxRuleSet, RuleSetLoaderError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| RuleSetLoaderError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&contents)
    }

    /// Loads a file and registers the rule set, replacing any rule set
    /// already registered for the same year. Returns the tax year.
    ///
    /// # Errors
    ///
    /// Any error from [`RuleSetLoader::load_from_file`] or
    /// [`RuleSetRegistry::register`].
    pub fn register_file(
        registry: &mut RuleSetRegistry,
        path: &Path,
    ) -> Result<i32, RuleSetLoaderError> {
        let rule_set = Self::load_from_file(path)?;
        let tax_year = rule_set.tax_year;
        registry.register(rule_set)?;

        info!(tax_year, path = %path.display(), "registered rule set");
        Ok(tax_year)
    }
}
