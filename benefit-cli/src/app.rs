use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use benefit_core::calculations::marginal_tax_rate_for_salary;
use benefit_core::{RuleSetRegistry, TaxRuleSet, UserTaxContext, VehicleCalculator};
use benefit_data::{RuleSetLoader, VehicleLoader};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::output::VehicleReport;

/// Where the user's marginal tax rate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Given directly as a fraction.
    Marginal(Decimal),
    /// Looked up in the rule set's income brackets.
    GrossSalary(Decimal),
    /// Neither was given; the lowest bracket applies.
    Default,
}

/// Everything one calculation run needs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub vehicles: PathBuf,
    pub tax_year: i32,
    pub rule_files: Vec<PathBuf>,
    pub rate: RateSource,
}

/// Builds the rule-set registry: built-in years first, then every file in
/// order, so a later file replaces an earlier one for the same year.
pub fn build_registry(rule_files: &[PathBuf]) -> Result<RuleSetRegistry> {
    let mut registry = RuleSetRegistry::with_builtin();
    for path in rule_files {
        RuleSetLoader::register_file(&mut registry, path)
            .with_context(|| format!("failed to load rule set: {}", path.display()))?;
    }
    debug!(years = ?registry.available_years(), "rule sets available");
    Ok(registry)
}

/// Resolves the marginal tax rate for `rules`.
pub fn resolve_marginal_rate(
    source: RateSource,
    rules: &TaxRuleSet,
) -> Result<Decimal> {
    let salary = match source {
        RateSource::Marginal(rate) => return Ok(rate),
        RateSource::GrossSalary(salary) => salary,
        RateSource::Default => Decimal::ZERO,
    };

    let rate = marginal_tax_rate_for_salary(salary, &rules.income_tax_brackets).with_context(
        || format!("cannot derive a marginal tax rate for tax year {}", rules.tax_year),
    )?;
    debug!(salary = %salary, rate = %rate, "marginal tax rate from income brackets");
    Ok(rate)
}

/// Loads the vehicles and calculates every one of them.
pub fn run(options: &RunOptions) -> Result<Vec<VehicleReport>> {
    let registry = build_registry(&options.rule_files)?;
    let rules = registry.get(options.tax_year)?;
    let marginal_tax_rate = resolve_marginal_rate(options.rate, rules)?;

    calculate_file(&options.vehicles, rules, marginal_tax_rate)
}

fn calculate_file(
    path: &Path,
    rules: &TaxRuleSet,
    marginal_tax_rate: Decimal,
) -> Result<Vec<VehicleReport>> {
    let records = VehicleLoader::load_from_file(path, rules)
        .with_context(|| format!("failed to load vehicles: {}", path.display()))?;
    info!(
        count = records.len(),
        tax_year = rules.tax_year,
        "calculating vehicles"
    );

    let calculator = VehicleCalculator::new(rules)?;
    let tax = UserTaxContext::new(marginal_tax_rate);

    records
        .into_iter()
        .map(|record| {
            let report = calculator
                .calculate(&record.vehicle, &tax)
                .with_context(|| format!("calculation failed for '{}'", record.name))?;
            Ok(VehicleReport {
                propulsion: record.vehicle.propulsion(),
                name: record.name,
                tax_year: rules.tax_year,
                marginal_tax_rate,
                report,
            })
        })
        .collect()
}
