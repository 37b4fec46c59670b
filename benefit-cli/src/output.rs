use anyhow::{Context, Result};
use benefit_core::{CalculationReport, Propulsion};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{Table, builder::Builder, settings::Style};

use crate::utils::opt_decimal_display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Calculation outcome for one named vehicle.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleReport {
    pub name: String,
    pub propulsion: Propulsion,
    pub tax_year: i32,
    pub marginal_tax_rate: Decimal,
    #[serde(flatten)]
    pub report: CalculationReport,
}

const CSV_HEADERS: [&str; 8] = [
    "name",
    "propulsion",
    "benefit_value_annual",
    "benefit_value_monthly",
    "total_owner_cost_annual",
    "total_employer_cost_annual",
    "net_salary_equivalent_annual",
    "cost_per_distance_unit",
];

const TABLE_HEADERS: [&str; 8] = [
    "Vehicle",
    "Propulsion",
    "Benefit / yr",
    "Benefit / mo",
    "Private TCO / yr",
    "Employer cost / yr",
    "Net salary eq. / yr",
    "Cost / mil",
];

/// Renders reports in the requested format.
///
/// Table and CSV show the headline figures only; JSON carries every
/// breakdown.
pub fn render(
    format: OutputFormat,
    reports: &[VehicleReport],
) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(reports)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(reports).context("failed to serialise reports as JSON")
        }
        OutputFormat::Csv => render_csv(reports),
    }
}

fn summary_row(report: &VehicleReport) -> [String; 8] {
    let result = &report.report.result;
    [
        report.name.clone(),
        report.propulsion.as_str().to_string(),
        result.benefit_value_annual.to_string(),
        result.benefit_value_monthly.to_string(),
        result.total_owner_cost_annual.to_string(),
        result.total_employer_cost_annual.to_string(),
        result.net_salary_equivalent_annual.to_string(),
        opt_decimal_display(&result.cost_per_distance_unit),
    ]
}

fn render_table(reports: &[VehicleReport]) -> String {
    if reports.is_empty() {
        return "(no vehicles)".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(TABLE_HEADERS);
    for report in reports {
        builder.push_record(summary_row(report));
    }

    let mut table = Table::from(builder);
    table.with(Style::rounded());
    table.to_string()
}

fn render_csv(reports: &[VehicleReport]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADERS)?;

    for report in reports {
        let mut row = summary_row(report);
        // Empty cell instead of the display dash.
        if report.report.result.cost_per_distance_unit.is_none() {
            row[7].clear();
        }
        wtr.write_record(&row)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| e.into_error())
        .context("failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}
