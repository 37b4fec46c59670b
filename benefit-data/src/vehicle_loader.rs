//! CSV loader for vehicle options.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Optional
//! columns may be left out entirely or left empty on a row.
//!
//! | Column | Required | Type | Notes |
//! |---------------------------------|----------|---------|------------------------------------------|
//! | `name` | yes | string | Label shown in reports |
//! | `purchase_price` | yes | decimal | List price |
//! | `propulsion` | yes | string | `conventional`, `electric`, `plugin_hybrid` |
//! | `actual_price` | no | decimal | Defaults to `purchase_price` |
//! | `electric_range_km` | no | decimal | Plug-in hybrids only |
//! | `registration_date` | no | date | `YYYY-MM-DD`, compared to the cutoff |
//! | `registered_after_cutoff` | no | bool | Wins over `registration_date` |
//! | `vehicle_tax_annual` | no | decimal | Defaults to 0 |
//! | `extra_equipment_value` | no | decimal | Defaults to 0 |
//! | `service_distance_km_per_year` | no | decimal | Defaults to 0 |
//! | `is_leasing` | no | bool | Defaults to `false` |
//! | `interest_rate_percent` | no | decimal | Defaults to 0 |
//! | `leasing_period_months` | no | integer | Defaults to 36 |
//! | `residual_value_percent` | no | decimal | Defaults to 0 |
//! | `annual_leasing_cost` | no | decimal | Computed from the terms when empty |
//! | `insurance_included_in_lease` | no | bool | Defaults to `false` |
//! | `maintenance_included_in_lease` | no | bool | Defaults to `false` |
//! | `annual_distance_km` | no | decimal | Defaults to 0 |
//!
//! ### Minimal example
//!
//! ```csv
//! name,purchase_price,propulsion
//! Volvo V60 B4,400000,conventional
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use benefit_core::{Propulsion, TaxRuleSet, VehicleInput};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    purchase_price: Decimal,
    propulsion: String,
    actual_price: Option<Decimal>,
    electric_range_km: Option<Decimal>,
    registration_date: Option<String>,
    registered_after_cutoff: Option<bool>,
    vehicle_tax_annual: Option<Decimal>,
    extra_equipment_value: Option<Decimal>,
    service_distance_km_per_year: Option<Decimal>,
    is_leasing: Option<bool>,
    interest_rate_percent: Option<Decimal>,
    leasing_period_months: Option<i32>,
    residual_value_percent: Option<Decimal>,
    annual_leasing_cost: Option<Decimal>,
    insurance_included_in_lease: Option<bool>,
    maintenance_included_in_lease: Option<bool>,
    annual_distance_km: Option<Decimal>,
}

/// Errors that can occur while loading vehicles.
#[derive(Debug, Error)]
pub enum VehicleLoaderError {
    /// Bad CSV structure, a missing required column, or a type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `row` is 1-based; the header is row 0.
    #[error("unrecognised propulsion '{value}' on row {row}")]
    InvalidPropulsion { value: String, row: usize },

    #[error("invalid registration date '{value}' on row {row} (expected YYYY-MM-DD)")]
    InvalidRegistrationDate { value: String, row: usize },

    #[error("{field} must be non-negative, got {value} on row {row}")]
    NegativeAmount {
        field: &'static str,
        value: Decimal,
        row: usize,
    },
}

/// A named vehicle option ready for the calculators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleRecord {
    pub name: String,
    pub vehicle: VehicleInput,
}

/// Loader for vehicle options from CSV.
///
/// The rule set is needed to turn a registration date into the
/// registered-after-cutoff flag.
pub struct VehicleLoader;

impl VehicleLoader {
    /// Parses vehicle records from any CSV reader, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`VehicleLoaderError`] on the first row that fails to parse or
    /// convert.
    pub fn parse<R: Read>(
        reader: R,
        rules: &TaxRuleSet,
    ) -> Result<Vec<VehicleRecord>, VehicleLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let records = csv_reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| convert_row(result?, idx + 1, rules))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = records.len(), "parsed vehicle records");
        Ok(records)
    }

    /// Reads a CSV file from disk and delegates to [`VehicleLoader::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`VehicleLoaderError::Io`] when the file cannot be opened,
    /// otherwise any error from [`VehicleLoader::parse`].
    pub fn load_from_file(
        path: &Path,
        rules: &TaxRuleSet,
    ) -> Result<Vec<VehicleRecord>, VehicleLoaderError> {
        let file = File::open(path).map_err(|source| VehicleLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(file, rules)
    }
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
    rules: &TaxRuleSet,
) -> Result<VehicleRecord, VehicleLoaderError> {
    let propulsion = Propulsion::parse(&row.propulsion).ok_or_else(|| {
        VehicleLoaderError::InvalidPropulsion {
            value: row.propulsion.clone(),
            row: row_number,
        }
    })?;

    let registered_after_cutoff_date = registered_after_cutoff(&row, row_number, rules)?;
    let defaults = VehicleInput::default();

    let vehicle = VehicleInput {
        purchase_price: row.purchase_price,
        actual_price: row.actual_price.unwrap_or(row.purchase_price),
        is_electric: propulsion.is_electric(),
        is_plugin_hybrid: propulsion.is_plugin_hybrid(),
        electric_range_km: row.electric_range_km,
        registered_after_cutoff_date,
        vehicle_tax_annual: row.vehicle_tax_annual.unwrap_or_default(),
        extra_equipment_value: row.extra_equipment_value.unwrap_or_default(),
        service_distance_km_per_year: row.service_distance_km_per_year.unwrap_or_default(),
        is_leasing: row.is_leasing.unwrap_or_default(),
        interest_rate_percent: row.interest_rate_percent.unwrap_or_default(),
        leasing_period_months: row
            .leasing_period_months
            .unwrap_or(defaults.leasing_period_months),
        residual_value_percent: row.residual_value_percent.unwrap_or_default(),
        annual_leasing_cost: row.annual_leasing_cost,
        insurance_included_in_lease: row.insurance_included_in_lease.unwrap_or_default(),
        maintenance_included_in_lease: row.maintenance_included_in_lease.unwrap_or_default(),
        annual_distance_km: row.annual_distance_km.unwrap_or_default(),
    };

    check_amounts(&vehicle, row_number)?;

    Ok(VehicleRecord {
        name: row.name,
        vehicle,
    })
}

fn registered_after_cutoff(
    row: &CsvRow,
    row_number: usize,
    rules: &TaxRuleSet,
) -> Result<bool, VehicleLoaderError> {
    let from_date = row
        .registration_date
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|date| rules.is_registered_after_cutoff(date))
                .map_err(|_| VehicleLoaderError::InvalidRegistrationDate {
                    value: s.to_string(),
                    row: row_number,
                })
        })
        .transpose()?;

    match (row.registered_after_cutoff, from_date) {
        (Some(explicit), Some(derived)) if explicit != derived => {
            warn!(
                row = row_number,
                name = %row.name,
                "registered_after_cutoff contradicts registration_date, using explicit value"
            );
            Ok(explicit)
        }
        (Some(explicit), _) => Ok(explicit),
        (None, Some(derived)) => Ok(derived),
        (None, None) => Ok(VehicleInput::default().registered_after_cutoff_date),
    }
}

fn check_amounts(
    vehicle: &VehicleInput,
    row_number: usize,
) -> Result<(), VehicleLoaderError> {
    let amounts = [
        ("purchase_price", Some(vehicle.purchase_price)),
        ("actual_price", Some(vehicle.actual_price)),
        ("electric_range_km", vehicle.electric_range_km),
        ("vehicle_tax_annual", Some(vehicle.vehicle_tax_annual)),
        ("extra_equipment_value", Some(vehicle.extra_equipment_value)),
        (
            "service_distance_km_per_year",
            Some(vehicle.service_distance_km_per_year),
        ),
        ("interest_rate_percent", Some(vehicle.interest_rate_percent)),
        ("residual_value_percent", Some(vehicle.residual_value_percent)),
        ("annual_leasing_cost", vehicle.annual_leasing_cost),
        ("annual_distance_km", Some(vehicle.annual_distance_km)),
    ];

    for (field, value) in amounts {
        if let Some(value) = value.filter(|v| *v < Decimal::ZERO) {
            return Err(VehicleLoaderError::NegativeAmount {
                field,
                value,
                row: row_number,
            });
        }
    }
    Ok(())
}
