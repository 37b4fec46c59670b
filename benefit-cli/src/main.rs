use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use rust_decimal::Decimal;
use tracing::debug;

use benefit_cli::app::{self, RateSource, RunOptions};
use benefit_cli::logging;
use benefit_cli::output::{self, OutputFormat};
use benefit_cli::utils::parse_decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Company-car benefit value and cost calculator.
///
/// Reads vehicle options from a CSV file and prints benefit value, private
/// cost of ownership, employer cost and net-salary equivalent for each.
#[derive(Debug, Parser)]
#[command(name = "benefit-calc", version, about)]
#[command(group(ArgGroup::new("rate").args(["marginal_rate", "gross_salary"])))]
struct Cli {
    /// CSV file with one vehicle option per row.
    #[arg(long)]
    vehicles: PathBuf,

    /// Tax year whose rule set is used.
    #[arg(long, default_value = "2025")]
    year: i32,

    /// Extra rule-set TOML file. May be repeated; a file replaces the
    /// built-in rule set for the same year.
    #[arg(long = "rules")]
    rules: Vec<PathBuf>,

    /// Marginal income tax rate as a fraction, e.g. 0.32.
    #[arg(long, value_parser = parse_decimal)]
    marginal_rate: Option<Decimal>,

    /// Gross annual salary; the marginal rate is looked up in the income brackets.
    #[arg(long, value_parser = parse_decimal)]
    gross_salary: Option<Decimal>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Log level or filter directive. `RUST_LOG` takes precedence.
    #[arg(long)]
    log_level: Option<String>,

    /// Append log output to this file as well.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn rate_source(&self) -> RateSource {
        match (self.marginal_rate, self.gross_salary) {
            (Some(rate), _) => RateSource::Marginal(rate),
            (None, Some(salary)) => RateSource::GrossSalary(salary),
            (None, None) => RateSource::Default,
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn run(cli: &Cli) -> anyhow::Result<()> {
    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;
    debug!(?cli, "starting");

    let options = RunOptions {
        vehicles: cli.vehicles.clone(),
        tax_year: cli.year,
        rule_files: cli.rules.clone(),
        rate: cli.rate_source(),
    };

    let reports = app::run(&options)?;
    println!("{}", output::render(cli.output, &reports)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
