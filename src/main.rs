//! Realty Projection CLI
//!
//! Command-line interface for projecting a rental property investment

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser};

use realty_projection::{
    metrics::IrrSolver,
    params::{load_parameters, load_scenarios},
    projection::ProjectionConfig,
    report::{format_optional_rate, format_percentage, render_text, write_years_csv},
    InvestmentParameters, RentAdjustment, RentPeriod, ScenarioRunner,
};

#[derive(Parser, Debug)]
#[command(name = "realty-projection", version, about = "Project cash flows and returns of a rental property")]
struct Cli {
    /// JSON file with the investment parameters (missing fields use defaults)
    #[arg(long, conflicts_with = "scenarios")]
    params: Option<PathBuf>,

    /// CSV file with one parameter set per row, evaluated as a batch
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// Write the year-by-year records to this CSV file
    #[arg(long, conflicts_with = "scenarios")]
    years_csv: Option<PathBuf>,

    /// Print the full report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Longest accepted investment horizon in years
    #[arg(long, default_value_t = realty_projection::params::DEFAULT_MAX_HORIZON_YEARS)]
    max_years: u32,

    #[command(flatten)]
    overrides: Overrides,
}

/// Individual parameter overrides, applied on top of the file or the defaults
#[derive(Args, Debug)]
struct Overrides {
    #[arg(long)]
    label: Option<String>,
    #[arg(long)]
    property_value: Option<f64>,
    /// Gross rent (annual unless --rent-period monthly)
    #[arg(long)]
    rent: Option<f64>,
    #[arg(long, value_enum)]
    rent_period: Option<RentPeriod>,
    /// Annual appreciation (%)
    #[arg(long, allow_negative_numbers = true)]
    appreciation: Option<f64>,
    /// Annual inflation (%)
    #[arg(long, allow_negative_numbers = true)]
    inflation: Option<f64>,
    #[arg(long)]
    years: Option<u32>,
    /// Vacancy (% of the year)
    #[arg(long)]
    vacancy: Option<f64>,
    /// Extraordinary maintenance (% of property value)
    #[arg(long)]
    maintenance: Option<f64>,
    /// Tax on rent (%)
    #[arg(long)]
    rent_tax: Option<f64>,
    /// Property tax (% of property value)
    #[arg(long)]
    property_tax: Option<f64>,
    #[arg(long)]
    insurance: Option<f64>,
    #[arg(long)]
    management: Option<f64>,
    /// Monthly mortgage payment
    #[arg(long)]
    mortgage_payment: Option<f64>,
    #[arg(long)]
    mortgage_years: Option<u32>,
    #[arg(long, value_enum)]
    adjustment: Option<RentAdjustment>,
    /// Rent adjustment interval in years
    #[arg(long)]
    adjust_every: Option<u32>,
    #[arg(long)]
    initial_commission: Option<f64>,
    #[arg(long)]
    final_commission: Option<f64>,
    #[arg(long)]
    purchase_cost: Option<f64>,
    #[arg(long)]
    renovation_cost: Option<f64>,
}

impl Overrides {
    fn apply(&self, params: &mut InvestmentParameters) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        if self.label.is_some() {
            params.label = self.label.clone();
        }
        set(&mut params.property_value, &self.property_value);
        set(&mut params.gross_rent, &self.rent);
        set(&mut params.rent_period, &self.rent_period);
        set(&mut params.appreciation_pct, &self.appreciation);
        set(&mut params.inflation_pct, &self.inflation);
        set(&mut params.investment_years, &self.years);
        set(&mut params.vacancy_pct, &self.vacancy);
        set(&mut params.maintenance_pct, &self.maintenance);
        set(&mut params.rent_tax_pct, &self.rent_tax);
        set(&mut params.property_tax_pct, &self.property_tax);
        set(&mut params.insurance_cost, &self.insurance);
        set(&mut params.management_cost, &self.management);
        set(&mut params.monthly_mortgage_payment, &self.mortgage_payment);
        set(&mut params.remaining_mortgage_years, &self.mortgage_years);
        set(&mut params.rent_adjustment, &self.adjustment);
        set(&mut params.rent_adjustment_interval, &self.adjust_every);
        set(&mut params.initial_commission, &self.initial_commission);
        set(&mut params.final_commission, &self.final_commission);
        if self.purchase_cost.is_some() {
            params.purchase_cost = self.purchase_cost;
        }
        if self.renovation_cost.is_some() {
            params.renovation_cost = self.renovation_cost;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let runner = ScenarioRunner::with_config(
        ProjectionConfig { max_horizon_years: cli.max_years },
        IrrSolver::default(),
    );

    match &cli.scenarios {
        Some(path) => run_batch(&cli, &runner, path),
        None => run_single(&cli, &runner),
    }
}

fn run_single(cli: &Cli, runner: &ScenarioRunner) -> Result<()> {
    let mut params = match &cli.params {
        Some(path) => load_parameters(path)
            .with_context(|| format!("failed to load parameters from {}", path.display()))?,
        None => InvestmentParameters::default(),
    };
    cli.overrides.apply(&mut params);

    let report = runner.run(&params).context("invalid investment parameters")?;

    if let Some(path) = &cli.years_csv {
        let file = File::create(path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        write_years_csv(file, &report.years)?;
        log::info!("year records written to {}", path.display());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

fn run_batch(cli: &Cli, runner: &ScenarioRunner, path: &Path) -> Result<()> {
    let mut scenarios = load_scenarios(path)
        .with_context(|| format!("failed to load scenarios from {}", path.display()))?;
    for params in &mut scenarios {
        cli.overrides.apply(params);
    }
    log::info!("loaded {} scenarios from {}", scenarios.len(), path.display());

    let results = runner.run_batch(&scenarios);

    if cli.json {
        let reports: Vec<_> = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("{:<20} {:>12} {:>12} {:>12} {:>12}", "Scenario", "CAGR", "CAGR real", "IRR", "ROI");
        println!("{}", "-".repeat(72));
    }

    for (i, (params, result)) in scenarios.iter().zip(&results).enumerate() {
        let label = params.label.clone().unwrap_or_else(|| format!("#{}", i + 1));
        match result {
            Ok(report) if !cli.json => {
                println!(
                    "{:<20} {:>12} {:>12} {:>12} {:>12}",
                    label,
                    format_percentage(report.projection.cagr_nominal * 100.0, 2),
                    format_percentage(report.projection.cagr_real * 100.0, 2),
                    format_optional_rate(report.metrics.irr_nominal, 2),
                    format_percentage(report.metrics.roi_nominal_pct, 2),
                );
            }
            Ok(_) => {}
            Err(err) => log::error!("scenario {} skipped: {}", label, err),
        }
    }
    Ok(())
}
