//! Scenario runner combining projection, return metrics and derived insights
//!
//! Each scenario is evaluated independently, so batches can be spread across
//! threads without coordination.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::metrics::{derive_metrics_with, IrrSolver, ReturnMetrics};
use crate::params::InvestmentParameters;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, YearRecord};

/// How heavy the mortgage payment is relative to the initial rent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MortgageBurden {
    /// Below 50% of the initial rent
    Sustainable,
    /// 50% to 70%
    Challenging,
    /// Above 70%
    Risky,
}

impl MortgageBurden {
    pub fn from_payment_to_rent_pct(pct: f64) -> Self {
        if pct < 50.0 {
            MortgageBurden::Sustainable
        } else if pct < 70.0 {
            MortgageBurden::Challenging
        } else {
            MortgageBurden::Risky
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageAnalysis {
    pub annual_payment: f64,
    /// Annual payment as a percentage of the initial annual gross rent
    pub payment_to_rent_pct: f64,
    pub burden: MortgageBurden,
    /// Trailing years of the horizon with no payment due
    pub mortgage_free_years: u32,
    pub total_cost: f64,
    /// Nominal total return had the property been bought in cash
    pub return_without_mortgage: f64,
}

/// How closely nominal CAGR and IRR agree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricAgreement {
    /// Within half a percentage point: cash flows evenly spread over time
    WellDistributed,
    /// Within two percentage points
    SmallDifference,
    /// Timing of the cash flows matters
    SignificantDifference,
}

impl MetricAgreement {
    /// Compare two decimal rates
    pub fn compare(cagr: f64, irr: f64) -> Self {
        let gap_pp = (cagr - irr).abs() * 100.0;
        if gap_pp < 0.5 {
            MetricAgreement::WellDistributed
        } else if gap_pp < 2.0 {
            MetricAgreement::SmallDifference
        } else {
            MetricAgreement::SignificantDifference
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub mortgage: Option<MortgageAnalysis>,
    /// None when the nominal IRR is undefined
    pub cagr_irr_agreement: Option<MetricAgreement>,
}

impl Insights {
    pub fn derive(
        params: &InvestmentParameters,
        projection: &ProjectionResult,
        metrics: &ReturnMetrics,
    ) -> Self {
        let mortgage = (projection.total_mortgage_cost > 0.0).then(|| {
            let annual_payment = params.annual_mortgage_payment();
            let initial_rent = params.annual_gross_rent();
            let payment_to_rent_pct = if initial_rent > 0.0 {
                annual_payment / initial_rent * 100.0
            } else {
                0.0
            };
            MortgageAnalysis {
                annual_payment,
                payment_to_rent_pct,
                burden: MortgageBurden::from_payment_to_rent_pct(payment_to_rent_pct),
                mortgage_free_years: params
                    .investment_years
                    .saturating_sub(params.remaining_mortgage_years),
                total_cost: projection.total_mortgage_cost,
                return_without_mortgage: projection.total_return_nominal + projection.total_mortgage_cost,
            }
        });

        let cagr_irr_agreement = metrics
            .irr_nominal
            .map(|irr| MetricAgreement::compare(projection.cagr_nominal, irr));

        Self { mortgage, cagr_irr_agreement }
    }
}

/// Everything computed for one parameter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub parameters: InvestmentParameters,
    pub years: Vec<YearRecord>,
    pub projection: ProjectionResult,
    pub metrics: ReturnMetrics,
    pub insights: Insights,
}

/// Runs projections and metrics with shared configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// for appreciation_pct in [1.0, 2.0, 3.0] {
///     let params = InvestmentParameters { appreciation_pct, ..Default::default() };
///     let report = runner.run(&params)?;
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: ProjectionConfig,
    solver: IrrSolver,
}

impl ScenarioRunner {
    /// Create runner with default projection and solver settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig, solver: IrrSolver) -> Self {
        Self { config, solver }
    }

    /// Run a single scenario
    pub fn run(&self, params: &InvestmentParameters) -> ValidationResult<ScenarioReport> {
        let engine = ProjectionEngine::new(params.clone(), self.config.clone());
        let (years, projection) = engine.project()?;
        let metrics = derive_metrics_with(params, &projection, &self.solver);
        let insights = Insights::derive(params, &projection, &metrics);

        Ok(ScenarioReport {
            parameters: params.clone(),
            years,
            projection,
            metrics,
            insights,
        })
    }

    /// Run many independent scenarios, preserving input order
    pub fn run_batch(&self, scenarios: &[InvestmentParameters]) -> Vec<ValidationResult<ScenarioReport>> {
        scenarios.par_iter().map(|params| self.run(params)).collect()
    }
}

/// Run a single scenario with default settings
pub fn run_scenario(params: &InvestmentParameters) -> ValidationResult<ScenarioReport> {
    ScenarioRunner::new().run(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_mortgage_burden_bands() {
        assert_eq!(MortgageBurden::from_payment_to_rent_pct(0.0), MortgageBurden::Sustainable);
        assert_eq!(MortgageBurden::from_payment_to_rent_pct(49.9), MortgageBurden::Sustainable);
        assert_eq!(MortgageBurden::from_payment_to_rent_pct(50.0), MortgageBurden::Challenging);
        assert_eq!(MortgageBurden::from_payment_to_rent_pct(70.0), MortgageBurden::Risky);
    }

    #[test]
    fn test_metric_agreement_thresholds() {
        assert_eq!(MetricAgreement::compare(0.050, 0.052), MetricAgreement::WellDistributed);
        assert_eq!(MetricAgreement::compare(0.050, 0.060), MetricAgreement::SmallDifference);
        assert_eq!(MetricAgreement::compare(0.050, 0.080), MetricAgreement::SignificantDifference);
    }

    #[test]
    fn test_mortgage_analysis() {
        let params = InvestmentParameters {
            gross_rent: 14_900.0,
            monthly_mortgage_payment: 500.0,
            remaining_mortgage_years: 5,
            investment_years: 10,
            ..Default::default()
        };
        let report = run_scenario(&params).unwrap();
        let mortgage = report.insights.mortgage.unwrap();

        assert_eq!(mortgage.annual_payment, 6_000.0);
        assert_eq!(mortgage.mortgage_free_years, 5);
        assert_eq!(mortgage.total_cost, 30_000.0);
        assert_eq!(mortgage.burden, MortgageBurden::Sustainable);
        assert_eq!(
            mortgage.return_without_mortgage,
            report.projection.total_return_nominal + 30_000.0
        );
    }

    #[test]
    fn test_no_mortgage_no_analysis() {
        let report = run_scenario(&InvestmentParameters::default()).unwrap();
        assert!(report.insights.mortgage.is_none());
        assert!(report.insights.cagr_irr_agreement.is_some());
        assert_eq!(report.years.len(), 10);
    }

    #[test]
    fn test_batch_preserves_order_and_errors() {
        let runner = ScenarioRunner::new();
        let scenarios: Vec<_> = [1.0, 2.0, 3.0, 4.0]
            .iter()
            .map(|&appreciation_pct| InvestmentParameters { appreciation_pct, ..Default::default() })
            .chain(std::iter::once(InvestmentParameters { investment_years: 0, ..Default::default() }))
            .collect();

        let results = runner.run_batch(&scenarios);
        assert_eq!(results.len(), 5);

        let finals: Vec<f64> = results[..4]
            .iter()
            .map(|r| r.as_ref().unwrap().projection.final_value_nominal)
            .collect();
        assert!(finals.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(results[4].as_ref().unwrap_err(), &ValidationError::HorizonTooShort(0));
    }
}
