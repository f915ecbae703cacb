//! ROI, ROE and IRR derived from a completed projection

use serde::{Deserialize, Serialize};

use crate::params::InvestmentParameters;
use crate::projection::{inflation_factor, ProjectionResult};
use super::irr::IrrSolver;

/// What the ROE denominator actually represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquityBasis {
    /// No mortgage: equity is the cash invested and ROE equals ROI
    Unlevered,
    /// Mortgage present but its principal is unknown, so equity is
    /// approximated by the cash invested and ROE still equals ROI
    CashInvestedApproximation,
}

impl EquityBasis {
    pub fn note(&self) -> &'static str {
        match self {
            EquityBasis::Unlevered => "no leverage: ROE = ROI",
            EquityBasis::CashInvestedApproximation => {
                "equity approximated by cash invested; supply the initial mortgage principal for a true ROE"
            }
        }
    }
}

/// Secondary return ratios. Percent fields are already multiplied by 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnMetrics {
    /// Cash put in on day one, including the initial commission
    pub initial_investment: f64,
    pub equity: f64,
    pub equity_basis: EquityBasis,

    pub roi_nominal_pct: f64,
    pub roi_real_pct: f64,
    pub roe_nominal_pct: f64,
    pub roe_real_pct: f64,

    /// ROI with total mortgage cost added back, as if bought in cash
    pub cash_purchase_roi_nominal_pct: f64,
    pub cash_purchase_roi_real_pct: f64,

    pub annualized_roi_nominal_pct: f64,
    pub annualized_roi_real_pct: f64,
    pub annualized_roe_nominal_pct: f64,
    pub annualized_roe_real_pct: f64,

    /// Annual IRR as a decimal; None when undefined
    pub irr_nominal: Option<f64>,
    pub irr_real: Option<f64>,

    /// Year 0 outlay followed by one flow per year
    pub cashflows_nominal: Vec<f64>,
    pub cashflows_real: Vec<f64>,
}

/// Derive the return metrics with the default IRR solver
pub fn derive_metrics(params: &InvestmentParameters, projection: &ProjectionResult) -> ReturnMetrics {
    derive_metrics_with(params, projection, &IrrSolver::default())
}

/// Derive the return metrics using a specific IRR solver
pub fn derive_metrics_with(
    params: &InvestmentParameters,
    projection: &ProjectionResult,
    solver: &IrrSolver,
) -> ReturnMetrics {
    let initial_investment = params.initial_investment();
    let n = projection.investment_years;

    let roi_nominal_pct = percent_of(projection.total_return_nominal, initial_investment);
    let roi_real_pct = percent_of(projection.total_return_real, initial_investment);

    // Equity is not tracked separately from the cash invested
    let equity = initial_investment;
    let equity_basis = if params.has_mortgage() {
        EquityBasis::CashInvestedApproximation
    } else {
        EquityBasis::Unlevered
    };
    let roe_nominal_pct = percent_of(projection.total_return_nominal, equity);
    let roe_real_pct = percent_of(projection.total_return_real, equity);

    let cash_purchase_roi_nominal_pct = percent_of(
        projection.total_return_nominal + projection.total_mortgage_cost,
        initial_investment,
    );
    let cash_purchase_roi_real_pct = percent_of(
        projection.total_return_real + projection.total_mortgage_cost_real,
        initial_investment,
    );

    let cashflows_nominal = irr_cashflows(params, projection);
    let cashflows_real = deflate(&cashflows_nominal, params.inflation_rate());

    let irr_nominal = solver.solve(&cashflows_nominal);
    let irr_real = solver.solve(&cashflows_real);
    if irr_nominal.is_none() {
        log::debug!("nominal IRR undefined for cash flows {:?}", cashflows_nominal);
    }

    ReturnMetrics {
        initial_investment,
        equity,
        equity_basis,
        roi_nominal_pct,
        roi_real_pct,
        roe_nominal_pct,
        roe_real_pct,
        cash_purchase_roi_nominal_pct,
        cash_purchase_roi_real_pct,
        annualized_roi_nominal_pct: annualize_pct(roi_nominal_pct, n),
        annualized_roi_real_pct: annualize_pct(roi_real_pct, n),
        annualized_roe_nominal_pct: annualize_pct(roe_nominal_pct, n),
        annualized_roe_real_pct: annualize_pct(roe_real_pct, n),
        irr_nominal,
        irr_real,
        cashflows_nominal,
        cashflows_real,
    }
}

/// Build the nominal IRR cash flows: outlay, yearly net rents, and the sale
/// proceeds (net of the final commission) in the last year.
pub fn irr_cashflows(params: &InvestmentParameters, projection: &ProjectionResult) -> Vec<f64> {
    let mut flows = Vec::with_capacity(projection.net_rent_series.len() + 1);
    flows.push(-params.initial_investment());
    flows.extend_from_slice(&projection.net_rent_series);

    if let Some(last) = flows.len().checked_sub(1).filter(|&i| i > 0) {
        flows[last] += projection.final_value_nominal - projection.final_commission;
    }
    flows
}

/// Discount each flow by its own elapsed inflation; year 0 is unchanged
fn deflate(cashflows: &[f64], inflation_rate: f64) -> Vec<f64> {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / inflation_factor(inflation_rate, t as u32))
        .collect()
}

fn percent_of(amount: f64, base: f64) -> f64 {
    if base <= 0.0 {
        0.0
    } else {
        amount / base * 100.0
    }
}

/// Convert a total percentage return over `years` into a yearly one
pub fn annualize_pct(total_pct: f64, years: u32) -> f64 {
    let growth = 1.0 + total_pct / 100.0;
    if years == 0 || growth <= 0.0 {
        return 0.0;
    }
    (growth.powf(1.0 / years as f64) - 1.0) * 100.0
}
