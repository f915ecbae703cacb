//! Per-year records and the aggregate projection result

use serde::{Deserialize, Serialize};

use crate::params::InvestmentParameters;

/// One simulated year of the projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// Year index (1-indexed)
    pub year: u32,

    // Property
    pub property_value: f64,
    /// Property value deflated to day-one purchasing power
    pub property_value_real: f64,

    // Rent
    pub gross_rent: f64,
    /// Gross rent net of vacancy
    pub effective_rent: f64,

    // Costs
    pub insurance_cost: f64,
    pub management_cost: f64,
    pub maintenance_cost: f64,
    pub property_tax: f64,
    pub rent_tax: f64,
    pub mortgage_cost: f64,

    // Result
    pub net_rent: f64,
    /// Net rent discounted by this year's cumulative inflation
    pub net_rent_real: f64,
    /// Net rent as a percentage of the initial property value
    pub annual_yield_pct: f64,
}

impl YearRecord {
    /// Sum of every cost line deducted from effective rent
    pub fn total_costs(&self) -> f64 {
        self.insurance_cost
            + self.management_cost
            + self.maintenance_cost
            + self.property_tax
            + self.rent_tax
            + self.mortgage_cost
    }
}

/// Growth of a stream between the first day and the last simulated year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthStats {
    pub initial: f64,
    pub final_value: f64,
    /// Total growth in percent, 0 when the initial amount is not positive
    pub growth_pct: f64,
}

impl GrowthStats {
    pub fn new(initial: f64, final_value: f64) -> Self {
        Self {
            initial,
            final_value,
            growth_pct: growth_pct(initial, final_value),
        }
    }
}

/// Terminal aggregates derived once from the year records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub investment_years: u32,
    pub initial_value: f64,

    // Terminal property value
    pub final_value_nominal: f64,
    pub final_value_real: f64,
    pub capital_gain_nominal: f64,
    pub capital_gain_real: f64,
    /// Total appreciation over the horizon, in percent
    pub total_appreciation_pct: f64,

    // Rents
    pub total_net_rent_nominal: f64,
    pub total_net_rent_real: f64,
    pub average_monthly_net_rent_real: f64,
    /// Nominal net rent of each year, in order
    pub net_rent_series: Vec<f64>,
    /// Annual gross rent growth
    pub rent: GrowthStats,
    /// Annual management cost growth
    pub management_cost: GrowthStats,

    // Financing and one-time costs
    pub total_mortgage_cost: f64,
    pub total_mortgage_cost_real: f64,
    pub initial_commission: f64,
    pub final_commission: f64,
    /// Appraised value minus actual purchase and renovation cost
    pub day_one_premium: f64,

    // Returns
    pub total_return_nominal: f64,
    pub total_return_real: f64,
    /// Total return as a percentage of the appraised property value
    pub total_return_pct_of_value_nominal: f64,
    pub total_return_pct_of_value_real: f64,
    /// Terminal value plus net rents, after both commissions
    pub final_capital_nominal: f64,
    pub final_capital_real: f64,
    pub cagr_nominal: f64,
    pub cagr_real: f64,
}

impl ProjectionResult {
    /// Aggregate a completed year sequence
    pub fn from_years(params: &InvestmentParameters, years: &[YearRecord]) -> Self {
        let n = years.len() as u32;
        let initial_value = params.property_value;

        let last = years.last();
        let final_value_nominal = last.map(|r| r.property_value).unwrap_or(initial_value);
        let final_value_real = last.map(|r| r.property_value_real).unwrap_or(initial_value);

        let total_net_rent_nominal: f64 = years.iter().map(|r| r.net_rent).sum();
        let total_net_rent_real: f64 = years.iter().map(|r| r.net_rent_real).sum();
        let total_mortgage_cost: f64 = years.iter().map(|r| r.mortgage_cost).sum();
        let total_mortgage_cost_real: f64 = years
            .iter()
            .map(|r| r.mortgage_cost / inflation_factor(params.inflation_rate(), r.year))
            .sum();

        let capital_gain_nominal = final_value_nominal - initial_value;
        let capital_gain_real = final_value_real - initial_value;

        let day_one_premium = params.day_one_premium();
        let commissions = params.initial_commission + params.final_commission;

        let total_return_nominal =
            total_net_rent_nominal + capital_gain_nominal + day_one_premium - commissions;
        let total_return_real =
            total_net_rent_real + capital_gain_real + day_one_premium - commissions;

        let cagr_outlay = match params.actual_cost_basis() {
            Some(basis) => basis + params.initial_commission,
            None => initial_value,
        };
        let cagr_nominal = cagr(
            final_value_nominal + total_net_rent_nominal - params.final_commission,
            cagr_outlay,
            n,
        );
        let cagr_real = cagr(
            final_value_real + total_net_rent_real - params.final_commission,
            cagr_outlay,
            n,
        );

        let average_monthly_net_rent_real = if n == 0 {
            0.0
        } else {
            total_net_rent_real / (12.0 * n as f64)
        };

        Self {
            investment_years: n,
            initial_value,
            final_value_nominal,
            final_value_real,
            capital_gain_nominal,
            capital_gain_real,
            total_appreciation_pct: growth_pct(initial_value, final_value_nominal),
            total_net_rent_nominal,
            total_net_rent_real,
            average_monthly_net_rent_real,
            net_rent_series: years.iter().map(|r| r.net_rent).collect(),
            rent: GrowthStats::new(
                params.annual_gross_rent(),
                last.map(|r| r.gross_rent).unwrap_or(params.annual_gross_rent()),
            ),
            management_cost: GrowthStats::new(
                params.management_cost,
                last.map(|r| r.management_cost).unwrap_or(params.management_cost),
            ),
            total_mortgage_cost,
            total_mortgage_cost_real,
            initial_commission: params.initial_commission,
            final_commission: params.final_commission,
            day_one_premium,
            total_return_nominal,
            total_return_real,
            total_return_pct_of_value_nominal: percent_of_value(total_return_nominal, initial_value),
            total_return_pct_of_value_real: percent_of_value(total_return_real, initial_value),
            final_capital_nominal: final_value_nominal + total_net_rent_nominal - commissions,
            final_capital_real: final_value_real + total_net_rent_real - commissions,
            cagr_nominal,
            cagr_real,
        }
    }

    /// Final annual gross rent expressed per month
    pub fn final_monthly_rent(&self) -> f64 {
        self.rent.final_value / 12.0
    }
}

/// Cumulative inflation after `year` years
pub(crate) fn inflation_factor(inflation_rate: f64, year: u32) -> f64 {
    (1.0 + inflation_rate).powi(year as i32)
}

/// Constant annual rate growing `outlay` into `terminal` over `years`.
///
/// Defined as 0 when either end is not positive.
pub fn cagr(terminal: f64, outlay: f64, years: u32) -> f64 {
    if outlay <= 0.0 || terminal <= 0.0 || years == 0 {
        return 0.0;
    }
    (terminal / outlay).powf(1.0 / years as f64) - 1.0
}

fn percent_of_value(amount: f64, property_value: f64) -> f64 {
    if property_value <= 0.0 {
        0.0
    } else {
        amount / property_value * 100.0
    }
}

fn growth_pct(initial: f64, final_value: f64) -> f64 {
    if initial <= 0.0 {
        0.0
    } else {
        (final_value / initial - 1.0) * 100.0
    }
}
