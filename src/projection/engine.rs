//! Core projection engine for yearly property cash flow projections

use crate::error::ValidationResult;
use crate::params::{InvestmentParameters, RentAdjustment, DEFAULT_MAX_HORIZON_YEARS};
use super::state::ProjectionState;
use super::cashflows::{inflation_factor, ProjectionResult, YearRecord};

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Longest horizon accepted before the loop runs
    pub max_horizon_years: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            max_horizon_years: DEFAULT_MAX_HORIZON_YEARS,
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    params: InvestmentParameters,
    config: ProjectionConfig,
    /// Day-one rent/value ratio used by property-value rent adjustment
    initial_rent_ratio: f64,
}

impl ProjectionEngine {
    /// Create a new projection engine for the given parameters
    pub fn new(params: InvestmentParameters, config: ProjectionConfig) -> Self {
        let initial_rent_ratio = ProjectionState::initial(&params).rent_to_value();
        Self { params, config, initial_rent_ratio }
    }

    pub fn params(&self) -> &InvestmentParameters {
        &self.params
    }

    /// Validate the parameters, then run every year and aggregate the result
    pub fn project(&self) -> ValidationResult<(Vec<YearRecord>, ProjectionResult)> {
        self.params.validate(self.config.max_horizon_years)?;

        let n = self.params.investment_years;
        let (_, years) = (1..=n).fold(
            (ProjectionState::initial(&self.params), Vec::with_capacity(n as usize)),
            |(state, mut years), year| {
                let (next, record) = self.step(&state, year);
                years.push(record);
                (next, years)
            },
        );

        let result = ProjectionResult::from_years(&self.params, &years);
        log::info!(
            "projected {} years: final value {:.2}, total net rent {:.2}, nominal CAGR {:.4}",
            n,
            result.final_value_nominal,
            result.total_net_rent_nominal,
            result.cagr_nominal,
        );

        Ok((years, result))
    }

    /// Advance one year from `prior`, producing the new state and the year's record.
    ///
    /// `year` is 1-indexed and must equal `prior.year + 1`.
    pub fn step(&self, prior: &ProjectionState, year: u32) -> (ProjectionState, YearRecord) {
        let p = &self.params;
        let inflation = p.inflation_rate();

        // Value and fixed costs compound every year
        let property_value = prior.property_value * (1.0 + p.appreciation_rate());
        let insurance_cost = prior.insurance_cost * (1.0 + inflation);
        let management_cost = prior.management_cost * (1.0 + inflation);

        // Rent only moves at adjustment points, flat in between
        let gross_rent = if year % p.rent_adjustment_interval == 0 {
            self.adjusted_rent(prior.gross_rent, property_value)
        } else {
            prior.gross_rent
        };

        let mortgage_cost = if year <= p.remaining_mortgage_years {
            p.annual_mortgage_payment()
        } else {
            0.0
        };

        let effective_rent = gross_rent * (1.0 - p.vacancy_rate());
        let rent_tax = effective_rent * p.rent_tax_rate();
        let property_tax = property_value * p.property_tax_rate();
        let maintenance_cost = property_value * p.maintenance_rate();

        let net_rent = effective_rent
            - (insurance_cost + management_cost + maintenance_cost + property_tax + rent_tax + mortgage_cost);

        // Yield is normalised to the day-one value, not the appreciated one
        let annual_yield_pct = if p.property_value > 0.0 {
            net_rent / p.property_value * 100.0
        } else {
            0.0
        };

        let deflator = inflation_factor(inflation, year);

        log::debug!(
            "year {}: value {:.2}, gross rent {:.2}, net rent {:.2}, mortgage {:.2}",
            year, property_value, gross_rent, net_rent, mortgage_cost,
        );

        let next = ProjectionState {
            year,
            property_value,
            gross_rent,
            insurance_cost,
            management_cost,
        };

        let record = YearRecord {
            year,
            property_value,
            property_value_real: property_value / deflator,
            gross_rent,
            effective_rent,
            insurance_cost,
            management_cost,
            maintenance_cost,
            property_tax,
            rent_tax,
            mortgage_cost,
            net_rent,
            net_rent_real: net_rent / deflator,
            annual_yield_pct,
        };

        (next, record)
    }

    /// Rent after an adjustment point
    fn adjusted_rent(&self, current_rent: f64, property_value: f64) -> f64 {
        let p = &self.params;
        match p.rent_adjustment {
            RentAdjustment::PropertyValue => property_value * self.initial_rent_ratio,
            RentAdjustment::Inflation => {
                current_rent * (1.0 + p.inflation_rate()).powi(p.rent_adjustment_interval as i32)
            }
            RentAdjustment::Fixed => current_rent,
        }
    }
}

/// Project `params` with the default configuration
pub fn project(params: &InvestmentParameters) -> ValidationResult<(Vec<YearRecord>, ProjectionResult)> {
    ProjectionEngine::new(params.clone(), ProjectionConfig::default()).project()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// 200k property, 14,900/yr rent, 2.5% appreciation, 2% inflation, 10 years
    fn reference_params() -> InvestmentParameters {
        InvestmentParameters {
            property_value: 200_000.0,
            gross_rent: 14_900.0,
            appreciation_pct: 2.5,
            inflation_pct: 2.0,
            investment_years: 10,
            rent_adjustment: RentAdjustment::Fixed,
            rent_adjustment_interval: 4,
            ..Default::default()
        }
    }

    fn rent_change_years(years: &[YearRecord], initial_rent: f64) -> Vec<u32> {
        let mut previous = initial_rent;
        let mut changes = Vec::new();
        for record in years {
            if record.gross_rent != previous {
                changes.push(record.year);
            }
            previous = record.gross_rent;
        }
        changes
    }

    #[test]
    fn test_one_record_per_year() {
        for n in [1, 2, 7, 30] {
            let params = InvestmentParameters { investment_years: n, ..reference_params() };
            let (years, result) = project(&params).unwrap();
            assert_eq!(years.len(), n as usize);
            assert_eq!(result.investment_years, n);
            let indices: Vec<u32> = years.iter().map(|r| r.year).collect();
            assert_eq!(indices, (1..=n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_terminal_value_reference_scenario() {
        let (years, result) = project(&reference_params()).unwrap();
        assert_relative_eq!(result.final_value_nominal, 200_000.0 * 1.025f64.powi(10), epsilon = 1e-6);
        assert_abs_diff_eq!(result.final_value_nominal, 256_017.0, epsilon = 1.0);
        assert_relative_eq!(
            result.final_value_real,
            result.final_value_nominal / 1.02f64.powi(10),
            epsilon = 1e-9
        );

        // Strictly increasing with positive appreciation
        for pair in years.windows(2) {
            assert!(pair[1].property_value > pair[0].property_value);
        }
    }

    #[test]
    fn test_fixed_rent_never_changes() {
        let (years, result) = project(&reference_params()).unwrap();
        assert!(years.iter().all(|r| r.gross_rent == 14_900.0));
        assert_eq!(result.rent.growth_pct, 0.0);
    }

    #[test]
    fn test_inflation_rent_steps_at_adjustment_points() {
        let params = InvestmentParameters {
            rent_adjustment: RentAdjustment::Inflation,
            ..reference_params()
        };
        let (years, _) = project(&params).unwrap();

        assert_eq!(rent_change_years(&years, 14_900.0), vec![4, 8]);
        assert_eq!(years[2].gross_rent, 14_900.0);
        assert_relative_eq!(years[3].gross_rent, 14_900.0 * 1.02f64.powi(4), epsilon = 1e-9);
        assert_relative_eq!(years[7].gross_rent, 14_900.0 * 1.02f64.powi(8), epsilon = 1e-9);
        assert_eq!(years[9].gross_rent, years[7].gross_rent);
    }

    #[test]
    fn test_property_value_rent_tracks_value() {
        let params = InvestmentParameters {
            rent_adjustment: RentAdjustment::PropertyValue,
            rent_adjustment_interval: 2,
            investment_years: 6,
            ..reference_params()
        };
        let (years, _) = project(&params).unwrap();

        assert_eq!(rent_change_years(&years, 14_900.0), vec![2, 4, 6]);
        for record in years.iter().filter(|r| r.year % 2 == 0) {
            assert_relative_eq!(
                record.gross_rent / record.property_value,
                14_900.0 / 200_000.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_yearly_adjustment_is_smooth() {
        let params = InvestmentParameters {
            rent_adjustment: RentAdjustment::Inflation,
            rent_adjustment_interval: 1,
            ..reference_params()
        };
        let (years, _) = project(&params).unwrap();
        assert_eq!(rent_change_years(&years, 14_900.0), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_mortgage_runs_for_remaining_years() {
        let params = InvestmentParameters {
            monthly_mortgage_payment: 500.0,
            remaining_mortgage_years: 5,
            ..reference_params()
        };
        let (years, result) = project(&params).unwrap();

        for record in &years {
            let expected = if record.year <= 5 { 6_000.0 } else { 0.0 };
            assert_eq!(record.mortgage_cost, expected);
        }
        assert_eq!(result.total_mortgage_cost, 30_000.0);
    }

    #[test]
    fn test_no_mortgage_costs_nothing() {
        let (years, result) = project(&reference_params()).unwrap();
        assert!(years.iter().all(|r| r.mortgage_cost == 0.0));
        assert_eq!(result.total_mortgage_cost, 0.0);
    }

    #[test]
    fn test_net_rent_breakdown_year_one() {
        let params = reference_params();
        let (years, _) = project(&params).unwrap();
        let first = &years[0];

        let value = 200_000.0 * 1.025;
        let effective = 14_900.0 * 0.95;
        assert_relative_eq!(first.effective_rent, effective, epsilon = 1e-9);
        assert_relative_eq!(first.rent_tax, effective * 0.21, epsilon = 1e-9);
        assert_relative_eq!(first.property_tax, value * 0.008, epsilon = 1e-9);
        assert_relative_eq!(first.maintenance_cost, value * 0.01, epsilon = 1e-9);
        assert_relative_eq!(first.insurance_cost, 250.0 * 1.02, epsilon = 1e-9);
        assert_relative_eq!(first.management_cost, 250.0 * 1.02, epsilon = 1e-9);
        assert_relative_eq!(first.net_rent, first.effective_rent - first.total_costs(), epsilon = 1e-9);
        assert_relative_eq!(first.annual_yield_pct, first.net_rent / 200_000.0 * 100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_management_cost_compounds_with_inflation() {
        let (years, result) = project(&reference_params()).unwrap();
        assert_relative_eq!(years[9].management_cost, 250.0 * 1.02f64.powi(10), epsilon = 1e-9);
        assert_relative_eq!(result.management_cost.growth_pct, (1.02f64.powi(10) - 1.0) * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_real_net_rent_discounted_per_year() {
        let (years, result) = project(&reference_params()).unwrap();
        let expected: f64 = years
            .iter()
            .map(|r| r.net_rent / 1.02f64.powi(r.year as i32))
            .sum();
        assert_relative_eq!(result.total_net_rent_real, expected, epsilon = 1e-9);
        assert!(result.total_net_rent_real < result.total_net_rent_nominal);
    }

    #[test]
    fn test_real_value_falls_when_appreciation_below_inflation() {
        let params = InvestmentParameters {
            appreciation_pct: 1.0,
            inflation_pct: 3.0,
            ..reference_params()
        };
        let (years, _) = project(&params).unwrap();
        for pair in years.windows(2) {
            assert!(pair[1].property_value_real <= pair[0].property_value_real);
        }
    }

    #[test]
    fn test_zero_inflation_nominal_equals_real() {
        let params = InvestmentParameters {
            inflation_pct: 0.0,
            monthly_mortgage_payment: 300.0,
            remaining_mortgage_years: 3,
            ..reference_params()
        };
        let (years, result) = project(&params).unwrap();
        for record in &years {
            assert_eq!(record.property_value, record.property_value_real);
            assert_eq!(record.net_rent, record.net_rent_real);
        }
        assert_eq!(result.final_value_nominal, result.final_value_real);
        assert_eq!(result.total_net_rent_nominal, result.total_net_rent_real);
        assert_eq!(result.capital_gain_nominal, result.capital_gain_real);
        assert_eq!(result.total_return_nominal, result.total_return_real);
        assert_eq!(result.cagr_nominal, result.cagr_real);
        assert_eq!(result.total_mortgage_cost, result.total_mortgage_cost_real);
    }

    #[test]
    fn test_total_return_with_commissions_and_bargain() {
        let base = reference_params();
        let (_, plain) = project(&base).unwrap();

        let params = InvestmentParameters {
            initial_commission: 4_000.0,
            final_commission: 6_000.0,
            purchase_cost: Some(190_000.0),
            ..base
        };
        let (_, result) = project(&params).unwrap();

        assert_eq!(result.day_one_premium, 10_000.0);
        assert_relative_eq!(
            result.total_return_nominal,
            plain.total_return_nominal + 10_000.0 - 10_000.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            result.total_return_nominal,
            result.total_net_rent_nominal + result.capital_gain_nominal + 10_000.0 - 10_000.0,
            epsilon = 1e-9
        );

        // CAGR base is purchase + initial commission
        let terminal = result.final_value_nominal + result.total_net_rent_nominal - 6_000.0;
        assert_relative_eq!(
            result.cagr_nominal,
            (terminal / 194_000.0).powf(0.1) - 1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cagr_uses_property_value_without_actual_costs() {
        let params = InvestmentParameters { initial_commission: 5_000.0, ..reference_params() };
        let (_, result) = project(&params).unwrap();
        let terminal = result.final_value_nominal + result.total_net_rent_nominal;
        assert_relative_eq!(
            result.cagr_nominal,
            (terminal / 200_000.0).powf(0.1) - 1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_property_value_yields_zero_ratios() {
        let params = InvestmentParameters { property_value: 0.0, ..reference_params() };
        let (years, result) = project(&params).unwrap();
        assert!(years.iter().all(|r| r.annual_yield_pct == 0.0));
        assert_eq!(result.total_appreciation_pct, 0.0);
        assert_eq!(result.cagr_nominal, 0.0);
    }

    #[test]
    fn test_invalid_horizon_is_rejected() {
        let params = InvestmentParameters { investment_years: 0, ..reference_params() };
        assert_eq!(project(&params).unwrap_err(), ValidationError::HorizonTooShort(0));

        let engine = ProjectionEngine::new(
            InvestmentParameters { investment_years: 50, ..reference_params() },
            ProjectionConfig { max_horizon_years: 40 },
        );
        assert!(matches!(engine.project(), Err(ValidationError::HorizonTooLong { .. })));
    }

    #[test]
    fn test_step_is_pure() {
        let params = reference_params();
        let engine = ProjectionEngine::new(params.clone(), ProjectionConfig::default());
        let start = ProjectionState::initial(&params);

        let (a_state, a_record) = engine.step(&start, 1);
        let (b_state, b_record) = engine.step(&start, 1);
        assert_eq!(a_state, b_state);
        assert_eq!(a_record, b_record);
        assert_eq!(a_state.year, 1);
        assert_eq!(start.year, 0);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let params = InvestmentParameters {
            rent_adjustment: RentAdjustment::PropertyValue,
            monthly_mortgage_payment: 500.0,
            remaining_mortgage_years: 5,
            ..reference_params()
        };
        let first = project(&params).unwrap();
        let second = project(&params).unwrap();
        assert_eq!(first, second);
    }
}
