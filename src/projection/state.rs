//! Running state carried from one simulated year to the next

use crate::params::InvestmentParameters;

/// State of the investment at the end of a simulated year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionState {
    /// Last completed year (0 before the first step)
    pub year: u32,

    /// Property value after this year's appreciation
    pub property_value: f64,

    /// Annual gross rent currently charged
    pub gross_rent: f64,

    /// Annual insurance cost, inflation-compounded
    pub insurance_cost: f64,

    /// Annual management cost, inflation-compounded
    pub management_cost: f64,
}

impl ProjectionState {
    /// Day-one state, before any appreciation or inflation is applied
    pub fn initial(params: &InvestmentParameters) -> Self {
        Self {
            year: 0,
            property_value: params.property_value,
            gross_rent: params.annual_gross_rent(),
            insurance_cost: params.insurance_cost,
            management_cost: params.management_cost,
        }
    }

    /// Rent-to-value ratio, 0 when the value is not positive
    pub fn rent_to_value(&self) -> f64 {
        if self.property_value <= 0.0 {
            0.0
        } else {
            self.gross_rent / self.property_value
        }
    }
}
