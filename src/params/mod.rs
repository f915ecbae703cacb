//! Investment parameters and scenario loading

mod data;
pub mod loader;

pub use data::{InvestmentParameters, RentAdjustment, RentPeriod, DEFAULT_MAX_HORIZON_YEARS};
pub use loader::{load_parameters, load_scenarios, load_scenarios_from_reader};
