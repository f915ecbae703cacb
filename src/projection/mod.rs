//! Yearly projection of property value, rent and costs

mod state;
mod engine;
mod cashflows;

pub use state::ProjectionState;
pub use engine::{project, ProjectionEngine, ProjectionConfig};
pub use cashflows::{cagr, GrowthStats, ProjectionResult, YearRecord};
pub(crate) use cashflows::inflation_factor;
