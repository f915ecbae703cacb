//! Realty Projection - Year-by-year cash flow and return projection for rental property
//!
//! This library provides:
//! - Projection of property value, rent, operating costs and mortgage payments
//! - Nominal and inflation-deflated aggregates (total return, capital gain, CAGR)
//! - Return metrics (ROI, ROE, IRR)
//! - Scenario batches and plain-text/CSV reporting

pub mod error;
pub mod params;
pub mod projection;
pub mod metrics;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{LoadError, ValidationError};
pub use params::{InvestmentParameters, RentAdjustment, RentPeriod};
pub use projection::{project, ProjectionEngine, ProjectionResult, YearRecord};
pub use metrics::{derive_metrics, ReturnMetrics};
pub use scenario::{run_scenario, ScenarioReport, ScenarioRunner};
