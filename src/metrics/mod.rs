//! Return metrics derived from a projection

mod returns;
pub mod irr;

pub use returns::{annualize_pct, derive_metrics, derive_metrics_with, irr_cashflows, EquityBasis, ReturnMetrics};
pub use irr::{calculate_irr, npv, IrrSolver};
