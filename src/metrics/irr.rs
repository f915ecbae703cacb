//! Internal Rate of Return (IRR) calculation
//!
//! Used to derive the annual IRR of an investment's yearly cash flows

/// Exclusive lower acceptance bound (-100%)
pub const MIN_ACCEPTED_RATE: f64 = -1.0;

/// Exclusive upper acceptance bound (1000%)
pub const MAX_ACCEPTED_RATE: f64 = 10.0;

/// Closest the search gets to -100%, where discount factors blow up
const RATE_FLOOR: f64 = MIN_ACCEPTED_RATE + 1e-9;

/// Lower ends tried in turn when bracketing a root for bisection
const BRACKET_LOWS: [f64; 8] = [
    -0.99,
    -0.999,
    -0.9999,
    -0.99999,
    -0.999999,
    -0.9999999,
    -0.99999999,
    RATE_FLOOR,
];

/// Tunables for the IRR root-finder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrSolver {
    /// Starting rate for Newton-Raphson
    pub initial_guess: f64,
    pub tolerance: f64,
    /// Iteration cap for each of the Newton and bisection phases
    pub max_iterations: u32,
}

impl Default for IrrSolver {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            tolerance: 1e-10,
            max_iterations: 1000,
        }
    }
}

impl IrrSolver {
    /// Calculate the IRR of yearly cash flows (index 0 = today) using the
    /// Newton-Raphson method, falling back to bisection.
    ///
    /// # Arguments
    /// * `cashflows` - Vector of cash flows (positive = inflow, negative = outflow)
    ///
    /// # Returns
    /// * `Option<f64>` - Annual IRR as a decimal (e.g., 0.05 for 5%), or None if the
    ///   flows never change sign or no root lies in (-100%, 1000%)
    pub fn solve(&self, cashflows: &[f64]) -> Option<f64> {
        if !has_sign_change(cashflows) {
            return None;
        }

        let mut rate = self.initial_guess;

        for _ in 0..self.max_iterations {
            let (npv, dnpv) = npv_and_derivative(cashflows, rate);

            if dnpv.abs() < 1e-20 || !npv.is_finite() || !dnpv.is_finite() {
                // Derivative too small, try bisection instead
                return self.bisection(cashflows);
            }

            // Bound the rate to reasonable values
            let new_rate = (rate - npv / dnpv).clamp(RATE_FLOOR, MAX_ACCEPTED_RATE);

            if (new_rate - rate).abs() < self.tolerance {
                // Pinned to the floor is not a root
                if new_rate <= RATE_FLOOR {
                    return self.bisection(cashflows);
                }
                return accept(new_rate);
            }

            rate = new_rate;
        }

        // Newton-Raphson didn't converge, try bisection
        self.bisection(cashflows)
    }

    /// Fallback IRR calculation using bisection method
    fn bisection(&self, cashflows: &[f64]) -> Option<f64> {
        let mut high = MAX_ACCEPTED_RATE;
        let npv_high = npv(cashflows, high);

        // Widen toward -100% until the interval holds a root. An infinite
        // NPV still brackets by sign, a NaN never does.
        let Some((mut low, mut npv_low)) = BRACKET_LOWS
            .iter()
            .map(|&low| (low, npv(cashflows, low)))
            .find(|(_, npv_low)| npv_low * npv_high <= 0.0)
        else {
            log::warn!("IRR solver found no root between {} and {}", RATE_FLOOR, high);
            return None;
        };

        for _ in 0..self.max_iterations {
            let mid = (low + high) / 2.0;
            let npv_mid = npv(cashflows, mid);

            if npv_mid.abs() < self.tolerance || (high - low) / 2.0 < self.tolerance {
                return accept(mid);
            }

            if npv_mid * npv_low < 0.0 {
                high = mid;
            } else {
                low = mid;
                npv_low = npv_mid;
            }
        }

        log::warn!("IRR bisection did not converge after {} iterations", self.max_iterations);
        None
    }
}

/// Calculate the IRR with the default solver settings
pub fn calculate_irr(cashflows: &[f64]) -> Option<f64> {
    IrrSolver::default().solve(cashflows)
}

/// Net present value of `cashflows` at a yearly `rate`
pub fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Whether the flows contain at least one inflow and one outflow
pub fn has_sign_change(cashflows: &[f64]) -> bool {
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    has_positive && has_negative
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        npv += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (npv, dnpv)
}

fn accept(rate: f64) -> Option<f64> {
    if rate.is_finite() && rate > MIN_ACCEPTED_RATE && rate < MAX_ACCEPTED_RATE {
        Some(rate)
    } else {
        None
    }
}
