//! Input validation errors raised before a projection runs

use thiserror::Error;

/// Structural problems with an [`InvestmentParameters`](crate::InvestmentParameters) record.
///
/// Ratio denominators that happen to be zero are not errors; those quantities
/// are reported as zero instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("investment horizon must be at least 1 year, got {0}")]
    HorizonTooShort(u32),

    #[error("investment horizon of {years} years exceeds the supported maximum of {max}")]
    HorizonTooLong { years: u32, max: u32 },

    #[error("rent adjustment interval must be at least 1 year")]
    AdjustmentIntervalZero,

    #[error("'{field}' must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("'{field}' must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("'{field}' must lie between {min}% and {max}%, got {value}%")]
    RateOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Failures while reading parameter files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
