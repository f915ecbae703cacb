//! Investment parameter record supplied by the caller

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Default upper bound on the investment horizon
pub const DEFAULT_MAX_HORIZON_YEARS: u32 = 200;

/// How the gross rent figure was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RentPeriod {
    /// Rent per month, multiplied by 12 for the projection
    Monthly,
    /// Rent per year
    Annual,
}

/// How the rent is revised at each adjustment point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RentAdjustment {
    /// Rent keeps the day-one rent/value ratio against the appreciated property value
    PropertyValue,
    /// Rent grows with inflation compounded over the adjustment interval
    Inflation,
    /// Rent never changes
    Fixed,
}

impl RentAdjustment {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentAdjustment::PropertyValue => "property value",
            RentAdjustment::Inflation => "inflation",
            RentAdjustment::Fixed => "no adjustment",
        }
    }
}

/// Economic and financing assumptions for a single property.
///
/// All `*_pct` fields are percentages (2.0 means 2%); use the rate accessors
/// to get decimal fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentParameters {
    /// Optional label used when several scenarios are evaluated together
    pub label: Option<String>,

    /// Appraised property value on day one
    pub property_value: f64,

    /// Gross rent, per month or per year depending on `rent_period`
    pub gross_rent: f64,

    pub rent_period: RentPeriod,

    /// Annual property appreciation
    pub appreciation_pct: f64,

    /// Annual inflation
    pub inflation_pct: f64,

    /// Investment horizon in whole years
    pub investment_years: u32,

    /// Share of the year the property is assumed empty
    pub vacancy_pct: f64,

    /// Extraordinary maintenance, as a share of the current property value
    pub maintenance_pct: f64,

    /// Tax on effective rent
    pub rent_tax_pct: f64,

    /// Property tax, as a share of the current property value
    pub property_tax_pct: f64,

    /// Fixed annual insurance cost, compounded by inflation
    pub insurance_cost: f64,

    /// Fixed annual management cost, compounded by inflation
    pub management_cost: f64,

    /// Monthly mortgage payment (0 if none). Never inflation-adjusted.
    pub monthly_mortgage_payment: f64,

    /// Years of mortgage payments left
    pub remaining_mortgage_years: u32,

    /// Rent is revised every this many years
    pub rent_adjustment_interval: u32,

    pub rent_adjustment: RentAdjustment,

    /// One-time acquisition costs (agency, notary)
    pub initial_commission: f64,

    /// One-time disposal costs at the end of the horizon
    pub final_commission: f64,

    /// Price actually paid, when it differs from the appraised value
    pub purchase_cost: Option<f64>,

    /// Renovation spend on top of the purchase price
    pub renovation_cost: Option<f64>,
}

impl Default for InvestmentParameters {
    fn default() -> Self {
        Self {
            label: None,
            property_value: 200_000.0,
            gross_rent: 12_000.0,
            rent_period: RentPeriod::Annual,
            appreciation_pct: 2.0,
            inflation_pct: 2.0,
            investment_years: 10,
            vacancy_pct: 5.0,
            maintenance_pct: 1.0,
            rent_tax_pct: 21.0,
            property_tax_pct: 0.8,
            insurance_cost: 250.0,
            management_cost: 250.0,
            monthly_mortgage_payment: 0.0,
            remaining_mortgage_years: 0,
            rent_adjustment_interval: 4,
            rent_adjustment: RentAdjustment::PropertyValue,
            initial_commission: 0.0,
            final_commission: 0.0,
            purchase_cost: None,
            renovation_cost: None,
        }
    }
}

impl InvestmentParameters {
    pub fn appreciation_rate(&self) -> f64 {
        self.appreciation_pct / 100.0
    }

    pub fn inflation_rate(&self) -> f64 {
        self.inflation_pct / 100.0
    }

    pub fn vacancy_rate(&self) -> f64 {
        self.vacancy_pct / 100.0
    }

    pub fn maintenance_rate(&self) -> f64 {
        self.maintenance_pct / 100.0
    }

    pub fn rent_tax_rate(&self) -> f64 {
        self.rent_tax_pct / 100.0
    }

    pub fn property_tax_rate(&self) -> f64 {
        self.property_tax_pct / 100.0
    }

    /// Gross rent for a full year
    pub fn annual_gross_rent(&self) -> f64 {
        match self.rent_period {
            RentPeriod::Monthly => self.gross_rent * 12.0,
            RentPeriod::Annual => self.gross_rent,
        }
    }

    pub fn annual_mortgage_payment(&self) -> f64 {
        self.monthly_mortgage_payment * 12.0
    }

    pub fn has_mortgage(&self) -> bool {
        self.monthly_mortgage_payment > 0.0 && self.remaining_mortgage_years > 0
    }

    /// Purchase plus renovation cost, if either was supplied.
    ///
    /// A renovation cost on its own is added to the appraised value.
    pub fn actual_cost_basis(&self) -> Option<f64> {
        if self.purchase_cost.is_none() && self.renovation_cost.is_none() {
            return None;
        }
        let purchase = self.purchase_cost.unwrap_or(self.property_value);
        Some(purchase + self.renovation_cost.unwrap_or(0.0))
    }

    /// Gain (or loss, if negative) from buying below (or above) the appraised value
    pub fn day_one_premium(&self) -> f64 {
        self.actual_cost_basis()
            .map(|basis| self.property_value - basis)
            .unwrap_or(0.0)
    }

    /// Cash put in on day one: actual cost basis (or appraised value) plus the initial commission
    pub fn initial_investment(&self) -> f64 {
        self.actual_cost_basis().unwrap_or(self.property_value) + self.initial_commission
    }

    /// Check the structural preconditions of a projection
    pub fn validate(&self, max_horizon_years: u32) -> ValidationResult<()> {
        if self.investment_years < 1 {
            return Err(ValidationError::HorizonTooShort(self.investment_years));
        }
        if self.investment_years > max_horizon_years {
            return Err(ValidationError::HorizonTooLong {
                years: self.investment_years,
                max: max_horizon_years,
            });
        }
        if self.rent_adjustment_interval < 1 {
            return Err(ValidationError::AdjustmentIntervalZero);
        }

        let amounts = [
            ("property_value", self.property_value),
            ("gross_rent", self.gross_rent),
            ("insurance_cost", self.insurance_cost),
            ("management_cost", self.management_cost),
            ("monthly_mortgage_payment", self.monthly_mortgage_payment),
            ("initial_commission", self.initial_commission),
            ("final_commission", self.final_commission),
            ("purchase_cost", self.purchase_cost.unwrap_or(0.0)),
            ("renovation_cost", self.renovation_cost.unwrap_or(0.0)),
        ];
        for (field, value) in amounts {
            check_finite(field, value)?;
            if value < 0.0 {
                return Err(ValidationError::NegativeAmount { field, value });
            }
        }

        let shares = [
            ("vacancy_pct", self.vacancy_pct),
            ("maintenance_pct", self.maintenance_pct),
            ("rent_tax_pct", self.rent_tax_pct),
            ("property_tax_pct", self.property_tax_pct),
        ];
        for (field, value) in shares {
            check_range(field, value, 0.0, 100.0)?;
        }

        // Growth rates may be negative but not at or below -100%
        for (field, value) in [
            ("appreciation_pct", self.appreciation_pct),
            ("inflation_pct", self.inflation_pct),
        ] {
            check_finite(field, value)?;
            if value <= -100.0 {
                return Err(ValidationError::RateOutOfRange {
                    field,
                    value,
                    min: -100.0,
                    max: f64::INFINITY,
                });
            }
        }

        Ok(())
    }
}

fn check_finite(field: &'static str, value: f64) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { field, value })
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    check_finite(field, value)?;
    if value < min || value > max {
        return Err(ValidationError::RateOutOfRange { field, value, min, max });
    }
    Ok(())
}
