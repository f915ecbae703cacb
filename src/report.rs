//! Plain-text and CSV rendering of scenario reports

use std::fmt;
use std::io::Write;

use crate::projection::YearRecord;
use crate::scenario::{MetricAgreement, MortgageBurden, ScenarioReport};

/// Euro amount with thousands separators and 2 decimals, e.g. `€1,234.56`
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}€{}.{}", sign, grouped, frac_part)
}

pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Decimal rate as a percentage, or `N/A` when undefined
pub fn format_optional_rate(rate: Option<f64>, decimals: usize) -> String {
    match rate {
        Some(r) => format_percentage(r * 100.0, decimals),
        None => "N/A".to_string(),
    }
}

/// Human-readable summary of a scenario
pub fn render_text(report: &ScenarioReport) -> String {
    report.to_string()
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = &self.parameters;
        let proj = &self.projection;
        let m = &self.metrics;

        writeln!(out, "Scenario: {}", params.label.as_deref().unwrap_or("unnamed"))?;
        writeln!(out, "{}", "=".repeat(60))?;

        writeln!(out, "Property value:")?;
        writeln!(out, "  Initial value:           {}", format_currency(proj.initial_value))?;
        writeln!(out, "  Final value (nominal):   {}", format_currency(proj.final_value_nominal))?;
        writeln!(out, "  Final value (real):      {}", format_currency(proj.final_value_real))?;
        writeln!(out, "  Capital gain (nominal):  {}", format_currency(proj.capital_gain_nominal))?;
        writeln!(out, "  Total appreciation:      {}", format_percentage(proj.total_appreciation_pct, 2))?;

        writeln!(out, "Rent:")?;
        writeln!(out, "  Initial monthly rent:    {}", format_currency(proj.rent.initial / 12.0))?;
        writeln!(out, "  Final monthly rent:      {}", format_currency(proj.final_monthly_rent()))?;
        writeln!(out, "  Rent growth:             {}", format_percentage(proj.rent.growth_pct, 2))?;
        writeln!(out, "  Net rents (nominal):     {}", format_currency(proj.total_net_rent_nominal))?;
        writeln!(out, "  Net rents (real):        {}", format_currency(proj.total_net_rent_real))?;
        writeln!(out, "  Avg monthly real rent:   {}", format_currency(proj.average_monthly_net_rent_real))?;
        writeln!(out, "  Adjustment mode:         {} every {} years",
            params.rent_adjustment.as_str(), params.rent_adjustment_interval)?;
        writeln!(out, "  Management cost growth:  {}", format_percentage(proj.management_cost.growth_pct, 2))?;

        writeln!(out, "Total return:")?;
        writeln!(out, "  Nominal:                 {}", format_currency(proj.total_return_nominal))?;
        writeln!(out, "  Real:                    {}", format_currency(proj.total_return_real))?;
        writeln!(out, "  Of property value:       {} nominal, {} real",
            format_percentage(proj.total_return_pct_of_value_nominal, 2),
            format_percentage(proj.total_return_pct_of_value_real, 2))?;
        if proj.initial_commission > 0.0 || proj.final_commission > 0.0 {
            writeln!(out, "  Commissions:             {} + {}",
                format_currency(proj.initial_commission), format_currency(proj.final_commission))?;
        }
        if proj.day_one_premium != 0.0 {
            writeln!(out, "  Day-one premium:         {}", format_currency(proj.day_one_premium))?;
        }
        writeln!(out, "  Final capital + rents:   {} nominal, {} real",
            format_currency(proj.final_capital_nominal), format_currency(proj.final_capital_real))?;

        writeln!(out, "Performance:")?;
        writeln!(out, "  CAGR:                    {} nominal, {} real",
            format_percentage(proj.cagr_nominal * 100.0, 2), format_percentage(proj.cagr_real * 100.0, 2))?;
        writeln!(out, "  IRR:                     {} nominal, {} real",
            format_optional_rate(m.irr_nominal, 2), format_optional_rate(m.irr_real, 2))?;
        writeln!(out, "  ROI:                     {} nominal, {} real ({} / {} annualized)",
            format_percentage(m.roi_nominal_pct, 2), format_percentage(m.roi_real_pct, 2),
            format_percentage(m.annualized_roi_nominal_pct, 2), format_percentage(m.annualized_roi_real_pct, 2))?;
        writeln!(out, "  ROE:                     {} nominal, {} real ({})",
            format_percentage(m.roe_nominal_pct, 2), format_percentage(m.roe_real_pct, 2), m.equity_basis.note())?;
        writeln!(out, "  Initial investment:      {}", format_currency(m.initial_investment))?;
        if let Some(agreement) = self.insights.cagr_irr_agreement {
            let verdict = match agreement {
                MetricAgreement::WellDistributed => "CAGR and IRR agree: cash flows well distributed",
                MetricAgreement::SmallDifference => "small CAGR/IRR gap, normal for property",
                MetricAgreement::SignificantDifference => "large CAGR/IRR gap: check cash flow timing",
            };
            writeln!(out, "  {}", verdict)?;
        }

        if let Some(mortgage) = &self.insights.mortgage {
            let burden = match mortgage.burden {
                MortgageBurden::Sustainable => "sustainable (< 50% of rent)",
                MortgageBurden::Challenging => "challenging (50-70% of rent)",
                MortgageBurden::Risky => "risky (> 70% of rent)",
            };
            writeln!(out, "Mortgage:")?;
            writeln!(out, "  Total cost:              {}", format_currency(mortgage.total_cost))?;
            writeln!(out, "  Payment vs initial rent: {} - {}",
                format_percentage(mortgage.payment_to_rent_pct, 2), burden)?;
            if mortgage.mortgage_free_years > 0 {
                writeln!(out, "  Last {} years without payments", mortgage.mortgage_free_years)?;
            }
            writeln!(out, "  Return without mortgage: {}", format_currency(mortgage.return_without_mortgage))?;
            writeln!(out, "  Cash-purchase ROI:       {}", format_percentage(m.cash_purchase_roi_nominal_pct, 2))?;
        }

        Ok(())
    }
}

/// Write the year records as CSV with a header row
pub fn write_years_csv<W: Write>(writer: W, years: &[YearRecord]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in years {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
