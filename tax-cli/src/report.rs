//! Plain-text rendering of a [`TaxResult`].
//!
//! ```text
//!
//! Tax Breakdown:
//! - 10%: $100.00
//! - 20%: $100.00
//!
//! Total Tax Owed: $200.00
//! Effective Tax Rate: 13.33%
//! ```
//!
//! Amounts are rounded half-up to cents here and nowhere else.

use std::io::{self, Write};

use tax_core::{TaxResult, effective_rate, to_currency};

/// Which view of the per-bracket figures to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakdownStyle {
    /// One line per distinct rate, lowest first.
    #[default]
    ByRate,
    /// One line per contributing bracket, in bracket order.
    PerBracket,
}

/// Formats an amount to two decimals, rounding half-up.
pub fn format_amount(value: f64) -> String {
    match to_currency(value) {
        Some(amount) => format!("{amount:.2}"),
        None => format!("{value:.2}"),
    }
}

pub fn write_report<W: Write>(
    out: &mut W,
    income: f64,
    result: &TaxResult,
    style: BreakdownStyle,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Tax Breakdown:")?;
    match style {
        BreakdownStyle::ByRate => {
            for (rate, amount) in result.breakdown.iter() {
                writeln!(out, "- {rate}%: ${}", format_amount(amount))?;
            }
        }
        BreakdownStyle::PerBracket => {
            for c in &result.contributions {
                let range = match c.upper_bound {
                    Some(bound) => format!("up to ${}", format_amount(bound)),
                    None => "and above".to_string(),
                };
                writeln!(
                    out,
                    "- #{} {}% {range}: ${}",
                    c.bracket_index + 1,
                    c.rate,
                    format_amount(c.tax)
                )?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Total Tax Owed: ${}", format_amount(result.total_tax))?;
    match effective_rate(result.total_tax, income) {
        Some(rate) => writeln!(out, "Effective Tax Rate: {}%", format_amount(rate)),
        None => writeln!(out, "Effective Tax Rate: n/a"),
    }
}
