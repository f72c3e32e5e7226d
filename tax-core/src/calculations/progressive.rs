//! Marginal bracket application.
//!
//! Each bracket taxes only the slice of income between the previous
//! bracket's upper bound and its own:
//!
//! | Step | Description |
//! |------|-------------|
//! | a    | Taxable slice = income - previous limit |
//! | b    | Bounded bracket: slice capped at upper bound - previous limit |
//! | c    | Positive slice: tax = slice × rate / 100, added to the total |
//! | d    | Stop at an open-ended bracket or once income ≤ upper bound |
//!
//! All arithmetic is `f64` and nothing is rounded here; rounding to
//! currency happens when the result is displayed.
//!
//! # Example
//!
//! ```
//! use tax_core::{BracketSet, TaxBracket, calculate_tax};
//!
//! let brackets = BracketSet::new(vec![
//!     TaxBracket::open_ended(20.0),
//!     TaxBracket::bounded(10.0, 1000.0),
//! ]);
//!
//! let result = calculate_tax(1500.0, &brackets);
//!
//! assert!((result.total_tax - 200.0).abs() < 1e-9);
//! assert_eq!(result.breakdown.len(), 2);
//! ```

use tracing::trace;

use crate::models::{BracketContribution, BracketSet, TaxResult};

/// Applies `brackets` to `income`.
///
/// Income at or below zero yields a zero total and an empty breakdown. When
/// income lands exactly on a bracket's upper bound, that bracket is the last
/// one applied. If the set has no open-ended bracket, income above the
/// highest bound is not taxed.
///
/// The breakdown is keyed by rate: brackets sharing a rate overwrite each
/// other there, while `total_tax` and `contributions` include every bracket.
pub fn calculate_tax(
    income: f64,
    brackets: &BracketSet,
) -> TaxResult {
    let mut result = TaxResult::default();
    let mut previous_limit = 0.0;

    for (bracket_index, bracket) in brackets.iter().enumerate() {
        let mut taxable_amount = income - previous_limit;
        if let Some(upper) = bracket.upper_bound {
            // Plain comparison so a NaN slice is never replaced by the cap.
            if taxable_amount > upper - previous_limit {
                taxable_amount = upper - previous_limit;
            }
        }

        if taxable_amount > 0.0 {
            let tax = taxable_amount * (bracket.rate / 100.0);
            trace!(bracket_index, rate = bracket.rate, taxable_amount, tax, "bracket applied");

            result.total_tax += tax;
            result.breakdown.insert(bracket.rate, tax);
            result.contributions.push(BracketContribution {
                bracket_index,
                rate: bracket.rate,
                upper_bound: bracket.upper_bound,
                taxable_amount,
                tax,
            });
        }

        let Some(upper) = bracket.upper_bound else {
            break;
        };
        previous_limit = upper;
        if income <= previous_limit {
            break;
        }
    }

    result
}
