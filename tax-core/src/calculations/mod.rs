//! Progressive tax calculation.
//!
//! [`progressive`] applies a [`BracketSet`](crate::BracketSet) to an income;
//! [`common`] holds the helpers used when presenting the result.

pub mod common;
pub mod progressive;

pub use common::{effective_rate, round_half_up, to_currency};
pub use progressive::calculate_tax;
