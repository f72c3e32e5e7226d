use serde::{Deserialize, Serialize};

/// A single marginal bracket.
///
/// `rate` is a percentage (`22.0` means 22%). A bracket without an
/// `upper_bound` taxes everything above the previous bound and must be the
/// last one in a [`BracketSet`](crate::BracketSet).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub rate: f64,
    pub upper_bound: Option<f64>,
}

impl TaxBracket {
    pub fn bounded(
        rate: f64,
        upper_bound: f64,
    ) -> Self {
        Self {
            rate,
            upper_bound: Some(upper_bound),
        }
    }

    pub fn open_ended(rate: f64) -> Self {
        Self {
            rate,
            upper_bound: None,
        }
    }

    pub fn is_open_ended(&self) -> bool {
        self.upper_bound.is_none()
    }
}
