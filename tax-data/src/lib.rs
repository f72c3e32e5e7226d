//! Bracket configuration loading.
//!
//! Reads bracket definitions from JSON or CSV and returns them as a sorted
//! [`BracketSet`](tax_core::BracketSet).

mod loader;

pub use loader::{BracketConfigLoader, BracketRecord, ConfigError, ConfigFormat};
