pub mod calculations;
pub mod models;

pub use calculations::{calculate_tax, effective_rate, to_currency};
pub use models::*;
