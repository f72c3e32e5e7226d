mod bracket_set;
mod tax_bracket;
mod tax_result;

pub use bracket_set::{BracketIssue, BracketSet};
pub use tax_bracket::TaxBracket;
pub use tax_result::{BracketContribution, Breakdown, TaxResult};
