use std::io::BufRead;
use std::num::ParseFloatError;

use thiserror::Error;

/// Error returned when the income value cannot be obtained or parsed.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no income entered")]
    Missing,

    #[error("'{input}' is not a number: {source}")]
    Invalid {
        input: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("'{0}' is not a finite amount")]
    NonFinite(String),

    #[error("failed to read input: {0}")]
    Read(#[from] std::io::Error),
}

/// Normalizes input for number parsing: trims whitespace, drops a leading
/// `$` and removes commas (thousands separator).
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .trim_start()
        .replace(',', "")
}

/// Parses an income amount.
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`) and an optional
/// leading `$`. Empty input is [`InputError::Missing`]; infinities and NaN
/// are rejected.
pub fn parse_income(s: &str) -> Result<f64, InputError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Err(InputError::Missing);
    }

    let value: f64 = normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid income: {}", e);
        InputError::Invalid {
            input: s.trim().to_string(),
            source: e,
        }
    })?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NonFinite(s.trim().to_string()))
    }
}

/// Reads one line from `reader` and parses it with [`parse_income`].
/// End of input before any text is [`InputError::Missing`].
pub fn read_income<R: BufRead>(mut reader: R) -> Result<f64, InputError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(InputError::Missing);
    }
    parse_income(&line)
}
