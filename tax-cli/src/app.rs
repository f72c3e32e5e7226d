//! One run of the calculator: load brackets, obtain income, calculate,
//! print the report.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use tax_core::{BracketSet, TaxResult, calculate_tax};
use tax_data::{BracketConfigLoader, ConfigError};
use thiserror::Error;
use tracing::{debug, info};

use crate::report::{BreakdownStyle, write_report};
use crate::utils::{InputError, parse_income, read_income};

pub const PROMPT: &str = "Enter your taxable income: ";

/// Exit status for a run that could not load its configuration.
pub const EXIT_CONFIG_ERROR: u8 = 2;
/// Exit status for a run whose income value was missing or invalid.
pub const EXIT_INPUT_ERROR: u8 = 3;
/// Exit status for any other failure, e.g. stdout closed.
pub const EXIT_OTHER_ERROR: u8 = 1;

/// Everything a run needs besides its I/O handles.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: PathBuf,
    /// Income supplied up front; when `None` the user is prompted.
    pub income: Option<String>,
    /// Reject configurations with any bracket issue.
    pub strict: bool,
    pub style: BreakdownStyle,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error loading config: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid income: {0}")]
    Input(#[from] InputError),

    #[error(transparent)]
    Output(#[from] anyhow::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => EXIT_CONFIG_ERROR,
            AppError::Input(_) => EXIT_INPUT_ERROR,
            AppError::Output(_) => EXIT_OTHER_ERROR,
        }
    }
}

fn load_brackets(options: &RunOptions) -> Result<BracketSet, ConfigError> {
    if options.strict {
        BracketConfigLoader::load_strict(&options.config)
    } else {
        BracketConfigLoader::load_from_file(&options.config)
    }
}

fn obtain_income<R: BufRead, W: Write>(
    options: &RunOptions,
    input: R,
    out: &mut W,
) -> Result<f64, AppError> {
    if let Some(raw) = &options.income {
        return Ok(parse_income(raw)?);
    }

    write!(out, "{PROMPT}")
        .and_then(|()| out.flush())
        .context("failed to write prompt")?;
    Ok(read_income(input)?)
}

/// Runs the calculator against `input` and `out`.
///
/// Nothing is calculated or printed past the prompt when loading or income
/// parsing fails.
pub fn run<R: BufRead, W: Write>(
    options: &RunOptions,
    input: R,
    out: &mut W,
) -> Result<TaxResult, AppError> {
    let brackets = load_brackets(options)?;
    debug!(config = %options.config.display(), count = brackets.len(), "brackets loaded");

    let income = obtain_income(options, input, out)?;
    let result = calculate_tax(income, &brackets);
    info!(income, total_tax = result.total_tax, "tax calculated");

    write_report(out, income, &result, options.style).context("failed to write report")?;
    Ok(result)
}
