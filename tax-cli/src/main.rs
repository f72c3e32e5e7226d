use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tax_cli::app::{self, RunOptions};
use tax_cli::report::BreakdownStyle;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income tax calculator.
///
/// Loads marginal brackets from a JSON (or CSV) file, asks for a taxable
/// income, and prints the tax owed per rate, the total and the effective
/// rate.
///
/// Exit status: 0 on success, 2 when the configuration cannot be loaded,
/// 3 when the income is missing or invalid, 1 for any other failure.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Bracket configuration file (`.csv` for CSV, anything else is JSON).
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Taxable income; when omitted it is read from standard input.
    #[arg(long, allow_hyphen_values = true)]
    income: Option<String>,

    /// Refuse configurations with overlapping, missing or out-of-range brackets.
    #[arg(long)]
    strict: bool,

    /// List each bracket separately instead of grouping by rate.
    #[arg(long)]
    per_bracket: bool,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `warn` so the report is not interleaved with logs.
/// * Writes to stderr and strips timestamps and target names.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");

    let options = RunOptions {
        config: cli.config,
        income: cli.income,
        strict: cli.strict,
        style: if cli.per_bracket {
            BreakdownStyle::PerBracket
        } else {
            BreakdownStyle::ByRate
        },
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    match app::run(&options, stdin.lock(), &mut stdout) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "run failed");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
