use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tax_data::BracketConfigLoader;
use tracing_subscriber::EnvFilter;

/// Check a bracket configuration file and print it in applied order.
///
/// The file is either JSON (`{"brackets": [{"rate": 10, "up_to": 1000}, ...]}`)
/// or CSV with a `rate,up_to` header; the format is chosen by extension.
#[derive(Parser, Debug)]
#[command(name = "tax-brackets")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the bracket configuration file
    #[arg(short, long, default_value = "config.json")]
    file: PathBuf,

    /// Exit with a failure status when the configuration has any issue
    #[arg(short, long, default_value_t = false)]
    strict: bool,
}

fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    let args = Args::parse();

    let brackets = BracketConfigLoader::load_from_file(&args.file)
        .with_context(|| format!("Failed to load brackets from: {}", args.file.display()))?;

    println!("Brackets in {} (applied top to bottom):", args.file.display());
    print!("{brackets}");

    let issues = brackets.validate();
    if issues.is_empty() {
        println!("No issues found.");
        return Ok(ExitCode::SUCCESS);
    }

    println!("\n{} issue(s):", issues.len());
    for issue in &issues {
        println!("- {issue}");
    }

    if args.strict {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
