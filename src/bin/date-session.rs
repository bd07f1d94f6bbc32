//! Interactive date session
//!
//! Reads a number of dates from stdin, then prints them, the weekday of the
//! first one, day differences from the first date, and the sorted list.

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use civil_date::{Session, SessionOptions};

/// Enter dates and compare them
#[derive(Parser)]
#[command(name = "date-session")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Interactive
    date-session

    # Piped, without prompts
    printf '2\\n15 8 2022\\n20 8 2022\\n' | date-session --quiet")]
struct Cli {
    /// Increase log verbosity on stderr (-v, -vv, -vvv). RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not print prompts, for piped input
    #[arg(short, long)]
    quiet: bool,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(cli.verbose)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let options = SessionOptions {
        prompts: !cli.quiet,
    };
    let mut session = Session::new(io::stdin().lock(), io::stdout().lock(), options);
    let result = session.run();
    session
        .finish(result)
        .context("failed to write session output")?;

    Ok(())
}
