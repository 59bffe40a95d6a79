//! # margin-cli: Command Line Host for Margin
//!
//! Wraps `margin-core` in a `margin` binary. This crate owns everything the
//! engine deliberately does not: argument parsing, config files, environment
//! variables, stdout/stderr and the log subscriber.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          margin-cli                                     │
//! │                                                                         │
//! │   argv ──► cli (clap) ──► config::CliConfig::load ──► PricingResolver   │
//! │                                                          │              │
//! │              ┌───────────────────┬───────────────────────┤              │
//! │              ▼                   ▼                       ▼              │
//! │        commands::resolve   commands::batch      commands::show_config  │
//! │              │                   │                       │              │
//! │              ▼                   ▼                       ▼              │
//! │        render (text/json)   JSON array              TOML on stdout      │
//! │                                                                         │
//! │   logs ──► tracing-subscriber ──► stderr                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exit Codes
//! - `0` resolved or infeasible
//! - `1` I/O or malformed input
//! - `2` invalid input or configuration

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

use std::fs::File;
use std::io::{self, BufReader};

use margin_core::PricingResolver;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Command};
pub use config::CliConfig;
pub use error::{CliError, CliResult, ErrorCode};

/// Runs one parsed invocation to completion.
pub fn run(cli: Cli) -> CliResult<()> {
    init_tracing(cli.verbose);

    let config = CliConfig::load(cli.config)?;
    let resolver = PricingResolver::new(config.pricing)?;
    debug!(?config, "Configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Resolve(args) => commands::resolve(&resolver, config.output, &args, &mut out),
        Command::Batch { input, pretty } => {
            if input.as_os_str() == "-" {
                commands::batch(&resolver, io::stdin().lock(), pretty, &mut out)?;
            } else {
                let file = File::open(&input)?;
                commands::batch(&resolver, BufReader::new(file), pretty, &mut out)?;
            }
            Ok(())
        }
        Command::Config => commands::show_config(&config, &mut out),
    }
}

/// Default log filter for a `-v` count. `RUST_LOG` takes precedence.
pub fn default_log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,margin=info",
        1 => "info,margin=debug",
        _ => "debug,margin=trace",
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=margin=debug` for configuration and per-entry detail
/// - `RUST_LOG=margin_core=trace` for every solved price
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
