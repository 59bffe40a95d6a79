//! `margin` binary entry point.

use std::process::ExitCode;

use clap::Parser;
use margin_cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error[{}]: {}", err.code(), err);
            ExitCode::from(err.exit_code())
        }
    }
}
