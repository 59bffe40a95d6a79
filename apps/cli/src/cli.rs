//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use margin_core::{CostStructure, ModeKind, SolveMode};
use rust_decimal::Decimal;

use crate::config::OutputFormat;

/// Resolve sale prices, margins and break-even points from a cost structure.
#[derive(Debug, Parser)]
#[command(name = "margin", version, about)]
pub struct Cli {
    /// Path to a margin.toml file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one cost structure
    Resolve(ResolveArgs),

    /// Resolve a JSON array of requests
    Batch {
        /// JSON file with the requests, or - for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Unit cost of the product
    #[arg(long, allow_negative_numbers = true)]
    pub cost: Decimal,

    /// Tax rate, percent of the sale price
    #[arg(long = "tax-rate", default_value = "0", allow_negative_numbers = true)]
    pub tax_rate_percent: Decimal,

    /// Fixed-cost rate, percent of the sale price
    #[arg(long = "fixed-cost-rate", default_value = "0", allow_negative_numbers = true)]
    pub fixed_cost_rate_percent: Decimal,

    /// What --value means: price, profit or margin
    #[arg(long)]
    pub mode: ModeKind,

    /// Sale price, target net profit or target net margin percent
    #[arg(long, allow_negative_numbers = true)]
    pub value: Decimal,

    /// Output format (overrides the config file)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Explain every metric
    #[arg(long)]
    pub explain: bool,
}

impl ResolveArgs {
    pub fn cost_structure(&self) -> CostStructure {
        CostStructure::new(self.cost, self.tax_rate_percent, self.fixed_cost_rate_percent)
    }

    pub fn solve_mode(&self) -> SolveMode {
        SolveMode::from_parts(self.mode, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "margin", "resolve", "--cost", "50", "--tax-rate", "18", "--fixed-cost-rate", "12",
            "--mode", "margin", "--value", "20", "--format", "json", "--explain",
        ])
        .unwrap();

        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.cost_structure(), CostStructure::new(dec!(50), dec!(18), dec!(12)));
        assert_eq!(
            args.solve_mode(),
            SolveMode::ByMarginPercent {
                target_margin_percent: dec!(20)
            }
        );
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert!(args.explain);
    }

    #[test]
    fn test_negative_numbers_reach_validation() {
        let cli = Cli::try_parse_from([
            "margin", "resolve", "--cost", "-5", "--mode", "price", "--value", "10",
        ])
        .unwrap();
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.cost, dec!(-5));
        assert_eq!(args.tax_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = Cli::try_parse_from([
            "margin", "resolve", "--cost", "5", "--mode", "markdown", "--value", "10",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("markdown"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let argv = ["margin", "batch", "-", "--pretty", "-vv", "--config", "m.toml"];
        let cli = Cli::try_parse_from(argv).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("m.toml")));
        assert!(matches!(cli.command, Command::Batch { pretty: true, .. }));
    }
}
