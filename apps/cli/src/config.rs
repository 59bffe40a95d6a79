//! # CLI Configuration
//!
//! Configuration for the `margin` binary: the pricing engine settings plus
//! how results are printed.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, resolve only)                │
//! │     --format json --explain                                            │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     MARGIN_DECIMAL_PLACES=4                                            │
//! │     MARGIN_ROUNDING=half_even                                          │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <PATH>, or                                                │
//! │     ~/.config/margin/margin.toml (Linux)                               │
//! │     ~/Library/Application Support/com.margin.margin/margin.toml (macOS)│
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     2 decimal places, half_up, text output                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # margin.toml
//! [pricing]
//! max_input = "1000000000000"
//!
//! [pricing.rounding]
//! decimal_places = 2
//! mode = "half_up"   # half_up | half_even | truncate
//!
//! [output]
//! format = "text"    # text | json
//! explain = false
//! ```

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use margin_core::{PricingConfig, RoundingMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

/// Environment variable names recognised as overrides.
pub const ENV_DECIMAL_PLACES: &str = "MARGIN_DECIMAL_PLACES";
pub const ENV_ROUNDING: &str = "MARGIN_ROUNDING";
pub const ENV_OUTPUT_FORMAT: &str = "MARGIN_OUTPUT_FORMAT";
pub const ENV_EXPLAIN: &str = "MARGIN_EXPLAIN";
pub const ENV_MAX_INPUT: &str = "MARGIN_MAX_INPUT";

// =============================================================================
// Output Format
// =============================================================================

/// How `margin resolve` prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Aligned table for humans.
    #[default]
    Text,

    /// One JSON document on stdout.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::InvalidConfig(format!(
                "Unknown output format: '{}'. Valid options: text, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Output Settings
// =============================================================================

/// Presentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,

    /// Print the explanation of every metric.
    #[serde(default)]
    pub explain: bool,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete `margin` configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub output: OutputSettings,
}

impl CliConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from the config file if it exists
    /// 3. Override with environment variables
    /// 4. Validate
    ///
    /// An explicit `config_path` that does not exist is an error. A missing
    /// file at the platform default location is not.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// [`CliConfig::load`] with an injectable environment lookup.
    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::ConfigNotFound(path));
                }
                config = Self::read_file(&path)?;
            }
            None => {
                if let Some(path) = Self::default_config_path() {
                    if path.exists() {
                        config = Self::read_file(&path)?;
                    } else {
                        debug!(?path, "Config file not found, using defaults");
                    }
                }
            }
        }

        config.apply_env_overrides(env)?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document.
    pub fn from_toml(contents: &str) -> CliResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        self.pricing.validate()?;
        Ok(())
    }

    fn read_file(path: &Path) -> CliResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Applies environment variable overrides.
    ///
    /// Unparseable numbers and booleans are ignored with a warning. An
    /// unknown rounding mode or output format is an error.
    fn apply_env_overrides<F>(&mut self, env: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(places) = env(ENV_DECIMAL_PLACES) {
            match places.trim().parse::<u32>() {
                Ok(p) => {
                    debug!(decimal_places = p, "Overriding decimal places from environment");
                    self.pricing.rounding.decimal_places = p;
                }
                Err(_) => warn!(value = %places, "Ignoring unparseable {}", ENV_DECIMAL_PLACES),
            }
        }

        if let Some(mode) = env(ENV_ROUNDING) {
            let parsed: RoundingMode = mode.parse().map_err(CliError::InvalidConfig)?;
            debug!(mode = %parsed, "Overriding rounding mode from environment");
            self.pricing.rounding.mode = parsed;
        }

        if let Some(max) = env(ENV_MAX_INPUT) {
            match max.trim().parse::<Decimal>() {
                Ok(m) => {
                    debug!(max_input = %m, "Overriding max input from environment");
                    self.pricing.max_input = m;
                }
                Err(_) => warn!(value = %max, "Ignoring unparseable {}", ENV_MAX_INPUT),
            }
        }

        if let Some(format) = env(ENV_OUTPUT_FORMAT) {
            self.output.format = format.parse()?;
            debug!(format = %self.output.format, "Overriding output format from environment");
        }

        if let Some(explain) = env(ENV_EXPLAIN) {
            match parse_flag(&explain) {
                Some(flag) => self.output.explain = flag,
                None => warn!(value = %explain, "Ignoring unparseable {}", ENV_EXPLAIN),
            }
        }

        Ok(())
    }

    /// Returns the platform config file location.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "margin", "margin")
            .map(|dirs| dirs.config_dir().join("margin.toml"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let file = format!("margin-cli-{}-{}.toml", name, std::process::id());
        let path = std::env::temp_dir().join(file);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.pricing.rounding.decimal_places, 2);
        assert_eq!(config.pricing.rounding.mode, RoundingMode::HalfUp);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(!config.output.explain);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = CliConfig::from_toml(
            r#"
            [pricing.rounding]
            decimal_places = 4
            mode = "half_even"

            [output]
            format = "json"
            explain = true
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.rounding.decimal_places, 4);
        assert_eq!(config.pricing.rounding.mode, RoundingMode::HalfEven);
        assert_eq!(config.pricing.max_input, PricingConfig::default().max_input);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.explain);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(CliConfig::from_toml("").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_rendered_toml_reads_back() {
        let mut config = CliConfig::default();
        config.pricing.rounding.decimal_places = 3;
        config.output.format = OutputFormat::Json;

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[pricing.rounding]"));
        assert_eq!(CliConfig::from_toml(&rendered).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config
            .apply_env_overrides(env_from(&[
                (ENV_DECIMAL_PLACES, "4"),
                (ENV_ROUNDING, "truncate"),
                (ENV_OUTPUT_FORMAT, "json"),
                (ENV_EXPLAIN, "yes"),
                (ENV_MAX_INPUT, "5000"),
            ]))
            .unwrap();

        assert_eq!(config.pricing.rounding.decimal_places, 4);
        assert_eq!(config.pricing.rounding.mode, RoundingMode::Truncate);
        assert_eq!(config.pricing.max_input, dec!(5000));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.explain);
    }

    #[test]
    fn test_unparseable_numbers_are_ignored() {
        let mut config = CliConfig::default();
        config
            .apply_env_overrides(env_from(&[
                (ENV_DECIMAL_PLACES, "many"),
                (ENV_EXPLAIN, "perhaps"),
            ]))
            .unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_unknown_rounding_mode_is_an_error() {
        let mut config = CliConfig::default();
        let err = config
            .apply_env_overrides(env_from(&[(ENV_ROUNDING, "ceiling")]))
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidConfig(_)));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("margin-cli-does-not-exist.toml");
        let err = CliConfig::load_with_env(Some(path), env_from(&[])).unwrap_err();
        assert!(matches!(err, CliError::ConfigNotFound(_)));
    }

    #[test]
    fn test_load_file_then_env() {
        let path = temp_config(
            "layering",
            "[pricing.rounding]\ndecimal_places = 3\n\n[output]\nformat = \"json\"\n",
        );

        let config =
            CliConfig::load_with_env(Some(path.clone()), env_from(&[(ENV_OUTPUT_FORMAT, "text")]))
                .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.pricing.rounding.decimal_places, 3);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_rejects_excess_precision() {
        let path = temp_config("precision", "[pricing.rounding]\ndecimal_places = 11\n");
        let err = CliConfig::load_with_env(Some(path.clone()), env_from(&[])).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
