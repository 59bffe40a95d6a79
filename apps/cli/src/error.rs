//! # CLI Error Type
//!
//! Unified error type for `margin` commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in margin-cli                             │
//! │                                                                         │
//! │  margin resolve --cost -5 ...                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  CliResult<()>                                                   │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad margin.toml? ── CliError::TomlParse ──────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Bad input? ─── PricingError::InvalidInput ─── CliError ───────►│  │
//! │  │         │                                       code + exit     │  │
//! │  │         ▼                                                        │  │
//! │  │  Resolved / Infeasible ──────────── stdout, exit 0 ────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Infeasible structures are never errors. They print normally and exit 0.

use std::path::PathBuf;

use margin_core::PricingError;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the `margin` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Rejected by the pricing engine (bad input or bad pricing config).
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// A config value outside the pricing engine failed to parse.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config file: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to render config: {0}")]
    TomlRender(#[from] toml::ser::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Machine-readable error codes, shared by stderr reports and batch entries.
///
/// ```json
/// { "code": "VALIDATION_ERROR", "message": "cost must not be negative (got -5)" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before solving (exit 2)
    ValidationError,

    /// Configuration rejected (exit 2)
    ConfigError,

    /// Reading input or writing output failed (exit 1)
    IoError,

    /// Input or config file is not well-formed (exit 1)
    ParseError,
}

impl ErrorCode {
    /// Process exit status for this class of failure.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::ValidationError | ErrorCode::ConfigError => 2,
            ErrorCode::IoError | ErrorCode::ParseError => 1,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
        }
    }
}

/// Serializable form of an error: `code` plus human-readable `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorReport {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ErrorReport {
            code,
            message: message.into(),
        }
    }
}

impl From<&PricingError> for ErrorReport {
    fn from(err: &PricingError) -> Self {
        let code = match err {
            PricingError::InvalidInput(_) => ErrorCode::ValidationError,
            PricingError::InvalidConfig { .. } => ErrorCode::ConfigError,
        };
        ErrorReport::new(code, err.to_string())
    }
}

impl CliError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CliError::Pricing(PricingError::InvalidInput(_)) => ErrorCode::ValidationError,
            CliError::Pricing(PricingError::InvalidConfig { .. })
            | CliError::ConfigNotFound(_)
            | CliError::InvalidConfig(_) => ErrorCode::ConfigError,
            CliError::Io(_) | CliError::TomlRender(_) => ErrorCode::IoError,
            CliError::Json(_) | CliError::TomlParse(_) => ErrorCode::ParseError,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.code().exit_code()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use margin_core::ValidationError;
    use rust_decimal_macros::dec;

    fn negative_cost() -> PricingError {
        ValidationError::Negative {
            field: "cost".to_string(),
            value: dec!(-5),
        }
        .into()
    }

    #[test]
    fn test_invalid_input_exits_with_two() {
        let err = CliError::from(negative_cost());
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Invalid input: cost must not be negative (got -5)");
    }

    #[test]
    fn test_config_errors_exit_with_two() {
        let err = CliError::ConfigNotFound(PathBuf::from("/nowhere/margin.toml"));
        assert_eq!(err.code(), ErrorCode::ConfigError);
        assert_eq!(err.exit_code(), 2);

        let err = CliError::from(PricingError::InvalidConfig {
            reason: "max_input must be positive".to_string(),
        });
        assert_eq!(err.code(), ErrorCode::ConfigError);
    }

    #[test]
    fn test_parse_errors_exit_with_one() {
        let err: CliError = serde_json::from_str::<serde_json::Value>("[1,")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), ErrorCode::ParseError);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_report_serializes_screaming_code() {
        let report = ErrorReport::from(&negative_cost());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "Invalid input: cost must not be negative (got -5)");
        assert_eq!(report.code.to_string(), "VALIDATION_ERROR");
    }
}
