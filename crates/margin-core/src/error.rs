//! # Error Types
//!
//! Domain-specific error types for margin-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  margin-core errors (this file)                                        │
//! │  ├── PricingError     - What `resolve` can fail with                   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  margin-cli errors (separate crate)                                    │
//! │  └── CliError         - Config/IO/parse failures + exit codes          │
//! │                                                                         │
//! │  NOT an error: Infeasibility                                           │
//! │  └── "no valid price exists" is a normal outcome (see types.rs)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field and value in messages
//! 3. Bad input (caller error) and infeasible structures (business outcome)
//!    never share a type

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Pricing Error
// =============================================================================

/// Errors returned by the pricing engine.
///
/// Only caller mistakes end up here. A cost structure that simply has no
/// valid price is reported as [`crate::types::PricingOutcome::Infeasible`].
#[derive(Debug, Error)]
pub enum PricingError {
    /// One of the inputs is negative, out of range or unparseable.
    ///
    /// ## When This Occurs
    /// - `cost`, a rate, or the mode target is below zero
    /// - A value exceeds the configured `max_input` ceiling
    /// - The mode name is not one of `price`, `profit`, `margin`
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The resolver configuration itself is unusable.
    #[error("Invalid pricing configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl PricingError {
    /// Returns true when the caller supplied bad input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, PricingError::InvalidInput(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any arithmetic runs, so nothing is ever partially computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value must not be negative.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: Decimal },

    /// Value is larger than the supported ceiling.
    #[error("{field} must be at most {max} (got {value})")]
    OutOfRange {
        field: String,
        value: Decimal,
        max: Decimal,
    },

    /// Value carries more decimal places than arithmetic can safely absorb.
    #[error("{field} must have at most {max_places} decimal places (got {value})")]
    TooPrecise {
        field: String,
        value: Decimal,
        max_places: u32,
    },

    /// Mode name is not recognised.
    #[error("unknown pricing mode '{value}', expected one of: price, profit, margin")]
    UnknownMode { value: String },

    /// Rounding precision is not supported.
    #[error("decimal places must be at most {max} (got {places})")]
    InvalidPrecision { places: u32, max: u32 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type CoreResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================
