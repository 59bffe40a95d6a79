//! # Validation Module
//!
//! Input checks that run before any pricing arithmetic.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Portal form / CLI flags                                      │
//! │  ├── Type checks (is it a number at all?)                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── No negative cost, rate or target                                  │
//! │  ├── No magnitude beyond `max_input`                                   │
//! │  └── No more than `MAX_INPUT_SCALE` decimal places                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Resolver                                                     │
//! │  └── Feasibility (V < 100, margin headroom) - NOT an error             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use margin_core::validation::validate_amount;
//! use rust_decimal::Decimal;
//!
//! let ceiling = Decimal::from(1_000_000);
//! assert!(validate_amount("cost", Decimal::from(50), ceiling).is_ok());
//! assert!(validate_amount("cost", Decimal::from(-1), ceiling).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::rounding::MAX_DECIMAL_PLACES;
use crate::types::{CostStructure, SolveMode};

/// Most decimal places accepted on any input.
///
/// With magnitudes capped by `max_input`, this keeps every ratio of a fixed
/// price (markup against a tiny cost in particular) inside the `Decimal` range.
pub const MAX_INPUT_SCALE: u32 = MAX_DECIMAL_PLACES + 4;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates a single cost, rate or target value.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: free samples, untaxed goods)
/// - Must not exceed `max`
/// - At most [`MAX_INPUT_SCALE`] significant decimal places (trailing zeros
///   do not count)
pub fn validate_amount(field: &str, value: Decimal, max: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }

    if value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            max,
        });
    }

    if value.normalize().scale() > MAX_INPUT_SCALE {
        return Err(ValidationError::TooPrecise {
            field: field.to_string(),
            value,
            max_places: MAX_INPUT_SCALE,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates every field of a cost structure.
///
/// Reports the first offending field, checked in declaration order.
pub fn validate_cost_structure(structure: &CostStructure, max: Decimal) -> ValidationResult<()> {
    validate_amount("cost", structure.cost, max)?;
    validate_amount("tax_rate_percent", structure.tax_rate_percent, max)?;
    validate_amount(
        "fixed_cost_rate_percent",
        structure.fixed_cost_rate_percent,
        max,
    )?;
    Ok(())
}

/// Validates the target carried by a solve mode.
pub fn validate_mode(mode: &SolveMode, max: Decimal) -> ValidationResult<()> {
    validate_amount(mode.target_field(), mode.target(), max)
}

// =============================================================================
// Unit Tests
// =============================================================================
