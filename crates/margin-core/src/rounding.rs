//! # Rounding Module
//!
//! The one place where precision is thrown away.
//!
//! ## Why Round Only Once?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE INCREMENTAL ROUNDING PROBLEM                                       │
//! │                                                                         │
//! │  cost 100, tax 10%, fixed 20%  →  P = 100 / 0.70 = 142.857142...        │
//! │                                                                         │
//! │  Round every step:                                                      │
//! │    P = 142.86, tax = 14.29, fixed = 28.57                               │
//! │    profit = 142.86 - 100 - 14.29 - 28.57 = 0.00   (lucky here)          │
//! │    ...but margin × price / 100 drifts from profit on other inputs      │
//! │                                                                         │
//! │  OUR SOLUTION: full-precision algebra, then round every output field   │
//! │  with the same policy at the very end                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use margin_core::rounding::RoundingPolicy;
//! use rust_decimal::Decimal;
//!
//! let policy = RoundingPolicy::default(); // 2 places, half-up
//! let price = Decimal::from(100) / Decimal::new(70, 2);
//! assert_eq!(policy.apply(price).to_string(), "142.86");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Largest supported number of decimal places.
pub const MAX_DECIMAL_PLACES: u32 = 10;

/// Default number of decimal places for money and percentages.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

// =============================================================================
// Rounding Mode
// =============================================================================

/// How a midpoint (or any excess digit) is resolved.
///
/// ## Mode Comparison
/// ```text
/// value      half_up    half_even   truncate
/// ─────────  ─────────  ──────────  ─────────
///  2.345      2.35       2.34        2.34
///  2.355      2.36       2.36        2.35
/// -2.345     -2.35      -2.34       -2.34
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Midpoint away from zero. What a spreadsheet or a receipt does.
    #[default]
    HalfUp,

    /// Midpoint to the nearest even digit (bankers rounding).
    HalfEven,

    /// Drop excess digits.
    Truncate,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Truncate => RoundingStrategy::ToZero,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::HalfUp => write!(f, "half_up"),
            RoundingMode::HalfEven => write!(f, "half_even"),
            RoundingMode::Truncate => write!(f, "truncate"),
        }
    }
}

impl std::str::FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "half_up" | "half-up" | "away_from_zero" => Ok(RoundingMode::HalfUp),
            "half_even" | "half-even" | "bankers" => Ok(RoundingMode::HalfEven),
            "truncate" | "down" => Ok(RoundingMode::Truncate),
            other => Err(format!(
                "Unknown rounding mode: '{}'. Valid options: half_up, half_even, truncate",
                other
            )),
        }
    }
}

// =============================================================================
// Rounding Policy
// =============================================================================

/// Precision and mode applied to every output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingPolicy {
    /// Digits kept after the decimal point.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,

    /// Midpoint handling.
    #[serde(default)]
    pub mode: RoundingMode,
}

fn default_decimal_places() -> u32 {
    DEFAULT_DECIMAL_PLACES
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        RoundingPolicy {
            decimal_places: default_decimal_places(),
            mode: RoundingMode::default(),
        }
    }
}

impl RoundingPolicy {
    pub fn new(decimal_places: u32, mode: RoundingMode) -> Self {
        RoundingPolicy {
            decimal_places,
            mode,
        }
    }

    /// Checks the precision is within what `Decimal` can carry comfortably.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ValidationError::InvalidPrecision {
                places: self.decimal_places,
                max: MAX_DECIMAL_PLACES,
            });
        }
        Ok(())
    }

    /// Rounds and pads to exactly `decimal_places` digits.
    ///
    /// Padding matters for display: `100` comes back as `100.00`.
    /// Equality is unaffected, `Decimal` compares by value.
    pub fn apply(&self, value: Decimal) -> Decimal {
        let mut rounded = value.round_dp_with_strategy(self.decimal_places, self.mode.strategy());
        rounded.rescale(self.decimal_places);
        // -0.004 must not render as "-0.00"
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        rounded
    }

    /// Smallest representable step, e.g. `0.01` at two places.
    pub fn unit(&self) -> Decimal {
        Decimal::new(1, self.decimal_places)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_policy() {
        let policy = RoundingPolicy::default();
        assert_eq!(policy.decimal_places, 2);
        assert_eq!(policy.mode, RoundingMode::HalfUp);
        assert_eq!(policy.unit(), dec!(0.01));
    }

    #[test]
    fn test_half_up_rounding() {
        let policy = RoundingPolicy::default();
        assert_eq!(policy.apply(dec!(2.345)), dec!(2.35));
        assert_eq!(policy.apply(dec!(-2.345)), dec!(-2.35));
        assert_eq!(policy.apply(dec!(142.857142857)), dec!(142.86));
    }

    #[test]
    fn test_half_even_rounding() {
        let policy = RoundingPolicy::new(2, RoundingMode::HalfEven);
        assert_eq!(policy.apply(dec!(2.345)), dec!(2.34));
        assert_eq!(policy.apply(dec!(2.355)), dec!(2.36));
    }

    #[test]
    fn test_truncate() {
        let policy = RoundingPolicy::new(2, RoundingMode::Truncate);
        assert_eq!(policy.apply(dec!(2.349)), dec!(2.34));
        assert_eq!(policy.apply(dec!(-2.349)), dec!(-2.34));
    }

    #[test]
    fn test_apply_pads_scale() {
        let policy = RoundingPolicy::default();
        assert_eq!(policy.apply(dec!(100)).to_string(), "100.00");
        assert_eq!(policy.apply(Decimal::ZERO).to_string(), "0.00");
        assert_eq!(policy.apply(dec!(-0.004)).to_string(), "0.00");
    }

    #[test]
    fn test_precision_validation() {
        assert!(RoundingPolicy::new(10, RoundingMode::HalfUp).validate().is_ok());
        assert!(RoundingPolicy::new(11, RoundingMode::HalfUp).validate().is_err());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("half_up".parse::<RoundingMode>().unwrap(), RoundingMode::HalfUp);
        assert_eq!("bankers".parse::<RoundingMode>().unwrap(), RoundingMode::HalfEven);
        assert_eq!("truncate".parse::<RoundingMode>().unwrap(), RoundingMode::Truncate);
        assert!("ceil".parse::<RoundingMode>().is_err());
    }
}
