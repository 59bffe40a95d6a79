//! # Pricing Configuration
//!
//! Plain data describing how the resolver rounds and which magnitudes it
//! accepts. Loading it from files or the environment is the host's job
//! (see `margin-cli`); this module only defines the shape and the rules.
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! max_input = "1000000000000"
//!
//! [pricing.rounding]
//! decimal_places = 2
//! mode = "half_up"   # half_up | half_even | truncate
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, PricingError};
use crate::rounding::RoundingPolicy;

/// Default ceiling for any single input (one trillion).
///
/// Keeps `price × rate` comfortably inside the 96-bit `Decimal` range.
/// Parts are the low and mid words of 10^12.
pub const DEFAULT_MAX_INPUT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Resolver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Largest accepted cost, rate or target.
    #[serde(default = "default_max_input")]
    pub max_input: Decimal,

    /// Rounding applied to every output field.
    #[serde(default)]
    pub rounding: RoundingPolicy,
}

fn default_max_input() -> Decimal {
    DEFAULT_MAX_INPUT
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            max_input: default_max_input(),
            rounding: RoundingPolicy::default(),
        }
    }
}

impl PricingConfig {
    /// Creates a config with a custom rounding policy.
    pub fn with_rounding(rounding: RoundingPolicy) -> Self {
        PricingConfig {
            rounding,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        self.rounding
            .validate()
            .map_err(|e| PricingError::InvalidConfig {
                reason: e.to_string(),
            })?;

        if self.max_input <= Decimal::ZERO {
            return Err(PricingError::InvalidConfig {
                reason: format!("max_input must be positive, got {}", self.max_input),
            });
        }

        if self.max_input > DEFAULT_MAX_INPUT {
            return Err(PricingError::InvalidConfig {
                reason: format!(
                    "max_input must be at most {}, got {}",
                    DEFAULT_MAX_INPUT, self.max_input
                ),
            });
        }

        Ok(())
    }
}
