//! # margin-core: Pure Pricing Engine for Margin
//!
//! This crate is the **heart** of Margin. Given a unit cost and two
//! variable-cost rates it solves for a sale price and derives every
//! financial indicator, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Margin Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host (portal backend / margin-cli)              │   │
//! │  │    Pricing form ──► resolve ──► Result panel + explanations     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ margin-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ resolver  │  │ rounding  │  │ validation│  │   │
//! │  │   │CostStruct │  │ solve P   │  │  policy   │  │   rules   │  │   │
//! │  │   │ SolveMode │  │ metrics   │  │ 2dp once  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CostStructure, SolveMode, PricingResult, ...)
//! - [`resolver`] - The price solver and derived metrics
//! - [`rounding`] - Output rounding policy
//! - [`config`] - Resolver configuration (plain data)
//! - [`explain`] - Human-readable explanation of each metric
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, safe to call from any thread
//! 2. **No I/O**: files, environment and log subscribers belong to the host
//! 3. **Exact Decimals**: `rust_decimal` everywhere, rounding happens once
//! 4. **Bad Input ≠ No Price**: validation failures are `Err`, infeasible
//!    structures are a normal `Ok` outcome
//!
//! ## Example Usage
//!
//! ```rust
//! use margin_core::{CostStructure, PricingResolver, SolveMode};
//! use rust_decimal::Decimal;
//!
//! let resolver = PricingResolver::default();
//! let structure = CostStructure::new(Decimal::from(100), Decimal::from(10), Decimal::from(20));
//!
//! let outcome = resolver
//!     .resolve(&structure, SolveMode::ByPrice { sale_price: Decimal::from(150) })
//!     .unwrap();
//! let result = outcome.result().unwrap();
//!
//! // Break-even: 100 / (1 - 0.30) = 142.857... → 142.86
//! assert_eq!(result.break_even_price.unwrap().to_string(), "142.86");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod explain;
pub mod resolver;
pub mod rounding;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::PricingConfig;
pub use error::{CoreResult, PricingError, ValidationError};
pub use explain::{Metric, MetricLine, MetricUnit};
pub use resolver::{resolve, PricingResolver};
pub use rounding::{RoundingMode, RoundingPolicy};
pub use types::*;
