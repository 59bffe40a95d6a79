//! # Domain Types
//!
//! Core domain types used throughout Margin.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT                                  OUTPUT                          │
//! │  ┌─────────────────────┐               ┌──────────────────────────┐    │
//! │  │   CostStructure     │               │     PricingOutcome       │    │
//! │  │  ─────────────────  │               │  ──────────────────────  │    │
//! │  │  cost               │   resolve()   │  Resolved(PricingResult) │    │
//! │  │  tax_rate_percent   │ ────────────► │  Infeasible(reason)      │    │
//! │  │  fixed_cost_rate_%  │               └──────────────────────────┘    │
//! │  └─────────────────────┘                                                │
//! │  ┌─────────────────────┐                                                │
//! │  │     SolveMode       │  exactly one target per call:                 │
//! │  │  ByPrice            │    sale_price                                 │
//! │  │  ByAbsoluteProfit   │    target_profit                              │
//! │  │  ByMarginPercent    │    target_margin_percent                      │
//! │  └─────────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Decimals serialize as strings (`"142.86"`) so the portal never sees a
//! binary float. A request looks like:
//! ```json
//! {
//!   "cost": "50",
//!   "tax_rate_percent": "18",
//!   "fixed_cost_rate_percent": "12",
//!   "mode": "margin",
//!   "target_margin_percent": "20"
//! }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Cost Structure
// =============================================================================

/// What it costs to make and sell one unit.
///
/// Both rates are expressed as a percentage of the *sale price*, not of cost.
/// Their sum is the variable-cost percentage `V`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CostStructure {
    /// Unit cost of the good or service.
    #[ts(type = "string")]
    pub cost: Decimal,

    /// Percentage of the sale price consumed by taxes.
    #[ts(type = "string")]
    pub tax_rate_percent: Decimal,

    /// Percentage of the sale price allocated to fixed overhead.
    #[ts(type = "string")]
    pub fixed_cost_rate_percent: Decimal,
}

impl CostStructure {
    /// Creates a cost structure. Nothing is validated until `resolve`.
    pub const fn new(
        cost: Decimal,
        tax_rate_percent: Decimal,
        fixed_cost_rate_percent: Decimal,
    ) -> Self {
        CostStructure {
            cost,
            tax_rate_percent,
            fixed_cost_rate_percent,
        }
    }

    /// Variable-cost percentage `V = tax + fixed`.
    #[inline]
    pub fn variable_cost_percent(&self) -> Decimal {
        self.tax_rate_percent + self.fixed_cost_rate_percent
    }

    /// True when some finite price can leave room for profit (`V < 100`).
    #[inline]
    pub fn is_price_solvable(&self) -> bool {
        self.variable_cost_percent() < Decimal::ONE_HUNDRED
    }
}

// =============================================================================
// Mode Kind
// =============================================================================

/// Name of a solve mode without its target value.
///
/// This is what a form dropdown or a CLI flag carries; combine it with the
/// numeric value through [`SolveMode::from_parts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ModeKind {
    /// Price is given.
    Price,
    /// Solve for a target absolute profit.
    Profit,
    /// Solve for a target net margin percentage.
    Margin,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeKind::Price => write!(f, "price"),
            ModeKind::Profit => write!(f, "profit"),
            ModeKind::Margin => write!(f, "margin"),
        }
    }
}

impl std::str::FromStr for ModeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" | "by_price" => Ok(ModeKind::Price),
            "profit" | "by_profit" | "by_absolute_profit" => Ok(ModeKind::Profit),
            "margin" | "by_margin" | "by_margin_percent" => Ok(ModeKind::Margin),
            other => Err(ValidationError::UnknownMode {
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Solve Mode
// =============================================================================

/// Which quantity is fixed by the caller, together with its target.
///
/// A sum type rather than an options bag: a request can never carry both a
/// target profit and a target margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "mode")]
#[ts(export)]
pub enum SolveMode {
    /// The sale price is known; derive everything else from it.
    #[serde(rename = "price")]
    ByPrice {
        #[ts(type = "string")]
        sale_price: Decimal,
    },

    /// Find the price that yields exactly this net profit per unit.
    #[serde(rename = "profit")]
    ByAbsoluteProfit {
        #[ts(type = "string")]
        target_profit: Decimal,
    },

    /// Find the price whose net profit is this percentage of the price.
    #[serde(rename = "margin")]
    ByMarginPercent {
        #[ts(type = "string")]
        target_margin_percent: Decimal,
    },
}

impl SolveMode {
    /// Builds a mode from its name and a single value.
    ///
    /// ## Example
    /// ```rust
    /// use margin_core::{ModeKind, SolveMode};
    /// use rust_decimal::Decimal;
    ///
    /// let mode = SolveMode::from_parts(ModeKind::Margin, Decimal::from(20));
    /// assert_eq!(
    ///     mode,
    ///     SolveMode::ByMarginPercent { target_margin_percent: Decimal::from(20) }
    /// );
    /// ```
    pub fn from_parts(kind: ModeKind, value: Decimal) -> Self {
        match kind {
            ModeKind::Price => SolveMode::ByPrice { sale_price: value },
            ModeKind::Profit => SolveMode::ByAbsoluteProfit {
                target_profit: value,
            },
            ModeKind::Margin => SolveMode::ByMarginPercent {
                target_margin_percent: value,
            },
        }
    }

    /// Returns the mode name.
    pub fn kind(&self) -> ModeKind {
        match self {
            SolveMode::ByPrice { .. } => ModeKind::Price,
            SolveMode::ByAbsoluteProfit { .. } => ModeKind::Profit,
            SolveMode::ByMarginPercent { .. } => ModeKind::Margin,
        }
    }

    /// Returns the caller-supplied target value.
    pub fn target(&self) -> Decimal {
        match *self {
            SolveMode::ByPrice { sale_price } => sale_price,
            SolveMode::ByAbsoluteProfit { target_profit } => target_profit,
            SolveMode::ByMarginPercent {
                target_margin_percent,
            } => target_margin_percent,
        }
    }

    /// Field name of the target, for error messages.
    pub fn target_field(&self) -> &'static str {
        match self {
            SolveMode::ByPrice { .. } => "sale_price",
            SolveMode::ByAbsoluteProfit { .. } => "target_profit",
            SolveMode::ByMarginPercent { .. } => "target_margin_percent",
        }
    }

    /// True for every mode where the price is the unknown.
    pub fn solves_for_price(&self) -> bool {
        !matches!(self, SolveMode::ByPrice { .. })
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// Every indicator derived from one sale price.
///
/// All money and percentage fields are rounded once, after the full-precision
/// algebra is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingResult {
    /// Mode that produced this result.
    pub mode: ModeKind,

    /// Sale price per unit.
    #[ts(type = "string")]
    pub sale_price: Decimal,

    /// Unit cost (echoed input).
    #[ts(type = "string")]
    pub cost: Decimal,

    /// Taxes paid out of the sale price.
    #[ts(type = "string")]
    pub tax_amount: Decimal,

    /// Sale price minus taxes.
    #[ts(type = "string")]
    pub net_revenue_after_tax: Decimal,

    /// Share of the sale price allocated to fixed overhead.
    #[ts(type = "string")]
    pub fixed_cost_amount: Decimal,

    /// Tax-free revenue minus cost.
    #[ts(type = "string")]
    pub gross_profit: Decimal,

    /// Gross profit relative to tax-free revenue.
    #[ts(type = "string")]
    pub gross_margin_percent: Decimal,

    /// What is left after cost, taxes and fixed overhead.
    #[ts(type = "string")]
    pub net_profit: Decimal,

    /// Net profit relative to the full sale price.
    #[ts(type = "string")]
    pub net_margin_percent: Decimal,

    /// Price premium over cost. Zero when cost is zero.
    #[ts(type = "string")]
    pub markup_percent: Decimal,

    /// Price minus cost minus taxes, before fixed overhead.
    #[ts(type = "string")]
    pub contribution_margin: Decimal,

    /// Price at which net profit is exactly zero. Absent when `V >= 100`.
    #[ts(type = "string | null")]
    pub break_even_price: Option<Decimal>,

    /// False when the numbers are computed but not meaningful
    /// (fixed price against a zero cost).
    pub feasible: bool,
}

// =============================================================================
// Infeasibility
// =============================================================================

/// Why no valid sale price exists for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "reason", rename_all = "snake_case")]
#[ts(export)]
pub enum Infeasibility {
    /// Taxes plus fixed overhead take 100% or more of every sale.
    VariableCostsConsumeRevenue {
        #[ts(type = "string")]
        variable_cost_percent: Decimal,
    },

    /// Variable costs plus the target margin leave nothing to recover cost.
    MarginExceedsHeadroom {
        #[ts(type = "string")]
        variable_cost_percent: Decimal,
        #[ts(type = "string")]
        target_margin_percent: Decimal,
    },

    /// Zero cost fixes the margin of every positive price at `100 - V`,
    /// so any other positive target is out of reach.
    MarginUnreachableAtZeroCost {
        #[ts(type = "string")]
        variable_cost_percent: Decimal,
        #[ts(type = "string")]
        target_margin_percent: Decimal,
    },

    /// The algebra produced a negative price.
    NegativePrice {
        #[ts(type = "string")]
        sale_price: Decimal,
    },

    /// The solved price does not fit in the decimal range.
    PriceOutOfRange,
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infeasibility::VariableCostsConsumeRevenue {
                variable_cost_percent,
            } => write!(
                f,
                "taxes and fixed costs take {}% of revenue, no price can leave a profit",
                variable_cost_percent
            ),
            Infeasibility::MarginExceedsHeadroom {
                variable_cost_percent,
                target_margin_percent,
            } => write!(
                f,
                "a {}% margin on top of {}% variable costs leaves nothing to cover cost",
                target_margin_percent, variable_cost_percent
            ),
            Infeasibility::MarginUnreachableAtZeroCost {
                variable_cost_percent,
                target_margin_percent,
            } => write!(
                f,
                "at zero cost every positive price earns a {}% margin, {}% is out of reach",
                Decimal::ONE_HUNDRED - variable_cost_percent,
                target_margin_percent
            ),
            Infeasibility::NegativePrice { sale_price } => {
                write!(f, "solved price {} is negative", sale_price)
            }
            Infeasibility::PriceOutOfRange => {
                write!(f, "solved price is too large to represent")
            }
        }
    }
}

// =============================================================================
// Pricing Outcome
// =============================================================================

/// What a well-formed request resolves to.
///
/// ## Serialization
/// ```json
/// { "status": "resolved", "detail": { "sale_price": "100.00", ... } }
/// { "status": "infeasible", "detail": { "reason": "price_out_of_range" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
#[ts(export)]
pub enum PricingOutcome {
    /// A complete, internally consistent result.
    Resolved(PricingResult),

    /// No finite non-negative price satisfies the request.
    Infeasible(Infeasibility),
}

impl PricingOutcome {
    /// True only for a resolved result whose own `feasible` flag is set.
    pub fn is_feasible(&self) -> bool {
        match self {
            PricingOutcome::Resolved(result) => result.feasible,
            PricingOutcome::Infeasible(_) => false,
        }
    }

    /// The computed result, if any.
    pub fn result(&self) -> Option<&PricingResult> {
        match self {
            PricingOutcome::Resolved(result) => Some(result),
            PricingOutcome::Infeasible(_) => None,
        }
    }

    /// The infeasibility reason, if any.
    pub fn infeasibility(&self) -> Option<&Infeasibility> {
        match self {
            PricingOutcome::Resolved(_) => None,
            PricingOutcome::Infeasible(reason) => Some(reason),
        }
    }
}

// =============================================================================
// Pricing Request
// =============================================================================

/// One line of a batch: a cost structure, a mode and an optional caller tag.
///
/// Flattened on the wire, see the module docs for the JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRequest {
    /// Caller-side identifier echoed back in batch output (SKU, row id...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub cost_structure: CostStructure,

    #[serde(flatten)]
    pub mode: SolveMode,
}

impl PricingRequest {
    pub fn new(cost_structure: CostStructure, mode: SolveMode) -> Self {
        PricingRequest {
            id: None,
            cost_structure,
            mode,
        }
    }

    /// Attaches a caller-side identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
