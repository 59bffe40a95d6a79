//! # Pricing Resolver
//!
//! Solves for a sale price under one of three modes and derives every
//! financial indicator from it.
//!
//! ## Resolution Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CostStructure + SolveMode                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  1. validate ──── negative / too large? ──► Err(InvalidInput)          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  2. solve_price                                                        │
//! │     ByPrice            P = sale_price                                  │
//! │     ByAbsoluteProfit   P = (profit + cost) / (1 - V/100)               │
//! │     ByMarginPercent    P = cost / (1 - (V + margin)/100)               │
//! │         │                                                               │
//! │         ├── V >= 100, no headroom, P < 0 ──► Ok(Infeasible(reason))    │
//! │         ▼                                                               │
//! │  3. Metrics::compute   full precision, checked arithmetic              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  4. round once ──────────────────────────► Ok(Resolved(result))        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use margin_core::{CostStructure, PricingResolver, SolveMode};
//! use rust_decimal::Decimal;
//!
//! let resolver = PricingResolver::default();
//! let structure = CostStructure::new(Decimal::from(50), Decimal::from(18), Decimal::from(12));
//! let mode = SolveMode::ByMarginPercent { target_margin_percent: Decimal::from(20) };
//!
//! let outcome = resolver.resolve(&structure, mode).unwrap();
//! let result = outcome.result().unwrap();
//! assert_eq!(result.sale_price.to_string(), "100.00");
//! assert_eq!(result.net_profit.to_string(), "20.00");
//! ```

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::config::PricingConfig;
use crate::error::CoreResult;
use crate::rounding::RoundingPolicy;
use crate::types::{
    CostStructure, Infeasibility, ModeKind, PricingOutcome, PricingRequest, PricingResult,
    SolveMode,
};
use crate::validation::{validate_cost_structure, validate_mode};

// =============================================================================
// Resolver
// =============================================================================

/// Stateless pricing engine.
///
/// Holds nothing but immutable configuration, so one instance can be shared
/// by any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingResolver {
    config: PricingConfig,
}

impl PricingResolver {
    /// Creates a resolver after validating the configuration.
    pub fn new(config: PricingConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(PricingResolver { config })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Resolves one cost structure under one solve mode.
    ///
    /// ## Returns
    /// - `Err(PricingError::InvalidInput)` - negative or oversized input
    /// - `Ok(PricingOutcome::Infeasible)` - no valid price exists
    /// - `Ok(PricingOutcome::Resolved)` - every field populated and rounded
    pub fn resolve(
        &self,
        structure: &CostStructure,
        mode: SolveMode,
    ) -> CoreResult<PricingOutcome> {
        let max = self.config.max_input;
        validate_cost_structure(structure, max)?;
        validate_mode(&mode, max)?;

        let kind = mode.kind();

        let price = match solve_price(structure, mode) {
            Ok(price) => price,
            Err(reason) => {
                debug!(mode = %kind, %reason, "pricing request is infeasible");
                return Ok(PricingOutcome::Infeasible(reason));
            }
        };
        trace!(mode = %kind, sale_price = %price, "sale price determined");

        let Some(metrics) = Metrics::compute(structure, price) else {
            debug!(mode = %kind, sale_price = %price, "derived metrics overflow");
            return Ok(PricingOutcome::Infeasible(Infeasibility::PriceOutOfRange));
        };

        let feasible = match mode {
            // Price/cost ratios mean nothing at zero cost.
            SolveMode::ByPrice { sale_price } => {
                sale_price >= Decimal::ZERO && structure.cost > Decimal::ZERO
            }
            _ => true,
        };
        if !feasible {
            debug!(mode = %kind, "fixed price against zero cost, ratios are not meaningful");
        }

        Ok(PricingOutcome::Resolved(metrics.finish(
            kind,
            feasible,
            &self.config.rounding,
        )))
    }

    /// Resolves a request record.
    pub fn resolve_request(&self, request: &PricingRequest) -> CoreResult<PricingOutcome> {
        self.resolve(&request.cost_structure, request.mode)
    }

    /// Resolves independent requests, preserving order.
    ///
    /// One bad request never affects the others.
    pub fn resolve_batch(&self, requests: &[PricingRequest]) -> Vec<CoreResult<PricingOutcome>> {
        requests
            .iter()
            .map(|request| self.resolve_request(request))
            .collect()
    }
}

/// Resolves with the default configuration from four scalars and a mode name.
///
/// ## Example
/// ```rust
/// use margin_core::{resolve, ModeKind};
/// use rust_decimal::Decimal;
///
/// let outcome = resolve(
///     Decimal::from(100),
///     Decimal::from(10),
///     Decimal::from(20),
///     "profit".parse::<ModeKind>().unwrap(),
///     Decimal::from(30),
/// )
/// .unwrap();
/// assert!(outcome.is_feasible());
/// ```
pub fn resolve(
    cost: Decimal,
    tax_rate_percent: Decimal,
    fixed_cost_rate_percent: Decimal,
    mode: ModeKind,
    mode_value: Decimal,
) -> CoreResult<PricingOutcome> {
    PricingResolver::default().resolve(
        &CostStructure::new(cost, tax_rate_percent, fixed_cost_rate_percent),
        SolveMode::from_parts(mode, mode_value),
    )
}

// =============================================================================
// Price Solving
// =============================================================================

/// `1 - percent/100`, or `None` when that is not positive.
fn headroom(percent: Decimal) -> Option<Decimal> {
    if percent >= Decimal::ONE_HUNDRED {
        return None;
    }
    Some(Decimal::ONE - percent / Decimal::ONE_HUNDRED)
}

fn solve_price(structure: &CostStructure, mode: SolveMode) -> Result<Decimal, Infeasibility> {
    let variable_cost_percent = structure.variable_cost_percent();
    let saturated = Infeasibility::VariableCostsConsumeRevenue {
        variable_cost_percent,
    };

    let price = match mode {
        SolveMode::ByPrice { sale_price } => return Ok(sale_price),

        SolveMode::ByAbsoluteProfit { target_profit } => {
            let room = headroom(variable_cost_percent).ok_or(saturated)?;
            (target_profit + structure.cost)
                .checked_div(room)
                .ok_or(Infeasibility::PriceOutOfRange)?
        }

        SolveMode::ByMarginPercent {
            target_margin_percent,
        } => {
            headroom(variable_cost_percent).ok_or(saturated)?;
            let room = headroom(variable_cost_percent + target_margin_percent).ok_or(
                Infeasibility::MarginExceedsHeadroom {
                    variable_cost_percent,
                    target_margin_percent,
                },
            )?;
            // Price 0 would report a 0% margin, not the target.
            if structure.cost.is_zero() && target_margin_percent > Decimal::ZERO {
                return Err(Infeasibility::MarginUnreachableAtZeroCost {
                    variable_cost_percent,
                    target_margin_percent,
                });
            }
            structure
                .cost
                .checked_div(room)
                .ok_or(Infeasibility::PriceOutOfRange)?
        }
    };

    if price < Decimal::ZERO {
        return Err(Infeasibility::NegativePrice { sale_price: price });
    }

    Ok(price)
}

// =============================================================================
// Derived Metrics
// =============================================================================

/// Full-precision indicators for one price. Never leaves this module unrounded.
#[derive(Debug)]
struct Metrics {
    sale_price: Decimal,
    cost: Decimal,
    tax_amount: Decimal,
    net_revenue_after_tax: Decimal,
    fixed_cost_amount: Decimal,
    gross_profit: Decimal,
    gross_margin_percent: Decimal,
    net_profit: Decimal,
    net_margin_percent: Decimal,
    markup_percent: Decimal,
    contribution_margin: Decimal,
    break_even_price: Option<Decimal>,
}

/// `amount × percent / 100`
fn percent_of(amount: Decimal, percent: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(percent)?
        .checked_div(Decimal::ONE_HUNDRED)
}

/// `part / whole × 100`, zero when `whole` is zero.
///
/// Saturates at `Decimal::MAX`/`Decimal::MIN` instead of failing, so a fixed
/// price always yields a result.
fn ratio_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    let bound = if part.is_sign_negative() == whole.is_sign_negative() {
        Decimal::MAX
    } else {
        Decimal::MIN
    };
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(bound)
}

impl Metrics {
    /// Returns `None` if any step leaves the `Decimal` range.
    fn compute(structure: &CostStructure, price: Decimal) -> Option<Self> {
        let cost = structure.cost;

        let tax_amount = percent_of(price, structure.tax_rate_percent)?;
        let fixed_cost_amount = percent_of(price, structure.fixed_cost_rate_percent)?;
        let net_revenue_after_tax = price.checked_sub(tax_amount)?;
        let contribution_margin = price.checked_sub(cost)?.checked_sub(tax_amount)?;
        let gross_profit = net_revenue_after_tax.checked_sub(cost)?;
        let net_profit = contribution_margin.checked_sub(fixed_cost_amount)?;

        // Zero cost makes markup undefined; 0 is the agreed sentinel.
        let markup_percent = ratio_percent(price.checked_sub(cost)?, cost);

        let break_even_price = headroom(structure.variable_cost_percent())
            .and_then(|room| cost.checked_div(room));

        Some(Metrics {
            sale_price: price,
            cost,
            tax_amount,
            net_revenue_after_tax,
            fixed_cost_amount,
            gross_profit,
            gross_margin_percent: ratio_percent(gross_profit, net_revenue_after_tax),
            net_profit,
            net_margin_percent: ratio_percent(net_profit, price),
            markup_percent,
            contribution_margin,
            break_even_price,
        })
    }

    /// Rounds every field with the same policy.
    fn finish(self, mode: ModeKind, feasible: bool, policy: &RoundingPolicy) -> PricingResult {
        PricingResult {
            mode,
            sale_price: policy.apply(self.sale_price),
            cost: policy.apply(self.cost),
            tax_amount: policy.apply(self.tax_amount),
            net_revenue_after_tax: policy.apply(self.net_revenue_after_tax),
            fixed_cost_amount: policy.apply(self.fixed_cost_amount),
            gross_profit: policy.apply(self.gross_profit),
            gross_margin_percent: policy.apply(self.gross_margin_percent),
            net_profit: policy.apply(self.net_profit),
            net_margin_percent: policy.apply(self.net_margin_percent),
            markup_percent: policy.apply(self.markup_percent),
            contribution_margin: policy.apply(self.contribution_margin),
            break_even_price: self.break_even_price.map(|price| policy.apply(price)),
            feasible,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
