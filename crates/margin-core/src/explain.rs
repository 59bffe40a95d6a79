//! # Metric Explanations
//!
//! Turns a [`PricingResult`] into labelled lines with a one-sentence
//! explanation quoting the actual numbers. The portal's result panel and the
//! CLI `--explain` output both render these.
//!
//! ```text
//! Sale price            100.00   Price solved so net profit is 20.00% of it.
//! Tax amount             18.00   Taxes take 18.00 out of the 100.00 sale price.
//! ...
//! Break-even price       71.43   Selling at 71.43 leaves exactly zero net profit.
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{ModeKind, PricingResult};

// =============================================================================
// Metric Identifiers
// =============================================================================

/// One field of a pricing result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Metric {
    SalePrice,
    Cost,
    TaxAmount,
    NetRevenueAfterTax,
    FixedCostAmount,
    ContributionMargin,
    GrossProfit,
    GrossMarginPercent,
    NetProfit,
    NetMarginPercent,
    MarkupPercent,
    BreakEvenPrice,
}

/// Whether a metric is an amount of money or a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MetricUnit {
    Money,
    Percent,
}

impl Metric {
    /// Every metric, in display order.
    pub const ALL: [Metric; 12] = [
        Metric::SalePrice,
        Metric::Cost,
        Metric::TaxAmount,
        Metric::NetRevenueAfterTax,
        Metric::FixedCostAmount,
        Metric::ContributionMargin,
        Metric::GrossProfit,
        Metric::GrossMarginPercent,
        Metric::NetProfit,
        Metric::NetMarginPercent,
        Metric::MarkupPercent,
        Metric::BreakEvenPrice,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Metric::SalePrice => "Sale price",
            Metric::Cost => "Cost",
            Metric::TaxAmount => "Tax amount",
            Metric::NetRevenueAfterTax => "Net revenue after tax",
            Metric::FixedCostAmount => "Fixed cost amount",
            Metric::ContributionMargin => "Contribution margin",
            Metric::GrossProfit => "Gross profit",
            Metric::GrossMarginPercent => "Gross margin",
            Metric::NetProfit => "Net profit",
            Metric::NetMarginPercent => "Net margin",
            Metric::MarkupPercent => "Markup",
            Metric::BreakEvenPrice => "Break-even price",
        }
    }

    pub fn unit(self) -> MetricUnit {
        match self {
            Metric::GrossMarginPercent | Metric::NetMarginPercent | Metric::MarkupPercent => {
                MetricUnit::Percent
            }
            _ => MetricUnit::Money,
        }
    }
}

// =============================================================================
// Metric Line
// =============================================================================

/// A metric, its value and what it means for this particular result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetricLine {
    pub metric: Metric,
    pub label: String,
    pub unit: MetricUnit,
    /// `None` only for an undefined break-even price.
    #[ts(type = "string | null")]
    pub value: Option<Decimal>,
    pub explanation: String,
}

impl PricingResult {
    /// Value of one metric.
    pub fn value_of(&self, metric: Metric) -> Option<Decimal> {
        let value = match metric {
            Metric::SalePrice => self.sale_price,
            Metric::Cost => self.cost,
            Metric::TaxAmount => self.tax_amount,
            Metric::NetRevenueAfterTax => self.net_revenue_after_tax,
            Metric::FixedCostAmount => self.fixed_cost_amount,
            Metric::ContributionMargin => self.contribution_margin,
            Metric::GrossProfit => self.gross_profit,
            Metric::GrossMarginPercent => self.gross_margin_percent,
            Metric::NetProfit => self.net_profit,
            Metric::NetMarginPercent => self.net_margin_percent,
            Metric::MarkupPercent => self.markup_percent,
            Metric::BreakEvenPrice => return self.break_even_price,
        };
        Some(value)
    }

    /// Explains every metric of this result, in display order.
    pub fn explain(&self) -> Vec<MetricLine> {
        Metric::ALL
            .iter()
            .map(|&metric| MetricLine {
                metric,
                label: metric.label().to_string(),
                unit: metric.unit(),
                value: self.value_of(metric),
                explanation: explanation(metric, self),
            })
            .collect()
    }
}

fn explanation(metric: Metric, r: &PricingResult) -> String {
    match metric {
        Metric::SalePrice => match r.mode {
            ModeKind::Price => "Sale price supplied by the caller.".to_string(),
            ModeKind::Profit => format!(
                "Price solved so each unit earns a net profit of {}.",
                r.net_profit
            ),
            ModeKind::Margin => format!(
                "Price solved so net profit is {}% of it.",
                r.net_margin_percent
            ),
        },
        Metric::Cost => format!("Unit cost of the product: {}.", r.cost),
        Metric::TaxAmount => format!(
            "Taxes take {} out of the {} sale price.",
            r.tax_amount, r.sale_price
        ),
        Metric::NetRevenueAfterTax => format!(
            "Revenue kept after taxes: {} - {} = {}.",
            r.sale_price, r.tax_amount, r.net_revenue_after_tax
        ),
        Metric::FixedCostAmount => format!(
            "Part of the sale price set aside for fixed overhead: {}.",
            r.fixed_cost_amount
        ),
        Metric::ContributionMargin => format!(
            "Price minus cost and taxes, before fixed overhead: {}. \
             This is what pays for fixed costs and profit.",
            r.contribution_margin
        ),
        Metric::GrossProfit => format!(
            "Tax-free revenue minus cost: {} - {} = {}.",
            r.net_revenue_after_tax, r.cost, r.gross_profit
        ),
        Metric::GrossMarginPercent => format!(
            "Gross profit is {}% of tax-free revenue.",
            r.gross_margin_percent
        ),
        Metric::NetProfit => {
            if r.net_profit < Decimal::ZERO {
                format!(
                    "Each unit loses {} once cost, taxes and fixed overhead are paid.",
                    r.net_profit.abs()
                )
            } else {
                format!(
                    "Left after cost, taxes and fixed overhead: {} - {} - {} - {} = {}.",
                    r.sale_price, r.cost, r.tax_amount, r.fixed_cost_amount, r.net_profit
                )
            }
        }
        Metric::NetMarginPercent => format!(
            "Net profit is {}% of the sale price.",
            r.net_margin_percent
        ),
        Metric::MarkupPercent => {
            if r.cost.is_zero() {
                "Markup is undefined for a zero cost and is reported as 0.".to_string()
            } else {
                format!("The price is {}% above cost.", r.markup_percent)
            }
        }
        Metric::BreakEvenPrice => match r.break_even_price {
            Some(price) => format!("Selling at {} leaves exactly zero net profit.", price),
            None => "No break-even price: taxes and fixed costs take all revenue.".to_string(),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
