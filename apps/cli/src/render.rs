//! # Output Rendering
//!
//! Text and JSON forms of a pricing outcome.
//!
//! ```text
//! Mode:    margin (target_margin_percent = 20)
//! Status:  resolved
//!
//!   Sale price                      100.00
//!   Cost                             50.00
//!   Tax amount                       18.00
//!   ...
//!   Markup                         100.00%
//!   Break-even price                 71.43
//! ```

use margin_core::{
    CoreResult, Infeasibility, MetricLine, MetricUnit, PricingOutcome, PricingResult, SolveMode,
};
use serde::Serialize;

use crate::error::ErrorReport;

const LABEL_WIDTH: usize = 24;
const VALUE_WIDTH: usize = 16;

// =============================================================================
// Text
// =============================================================================

/// Renders an outcome as an aligned table.
pub fn render_text(mode: &SolveMode, outcome: &PricingOutcome, explain: bool) -> String {
    let mut out = format!(
        "Mode:    {} ({} = {})\n",
        mode.kind(),
        mode.target_field(),
        mode.target()
    );

    match outcome {
        PricingOutcome::Resolved(result) => {
            if result.feasible {
                out.push_str("Status:  resolved\n\n");
            } else {
                out.push_str("Status:  resolved, not feasible\n\n");
            }
            for line in result.explain() {
                push_metric(&mut out, &line, explain);
            }
        }
        PricingOutcome::Infeasible(reason) => {
            out.push_str("Status:  infeasible\n");
            out.push_str(&format!("Reason:  {}\n", reason));
        }
    }

    out
}

fn push_metric(out: &mut String, line: &MetricLine, explain: bool) {
    let value = match (line.value, line.unit) {
        (Some(v), MetricUnit::Percent) => format!("{}%", v),
        (Some(v), MetricUnit::Money) => v.to_string(),
        (None, _) => "n/a".to_string(),
    };
    out.push_str(&format!(
        "  {:<label$}{:>value$}\n",
        line.label,
        value,
        label = LABEL_WIDTH,
        value = VALUE_WIDTH
    ));
    if explain {
        out.push_str(&format!("      {}\n", line.explanation));
    }
}

// =============================================================================
// JSON
// =============================================================================

/// JSON document printed by `margin resolve --format json`.
#[derive(Debug, Serialize)]
pub struct ResolveReport<'a> {
    #[serde(flatten)]
    pub outcome: &'a PricingOutcome,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Vec<MetricLine>>,
}

impl<'a> ResolveReport<'a> {
    pub fn new(outcome: &'a PricingOutcome, explain: bool) -> Self {
        let explanation = if explain {
            outcome.result().map(PricingResult::explain)
        } else {
            None
        };
        ResolveReport {
            outcome,
            explanation,
        }
    }
}

/// One element of the `margin batch` output array.
///
/// ```json
/// { "index": 0, "id": "sku-1", "status": "resolved", "detail": { ... } }
/// { "index": 1, "status": "error", "detail": { "code": "VALIDATION_ERROR", ... } }
/// ```
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub index: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub body: BatchBody,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum BatchBody {
    Resolved(PricingResult),
    Infeasible(Infeasibility),
    Error(ErrorReport),
}

impl BatchBody {
    pub fn status(&self) -> &'static str {
        match self {
            BatchBody::Resolved(_) => "resolved",
            BatchBody::Infeasible(_) => "infeasible",
            BatchBody::Error(_) => "error",
        }
    }
}

impl From<CoreResult<PricingOutcome>> for BatchBody {
    fn from(result: CoreResult<PricingOutcome>) -> Self {
        match result {
            Ok(PricingOutcome::Resolved(r)) => BatchBody::Resolved(r),
            Ok(PricingOutcome::Infeasible(reason)) => BatchBody::Infeasible(reason),
            Err(err) => BatchBody::Error(ErrorReport::from(&err)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use margin_core::{CostStructure, PricingResolver};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn margin_mode() -> SolveMode {
        SolveMode::ByMarginPercent {
            target_margin_percent: dec!(20),
        }
    }

    fn outcome(cost: Decimal, tax: Decimal, fixed: Decimal, mode: SolveMode) -> PricingOutcome {
        let structure = CostStructure::new(cost, tax, fixed);
        PricingResolver::default().resolve(&structure, mode).unwrap()
    }

    #[test]
    fn test_text_table() {
        let mode = margin_mode();
        let text = render_text(&mode, &outcome(dec!(50), dec!(18), dec!(12), mode), false);

        assert!(text.starts_with("Mode:    margin (target_margin_percent = 20)\n"));
        assert!(text.contains("Status:  resolved\n"));
        assert!(text.contains(&format!("  {:<24}{:>16}\n", "Sale price", "100.00")));
        assert!(text.contains(&format!("  {:<24}{:>16}\n", "Markup", "100.00%")));
        assert!(!text.contains("Taxes take"));
    }

    #[test]
    fn test_text_with_explanations() {
        let mode = margin_mode();
        let text = render_text(&mode, &outcome(dec!(50), dec!(18), dec!(12), mode), true);
        assert!(text.contains("      Taxes take 18.00 out of the 100.00 sale price.\n"));
    }

    #[test]
    fn test_text_infeasible() {
        let mode = SolveMode::ByAbsoluteProfit {
            target_profit: dec!(5),
        };
        let text = render_text(&mode, &outcome(dec!(40), dec!(60), dec!(41), mode), true);
        assert!(text.contains("Status:  infeasible\n"));
        assert!(text.contains("Reason:  "));
        assert!(!text.contains("Sale price"));
    }

    #[test]
    fn test_text_undefined_break_even() {
        let mode = SolveMode::ByPrice {
            sale_price: dec!(100),
        };
        let text = render_text(&mode, &outcome(dec!(40), dec!(60), dec!(41), mode), false);
        assert!(text.contains(&format!("  {:<24}{:>16}\n", "Break-even price", "n/a")));
    }

    #[test]
    fn test_not_feasible_flag_is_shown() {
        let mode = SolveMode::ByPrice {
            sale_price: dec!(10),
        };
        let text = render_text(&mode, &outcome(dec!(0), dec!(10), dec!(10), mode), false);
        assert!(text.contains("Status:  resolved, not feasible\n"));
    }

    #[test]
    fn test_json_report() {
        let mode = margin_mode();
        let outcome = outcome(dec!(50), dec!(18), dec!(12), mode);

        let plain = serde_json::to_value(ResolveReport::new(&outcome, false)).unwrap();
        assert_eq!(plain["status"], "resolved");
        assert_eq!(plain["detail"]["net_profit"], "20.00");
        assert!(plain.get("explanation").is_none());

        let explained = serde_json::to_value(ResolveReport::new(&outcome, true)).unwrap();
        assert_eq!(explained["explanation"].as_array().unwrap().len(), 12);
        assert_eq!(explained["explanation"][0]["metric"], "sale_price");
    }

    #[test]
    fn test_batch_entry_shape() {
        let entry = BatchEntry {
            index: 3,
            id: Some("sku-9".to_string()),
            body: BatchBody::Infeasible(Infeasibility::VariableCostsConsumeRevenue {
                variable_cost_percent: dec!(101),
            }),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["index"], 3);
        assert_eq!(json["id"], "sku-9");
        assert_eq!(json["status"], "infeasible");
        assert_eq!(json["detail"]["reason"], "variable_costs_consume_revenue");
        assert_eq!(entry.body.status(), "infeasible");
    }
}
