//! End-to-end pricing scenarios with hand-checked numbers.

use margin_core::{
    resolve, CostStructure, Infeasibility, ModeKind, PricingError, PricingOutcome,
    PricingResolver, PricingResult, SolveMode,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn expect_result(outcome: PricingOutcome) -> PricingResult {
    match outcome {
        PricingOutcome::Resolved(result) => result,
        PricingOutcome::Infeasible(reason) => panic!("unexpected infeasibility: {}", reason),
    }
}

// ── Walkthrough: cost 50, tax 18%, fixed 12%, target margin 20% ───────────

#[test]
fn margin_target_of_twenty_percent_prices_at_one_hundred() {
    let result = expect_result(
        resolve(dec!(50), dec!(18), dec!(12), ModeKind::Margin, dec!(20)).unwrap(),
    );

    assert_eq!(result.sale_price, dec!(100.00));
    assert_eq!(result.tax_amount, dec!(18.00));
    assert_eq!(result.fixed_cost_amount, dec!(12.00));
    assert_eq!(result.net_profit, dec!(20.00));
    assert_eq!(result.net_margin_percent, dec!(20.00));
    assert_eq!(result.markup_percent, dec!(100.00));
    assert!(result.feasible);
}

#[test]
fn outputs_always_carry_two_decimal_places() {
    let result = expect_result(
        resolve(dec!(50), dec!(18), dec!(12), ModeKind::Margin, dec!(20)).unwrap(),
    );
    assert_eq!(result.sale_price.to_string(), "100.00");
    assert_eq!(result.cost.to_string(), "50.00");
    assert_eq!(result.markup_percent.to_string(), "100.00");
}

// ── Break-even: cost 100, V = 30 ──────────────────────────────────────────

#[test]
fn break_even_price_leaves_zero_profit() {
    let resolver = PricingResolver::default();
    let structure = CostStructure::new(dec!(100), dec!(10), dec!(20));

    let probe = expect_result(
        resolver
            .resolve(&structure, SolveMode::ByPrice { sale_price: dec!(1) })
            .unwrap(),
    );
    assert_eq!(probe.break_even_price, Some(dec!(142.86)));

    let at_break_even = expect_result(
        resolver
            .resolve(
                &structure,
                SolveMode::ByPrice {
                    sale_price: dec!(142.86),
                },
            )
            .unwrap(),
    );
    assert!(at_break_even.net_profit.abs() <= dec!(0.01));
}

#[test]
fn zero_profit_target_solves_to_break_even() {
    let result = expect_result(
        resolve(dec!(100), dec!(10), dec!(20), ModeKind::Profit, Decimal::ZERO).unwrap(),
    );
    assert_eq!(Some(result.sale_price), result.break_even_price);
    assert_eq!(result.net_profit, Decimal::ZERO);
}

// ── Infeasibility boundary: V = 101 ───────────────────────────────────────

#[test]
fn over_saturated_structure_blocks_every_solving_mode() {
    for kind in [ModeKind::Profit, ModeKind::Margin] {
        let outcome = resolve(dec!(40), dec!(60), dec!(41), kind, dec!(5)).unwrap();
        assert_eq!(
            outcome,
            PricingOutcome::Infeasible(Infeasibility::VariableCostsConsumeRevenue {
                variable_cost_percent: dec!(101),
            }),
            "mode {} should be infeasible",
            kind
        );
        assert!(!outcome.is_feasible());
    }
}

#[test]
fn over_saturated_structure_still_prices_a_fixed_price() {
    let result = expect_result(
        resolve(dec!(40), dec!(60), dec!(41), ModeKind::Price, dec!(100)).unwrap(),
    );
    assert_eq!(result.net_profit, dec!(-41.00));
    assert_eq!(result.break_even_price, None);
    assert!(result.feasible);
}

#[test]
fn exactly_one_hundred_percent_is_already_infeasible() {
    let outcome = resolve(dec!(40), dec!(70), dec!(30), ModeKind::Profit, dec!(5)).unwrap();
    assert!(outcome.infeasibility().is_some());
}

// ── Zero cost ─────────────────────────────────────────────────────────────

#[test]
fn zero_cost_fixed_price_does_not_error() {
    let result = expect_result(
        resolve(Decimal::ZERO, dec!(10), dec!(10), ModeKind::Price, dec!(10)).unwrap(),
    );
    assert_eq!(result.markup_percent, Decimal::ZERO);
    assert!(!result.feasible);
}

#[test]
fn zero_cost_profit_target_is_feasible() {
    let result = expect_result(
        resolve(Decimal::ZERO, dec!(20), dec!(0), ModeKind::Profit, dec!(8)).unwrap(),
    );
    assert_eq!(result.sale_price, dec!(10.00));
    assert_eq!(result.net_profit, dec!(8.00));
    assert_eq!(result.markup_percent, Decimal::ZERO);
    assert!(result.feasible);
}

#[test]
fn zero_cost_cannot_reach_a_positive_margin_target() {
    let outcome = resolve(Decimal::ZERO, dec!(18), dec!(12), ModeKind::Margin, dec!(20)).unwrap();
    assert!(!outcome.is_feasible());
    assert!(matches!(
        outcome.infeasibility(),
        Some(Infeasibility::MarginUnreachableAtZeroCost { .. })
    ));
}

// ── Error kinds stay distinct ─────────────────────────────────────────────

#[test]
fn negative_inputs_are_errors_not_infeasibility() {
    let cases = [
        (dec!(-1), dec!(10), dec!(10), dec!(5)),
        (dec!(1), dec!(-10), dec!(10), dec!(5)),
        (dec!(1), dec!(10), dec!(-10), dec!(5)),
        (dec!(1), dec!(10), dec!(10), dec!(-5)),
    ];

    for (cost, tax, fixed, target) in cases {
        for kind in [ModeKind::Price, ModeKind::Profit, ModeKind::Margin] {
            let err = resolve(cost, tax, fixed, kind, target).unwrap_err();
            assert!(
                matches!(err, PricingError::InvalidInput(_)),
                "expected invalid input for {:?}",
                (cost, tax, fixed, target, kind)
            );
        }
    }
}

#[test]
fn mode_names_parse_from_form_values() {
    let kind: ModeKind = "margin".parse().unwrap();
    let outcome = resolve(dec!(50), dec!(18), dec!(12), kind, dec!(20)).unwrap();
    assert!(outcome.is_feasible());

    let err = "markdown".parse::<ModeKind>().unwrap_err();
    let err: PricingError = err.into();
    assert!(err.is_invalid_input());
}

// ── Serialized shape the portal consumes ──────────────────────────────────

#[test]
fn resolved_outcome_serializes_decimals_as_strings() {
    let outcome = resolve(dec!(50), dec!(18), dec!(12), ModeKind::Margin, dec!(20)).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["status"], "resolved");
    assert_eq!(json["detail"]["sale_price"], "100.00");
    assert_eq!(json["detail"]["mode"], "margin");
    assert_eq!(json["detail"]["feasible"], true);

    let back: PricingOutcome = serde_json::from_value(json).unwrap();
    assert_eq!(back, outcome);
}
