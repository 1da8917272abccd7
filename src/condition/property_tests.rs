//! Property tests for condition module
//!
//! Covers parenthesis balance, the negation law, grouping transparency and
//! numeric comparison consistency.

use proptest::prelude::*;

use crate::condition::cache::{cache_size, check_condition};
use crate::condition::number::OhmageNumber;
use crate::condition::parser::Condition;
use crate::condition::response::{ResponseValue, Responses};
use crate::error::ConditionError;

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

const PROMPTS: [&str; 4] = ["q1", "q2", "q3", "q4"];

/// Generate prompt ids that always have a response
fn prompt_id_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(PROMPTS.to_vec()).prop_map(|id| id.to_string())
}

/// Generate comparison operators
fn comparator_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("=="),
        Just("!="),
        Just("<"),
        Just("<="),
        Just(">"),
        Just(">="),
    ]
}

/// Generate decimal literals with up to two fractional digits
fn decimal_literal_strategy() -> impl Strategy<Value = String> {
    (-500..=500i64, prop::bool::ANY).prop_map(|(hundredths, fractional)| {
        if fractional {
            let sign = if hundredths < 0 { "-" } else { "" };
            let magnitude = hundredths.abs();
            format!("{}{}.{:02}", sign, magnitude / 100, magnitude % 100)
        } else {
            (hundredths / 100).to_string()
        }
    })
}

/// Generate a leaf expression
fn leaf_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prompt_id_strategy(),
        decimal_literal_strategy(),
        Just("\"text\"".to_string()),
        Just("NOT_DISPLAYED".to_string()),
        Just("SKIPPED".to_string()),
        (prompt_id_strategy(), comparator_strategy(), decimal_literal_strategy())
            .prop_map(|(id, op, value)| format!("{} {} {}", id, op, value)),
        (prompt_id_strategy(), prop_oneof![Just("NOT_DISPLAYED"), Just("SKIPPED")])
            .prop_map(|(id, marker)| format!("{} == {}", id, marker)),
    ]
}

/// Generate a well-formed condition expression
fn expression_strategy() -> impl Strategy<Value = String> {
    leaf_strategy().prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| format!("! ({})", e)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({}) and ({})", a, b)),
            (inner.clone(), inner).prop_map(|(a, b)| format!("({}) or ({})", a, b)),
        ]
    })
}

/// Generate a response for a single prompt
fn response_strategy() -> impl Strategy<Value = ResponseValue> {
    prop_oneof![
        (-5..=5i64).prop_map(ResponseValue::from),
        Just(ResponseValue::text("answer")),
        Just(ResponseValue::NOT_DISPLAYED),
        Just(ResponseValue::SKIPPED),
    ]
}

/// Generate a response map covering every prompt
fn responses_strategy() -> impl Strategy<Value = Responses> {
    prop::collection::vec(response_strategy(), PROMPTS.len()).prop_map(|values| {
        PROMPTS
            .iter()
            .map(|id| id.to_string())
            .zip(values)
            .collect()
    })
}

fn evaluate(sentence: &str, responses: &Responses) -> bool {
    Condition::parse(sentence)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", sentence, e))
        .evaluate(responses)
        .unwrap_or_else(|e| panic!("Failed to evaluate {}: {}", sentence, e))
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Generated expressions always parse
    #[test]
    fn prop_expression_parses(expr in expression_strategy()) {
        let result = Condition::parse(&expr);
        prop_assert!(result.is_ok(), "Failed to parse: {} ({:?})", expr, result);
    }

    /// Wrapping in K balanced parentheses parses; unequal counts never do
    #[test]
    fn prop_parenthesis_balance(
        expr in expression_strategy(),
        depth in 0..6usize,
        extra_open in 1..3usize,
    ) {
        let wrapped = format!("{}{}{}", "(".repeat(depth), expr, ")".repeat(depth));
        prop_assert!(Condition::parse(&wrapped).is_ok(), "Failed to parse: {}", wrapped);

        let unbalanced = format!("{}{}", "(".repeat(extra_open), wrapped);
        let is_unbalanced = matches!(
            Condition::parse(&unbalanced),
            Err(ConditionError::UnbalancedParentheses { .. })
        );
        prop_assert!(is_unbalanced, "Expected unbalanced error for: {}", unbalanced);
    }

    /// evaluate(!E) == !evaluate(E)
    #[test]
    fn prop_negation_law(expr in expression_strategy(), responses in responses_strategy()) {
        let plain = evaluate(&expr, &responses);
        let negated = evaluate(&format!("! ({})", expr), &responses);
        prop_assert_eq!(negated, !plain, "Condition: {}", expr);
    }

    /// evaluate((E)) == evaluate(E)
    #[test]
    fn prop_grouping_transparency(expr in expression_strategy(), responses in responses_strategy()) {
        let plain = evaluate(&expr, &responses);
        let grouped = evaluate(&format!("({})", expr), &responses);
        prop_assert_eq!(grouped, plain, "Condition: {}", expr);
    }

    /// Exactly one of <, ==, > holds and it agrees with decimal arithmetic
    #[test]
    fn prop_numeric_trichotomy(a in decimal_literal_strategy(), b in decimal_literal_strategy()) {
        let empty = Responses::new();
        let less = evaluate(&format!("{} < {}", a, b), &empty);
        let equal = evaluate(&format!("{} == {}", a, b), &empty);
        let greater = evaluate(&format!("{} > {}", a, b), &empty);

        prop_assert_eq!([less, equal, greater].iter().filter(|v| **v).count(), 1);

        let left = OhmageNumber::parse(&a).unwrap();
        let right = OhmageNumber::parse(&b).unwrap();
        prop_assert_eq!(less, left < right);
        prop_assert_eq!(equal, left == right);
        prop_assert_eq!(greater, left > right);
    }

    /// Prompt references to numeric answers compare like the literals
    #[test]
    fn prop_prompt_reference_comparison(answer in -20..=20i64, threshold in -20..=20i64) {
        let mut responses = Responses::new();
        responses.insert("q1".to_string(), ResponseValue::from(answer));

        prop_assert_eq!(evaluate(&format!("q1 > {}", threshold), &responses), answer > threshold);
        prop_assert_eq!(evaluate(&format!("q1 < {}", threshold), &responses), answer < threshold);
        prop_assert_eq!(evaluate(&format!("q1 >= {}", threshold), &responses), answer >= threshold);
        prop_assert_eq!(evaluate(&format!("q1 <= {}", threshold), &responses), answer <= threshold);
        prop_assert_eq!(evaluate(&format!("q1 == {}", threshold), &responses), answer == threshold);
        prop_assert_eq!(evaluate(&format!("q1 != {}", threshold), &responses), answer != threshold);
    }

    /// Prompts without a real answer are never truthy
    #[test]
    fn prop_no_response_is_falsy(responses in responses_strategy()) {
        for id in PROMPTS {
            let expected = !responses[id].is_no_response();
            prop_assert_eq!(evaluate(id, &responses), expected);
        }
    }

    /// Cached evaluation matches direct parsing
    #[test]
    fn prop_cache_consistency(expr in expression_strategy(), responses in responses_strategy()) {
        let direct = evaluate(&expr, &responses);
        let cached_first = check_condition(&expr, &responses).unwrap();
        let cached_second = check_condition(&expr, &responses).unwrap();

        prop_assert_eq!(direct, cached_first);
        prop_assert_eq!(cached_first, cached_second);
        prop_assert!(cache_size() >= 1);
    }
}
