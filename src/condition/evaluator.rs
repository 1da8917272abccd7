//! Condition evaluator and validator

use crate::condition::ast::{Comparator, Fragment, LogicalOp, Terminal};
use crate::condition::parser::Condition;
use crate::condition::response::{KnownPrompts, Responses};
use crate::error::{ConditionError, Result};
use smallvec::SmallVec;
use tracing::{trace, warn};

impl Fragment {
    /// Evaluate the fragment against the responses collected so far
    pub fn evaluate(&self, responses: &Responses) -> Result<bool> {
        match self {
            Fragment::Terminal(terminal) => terminal.evaluate(responses),
            Fragment::Not(inner) => Ok(!inner.evaluate(responses)?),
            Fragment::Parenthetical(condition) => condition.evaluate(responses),
            Fragment::Comparison {
                comparator,
                left,
                right,
            } => compare(*comparator, left, right, responses),
            Fragment::Logical { op, left, right } => match op {
                LogicalOp::And => Ok(left.evaluate(responses)? && right.evaluate(responses)?),
                LogicalOp::Or => Ok(left.evaluate(responses)? || right.evaluate(responses)?),
            },
        }
    }

    /// Check that every referenced prompt id is known
    pub fn validate<K: KnownPrompts + ?Sized>(&self, known: &K) -> Result<()> {
        let mut ids = SmallVec::new();
        self.collect_prompt_ids(&mut ids);
        match ids.into_iter().find(|id| !known.contains_prompt(id)) {
            Some(unknown) => {
                warn!(prompt = unknown, "condition references an unknown prompt");
                Err(ConditionError::UnknownPromptId(unknown.to_string()))
            }
            None => Ok(()),
        }
    }

    pub(crate) fn collect_prompt_ids<'a>(&'a self, ids: &mut SmallVec<[&'a str; 4]>) {
        match self {
            Fragment::Terminal(terminal) => terminal.collect_prompt_ids(ids),
            Fragment::Not(inner) => inner.collect_prompt_ids(ids),
            Fragment::Parenthetical(condition) => condition.root().collect_prompt_ids(ids),
            Fragment::Comparison { left, right, .. } => {
                left.collect_prompt_ids(ids);
                right.collect_prompt_ids(ids);
            }
            Fragment::Logical { left, right, .. } => {
                left.collect_prompt_ids(ids);
                right.collect_prompt_ids(ids);
            }
        }
    }
}

fn compare(
    comparator: Comparator,
    left: &Terminal,
    right: &Terminal,
    responses: &Responses,
) -> Result<bool> {
    let other = right.value(responses)?;
    let other = other.as_ref();

    match comparator {
        Comparator::Equals => left.equals_value(responses, other),
        Comparator::NotEquals => Ok(!left.equals_value(responses, other)?),
        Comparator::LessThan => left.less_than_value(responses, other),
        Comparator::GreaterThan => left.greater_than_value(responses, other),
        Comparator::LessThanOrEquals => Ok(left.less_than_value(responses, other)?
            || left.equals_value(responses, other)?),
        Comparator::GreaterThanOrEquals => Ok(left.greater_than_value(responses, other)?
            || left.equals_value(responses, other)?),
    }
}

impl Condition {
    /// Decide whether the prompt guarded by this condition is displayed
    pub fn evaluate(&self, responses: &Responses) -> Result<bool> {
        let result = self.root().evaluate(responses)?;
        trace!(condition = self.sentence(), result, "evaluated condition");
        Ok(result)
    }

    /// Check that every referenced prompt id exists in the survey
    pub fn validate<K: KnownPrompts + ?Sized>(&self, known: &K) -> Result<()> {
        self.root().validate(known)
    }
}

/// Evaluate an optional condition; a prompt without one is always displayed
pub fn check(condition: Option<&Condition>, responses: &Responses) -> Result<bool> {
    match condition {
        Some(condition) => condition.evaluate(responses),
        None => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::response::ResponseValue;
    use std::collections::HashSet;

    fn responses(entries: &[(&str, ResponseValue)]) -> Responses {
        entries
            .iter()
            .map(|(id, value)| (id.to_string(), value.clone()))
            .collect()
    }

    fn eval(condition: &str, responses: &Responses) -> bool {
        Condition::parse(condition)
            .unwrap()
            .evaluate(responses)
            .unwrap()
    }

    #[test]
    fn test_end_to_end_scenarios() {
        let answered = responses(&[("q1", ResponseValue::text("answered"))]);
        assert!(eval("q1", &answered));
        assert!(!eval("! q1", &answered));

        let hidden = responses(&[("q1", ResponseValue::NOT_DISPLAYED)]);
        assert!(!eval("(q1)", &hidden));

        let empty = Responses::new();
        assert!(eval("\"hello\"", &empty));
        assert!(eval("5", &empty));
        assert!(!eval("0", &empty));

        assert!(matches!(
            Condition::parse("(("),
            Err(ConditionError::UnbalancedParentheses { .. })
        ));
    }

    #[test]
    fn test_comparisons() {
        let state = responses(&[
            ("age", ResponseValue::number(30)),
            ("mood", ResponseValue::text("happy")),
            ("sleep", ResponseValue::SKIPPED),
        ]);

        assert!(eval("age > 18", &state));
        assert!(eval("age >= 30", &state));
        assert!(eval("age <= 30", &state));
        assert!(!eval("age < 30", &state));
        assert!(eval("age != 31", &state));
        assert!(eval("30.0 == age", &state));
        assert!(eval("mood == \"happy\"", &state));
        assert!(!eval("mood == \"sad\"", &state));
        assert!(!eval("mood > \"a\"", &state));
        assert!(eval("sleep == SKIPPED", &state));
        assert!(!eval("sleep == NOT_DISPLAYED", &state));
        assert!(eval("sleep != NOT_DISPLAYED", &state));
    }

    #[test]
    fn test_logical_connectives() {
        let state = responses(&[
            ("q1", ResponseValue::number(1)),
            ("q2", ResponseValue::NOT_DISPLAYED),
            ("q3", ResponseValue::text("x")),
        ]);

        assert!(!eval("q1 and q2", &state));
        assert!(eval("q1 or q2", &state));
        assert!(eval("q2 or q1 and q3", &state));
        assert!(!eval("(q2 or q1) and ! q3", &state));
        assert!(eval("! q2 and q1 == 1", &state));
    }

    #[test]
    fn test_choices_membership() {
        let state = responses(&[(
            "foods",
            ResponseValue::from_json(&serde_json::json!([0, 2])).unwrap(),
        )]);

        assert!(eval("foods == 2", &state));
        assert!(!eval("foods == 1", &state));
        assert!(eval("foods != 1", &state));
    }

    #[test]
    fn test_missing_response_surfaces() {
        let condition = Condition::parse("q1 and q9").unwrap();
        let state = responses(&[("q1", ResponseValue::number(1))]);
        assert_eq!(
            condition.evaluate(&state),
            Err(ConditionError::MissingResponse("q9".to_string()))
        );
    }

    #[test]
    fn test_validate_unknown_id() {
        let known: HashSet<String> = ["q1".to_string()].into_iter().collect();
        assert!(Condition::parse("q1").unwrap().validate(&known).is_ok());
        assert_eq!(
            Condition::parse("q1 or (! q2)").unwrap().validate(&known),
            Err(ConditionError::UnknownPromptId("q2".to_string()))
        );
        assert!(Condition::parse("\"q2\" == 3 or NOT_DISPLAYED")
            .unwrap()
            .validate(&known)
            .is_ok());
    }

    #[test]
    fn test_check_without_condition() {
        assert!(check(None, &Responses::new()).unwrap());
        let condition = Condition::parse("0").unwrap();
        assert!(!check(Some(&condition), &Responses::new()).unwrap());
    }
}
