//! Terminal values and their comparison semantics

use crate::condition::ast::Terminal;
use crate::condition::number::OhmageNumber;
use crate::condition::response::{ResponseValue, Responses};
use crate::error::{ConditionError, Result};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::cmp::Ordering;
use tracing::error;

/// Look up the response of a referenced prompt
///
/// Navigation records a response or a marker for every prompt before a
/// later prompt's condition runs, so a miss here is an invariant violation.
fn lookup<'a>(id: &str, responses: &'a Responses) -> Result<&'a ResponseValue> {
    responses.get(id).ok_or_else(|| {
        error!(prompt = id, "no response recorded for referenced prompt");
        ConditionError::MissingResponse(id.to_string())
    })
}

/// Equality between a number and a comparison operand
///
/// Numbers compare by decimal value, and a multi-choice response equals a
/// number when that key was chosen.
fn number_equals(number: &OhmageNumber, other: &ResponseValue) -> bool {
    match other {
        ResponseValue::Number(b) => number.compare_to(b) == Ordering::Equal,
        ResponseValue::Choices(keys) => keys.contains(number),
        _ => false,
    }
}

fn number_ordering(number: &OhmageNumber, other: &ResponseValue) -> Option<Ordering> {
    match other {
        ResponseValue::Number(b) => Some(number.compare_to(b)),
        _ => None,
    }
}

/// Equality between a recorded response and a comparison operand
fn response_equals(value: &ResponseValue, other: &ResponseValue) -> bool {
    match (value, other) {
        (ResponseValue::Number(number), _) => number_equals(number, other),
        (ResponseValue::Choices(keys), ResponseValue::Number(key)) => keys.contains(key),
        _ => value == other,
    }
}

fn response_ordering(value: &ResponseValue, other: &ResponseValue) -> Option<Ordering> {
    match value {
        ResponseValue::Number(number) => number_ordering(number, other),
        _ => None,
    }
}

impl Terminal {
    /// The value this terminal stands for
    pub fn value<'a>(&'a self, responses: &'a Responses) -> Result<Cow<'a, ResponseValue>> {
        match self {
            Terminal::Text(text) => Ok(Cow::Owned(ResponseValue::Text(text.clone()))),
            Terminal::Numeric(n) => Ok(Cow::Owned(ResponseValue::Number(n.clone()))),
            Terminal::PromptId(id) => lookup(id, responses).map(Cow::Borrowed),
            Terminal::NotDisplayed => Ok(Cow::Owned(ResponseValue::NOT_DISPLAYED)),
            Terminal::Skipped => Ok(Cow::Owned(ResponseValue::SKIPPED)),
        }
    }

    /// Truthiness of the terminal on its own
    pub fn evaluate(&self, responses: &Responses) -> Result<bool> {
        match self {
            Terminal::Text(_) => Ok(true),
            Terminal::Numeric(n) => Ok(!n.is_zero()),
            Terminal::PromptId(id) => Ok(!lookup(id, responses)?.is_no_response()),
            Terminal::NotDisplayed | Terminal::Skipped => Ok(false),
        }
    }

    pub fn equals_value(&self, responses: &Responses, other: &ResponseValue) -> Result<bool> {
        match self {
            Terminal::Text(text) => {
                Ok(matches!(other, ResponseValue::Text(candidate) if candidate == text))
            }
            Terminal::Numeric(n) => Ok(number_equals(n, other)),
            Terminal::PromptId(id) => Ok(response_equals(lookup(id, responses)?, other)),
            Terminal::NotDisplayed => Ok(*other == ResponseValue::NOT_DISPLAYED),
            Terminal::Skipped => Ok(*other == ResponseValue::SKIPPED),
        }
    }

    pub fn less_than_value(&self, responses: &Responses, other: &ResponseValue) -> Result<bool> {
        Ok(self.ordering(responses, other)? == Some(Ordering::Less))
    }

    pub fn greater_than_value(&self, responses: &Responses, other: &ResponseValue) -> Result<bool> {
        Ok(self.ordering(responses, other)? == Some(Ordering::Greater))
    }

    /// Ordering against `other`, `None` when the two are not ordered
    fn ordering(&self, responses: &Responses, other: &ResponseValue) -> Result<Option<Ordering>> {
        match self {
            Terminal::Numeric(n) => Ok(number_ordering(n, other)),
            Terminal::PromptId(id) => Ok(response_ordering(lookup(id, responses)?, other)),
            Terminal::Text(_) | Terminal::NotDisplayed | Terminal::Skipped => Ok(None),
        }
    }

    pub(crate) fn collect_prompt_ids<'a>(&'a self, ids: &mut SmallVec<[&'a str; 4]>) {
        if let Terminal::PromptId(id) = self {
            ids.push(id);
        }
    }
}
