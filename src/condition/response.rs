//! Response values a condition is evaluated against

use crate::condition::number::OhmageNumber;
use crate::error::{ConditionError, Result};
use ahash::AHashSet;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Keyword naming the not-displayed marker inside a condition
pub const NOT_DISPLAYED: &str = "NOT_DISPLAYED";
/// Keyword naming the skipped marker inside a condition
pub const SKIPPED: &str = "SKIPPED";

/// Why a prompt has no real answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoResponse {
    /// Hidden because its own condition evaluated to false
    NotDisplayed,
    /// Shown, but explicitly skipped by the user
    Skipped,
}

impl NoResponse {
    pub fn keyword(&self) -> &'static str {
        match self {
            NoResponse::NotDisplayed => NOT_DISPLAYED,
            NoResponse::Skipped => SKIPPED,
        }
    }
}

impl fmt::Display for NoResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The recorded value of a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseValue {
    Text(String),
    Number(OhmageNumber),
    /// Keys chosen in a multi-choice prompt
    Choices(Vec<OhmageNumber>),
    NoResponse(NoResponse),
}

impl ResponseValue {
    pub const NOT_DISPLAYED: ResponseValue = ResponseValue::NoResponse(NoResponse::NotDisplayed);
    pub const SKIPPED: ResponseValue = ResponseValue::NoResponse(NoResponse::Skipped);

    pub fn text(value: impl Into<String>) -> Self {
        ResponseValue::Text(value.into())
    }

    pub fn number(value: impl Into<OhmageNumber>) -> Self {
        ResponseValue::Number(value.into())
    }

    #[inline]
    pub fn is_no_response(&self) -> bool {
        matches!(self, ResponseValue::NoResponse(_))
    }

    /// Convert a JSON answer into a response value
    ///
    /// `null` means the prompt was never displayed. Strings are always
    /// answers, even when they spell a marker keyword.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(ResponseValue::NOT_DISPLAYED),
            Value::String(s) => Ok(ResponseValue::Text(s.clone())),
            Value::Number(n) => Ok(ResponseValue::Number(OhmageNumber::from_json(n)?)),
            Value::Bool(b) => Ok(ResponseValue::Number(OhmageNumber::from(i32::from(*b)))),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => OhmageNumber::from_json(n),
                    other => Err(ConditionError::DeserializationError(format!(
                        "Choice keys must be numbers, found: {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(ResponseValue::Choices),
            Value::Object(_) => Err(ConditionError::DeserializationError(format!(
                "Unsupported response value: {}",
                value
            ))),
        }
    }
}

impl From<NoResponse> for ResponseValue {
    fn from(marker: NoResponse) -> Self {
        ResponseValue::NoResponse(marker)
    }
}

impl From<OhmageNumber> for ResponseValue {
    fn from(value: OhmageNumber) -> Self {
        ResponseValue::Number(value)
    }
}

impl From<&str> for ResponseValue {
    fn from(value: &str) -> Self {
        ResponseValue::Text(value.to_string())
    }
}

impl From<String> for ResponseValue {
    fn from(value: String) -> Self {
        ResponseValue::Text(value)
    }
}

impl From<i64> for ResponseValue {
    fn from(value: i64) -> Self {
        ResponseValue::Number(OhmageNumber::from(value))
    }
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseValue::Text(s) => write!(f, "\"{}\"", s),
            ResponseValue::Number(n) => write!(f, "{}", n),
            ResponseValue::Choices(keys) => {
                let keys = keys.iter().map(|k| k.to_string()).collect::<Vec<_>>();
                write!(f, "[{}]", keys.join(","))
            }
            ResponseValue::NoResponse(marker) => write!(f, "{}", marker),
        }
    }
}

/// Map of prompt id to recorded response
pub type Responses = HashMap<String, ResponseValue>;

/// Convert a JSON object of answers into a response map
pub fn responses_from_json(value: &Value) -> Result<Responses> {
    let object = value.as_object().ok_or_else(|| {
        ConditionError::DeserializationError("responses must be a JSON object".to_string())
    })?;

    object
        .iter()
        .map(|(id, answer)| Ok((id.clone(), ResponseValue::from_json(answer)?)))
        .collect()
}

/// A set of prompt ids a condition may legally reference
pub trait KnownPrompts {
    fn contains_prompt(&self, id: &str) -> bool;
}

impl KnownPrompts for HashSet<String> {
    fn contains_prompt(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl KnownPrompts for AHashSet<String> {
    fn contains_prompt(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl<V> KnownPrompts for HashMap<String, V> {
    fn contains_prompt(&self, id: &str) -> bool {
        self.contains_key(id)
    }
}

impl<V> KnownPrompts for BTreeMap<String, V> {
    fn contains_prompt(&self, id: &str) -> bool {
        self.contains_key(id)
    }
}

impl KnownPrompts for [&str] {
    fn contains_prompt(&self, id: &str) -> bool {
        self.iter().any(|known| *known == id)
    }
}
