//! Error types for the condition engine

use thiserror::Error;

/// Main error type for condition parsing, validation and evaluation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    #[error("Unbalanced parentheses: {open} '(' versus {close} ')' in: {sentence}")]
    UnbalancedParentheses {
        sentence: String,
        open: usize,
        close: usize,
    },

    #[error("Malformed grouping: {0}")]
    MalformedGrouping(String),

    #[error("Malformed text literal: {0}")]
    MalformedText(String),

    #[error("Malformed numeric literal: {0}")]
    MalformedNumber(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("More than one terminal in a row: {left} {right}")]
    AdjacentTerminals { left: String, right: String },

    #[error("A parenthetical may not be placed directly next to a terminal or comparator: {0}")]
    MisplacedParenthetical(String),

    #[error("Missing operator between {left} and {right}")]
    MissingOperator { left: String, right: String },

    #[error("Comparator '{comparator}' requires a terminal operand, found: {found}")]
    InvalidComparisonOperand { comparator: String, found: String },

    #[error("Operator '{0}' is missing an operand")]
    MissingOperand(String),

    #[error("Empty expression: '{0}'")]
    EmptyExpression(String),

    #[error("Unknown prompt id: {0}")]
    UnknownPromptId(String),

    #[error("No response recorded for prompt: {0}")]
    MissingResponse(String),

    #[error("Duplicate prompt id: {0}")]
    DuplicatePrompt(String),

    #[error("Condition of prompt '{prompt}' references '{reference}', which is not an earlier prompt")]
    ForwardReference { prompt: String, reference: String },

    #[error("Invalid condition on prompt '{prompt}': {source}")]
    InvalidSurvey {
        prompt: String,
        #[source]
        source: Box<ConditionError>,
    },

    #[error("Navigation error: {0}")]
    NavigationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<serde_json::Error> for ConditionError {
    fn from(err: serde_json::Error) -> Self {
        ConditionError::DeserializationError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<ConditionError> for pyo3::PyErr {
    fn from(err: ConditionError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};

        match err {
            ConditionError::UnknownPromptId(_) | ConditionError::MissingResponse(_) => {
                PyKeyError::new_err(err.to_string())
            }
            ConditionError::NavigationError(_) => PyRuntimeError::new_err(err.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

/// Result type alias for the condition engine
pub type Result<T> = std::result::Result<T, ConditionError>;
