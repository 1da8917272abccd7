//! Ohmage Condition - survey skip-logic condition engine
//!
//! This crate parses the condition language attached to survey prompts
//! (`q1 == 2 and ! (q2 == SKIPPED)`), validates it against the prompt ids of
//! a survey and evaluates it against the responses recorded so far. Python
//! bindings via PyO3 are available behind the `python` feature.

pub mod condition;
pub mod error;
pub mod survey;

#[cfg(feature = "python")]
mod python;

pub use condition::{
    check, check_condition, get_or_parse, Condition, KnownPrompts, NoResponse, OhmageNumber,
    ResponseValue, Responses,
};
pub use error::{ConditionError, Result};
pub use survey::{Survey, SurveyDefinition, SurveyNavigator, VisibilityMap};
