//! Python bindings via PyO3

use crate::condition::{self, NoResponse, OhmageNumber, ResponseValue, Responses};
use crate::error::ConditionError;
use crate::survey::{Survey, VisibilityMap};
use ahash::AHashMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString};
use std::sync::Arc;

// ============================================================================
// Survey Registry
// ============================================================================

/// Surveys loaded through `load_survey`, keyed by survey id
static SURVEYS: OnceCell<Arc<RwLock<AHashMap<String, Arc<Survey>>>>> = OnceCell::new();

fn surveys() -> &'static Arc<RwLock<AHashMap<String, Arc<Survey>>>> {
    SURVEYS.get_or_init(|| Arc::new(RwLock::new(AHashMap::new())))
}

// ============================================================================
// NoResponse PyClass
// ============================================================================

/// Marker recorded for prompts without a real answer
#[pyclass(name = "NoResponse", eq, eq_int)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PyNoResponse {
    #[pyo3(name = "NOT_DISPLAYED")]
    NotDisplayed,
    #[pyo3(name = "SKIPPED")]
    Skipped,
}

impl From<PyNoResponse> for NoResponse {
    fn from(marker: PyNoResponse) -> Self {
        match marker {
            PyNoResponse::NotDisplayed => NoResponse::NotDisplayed,
            PyNoResponse::Skipped => NoResponse::Skipped,
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn extract_number(value: &Bound<'_, PyAny>) -> PyResult<OhmageNumber> {
    if value.downcast::<PyBool>().is_ok() {
        let flag: bool = value.extract()?;
        return Ok(OhmageNumber::from(i64::from(flag)));
    }
    if value.downcast::<PyInt>().is_ok() {
        let number: i64 = value.extract()?;
        return Ok(OhmageNumber::from(number));
    }
    if value.downcast::<PyFloat>().is_ok() {
        let number: f64 = value.extract()?;
        return Ok(OhmageNumber::from_f64(number)?);
    }
    Err(pyo3::exceptions::PyTypeError::new_err(format!(
        "Expected a number, found: {}",
        value.get_type().name()?
    )))
}

/// Convert a Python value into a response
///
/// `None` is recorded as not displayed; lists are multi-choice keys.
fn extract_response(value: &Bound<'_, PyAny>) -> PyResult<ResponseValue> {
    if value.is_none() {
        return Ok(ResponseValue::NOT_DISPLAYED);
    }
    if let Ok(marker) = value.extract::<PyNoResponse>() {
        return Ok(ResponseValue::from(NoResponse::from(marker)));
    }
    if value.downcast::<PyString>().is_ok() {
        let text: String = value.extract()?;
        return Ok(ResponseValue::Text(text));
    }
    if let Ok(list) = value.downcast::<PyList>() {
        let choices = list
            .iter()
            .map(|item| extract_number(&item))
            .collect::<PyResult<Vec<_>>>()?;
        return Ok(ResponseValue::Choices(choices));
    }
    extract_number(value).map(ResponseValue::Number)
}

/// Deserialize a response map from a Python dict
fn extract_responses(dict: &Bound<'_, PyDict>) -> PyResult<Responses> {
    let mut responses = Responses::with_capacity(dict.len());
    for (key, value) in dict.iter() {
        let id: String = key.extract()?;
        responses.insert(id, extract_response(&value)?);
    }
    Ok(responses)
}

// ============================================================================
// Python Functions
// ============================================================================

/// Parse a condition and return its sentence
///
/// # Raises
/// ValueError if the condition is malformed
#[pyfunction]
fn parse_condition(text: &str) -> PyResult<String> {
    let parsed = condition::get_or_parse(text)?;
    Ok(parsed.sentence().to_string())
}

/// Prompt ids referenced by a condition, in order of appearance
#[pyfunction]
fn condition_prompt_ids(text: &str) -> PyResult<Vec<String>> {
    let parsed = condition::get_or_parse(text)?;
    Ok(parsed.prompt_ids().into_iter().map(str::to_string).collect())
}

/// Evaluate a condition against a dict of responses
///
/// # Arguments
/// * `text` - Condition text; blank means always displayed
/// * `responses` - {prompt_id: str | int | float | list[int] | NoResponse | None}
///
/// # Raises
/// ValueError for malformed conditions, KeyError for unanswered prompt ids
#[pyfunction]
fn check_condition(text: &str, responses: &Bound<'_, PyDict>) -> PyResult<bool> {
    let responses = extract_responses(responses)?;
    Ok(condition::check_condition(text, &responses)?)
}

/// Load and validate a survey definition, replacing any survey with the same id
///
/// # Returns
/// The survey id
#[pyfunction]
fn load_survey(json: &str) -> PyResult<String> {
    let survey = Survey::from_json_str(json)?;
    let id = survey.id().to_string();
    surveys().write().insert(id.clone(), Arc::new(survey));
    Ok(id)
}

/// Check if a survey has been loaded
#[pyfunction]
fn is_survey_loaded(survey_id: &str) -> bool {
    surveys().read().contains_key(survey_id)
}

/// Visibility of each prompt of a loaded survey given the answers so far
///
/// # Raises
/// RuntimeError if `load_survey` was not called for this id first
#[pyfunction]
fn survey_visibility(survey_id: &str, responses: &Bound<'_, PyDict>) -> PyResult<VisibilityMap> {
    let survey = surveys()
        .read()
        .get(survey_id)
        .cloned()
        .ok_or_else(|| {
            ConditionError::NavigationError(format!(
                "Survey '{}' not loaded. Call load_survey() first.",
                survey_id
            ))
        })?;

    let answers = extract_responses(responses)?;
    Ok(survey.visibility(&answers)?)
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn ohmage_condition(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_condition, m)?)?;
    m.add_function(wrap_pyfunction!(condition_prompt_ids, m)?)?;
    m.add_function(wrap_pyfunction!(check_condition, m)?)?;
    m.add_function(wrap_pyfunction!(load_survey, m)?)?;
    m.add_function(wrap_pyfunction!(is_survey_loaded, m)?)?;
    m.add_function(wrap_pyfunction!(survey_visibility, m)?)?;
    m.add_class::<PyNoResponse>()?;
    Ok(())
}
