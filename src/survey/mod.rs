//! Survey loading, validation and navigation
//!
//! A survey is loaded once: every prompt condition is parsed and checked
//! against the survey's prompt ids before any navigation happens.

mod definition;
mod navigator;

pub use definition::*;
pub use navigator::*;

use crate::condition::{
    get_or_parse, responses_from_json, Condition, NoResponse, ResponseValue, Responses,
};
use crate::error::{ConditionError, Result};
use ahash::AHashSet;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prompt id to "is displayed"
pub type VisibilityMap = BTreeMap<String, bool>;

/// A validated survey
#[derive(Debug, Clone)]
pub struct Survey {
    definition: SurveyDefinition,
    conditions: Vec<Option<Arc<Condition>>>,
}

impl Survey {
    /// Parse and validate every condition of the survey
    pub fn load(definition: SurveyDefinition) -> Result<Self> {
        let mut seen: AHashSet<String> = AHashSet::with_capacity(definition.prompts.len());
        for prompt in &definition.prompts {
            if !seen.insert(prompt.id.clone()) {
                return Err(ConditionError::DuplicatePrompt(prompt.id.clone()));
            }
        }

        let mut conditions = Vec::with_capacity(definition.prompts.len());
        for (index, prompt) in definition.prompts.iter().enumerate() {
            let condition = match prompt.condition.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => {
                    let condition = load_condition(&prompt.id, text, &seen)?;
                    check_ordering(&definition, index, &condition)?;
                    Some(condition)
                }
                _ => None,
            };
            conditions.push(condition);
        }

        debug!(
            survey = definition.id.as_str(),
            prompts = definition.prompts.len(),
            "loaded survey"
        );
        Ok(Self {
            definition,
            conditions,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::load(SurveyDefinition::from_json_str(json)?)
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.definition.id
    }

    #[inline]
    pub fn definition(&self) -> &SurveyDefinition {
        &self.definition
    }

    #[inline]
    pub fn prompts(&self) -> &[PromptDefinition] {
        &self.definition.prompts
    }

    /// Condition guarding the prompt at `index`, if any
    pub fn condition(&self, index: usize) -> Option<&Condition> {
        self.conditions.get(index).and_then(|c| c.as_deref())
    }

    pub fn start(&self) -> SurveyNavigator<'_> {
        SurveyNavigator::new(self)
    }

    /// Visibility of each prompt given previously recorded answers
    ///
    /// Prompts are replayed in order through the navigator, so a `SKIPPED`
    /// answer is only accepted for a skippable prompt. Hidden prompts are
    /// marked not displayed. The walk stops at the first displayed prompt
    /// without an answer, which is reported as visible; a `NOT_DISPLAYED`
    /// entry for a prompt that is displayed counts as no answer.
    pub fn visibility(&self, answers: &Responses) -> Result<VisibilityMap> {
        let mut navigator = self.start();
        while let Some(prompt) = navigator.next_prompt()? {
            match answers.get(&prompt.id) {
                None | Some(ResponseValue::NoResponse(NoResponse::NotDisplayed)) => break,
                Some(ResponseValue::NoResponse(NoResponse::Skipped)) => navigator.skip()?,
                Some(value) => navigator.answer(value.clone())?,
            }
        }
        Ok(navigator.visibility())
    }

    /// [`Survey::visibility`] for answers given as a JSON object
    pub fn visibility_from_json(&self, answers: &str) -> Result<VisibilityMap> {
        let value: serde_json::Value = serde_json::from_str(answers)?;
        self.visibility(&responses_from_json(&value)?)
    }
}

fn load_condition(prompt: &str, text: &str, known: &AHashSet<String>) -> Result<Arc<Condition>> {
    let wrap = |source: ConditionError| {
        warn!(prompt, error = %source, "invalid prompt condition");
        ConditionError::InvalidSurvey {
            prompt: prompt.to_string(),
            source: Box::new(source),
        }
    };

    let condition = get_or_parse(text).map_err(wrap)?;
    condition.validate(known).map_err(wrap)?;
    Ok(condition)
}

/// A condition may only reference prompts that come before its own
fn check_ordering(definition: &SurveyDefinition, index: usize, condition: &Condition) -> Result<()> {
    let earlier = &definition.prompts[..index];
    for reference in condition.prompt_ids() {
        if !earlier.iter().any(|p| p.id == reference) {
            return Err(ConditionError::ForwardReference {
                prompt: definition.prompts[index].id.clone(),
                reference: reference.to_string(),
            });
        }
    }
    Ok(())
}
