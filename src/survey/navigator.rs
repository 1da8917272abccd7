//! Linear prompt-by-prompt survey navigation

use crate::condition::{check, NoResponse, ResponseValue, Responses};
use crate::error::{ConditionError, Result};
use crate::survey::{PromptDefinition, Survey, VisibilityMap};
use tracing::debug;

/// Walks a survey's prompts in order and tracks the responses
///
/// Every prompt passed over gets an entry in the response map: the answer,
/// `SKIPPED`, or `NOT_DISPLAYED` when its condition hid it. Later
/// conditions can therefore always look up any earlier prompt.
#[derive(Debug, Clone)]
pub struct SurveyNavigator<'s> {
    survey: &'s Survey,
    responses: Responses,
    /// Index of the next prompt to consider
    position: usize,
    /// Displayed prompt awaiting a response
    current: Option<usize>,
}

impl<'s> SurveyNavigator<'s> {
    pub fn new(survey: &'s Survey) -> Self {
        Self {
            survey,
            responses: Responses::with_capacity(survey.prompts().len()),
            position: 0,
            current: None,
        }
    }

    /// Advance to the next displayed prompt
    ///
    /// Returns the pending prompt again if it has not been answered yet, and
    /// `None` once the survey is complete.
    pub fn next_prompt(&mut self) -> Result<Option<&'s PromptDefinition>> {
        let survey = self.survey;
        let prompts = survey.prompts();
        if let Some(index) = self.current {
            return Ok(prompts.get(index));
        }

        while self.position < prompts.len() {
            let index = self.position;
            self.position += 1;

            let prompt = &prompts[index];
            if check(survey.condition(index), &self.responses)? {
                self.current = Some(index);
                return Ok(Some(prompt));
            }

            debug!(prompt = prompt.id.as_str(), "prompt not displayed");
            self.responses
                .insert(prompt.id.clone(), ResponseValue::from(NoResponse::NotDisplayed));
        }

        Ok(None)
    }

    /// Record an answer for the displayed prompt
    pub fn answer(&mut self, value: ResponseValue) -> Result<()> {
        if value.is_no_response() {
            return Err(ConditionError::NavigationError(format!(
                "{} is not an answer",
                value
            )));
        }
        self.record(value)
    }

    /// Skip the displayed prompt
    pub fn skip(&mut self) -> Result<()> {
        let prompt = self.pending()?;
        if !prompt.skippable {
            return Err(ConditionError::NavigationError(format!(
                "prompt '{}' is not skippable",
                prompt.id
            )));
        }
        self.record(ResponseValue::SKIPPED)
    }

    fn record(&mut self, value: ResponseValue) -> Result<()> {
        let prompt = self.pending()?;
        self.responses.insert(prompt.id.clone(), value);
        self.current = None;
        Ok(())
    }

    fn pending(&self) -> Result<&'s PromptDefinition> {
        let survey = self.survey;
        self.current
            .and_then(|index| survey.prompts().get(index))
            .ok_or_else(|| {
                ConditionError::NavigationError("no prompt is awaiting a response".to_string())
            })
    }

    #[inline]
    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    pub fn into_responses(self) -> Responses {
        self.responses
    }

    pub fn is_finished(&self) -> bool {
        self.current.is_none() && self.position >= self.survey.prompts().len()
    }

    /// Which of the prompts reached so far were displayed
    pub fn visibility(&self) -> VisibilityMap {
        let reached = self.current.map_or(self.position, |index| index + 1);
        self.survey.prompts()[..reached]
            .iter()
            .map(|prompt| {
                let displayed = !matches!(
                    self.responses.get(&prompt.id),
                    Some(ResponseValue::NoResponse(NoResponse::NotDisplayed))
                );
                (prompt.id.clone(), displayed)
            })
            .collect()
    }
}
