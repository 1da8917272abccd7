//! Survey definition structures

use serde::Deserialize;

/// Survey definition as shipped to the client
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyDefinition {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub prompts: Vec<PromptDefinition>,
}

/// A single prompt within a survey
#[derive(Debug, Clone, Deserialize)]
pub struct PromptDefinition {
    pub id: String,
    #[serde(default = "default_prompt_type")]
    pub prompt_type: String,
    #[serde(default)]
    pub text: String,
    /// Skip-logic condition; a prompt without one is always displayed
    pub condition: Option<String>,
    #[serde(default)]
    pub skippable: bool,
}

fn default_prompt_type() -> String {
    "text".to_string()
}

impl SurveyDefinition {
    /// Deserialize a survey definition from JSON
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
