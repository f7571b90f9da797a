//! Household prompt rendering via `minijinja`.
//!
//! The built-in template states the household's risk disposition, its
//! wealth, the round's headline and the four options a language model may
//! pick from. Operators can swap the wording by loading a template file
//! with the same variables.

use std::path::Path;

use minijinja::{Environment, context};

use agora_types::{ActionType, RiskDisposition};

use crate::error::BackendError;

/// Name under which the household template is registered.
const TEMPLATE_NAME: &str = "household";

/// Built-in household prompt.
const DEFAULT_TEMPLATE: &str = "Agent profile: {{ risk }}, wealth: {{ wealth }}.\n\
Market news: {{ news }}\n\
What will you do? Options: {{ options | join(\", \") }}.";

/// Renders household decision prompts.
pub struct PromptRenderer {
    env: Environment<'static>,
}

impl core::fmt::Debug for PromptRenderer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PromptRenderer").finish_non_exhaustive()
    }
}

impl PromptRenderer {
    /// Create a renderer with the built-in template.
    pub fn new() -> Result<Self, BackendError> {
        Self::from_source(DEFAULT_TEMPLATE.to_owned())
    }

    /// Create a renderer from a template file on disk.
    ///
    /// The template receives `risk`, `wealth`, `news` and `options`.
    pub fn from_file(path: &Path) -> Result<Self, BackendError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            BackendError::Prompt(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_source(source)
    }

    /// Create a renderer from template source text.
    pub fn from_source(source: String) -> Result<Self, BackendError> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source)
            .map_err(|e| BackendError::Prompt(format!("failed to add household template: {e}")))?;
        Ok(Self { env })
    }

    /// Render the prompt for one household decision.
    pub fn render(
        &self,
        risk: RiskDisposition,
        wealth: f64,
        news: &str,
    ) -> Result<String, BackendError> {
        let options: Vec<&str> = ActionType::LLM_OPTIONS
            .iter()
            .map(|action| action.as_str())
            .collect();
        self.env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| BackendError::Prompt(format!("missing household template: {e}")))?
            .render(context! {
                risk => risk.as_str(),
                wealth => format!("{wealth:.2}"),
                news => news,
                options => options,
            })
            .map_err(|e| BackendError::Prompt(format!("household render failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_mentions_profile_news_and_options() {
        let renderer = PromptRenderer::new().unwrap();
        let prompt = renderer
            .render(RiskDisposition::RiskTaker, 1234.567, "Trade war escalates.")
            .unwrap();
        assert!(prompt.contains("risk_taker"));
        assert!(prompt.contains("1234.57"));
        assert!(prompt.contains("Trade war escalates."));
        assert!(prompt.contains("buy, sell, save, invest"));
    }

    #[test]
    fn custom_template_source_is_used() {
        let renderer = PromptRenderer::from_source("{{ risk }}|{{ news }}".to_owned()).unwrap();
        let prompt = renderer
            .render(RiskDisposition::Cautious, 10.0, "Energy crisis.")
            .unwrap();
        assert_eq!(prompt, "cautious|Energy crisis.");
    }

    #[test]
    fn broken_template_is_reported() {
        let result = PromptRenderer::from_source("{{ risk ".to_owned());
        assert!(matches!(result, Err(BackendError::Prompt(_))));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = PromptRenderer::from_file(Path::new("/nonexistent/household.j2"));
        assert!(matches!(result, Err(BackendError::Prompt(_))));
    }
}
