//! Tab categorization on top of `generateContent`.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use tabflow_protocols::error::ProviderError;
use tabflow_protocols::provider::{Categorization, TabCategorizer};
use tabflow_protocols::types::{AIResult, Tab};

use crate::client::{GeminiClient, DEFAULT_BASE_URL};
use crate::types::*;

/// Knobs for the categorization call.
#[derive(Debug, Clone)]
pub struct GeminiOptions {
    pub model: String,
    /// Attach Google Search so ambiguous URLs can be looked up.
    pub grounding: bool,
    pub min_groups: u32,
    pub max_groups: u32,
}

impl Default for GeminiOptions {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash-lite".to_string(),
            grounding: true,
            min_groups: 4,
            max_groups: 6,
        }
    }
}

/// Gemini-backed [`TabCategorizer`].
pub struct GeminiCategorizer {
    client: GeminiClient,
    options: GeminiOptions,
}

impl GeminiCategorizer {
    /// Create a categorizer against the public Gemini endpoint.
    pub fn new(options: GeminiOptions) -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL, options)
    }

    /// Create a categorizer against a custom endpoint.
    pub fn with_base_url(
        base_url: impl Into<String>,
        options: GeminiOptions,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: GeminiClient::new(base_url)?,
            options,
        })
    }

    pub fn options(&self) -> &GeminiOptions {
        &self.options
    }

    /// Render the tab list as numbered lines; the numbers are the positional
    /// indices the model must answer with.
    fn render_tab_list(tabs: &[Tab]) -> String {
        tabs.iter()
            .enumerate()
            .map(|(idx, t)| format!("[{}] Title: {} | URL: {}", idx, t.title, t.url))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn build_prompt(&self, tabs: &[Tab]) -> String {
        let grounding_hint = if self.options.grounding {
            "Use Google Search grounding to better understand the content of any ambiguous URLs.\n"
        } else {
            ""
        };
        format!(
            "You are an expert browser tab organizer. Categorize the following tabs into {min}-{max} logical groups.\n\
             {grounding_hint}\n\
             Each group must have:\n\
             - name: A punchy name\n\
             - description: A short reason why these tabs are together.\n\
             - color: A vibrant CSS hex color code.\n\
             - tabIndices: The numbers (0, 1, 2...) of the tabs belonging to it.\n\n\
             Tabs to organize:\n{tabs}",
            min = self.options.min_groups,
            max = self.options.max_groups,
            grounding_hint = grounding_hint,
            tabs = Self::render_tab_list(tabs),
        )
    }

    /// Fixed response schema: `{groups: [{name, description, color, tabIndices}]}`.
    fn response_schema() -> serde_json::Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "groups": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING" },
                            "description": { "type": "STRING" },
                            "color": { "type": "STRING" },
                            "tabIndices": {
                                "type": "ARRAY",
                                "items": { "type": "INTEGER" }
                            }
                        },
                        "required": ["name", "description", "color", "tabIndices"]
                    }
                }
            },
            "required": ["groups"]
        })
    }

    fn build_request(&self, tabs: &[Tab]) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(self.build_prompt(tabs))],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(Self::response_schema()),
                ..Default::default()
            }),
            tools: self
                .options
                .grounding
                .then(|| vec![GeminiTool::google_search()]),
        }
    }

    fn convert_response(response: GenerateContentResponse) -> Result<Categorization, ProviderError> {
        let text = response
            .text()
            .ok_or_else(|| ProviderError::InvalidResponse("Model returned no text".to_string()))?;
        let result: AIResult = serde_json::from_str(&text).map_err(|e| {
            ProviderError::InvalidResponse(format!("Result does not match schema: {}", e))
        })?;
        Ok(Categorization {
            result,
            sources: response.grounding_chunks(),
        })
    }
}

#[async_trait]
impl TabCategorizer for GeminiCategorizer {
    fn id(&self) -> &str {
        "gemini"
    }

    async fn categorize(
        &self,
        credential: &str,
        tabs: &[Tab],
    ) -> Result<Categorization, ProviderError> {
        debug!("Gemini categorize: model={}, tabs={}", self.options.model, tabs.len());

        let request = self.build_request(tabs);
        let response = self
            .client
            .generate_content(credential, &self.options.model, &request)
            .await?;
        let categorization = Self::convert_response(response)?;

        info!(
            "Gemini proposed {} group(s) with {} source(s)",
            categorization.result.groups.len(),
            categorization.sources.len()
        );
        Ok(categorization)
    }
}

#[cfg(test)]
#[path = "categorizer_tests.rs"]
mod tests;
