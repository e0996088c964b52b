use crate::error::{BudgetToolError, Result};
use crate::llm::config::GeminiConfig;
use crate::llm::types::{GenerateContentRequest, GenerateContentResponse};
use log::debug;
use reqwest::Client;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::from_config(GeminiConfig::new(api_key))
    }

    pub fn from_config(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub async fn generate_content(&self, payload: &GenerateContentRequest) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        debug!("POST {}", url);

        let res = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(payload)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await.map_err(reqwest::Error::without_url)?;
            return Err(BudgetToolError::CommentaryFailed(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse =
            res.json().await.map_err(reqwest::Error::without_url)?;
        extract_text(&body)
    }
}

/// Pulls the generated text out of a response body. Any other shape, or an
/// empty text, is a failure.
pub fn extract_text(body: &GenerateContentResponse) -> Result<String> {
    match body.first_text() {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(BudgetToolError::CommentaryFailed(
            "No content received from API".to_string(),
        )),
    }
}
