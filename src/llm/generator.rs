use async_trait::async_trait;

use crate::commentary::CommentaryPrompt;
use crate::error::Result;
use crate::llm::client::GeminiClient;
use crate::llm::types::GenerateContentRequest;

/// A service that turns a commentary prompt into prose.
///
/// Implementations must be `Send + Sync` so requests for different
/// categories can run as independent tasks.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &CommentaryPrompt) -> Result<String>;
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &CommentaryPrompt) -> Result<String> {
        let payload = GenerateContentRequest::from_prompt(prompt);
        self.generate_content(&payload).await
    }
}
