//! Mock generator for testing
//!
//! Returns predictable commentary without a network connection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::commentary::CommentaryPrompt;
use crate::error::{BudgetToolError, Result};
use crate::schema::Category;

use super::TextGenerator;

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(String),
}

/// Mock text generator
///
/// By default answers every category with `"Mock commentary for {category}."`.
/// Individual categories can be given fixed text or made to fail, and an
/// artificial delay keeps requests in flight long enough to observe them.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    replies: HashMap<Category, MockReply>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, category: Category, text: impl Into<String>) -> Self {
        self.replies.insert(category, MockReply::Text(text.into()));
        self
    }

    pub fn failing(mut self, category: Category, reason: impl Into<String>) -> Self {
        self.replies.insert(category, MockReply::Fail(reason.into()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests received so far, shared across clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &CommentaryPrompt) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.replies.get(&prompt.category) {
            Some(MockReply::Text(text)) => Ok(text.clone()),
            Some(MockReply::Fail(reason)) => Err(BudgetToolError::CommentaryFailed(reason.clone())),
            None => Ok(format!("Mock commentary for {}.", prompt.category)),
        }
    }
}
