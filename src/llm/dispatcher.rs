use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use log::{debug, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::commentary::{CommentaryOutcome, CommentaryPrompt};
use crate::dashboard::BudgetDashboard;
use crate::error::BudgetToolError;
use crate::llm::client::GeminiClient;
use crate::llm::config::GeminiConfig;
use crate::schema::Category;

use super::TextGenerator;

/// Runs commentary requests as independent tasks, one per category, and
/// hands their outcomes back over a channel to whoever owns the dashboard.
pub struct CommentaryDispatcher {
    generator: Arc<dyn TextGenerator>,
    timeout: Option<Duration>,
    tx: mpsc::UnboundedSender<CommentaryOutcome>,
    rx: mpsc::UnboundedReceiver<CommentaryOutcome>,
    outstanding: HashMap<Category, (u64, JoinHandle<()>)>,
}

async fn run_prompt(
    generator: Arc<dyn TextGenerator>,
    prompt: CommentaryPrompt,
    timeout: Option<Duration>,
) -> CommentaryOutcome {
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, generator.generate(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(BudgetToolError::CommentaryTimeout(limit)),
        },
        None => generator.generate(&prompt).await,
    };

    CommentaryOutcome {
        category: prompt.category,
        ticket: prompt.ticket,
        result,
    }
}

impl CommentaryDispatcher {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            generator,
            timeout: None,
            tx,
            rx,
            outstanding: HashMap::new(),
        }
    }

    pub fn from_config(config: GeminiConfig) -> Self {
        let timeout = config.timeout;
        Self::new(Arc::new(GeminiClient::from_config(config))).with_timeout(timeout)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Categories with a spawned request whose outcome has not been received.
    pub fn pending(&self) -> usize {
        self.outstanding.len()
    }

    /// Spawns the request for `prompt`. Requires a Tokio runtime.
    pub fn dispatch(&mut self, prompt: CommentaryPrompt) {
        let category = prompt.category;
        let ticket = prompt.ticket;
        let generator = Arc::clone(&self.generator);
        let timeout = self.timeout;
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            // a panicking generator still reports a failure
            let outcome = AssertUnwindSafe(run_prompt(generator, prompt, timeout))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| CommentaryOutcome {
                    category,
                    ticket,
                    result: Err(BudgetToolError::CommentaryFailed(
                        "commentary task panicked".to_string(),
                    )),
                });
            // receiver gone means the dispatcher was dropped; nothing to report to
            let _ = tx.send(outcome);
        });

        info!("Dispatched {} commentary request #{}", category, ticket);
        self.outstanding.insert(category, (ticket, handle));
    }

    /// Starts a background generation for `category`. Returns false while one
    /// is already in flight.
    pub fn start(&mut self, dashboard: &mut BudgetDashboard, category: Category) -> bool {
        match dashboard.request_commentary(category) {
            Some(prompt) => {
                self.dispatch(prompt);
                true
            }
            None => {
                debug!("{} commentary already in flight", category);
                false
            }
        }
    }

    /// Waits for the next finished request.
    pub async fn next_outcome(&mut self) -> Option<CommentaryOutcome> {
        let outcome = self.rx.recv().await?;
        self.forget(&outcome);
        Some(outcome)
    }

    pub fn try_next_outcome(&mut self) -> Option<CommentaryOutcome> {
        let outcome = self.rx.try_recv().ok()?;
        self.forget(&outcome);
        Some(outcome)
    }

    fn forget(&mut self, outcome: &CommentaryOutcome) {
        if let Some((ticket, _)) = self.outstanding.get(&outcome.category) {
            if *ticket == outcome.ticket {
                self.outstanding.remove(&outcome.category);
            }
        }
    }

    /// Applies outcomes to `dashboard` until nothing is outstanding.
    /// Returns how many outcomes were applied.
    pub async fn drain(&mut self, dashboard: &mut BudgetDashboard) -> usize {
        let mut applied = 0;
        while !self.outstanding.is_empty() {
            let Some(outcome) = self.next_outcome().await else {
                break;
            };
            if dashboard.apply_commentary(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Aborts the outstanding request for `category`; its text is left as is.
    pub fn cancel(&mut self, dashboard: &mut BudgetDashboard, category: Category) -> bool {
        if let Some((ticket, handle)) = self.outstanding.remove(&category) {
            handle.abort();
            info!("Cancelled {} commentary request #{}", category, ticket);
        }
        dashboard.cancel_commentary(category)
    }

    /// Generates commentary for one category and waits for it.
    pub async fn generate(&self, dashboard: &mut BudgetDashboard, category: Category) -> bool {
        let Some(prompt) = dashboard.request_commentary(category) else {
            return false;
        };
        let outcome = run_prompt(Arc::clone(&self.generator), prompt, self.timeout).await;
        dashboard.apply_commentary(outcome)
    }

    /// Generates several categories concurrently and applies every outcome.
    /// Categories already in flight are skipped.
    pub async fn generate_many(
        &self,
        dashboard: &mut BudgetDashboard,
        categories: &[Category],
    ) -> usize {
        let prompts: Vec<CommentaryPrompt> = categories
            .iter()
            .filter_map(|category| dashboard.request_commentary(*category))
            .collect();

        let outcomes = join_all(
            prompts
                .into_iter()
                .map(|prompt| run_prompt(Arc::clone(&self.generator), prompt, self.timeout)),
        )
        .await;

        outcomes
            .into_iter()
            .map(|outcome| dashboard.apply_commentary(outcome))
            .filter(|applied| *applied)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::fallback_message;
    use crate::error::Result;
    use crate::llm::MockGenerator;
    use async_trait::async_trait;

    struct PanickingGenerator;

    #[async_trait]
    impl TextGenerator for PanickingGenerator {
        async fn generate(&self, _prompt: &CommentaryPrompt) -> Result<String> {
            panic!("generator crashed");
        }
    }

    fn dispatcher(mock: MockGenerator) -> CommentaryDispatcher {
        CommentaryDispatcher::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_generate_success_replaces_text() {
        let mut dashboard = BudgetDashboard::seeded();
        let mock = MockGenerator::new().with_reply(Category::Sales, "Sales slightly ahead.");
        let dispatcher = dispatcher(mock.clone());

        assert!(dispatcher.generate(&mut dashboard, Category::Sales).await);
        assert_eq!(dashboard.commentary_text(Category::Sales), "Sales slightly ahead.");
        assert!(!dashboard.is_generating(Category::Sales));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_only_touches_its_category() {
        let mut dashboard = BudgetDashboard::seeded();
        dashboard.set_commentary(Category::Profit, "manual note");
        let dispatcher = dispatcher(MockGenerator::new().failing(Category::Wages, "status 503"));

        let applied = dispatcher
            .generate_many(&mut dashboard, &[Category::Sales, Category::Wages])
            .await;

        assert_eq!(applied, 2);
        assert_eq!(
            dashboard.commentary_text(Category::Wages),
            "Failed to generate AI insight for wages. Please check your connection or try again later."
        );
        assert_eq!(dashboard.commentary_text(Category::Sales), "Mock commentary for sales.");
        assert_eq!(dashboard.commentary_text(Category::Profit), "manual note");
        for category in Category::ALL {
            assert!(!dashboard.is_generating(category));
        }
    }

    #[tokio::test]
    async fn test_background_requests_are_isolated() {
        let mut dashboard = BudgetDashboard::seeded();
        let mock = MockGenerator::new()
            .failing(Category::Overheads, "offline")
            .with_delay(Duration::from_millis(20));
        let mut dispatcher = dispatcher(mock.clone());

        assert!(dispatcher.start(&mut dashboard, Category::Sales));
        assert!(dispatcher.start(&mut dashboard, Category::Overheads));
        assert!(!dispatcher.start(&mut dashboard, Category::Sales));
        assert!(dashboard.is_generating(Category::Sales));
        assert!(dashboard.is_generating(Category::Overheads));
        assert!(!dashboard.is_generating(Category::Wages));
        assert_eq!(dispatcher.pending(), 2);

        assert_eq!(dispatcher.drain(&mut dashboard).await, 2);
        assert_eq!(dispatcher.pending(), 0);
        assert_eq!(
            dashboard.commentary_text(Category::Overheads),
            fallback_message(Category::Overheads)
        );
        assert_eq!(dashboard.commentary_text(Category::Sales), "Mock commentary for sales.");
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_timeout_yields_fallback() {
        let mut dashboard = BudgetDashboard::seeded();
        let dispatcher = dispatcher(MockGenerator::new().with_delay(Duration::from_secs(5)))
            .with_timeout(Some(Duration::from_millis(10)));

        assert!(dispatcher.generate(&mut dashboard, Category::Profit).await);
        assert_eq!(
            dashboard.commentary_text(Category::Profit),
            fallback_message(Category::Profit)
        );
        assert!(!dashboard.is_generating(Category::Profit));
    }

    #[tokio::test]
    async fn test_panicking_generator_does_not_stall_drain() {
        let mut dashboard = BudgetDashboard::seeded();
        let mut dispatcher = CommentaryDispatcher::new(Arc::new(PanickingGenerator));

        assert!(dispatcher.start(&mut dashboard, Category::Overheads));
        let applied = tokio::time::timeout(Duration::from_secs(5), dispatcher.drain(&mut dashboard))
            .await
            .expect("drain finished");

        assert_eq!(applied, 1);
        assert_eq!(dispatcher.pending(), 0);
        assert!(!dashboard.is_generating(Category::Overheads));
        assert_eq!(
            dashboard.commentary_text(Category::Overheads),
            fallback_message(Category::Overheads)
        );
    }

    #[tokio::test]
    async fn test_cancel_keeps_text_and_allows_retry() {
        let mut dashboard = BudgetDashboard::seeded();
        dashboard.set_commentary(Category::Wages, "draft");
        let mut dispatcher = dispatcher(MockGenerator::new().with_delay(Duration::from_secs(5)));

        assert!(dispatcher.start(&mut dashboard, Category::Wages));
        assert!(dispatcher.cancel(&mut dashboard, Category::Wages));
        assert!(!dashboard.is_generating(Category::Wages));
        assert_eq!(dispatcher.pending(), 0);
        assert_eq!(dashboard.commentary_text(Category::Wages), "draft");
        assert!(dispatcher.try_next_outcome().is_none());

        assert!(dispatcher.start(&mut dashboard, Category::Wages));
        assert!(!dispatcher.cancel(&mut dashboard, Category::Sales));
    }
}
