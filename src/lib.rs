//! # Budget Forecasting Tool
//!
//! The calculation core of a budget-vs-actual dashboard: monthly sales, wages
//! and overheads figures per fiscal year, their variances against budget, net
//! profit, and AI-written commentary per category.
//!
//! ## Core Concepts
//!
//! - **Dataset Store**: per fiscal year, an ordered sequence of 1 to 12
//!   [`MonthlyRecord`]s, edited through add/remove/update and CSV import
//! - **Metrics Engine**: pure functions deriving totals, variance strings,
//!   favorability and chart series from a record slice
//! - **Commentary**: a per-category `Idle -> Requesting -> Idle` state machine
//!   that builds prompts and stores generated text or a fixed fallback
//! - **Lenient input**: bad numbers become zero and short CSV rows are
//!   dropped; both are reported as [`ParseWarning`]s rather than errors
//!
//! Enable the `gemini` feature for the HTTP client and the concurrent
//! [`llm::CommentaryDispatcher`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use budget_forecasting_tool::*;
//!
//! let mut dashboard = BudgetDashboard::seeded();
//! dashboard.select_year("24/25");
//! dashboard.update_month(1, "salesActual", "97500")?;
//!
//! let totals = dashboard.totals();
//! let sales_variance = variance_percent(totals.sales_actual, totals.sales_budget);
//!
//! let outcome = dashboard.import_csv(
//!     "name,salesBudget,salesActual,wagesBudget,wagesActual,overheadsBudget,overheadsActual\n\
//!      Jan,1000,900,300,280,200,190\n",
//! );
//! assert!(outcome.replaced);
//! ```

pub mod commentary;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod ingestion;
pub mod metrics;
pub mod schema;
pub mod seed;
pub mod utils;

#[cfg(feature = "gemini")]
pub mod llm;

pub use commentary::{
    fallback_message, CommentaryEntry, CommentaryOutcome, CommentaryPrompt, CommentaryState,
    SYSTEM_PROMPT,
};
pub use dashboard::{BudgetDashboard, ChartPanel, DashboardSnapshot};
pub use dataset::{DatasetStore, ImportOutcome, UpdateOutcome, YearSequence, MAX_MONTHS, MIN_MONTHS};
pub use error::{BudgetToolError, Result};
pub use ingestion::{parse_csv_rows, ParsedRows, CSV_HEADER};
pub use metrics::*;
pub use schema::*;
pub use utils::*;
