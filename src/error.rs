use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetToolError {
    #[error("Unknown month field: {0}")]
    UnknownField(String),

    #[error("Unknown commentary category: {0}")]
    UnknownCategory(String),

    #[error("Unknown chart type: {0}")]
    UnknownChartType(String),

    #[error("Invalid fiscal year start month {0}: must be between 1 and 12")]
    InvalidFiscalYearStartMonth(u32),

    #[error("Commentary generation failed: {0}")]
    CommentaryFailed(String),

    #[error("Commentary request timed out after {0:?}")]
    CommentaryTimeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BudgetToolError>;
