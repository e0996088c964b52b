//! Per-category commentary text and the generation request lifecycle.
//!
//! Each category moves `Idle -> Requesting -> Idle`. [`CommentaryState::begin`]
//! builds the prompt and marks the category in flight; the outcome of the
//! external call comes back through [`CommentaryState::apply`], which stores
//! either the generated text or a fixed fallback. Categories are independent.

use crate::error::Result;
use crate::metrics::chart_series;
use crate::schema::{Category, MonthlyRecord};
use crate::utils::format_amount;
use log::{info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SYSTEM_PROMPT: &str = "You are a senior financial analyst. Provide a brief, insightful, \
and professional commentary on the provided financial data. Focus on performance against budget, \
key variances, and potential trends. The currency is GBP (£).";

pub fn fallback_message(category: Category) -> String {
    format!(
        "Failed to generate AI insight for {}. Please check your connection or try again later.",
        category
    )
}

/// `"{name}: Actual £{actual}, Budget £{budget}"` for every record, joined by `"; "`.
pub fn data_summary(category: Category, records: &[MonthlyRecord]) -> String {
    chart_series(category, records)
        .iter()
        .map(|point| {
            format!(
                "{}: Actual £{}, Budget £{}",
                point.name,
                format_amount(point.actual),
                format_amount(point.budget)
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn user_message(category: Category, fiscal_year: &str, records: &[MonthlyRecord]) -> String {
    format!(
        "Analyze the following monthly {} data for fiscal year {} and provide commentary:\n{}",
        category,
        fiscal_year,
        data_summary(category, records)
    )
}

/// Everything needed to ask the text-generation service for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentaryPrompt {
    pub category: Category,
    pub ticket: u64,
    pub system_instruction: String,
    pub user_message: String,
}

/// Result of one generation request, routed back to the state by ticket.
#[derive(Debug)]
pub struct CommentaryOutcome {
    pub category: Category,
    pub ticket: u64,
    pub result: Result<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CommentaryEntry {
    pub category: Category,
    pub text: String,
    pub generating: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CommentaryState {
    texts: BTreeMap<Category, String>,
    in_flight: BTreeMap<Category, u64>,
    next_ticket: u64,
}

impl CommentaryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, category: Category) -> &str {
        self.texts.get(&category).map_or("", String::as_str)
    }

    /// User edit; allowed at any time, a later generation result overwrites it.
    pub fn set_text(&mut self, category: Category, text: impl Into<String>) {
        self.texts.insert(category, text.into());
    }

    pub fn is_generating(&self, category: Category) -> bool {
        self.in_flight.contains_key(&category)
    }

    pub fn entries(&self) -> Vec<CommentaryEntry> {
        Category::ALL
            .into_iter()
            .map(|category| CommentaryEntry {
                category,
                text: self.text(category).to_string(),
                generating: self.is_generating(category),
            })
            .collect()
    }

    /// Marks `category` as requesting and builds its prompt.
    ///
    /// Returns `None` while a request for the same category is outstanding.
    pub fn begin(
        &mut self,
        category: Category,
        fiscal_year: &str,
        records: &[MonthlyRecord],
    ) -> Option<CommentaryPrompt> {
        if self.is_generating(category) {
            return None;
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight.insert(category, ticket);
        info!(
            "Requesting {} commentary for {} ({} months)",
            category,
            fiscal_year,
            records.len()
        );

        Some(CommentaryPrompt {
            category,
            ticket,
            system_instruction: SYSTEM_PROMPT.to_string(),
            user_message: user_message(category, fiscal_year, records),
        })
    }

    /// Stores the outcome and returns the category to idle.
    ///
    /// Outcomes whose ticket is no longer in flight (cancelled or superseded)
    /// are ignored and `false` is returned.
    pub fn apply(&mut self, outcome: CommentaryOutcome) -> bool {
        let CommentaryOutcome {
            category,
            ticket,
            result,
        } = outcome;

        if self.in_flight.get(&category) != Some(&ticket) {
            return false;
        }
        self.in_flight.remove(&category);

        let text = match result {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                warn!("Error generating {} commentary: empty response text", category);
                fallback_message(category)
            }
            Err(e) => {
                warn!("Error generating {} commentary: {}", category, e);
                fallback_message(category)
            }
        };
        self.texts.insert(category, text);
        true
    }

    /// Drops the outstanding request for `category`, keeping the current text.
    pub fn cancel(&mut self, category: Category) -> bool {
        self.in_flight.remove(&category).is_some()
    }
}
