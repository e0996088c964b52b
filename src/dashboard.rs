use crate::commentary::{CommentaryEntry, CommentaryOutcome, CommentaryPrompt, CommentaryState};
use crate::dataset::{DatasetStore, ImportOutcome, UpdateOutcome};
use crate::error::Result;
use crate::metrics::{
    chart_series, profit_series, row_variances, summary_cards, totals, ChartPoint, DerivedTotals,
    ProfitPoint, RowVariances, SummaryCard,
};
use crate::schema::{Category, ChartType, MonthField, MonthlyRecord};
use crate::seed::{seeded_store, DEFAULT_EXECUTIVE_SUMMARY};
use crate::utils::fiscal_year_label;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One chart panel: series, selected chart style and its commentary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartPanel {
    pub category: Category,
    pub title: String,
    pub chart_type: ChartType,
    pub series: Vec<ChartPoint>,
    pub commentary: CommentaryEntry,
}

/// Everything the presentation layer renders for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub year_labels: Vec<String>,
    pub active_year: String,
    pub months: Vec<MonthlyRecord>,
    pub totals: DerivedTotals,
    pub profit_series: Vec<ProfitPoint>,
    pub rows: Vec<RowVariances>,
    pub summary_cards: Vec<SummaryCard>,
    pub charts: Vec<ChartPanel>,
    pub executive_summary: String,
    pub can_add_month: bool,
    pub can_remove_month: bool,
}

impl DashboardSnapshot {
    /// JSON Schema of the snapshot, for UIs that validate what they render.
    pub fn json_schema() -> Result<serde_json::Value> {
        Ok(serde_json::to_value(schemars::schema_for!(DashboardSnapshot))?)
    }
}

/// Application state with a single owner. Every change goes through a
/// named operation; derived figures are recomputed on request.
#[derive(Debug, Clone)]
pub struct BudgetDashboard {
    store: DatasetStore,
    commentary: CommentaryState,
    chart_types: BTreeMap<Category, ChartType>,
    executive_summary: String,
}

impl Default for BudgetDashboard {
    fn default() -> Self {
        Self::seeded()
    }
}

impl BudgetDashboard {
    /// An empty dashboard with one (empty) year.
    pub fn new(active_year: impl Into<String>) -> Self {
        Self::with_store(DatasetStore::new(active_year), String::new())
    }

    /// The demo figures for "24/25" and "25/26" plus the default summary.
    pub fn seeded() -> Self {
        Self::with_store(seeded_store(), DEFAULT_EXECUTIVE_SUMMARY.to_string())
    }

    pub fn with_store(store: DatasetStore, executive_summary: String) -> Self {
        Self {
            store,
            commentary: CommentaryState::new(),
            chart_types: BTreeMap::new(),
            executive_summary,
        }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn commentary(&self) -> &CommentaryState {
        &self.commentary
    }

    pub fn active_year(&self) -> &str {
        self.store.active_year()
    }

    pub fn select_year(&mut self, label: &str) -> &[MonthlyRecord] {
        self.store.select_year(label)
    }

    pub fn select_year_for_date(
        &mut self,
        date: NaiveDate,
        start_month: u32,
    ) -> Result<&[MonthlyRecord]> {
        let label = fiscal_year_label(date, start_month)?;
        Ok(self.store.select_year(&label))
    }

    pub fn months(&self) -> &[MonthlyRecord] {
        self.store.months()
    }

    pub fn add_month(&mut self) -> Option<u32> {
        self.store.add_month()
    }

    pub fn remove_last_month(&mut self) -> Option<MonthlyRecord> {
        self.store.remove_last_month()
    }

    /// Applies a `(id, fieldName, rawValue)` edit from the input table.
    ///
    /// Only an unrecognised field name is an error; value problems are
    /// reported inside the outcome.
    pub fn update_month(&mut self, id: u32, field: &str, raw: &str) -> Result<UpdateOutcome> {
        let field: MonthField = field.parse()?;
        Ok(self.store.update_field(id, field, raw))
    }

    pub fn import_csv(&mut self, text: &str) -> ImportOutcome {
        self.store.import_csv(text)
    }

    pub fn import_csv_file(&mut self, path: &Path) -> Result<ImportOutcome> {
        self.store.import_csv_file(path)
    }

    pub fn totals(&self) -> DerivedTotals {
        totals(self.months())
    }

    pub fn profit_series(&self) -> Vec<ProfitPoint> {
        profit_series(self.months())
    }

    pub fn row_variances(&self) -> Vec<RowVariances> {
        row_variances(self.months())
    }

    pub fn summary_cards(&self) -> Vec<SummaryCard> {
        summary_cards(&self.totals())
    }

    pub fn chart_series(&self, category: Category) -> Vec<ChartPoint> {
        chart_series(category, self.months())
    }

    pub fn chart_type(&self, category: Category) -> ChartType {
        self.chart_types.get(&category).copied().unwrap_or_default()
    }

    pub fn set_chart_type(&mut self, category: Category, chart_type: ChartType) {
        self.chart_types.insert(category, chart_type);
    }

    /// Name-based variant of [`Self::set_chart_type`] for UI select boxes.
    pub fn select_chart_type(&mut self, category: &str, chart_type: &str) -> Result<()> {
        let category: Category = category.parse()?;
        let chart_type: ChartType = chart_type.parse()?;
        self.set_chart_type(category, chart_type);
        Ok(())
    }

    pub fn executive_summary(&self) -> &str {
        &self.executive_summary
    }

    pub fn set_executive_summary(&mut self, text: impl Into<String>) {
        self.executive_summary = text.into();
    }

    pub fn commentary_text(&self, category: Category) -> &str {
        self.commentary.text(category)
    }

    pub fn set_commentary(&mut self, category: Category, text: impl Into<String>) {
        self.commentary.set_text(category, text);
    }

    pub fn is_generating(&self, category: Category) -> bool {
        self.commentary.is_generating(category)
    }

    /// Starts a generation for the active year. `None` while one is in flight.
    pub fn request_commentary(&mut self, category: Category) -> Option<CommentaryPrompt> {
        let year = self.store.active_year().to_string();
        self.commentary.begin(category, &year, self.store.months())
    }

    pub fn apply_commentary(&mut self, outcome: CommentaryOutcome) -> bool {
        self.commentary.apply(outcome)
    }

    pub fn cancel_commentary(&mut self, category: Category) -> bool {
        self.commentary.cancel(category)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let months = self.months();
        let totals = totals(months);
        let commentary = self.commentary.entries();

        let charts = Category::ALL
            .into_iter()
            .zip(commentary)
            .map(|(category, commentary)| ChartPanel {
                category,
                title: category.title().to_string(),
                chart_type: self.chart_type(category),
                series: chart_series(category, months),
                commentary,
            })
            .collect();

        DashboardSnapshot {
            year_labels: self
                .store
                .year_labels()
                .into_iter()
                .map(str::to_string)
                .collect(),
            active_year: self.active_year().to_string(),
            months: months.to_vec(),
            totals,
            profit_series: profit_series(months),
            rows: row_variances(months),
            summary_cards: summary_cards(&totals),
            charts,
            executive_summary: self.executive_summary.clone(),
            can_add_month: months.len() < crate::dataset::MAX_MONTHS,
            can_remove_month: months.len() > crate::dataset::MIN_MONTHS,
        }
    }
}
