//! Variance, totals and chart series derived from a year's records.
//!
//! Everything here is a pure function of a record slice and is cheap enough
//! to recompute on every change (a year holds at most twelve months).

use crate::schema::{Category, MonthlyRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Percentage deviation of `actual` from `budget`, formatted to one decimal.
///
/// A zero budget yields `"0.0"` whatever the actual. The percentage is
/// rounded from its exact binary value, so `0.15` (stored just below) reads
/// `"0.1"`; exact halves round away from zero. A small negative variance
/// keeps its sign and can read `"-0.0"`, an exact zero never does.
pub fn variance_percent(actual: f64, budget: f64) -> String {
    if budget == 0.0 {
        return "0.0".to_string();
    }
    let percent = ((actual - budget) / budget) * 100.0;
    format_one_decimal(if percent == 0.0 { 0.0 } else { percent })
}

fn format_one_decimal(value: f64) -> String {
    // exact halves at one decimal are the odd multiples of 0.25
    let quarters = value * 4.0;
    let is_half = value.is_finite() && quarters.fract() == 0.0 && quarters % 2.0 != 0.0;
    if !is_half {
        return format!("{:.1}", value);
    }

    let tenths = (value * 10.0).round();
    let sign = if tenths < 0.0 { "-" } else { "" };
    let tenths = tenths.abs();
    format!("{}{}.{}", sign, (tenths / 10.0).trunc(), tenths % 10.0)
}

/// Numeric form of [`variance_percent`], re-read from the formatted string so
/// both agree on rounding.
pub fn variance_value(actual: f64, budget: f64) -> f64 {
    variance_percent(actual, budget).parse().unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Favorability {
    Favorable,
    Adverse,
}

/// Costs are favorable at or under budget, revenue and profit at or over it.
pub fn classify_variance(category: Category, variance: f64) -> Favorability {
    let favorable = if category.is_cost() {
        variance <= 0.0
    } else {
        variance >= 0.0
    };
    if favorable {
        Favorability::Favorable
    } else {
        Favorability::Adverse
    }
}

/// Classifies a formatted variance string; unparsable text counts as zero.
pub fn classify_variance_str(category: Category, variance: &str) -> Favorability {
    classify_variance(category, variance.trim().parse().unwrap_or(0.0))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTotals {
    pub sales_actual: f64,
    pub sales_budget: f64,
    pub wages_actual: f64,
    pub wages_budget: f64,
    pub overheads_actual: f64,
    pub overheads_budget: f64,
    pub profit_actual: f64,
    pub profit_budget: f64,
}

impl DerivedTotals {
    pub fn actual(&self, category: Category) -> f64 {
        match category {
            Category::Sales => self.sales_actual,
            Category::Wages => self.wages_actual,
            Category::Overheads => self.overheads_actual,
            Category::Profit => self.profit_actual,
        }
    }

    pub fn budget(&self, category: Category) -> f64 {
        match category {
            Category::Sales => self.sales_budget,
            Category::Wages => self.wages_budget,
            Category::Overheads => self.overheads_budget,
            Category::Profit => self.profit_budget,
        }
    }
}

/// Sums the six figures, then derives profit from those sums.
pub fn totals(records: &[MonthlyRecord]) -> DerivedTotals {
    let sum = |f: fn(&MonthlyRecord) -> f64| records.iter().map(f).sum::<f64>();

    let sales_actual = sum(|m| m.sales_actual);
    let sales_budget = sum(|m| m.sales_budget);
    let wages_actual = sum(|m| m.wages_actual);
    let wages_budget = sum(|m| m.wages_budget);
    let overheads_actual = sum(|m| m.overheads_actual);
    let overheads_budget = sum(|m| m.overheads_budget);

    DerivedTotals {
        sales_actual,
        sales_budget,
        wages_actual,
        wages_budget,
        overheads_actual,
        overheads_budget,
        profit_actual: sales_actual - wages_actual - overheads_actual,
        profit_budget: sales_budget - wages_budget - overheads_budget,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitPoint {
    pub name: String,
    pub profit_budget: f64,
    pub profit_actual: f64,
}

/// Per-record profit in record order.
pub fn profit_series(records: &[MonthlyRecord]) -> Vec<ProfitPoint> {
    records
        .iter()
        .map(|m| ProfitPoint {
            name: m.name.clone(),
            profit_budget: m.profit_budget(),
            profit_actual: m.profit_actual(),
        })
        .collect()
}

/// One x-axis point of a budget-vs-actual chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartPoint {
    pub name: String,
    pub budget: f64,
    pub actual: f64,
}

pub fn chart_series(category: Category, records: &[MonthlyRecord]) -> Vec<ChartPoint> {
    records
        .iter()
        .map(|m| ChartPoint {
            name: m.name.clone(),
            budget: m.budget(category),
            actual: m.actual(category),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VarianceCell {
    pub percent: String,
    pub favorability: Favorability,
}

impl VarianceCell {
    pub fn new(category: Category, actual: f64, budget: f64) -> Self {
        let percent = variance_percent(actual, budget);
        let favorability = classify_variance_str(category, &percent);
        Self {
            percent,
            favorability,
        }
    }
}

/// The variance columns of one table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowVariances {
    pub id: u32,
    pub name: String,
    pub profit_budget: f64,
    pub profit_actual: f64,
    pub sales: VarianceCell,
    pub wages: VarianceCell,
    pub overheads: VarianceCell,
    pub profit: VarianceCell,
}

pub fn row_variances(records: &[MonthlyRecord]) -> Vec<RowVariances> {
    records
        .iter()
        .map(|m| {
            let cell = |c: Category| VarianceCell::new(c, m.actual(c), m.budget(c));
            RowVariances {
                id: m.id,
                name: m.name.clone(),
                profit_budget: m.profit_budget(),
                profit_actual: m.profit_actual(),
                sales: cell(Category::Sales),
                wages: cell(Category::Wages),
                overheads: cell(Category::Overheads),
                profit: cell(Category::Profit),
            }
        })
        .collect()
}

/// Headline figures for one category across the year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryCard {
    pub category: Category,
    pub title: String,
    pub actual: f64,
    pub budget: f64,
    pub variance: VarianceCell,
}

pub fn summary_cards(totals: &DerivedTotals) -> Vec<SummaryCard> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let actual = totals.actual(category);
            let budget = totals.budget(category);
            SummaryCard {
                category,
                title: category.total_title().to_string(),
                actual,
                budget,
                variance: VarianceCell::new(category, actual, budget),
            }
        })
        .collect()
}
