use crate::error::BudgetToolError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One calendar month's budget and actual figures within a fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    #[schemars(description = "Identifier unique within the year's sequence. Never reused after removal; CSV import renumbers 1..N.")]
    pub id: u32,

    #[schemars(description = "Short display label, usually a month abbreviation. Not required to be unique or ordered.")]
    pub name: String,

    pub sales_actual: f64,
    pub sales_budget: f64,
    pub wages_actual: f64,
    pub wages_budget: f64,
    pub overheads_actual: f64,
    pub overheads_budget: f64,
}

impl MonthlyRecord {
    /// A record with every figure set to zero.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sales_actual: 0.0,
            sales_budget: 0.0,
            wages_actual: 0.0,
            wages_budget: 0.0,
            overheads_actual: 0.0,
            overheads_budget: 0.0,
        }
    }

    pub fn get(&self, field: MonthField) -> f64 {
        match field {
            MonthField::SalesActual => self.sales_actual,
            MonthField::SalesBudget => self.sales_budget,
            MonthField::WagesActual => self.wages_actual,
            MonthField::WagesBudget => self.wages_budget,
            MonthField::OverheadsActual => self.overheads_actual,
            MonthField::OverheadsBudget => self.overheads_budget,
        }
    }

    pub fn set(&mut self, field: MonthField, value: f64) {
        let slot = match field {
            MonthField::SalesActual => &mut self.sales_actual,
            MonthField::SalesBudget => &mut self.sales_budget,
            MonthField::WagesActual => &mut self.wages_actual,
            MonthField::WagesBudget => &mut self.wages_budget,
            MonthField::OverheadsActual => &mut self.overheads_actual,
            MonthField::OverheadsBudget => &mut self.overheads_budget,
        };
        *slot = value;
    }

    pub fn profit_actual(&self) -> f64 {
        self.sales_actual - self.wages_actual - self.overheads_actual
    }

    pub fn profit_budget(&self) -> f64 {
        self.sales_budget - self.wages_budget - self.overheads_budget
    }

    /// Actual figure for a category; profit is derived from this record alone.
    pub fn actual(&self, category: Category) -> f64 {
        match category {
            Category::Sales => self.sales_actual,
            Category::Wages => self.wages_actual,
            Category::Overheads => self.overheads_actual,
            Category::Profit => self.profit_actual(),
        }
    }

    pub fn budget(&self, category: Category) -> f64 {
        match category {
            Category::Sales => self.sales_budget,
            Category::Wages => self.wages_budget,
            Category::Overheads => self.overheads_budget,
            Category::Profit => self.profit_budget(),
        }
    }
}

/// The six editable figures of a [`MonthlyRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum MonthField {
    SalesActual,
    SalesBudget,
    WagesActual,
    WagesBudget,
    OverheadsActual,
    OverheadsBudget,
}

impl MonthField {
    pub const ALL: [MonthField; 6] = [
        MonthField::SalesActual,
        MonthField::SalesBudget,
        MonthField::WagesActual,
        MonthField::WagesBudget,
        MonthField::OverheadsActual,
        MonthField::OverheadsBudget,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonthField::SalesActual => "salesActual",
            MonthField::SalesBudget => "salesBudget",
            MonthField::WagesActual => "wagesActual",
            MonthField::WagesBudget => "wagesBudget",
            MonthField::OverheadsActual => "overheadsActual",
            MonthField::OverheadsBudget => "overheadsBudget",
        }
    }
}

impl fmt::Display for MonthField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonthField {
    type Err = BudgetToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonthField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| BudgetToolError::UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[schemars(description = "Revenue. Actual at or above budget is favorable.")]
    Sales,
    #[schemars(description = "Cost. Actual at or below budget is favorable.")]
    Wages,
    #[schemars(description = "Cost. Actual at or below budget is favorable.")]
    Overheads,
    #[schemars(description = "Net profit: sales minus wages minus overheads. Treated like revenue.")]
    Profit,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Sales,
        Category::Wages,
        Category::Overheads,
        Category::Profit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sales => "sales",
            Category::Wages => "wages",
            Category::Overheads => "overheads",
            Category::Profit => "profit",
        }
    }

    pub fn is_cost(&self) -> bool {
        matches!(self, Category::Wages | Category::Overheads)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Sales => "Sales",
            Category::Wages => "Wages",
            Category::Overheads => "Overheads",
            Category::Profit => "Net Profit",
        }
    }

    /// Heading used on the totals card.
    pub fn total_title(&self) -> &'static str {
        match self {
            Category::Sales => "Total Sales",
            Category::Wages => "Total Wages",
            Category::Overheads => "Total Overheads",
            Category::Profit => "Net Profit",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BudgetToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| BudgetToolError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Area,
}

impl FromStr for ChartType {
    type Err = BudgetToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "area" => Ok(ChartType::Area),
            other => Err(BudgetToolError::UnknownChartType(other.to_string())),
        }
    }
}

/// Input that was accepted with a lenient default instead of being rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A numeric field could not be parsed and was stored as zero.
    InvalidNumber {
        /// 1-based line in the imported text, `None` for direct edits.
        line: Option<usize>,
        field: MonthField,
        raw: String,
    },
    /// Text after a leading number was ignored, e.g. `"1000 GBP"`.
    TrailingText {
        line: Option<usize>,
        field: MonthField,
        raw: String,
        value: f64,
    },
    /// A CSV line with fewer than seven fields was dropped.
    ShortRow { line: usize, fields: usize },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::InvalidNumber {
                line: Some(line),
                field,
                raw,
            } => write!(f, "line {}: '{}' is not a number for {}, using 0", line, raw, field),
            ParseWarning::InvalidNumber {
                line: None,
                field,
                raw,
            } => write!(f, "'{}' is not a number for {}, using 0", raw, field),
            ParseWarning::TrailingText {
                line: Some(line),
                field,
                raw,
                value,
            } => write!(
                f,
                "line {}: '{}' read as {} for {}, trailing text ignored",
                line, raw, value, field
            ),
            ParseWarning::TrailingText {
                line: None,
                field,
                raw,
                value,
            } => write!(
                f,
                "'{}' read as {} for {}, trailing text ignored",
                raw, value, field
            ),
            ParseWarning::ShortRow { line, fields } => write!(
                f,
                "line {}: expected at least 7 fields, found {}; row dropped",
                line, fields
            ),
        }
    }
}
