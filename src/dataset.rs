use crate::error::Result;
use crate::ingestion::{amount_warning, parse_csv_rows};
use crate::schema::{MonthField, MonthlyRecord, ParseWarning};
use crate::utils::{month_label, parse_amount};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const MAX_MONTHS: usize = 12;
pub const MIN_MONTHS: usize = 1;

/// One fiscal year's ordered records and its id counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearSequence {
    records: Vec<MonthlyRecord>,
    next_id: u32,
}

impl Default for YearSequence {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl YearSequence {
    /// Takes records as given; the counter continues after the highest id.
    pub fn from_records(records: Vec<MonthlyRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self { records, next_id }
    }

    pub fn records(&self) -> &[MonthlyRecord] {
        &self.records
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Applied {
        value: f64,
        warning: Option<ParseWarning>,
    },
    NoMatchingRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportOutcome {
    /// False when no row survived parsing and the year was left untouched.
    pub replaced: bool,
    pub rows: usize,
    pub warnings: Vec<ParseWarning>,
}

/// Owns every fiscal year's records. All mutations apply to the active year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStore {
    years: BTreeMap<String, YearSequence>,
    active_year: String,
}

impl DatasetStore {
    pub fn new(active_year: impl Into<String>) -> Self {
        let active_year = active_year.into();
        let mut years = BTreeMap::new();
        years.insert(active_year.clone(), YearSequence::default());
        Self { years, active_year }
    }

    /// Adds or replaces a year without changing the active one.
    pub fn insert_year(&mut self, label: impl Into<String>, sequence: YearSequence) {
        self.years.insert(label.into(), sequence);
    }

    pub fn active_year(&self) -> &str {
        &self.active_year
    }

    pub fn year_labels(&self) -> Vec<&str> {
        self.years.keys().map(String::as_str).collect()
    }

    /// Switches the active year, creating an empty sequence for unknown labels.
    pub fn select_year(&mut self, label: &str) -> &[MonthlyRecord] {
        if !self.years.contains_key(label) {
            debug!("Creating empty sequence for unknown year {}", label);
        }
        self.active_year = label.to_string();
        self.years
            .entry(self.active_year.clone())
            .or_default()
            .records
            .as_slice()
    }

    pub fn months(&self) -> &[MonthlyRecord] {
        self.months_for(&self.active_year).unwrap_or(&[])
    }

    pub fn months_for(&self, label: &str) -> Option<&[MonthlyRecord]> {
        self.years.get(label).map(|seq| seq.records.as_slice())
    }

    pub fn next_id(&self) -> u32 {
        self.years
            .get(&self.active_year)
            .map_or(1, |seq| seq.next_id)
    }

    fn active_mut(&mut self) -> &mut YearSequence {
        self.years.entry(self.active_year.clone()).or_default()
    }

    /// Appends a zeroed month; returns its id, or `None` when the year is full.
    pub fn add_month(&mut self) -> Option<u32> {
        let seq = self.active_mut();
        if seq.records.len() >= MAX_MONTHS {
            debug!("Add month rejected: year already has {} months", MAX_MONTHS);
            return None;
        }

        let id = seq.next_id;
        let name = month_label(seq.records.len());
        seq.records.push(MonthlyRecord::new(id, name));
        seq.next_id += 1;
        Some(id)
    }

    /// Drops the last record by position. Refuses to go below one month.
    pub fn remove_last_month(&mut self) -> Option<MonthlyRecord> {
        let seq = self.active_mut();
        if seq.records.len() <= MIN_MONTHS {
            debug!("Remove month rejected: year must keep at least one month");
            return None;
        }
        seq.records.pop()
    }

    /// Replaces one figure on the record with `id`.
    ///
    /// Empty input stores zero. Otherwise the leading number is stored, or
    /// zero when there is none, and anything not fully numeric is reported.
    pub fn update_field(&mut self, id: u32, field: MonthField, raw: &str) -> UpdateOutcome {
        let Some(record) = self.active_mut().records.iter_mut().find(|r| r.id == id) else {
            return UpdateOutcome::NoMatchingRecord;
        };

        let amount = parse_amount(raw);
        let value = amount.value();
        let warning = amount_warning(amount, None, field, raw);
        if warning.is_some() {
            debug!("Coercing '{}' to {} for {} on month {}", raw, value, field, id);
        }

        record.set(field, value);
        UpdateOutcome::Applied { value, warning }
    }

    /// Swaps in imported rows for the active year, renumbering ids `1..=N`.
    ///
    /// An empty `rows` leaves the year untouched and returns false.
    pub fn replace_from_import(&mut self, mut rows: Vec<MonthlyRecord>) -> bool {
        if rows.is_empty() {
            return false;
        }

        for (index, record) in rows.iter_mut().enumerate() {
            record.id = index as u32 + 1;
        }

        let count = rows.len();
        let year = self.active_year.clone();
        let seq = self.active_mut();
        seq.next_id = count as u32 + 1;
        seq.records = rows;

        info!("Replaced {} with {} imported months", year, count);
        true
    }

    pub fn import_csv(&mut self, text: &str) -> ImportOutcome {
        let parsed = parse_csv_rows(text);
        let rows = parsed.records.len();

        for warning in &parsed.warnings {
            debug!("CSV import: {}", warning);
        }

        ImportOutcome {
            replaced: self.replace_from_import(parsed.records),
            rows,
            warnings: parsed.warnings,
        }
    }

    pub fn import_csv_file(&mut self, path: &Path) -> Result<ImportOutcome> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.import_csv(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_months(count: usize) -> DatasetStore {
        let mut store = DatasetStore::new("25/26");
        for _ in 0..count {
            store.add_month();
        }
        store
    }

    #[test]
    fn test_add_month_labels_and_ids() {
        let store = store_with_months(3);
        let names: Vec<&str> = store.months().iter().map(|m| m.name.as_str()).collect();
        let ids: Vec<u32> = store.months().iter().map(|m| m.id).collect();

        assert_eq!(names, vec!["Jan", "Feb", "Mar"]);
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.months()[2].sales_actual, 0.0);
    }

    #[test]
    fn test_add_month_rejected_at_twelve() {
        let mut store = store_with_months(12);
        assert_eq!(store.months().len(), 12);
        assert_eq!(store.add_month(), None);
        assert_eq!(store.months().len(), 12);
        assert_eq!(store.next_id(), 13);
    }

    #[test]
    fn test_remove_last_month_keeps_one() {
        let mut store = store_with_months(1);
        assert!(store.remove_last_month().is_none());
        assert_eq!(store.months().len(), 1);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut store = store_with_months(3);
        let removed = store.remove_last_month().unwrap();
        assert_eq!(removed.id, 3);

        let id = store.add_month().unwrap();
        assert_eq!(id, 4);
        // the label follows position, not the id
        assert_eq!(store.months()[2].name, "Mar");
    }

    #[test]
    fn test_update_field_coercions() {
        let mut store = store_with_months(1);

        let outcome = store.update_field(1, MonthField::SalesActual, "150.5");
        assert_eq!(
            outcome,
            UpdateOutcome::Applied {
                value: 150.5,
                warning: None
            }
        );
        assert_eq!(store.months()[0].sales_actual, 150.5);

        store.update_field(1, MonthField::SalesActual, "");
        assert_eq!(store.months()[0].sales_actual, 0.0);

        store.update_field(1, MonthField::SalesActual, "150.5");
        let outcome = store.update_field(1, MonthField::SalesActual, "abc");
        assert!(matches!(
            outcome,
            UpdateOutcome::Applied {
                value,
                warning: Some(ParseWarning::InvalidNumber { line: None, .. })
            } if value == 0.0
        ));
        assert_eq!(store.months()[0].sales_actual, 0.0);
    }

    #[test]
    fn test_update_field_keeps_leading_number() {
        let mut store = store_with_months(1);

        let outcome = store.update_field(1, MonthField::SalesActual, "12abc");
        assert_eq!(
            outcome,
            UpdateOutcome::Applied {
                value: 12.0,
                warning: Some(ParseWarning::TrailingText {
                    line: None,
                    field: MonthField::SalesActual,
                    raw: "12abc".to_string(),
                    value: 12.0,
                })
            }
        );
        assert_eq!(store.months()[0].sales_actual, 12.0);
    }

    #[test]
    fn test_update_field_only_touches_named_field() {
        let mut store = store_with_months(2);
        store.update_field(2, MonthField::WagesBudget, "300");

        assert_eq!(store.months()[1].wages_budget, 300.0);
        assert_eq!(store.months()[1].wages_actual, 0.0);
        assert_eq!(store.months()[0].wages_budget, 0.0);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = store_with_months(2);
        let before = store.months().to_vec();
        assert_eq!(
            store.update_field(99, MonthField::SalesActual, "5"),
            UpdateOutcome::NoMatchingRecord
        );
        assert_eq!(store.months(), before.as_slice());
    }

    #[test]
    fn test_import_renumbers_and_resets_counter() {
        let mut store = store_with_months(5);
        store.remove_last_month();

        let outcome = store.import_csv("h\nJan,1,1,1,1,1,1\nFeb,2,2,2,2,2,2\n");
        assert!(outcome.replaced);
        assert_eq!(outcome.rows, 2);
        assert_eq!(store.next_id(), 3);
        assert_eq!(store.add_month(), Some(3));
    }

    #[test]
    fn test_empty_import_leaves_year_untouched() {
        let mut store = store_with_months(4);
        let before = store.months().to_vec();

        let outcome = store.import_csv("header\n");
        assert!(!outcome.replaced);
        assert_eq!(store.months(), before.as_slice());
        assert_eq!(store.next_id(), 5);

        assert!(!store.import_csv("").replaced);
        assert!(!store.replace_from_import(Vec::new()));
        assert_eq!(store.months().len(), 4);
    }

    #[test]
    fn test_import_only_replaces_active_year() {
        let mut store = store_with_months(2);
        store.select_year("24/25");
        store.import_csv("h\nOct,1,2,3,4,5,6");

        assert_eq!(store.months_for("24/25").unwrap().len(), 1);
        assert_eq!(store.months_for("25/26").unwrap().len(), 2);
    }

    #[test]
    fn test_select_unknown_year_creates_empty() {
        let mut store = store_with_months(2);
        assert!(store.select_year("26/27").is_empty());
        assert_eq!(store.active_year(), "26/27");
        assert_eq!(store.year_labels(), vec!["25/26", "26/27"]);

        assert_eq!(store.select_year("25/26").len(), 2);
    }

    #[test]
    fn test_sequence_counter_from_records() {
        let seq = YearSequence::from_records(vec![
            MonthlyRecord::new(1, "Oct"),
            MonthlyRecord::new(3, "Nov"),
        ]);
        assert_eq!(seq.next_id(), 4);
        assert_eq!(YearSequence::from_records(Vec::new()).next_id(), 1);
    }
}
