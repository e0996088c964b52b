use crate::dataset::{DatasetStore, YearSequence};
use crate::schema::MonthlyRecord;

pub const DEFAULT_YEAR: &str = "25/26";

pub const DEFAULT_EXECUTIVE_SUMMARY: &str = "Overall performance for the selected period shows \
promising trends in sales, exceeding budget expectations. However, careful monitoring of wages \
and overheads is required to maintain healthy profit margins.";

// (name, sales actual, sales budget, wages actual, wages budget, overheads actual, overheads budget)
type SeedRow = (&'static str, f64, f64, f64, f64, f64, f64);

const YEAR_24_25: &[SeedRow] = &[
    ("Oct", 95_000.0, 100_000.0, 28_000.0, 30_000.0, 19_000.0, 20_000.0),
    ("Nov", 102_000.0, 100_000.0, 31_000.0, 30_000.0, 21_000.0, 20_000.0),
    ("Dec", 98_000.0, 100_000.0, 29_000.0, 30_000.0, 20_000.0, 20_000.0),
];

const YEAR_25_26: &[SeedRow] = &[
    ("Apr", 105_000.0, 110_000.0, 32_000.0, 33_000.0, 21_000.0, 22_000.0),
    ("May", 115_000.0, 110_000.0, 33_000.0, 33_000.0, 22_000.0, 22_000.0),
    ("Jun", 112_000.0, 110_000.0, 32_500.0, 33_000.0, 21_500.0, 22_000.0),
    ("Jul", 0.0, 115_000.0, 0.0, 34_000.0, 0.0, 23_000.0),
    ("Aug", 0.0, 115_000.0, 0.0, 34_000.0, 0.0, 23_000.0),
    ("Sep", 0.0, 115_000.0, 0.0, 34_000.0, 0.0, 23_000.0),
    ("Oct", 0.0, 120_000.0, 0.0, 35_000.0, 0.0, 24_000.0),
];

fn build_sequence(rows: &[SeedRow]) -> YearSequence {
    let records = rows
        .iter()
        .enumerate()
        .map(|(i, &(name, sa, sb, wa, wb, oa, ob))| MonthlyRecord {
            id: i as u32 + 1,
            name: name.to_string(),
            sales_actual: sa,
            sales_budget: sb,
            wages_actual: wa,
            wages_budget: wb,
            overheads_actual: oa,
            overheads_budget: ob,
        })
        .collect();
    YearSequence::from_records(records)
}

/// Store pre-loaded with "24/25" and "25/26", with "25/26" active.
pub fn seeded_store() -> DatasetStore {
    let mut store = DatasetStore::new(DEFAULT_YEAR);
    store.insert_year("24/25", build_sequence(YEAR_24_25));
    store.insert_year(DEFAULT_YEAR, build_sequence(YEAR_25_26));
    store
}
