use crate::schema::{MonthField, MonthlyRecord, ParseWarning};
use crate::utils::{parse_amount, ParsedAmount};
use log::debug;

/// Minimum comma-separated fields for a CSV line to become a record.
pub const MIN_CSV_FIELDS: usize = 7;

/// Column order after the leading `name` column.
pub const CSV_COLUMNS: [MonthField; 6] = [
    MonthField::SalesBudget,
    MonthField::SalesActual,
    MonthField::WagesBudget,
    MonthField::WagesActual,
    MonthField::OverheadsBudget,
    MonthField::OverheadsActual,
];

/// Header line matching [`CSV_COLUMNS`], for writing templates.
pub const CSV_HEADER: &str =
    "name,salesBudget,salesActual,wagesBudget,wagesActual,overheadsBudget,overheadsActual";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRows {
    pub records: Vec<MonthlyRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// Warning for a lenient amount read, `None` when the text was a clean number.
pub(crate) fn amount_warning(
    parsed: ParsedAmount,
    line: Option<usize>,
    field: MonthField,
    raw: &str,
) -> Option<ParseWarning> {
    let raw = raw.trim().to_string();
    match parsed {
        ParsedAmount::Number(_) => None,
        ParsedAmount::Prefix(value) => Some(ParseWarning::TrailingText {
            line,
            field,
            raw,
            value,
        }),
        ParsedAmount::Invalid => Some(ParseWarning::InvalidNumber { line, field, raw }),
    }
}

/// Builds records from CSV text.
///
/// The first line is a header and is skipped. Lines are split on commas with
/// no quoting. A line with fewer than [`MIN_CSV_FIELDS`] fields is dropped;
/// numbers keep their leading numeric part and become zero when there is none. Ids are 1-based positions among the kept
/// rows, not source line numbers.
pub fn parse_csv_rows(text: &str) -> ParsedRows {
    let mut parsed = ParsedRows::default();

    for (index, line) in text.split('\n').enumerate().skip(1) {
        let line_number = index + 1;
        let values: Vec<&str> = line.split(',').collect();

        if values.len() < MIN_CSV_FIELDS {
            // trailing newlines produce empty lines, not worth a warning
            if !line.trim().is_empty() {
                debug!(
                    "Dropping CSV line {} with {} fields",
                    line_number,
                    values.len()
                );
                parsed.warnings.push(ParseWarning::ShortRow {
                    line: line_number,
                    fields: values.len(),
                });
            }
            continue;
        }

        let id = parsed.records.len() as u32 + 1;
        let mut record = MonthlyRecord::new(id, values[0].trim());

        for (field, raw) in CSV_COLUMNS.iter().zip(&values[1..]) {
            let amount = parse_amount(raw);
            if let Some(warning) = amount_warning(amount, Some(line_number), *field, raw) {
                parsed.warnings.push(warning);
            }
            record.set(*field, amount.value());
        }

        parsed.records.push(record);
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_row_is_dropped_entirely() {
        let parsed = parse_csv_rows("header\nJan,1000,900,300,280,200,190\nFeb,1");

        assert_eq!(parsed.records.len(), 1);
        let jan = &parsed.records[0];
        assert_eq!(jan.id, 1);
        assert_eq!(jan.name, "Jan");
        assert_eq!(jan.sales_budget, 1000.0);
        assert_eq!(jan.sales_actual, 900.0);
        assert_eq!(jan.wages_budget, 300.0);
        assert_eq!(jan.wages_actual, 280.0);
        assert_eq!(jan.overheads_budget, 200.0);
        assert_eq!(jan.overheads_actual, 190.0);

        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::ShortRow { line: 3, fields: 2 }]
        );
    }

    #[test]
    fn test_header_only_and_empty_text_yield_nothing() {
        assert!(parse_csv_rows("").records.is_empty());
        assert!(parse_csv_rows("header\n").records.is_empty());
        assert!(parse_csv_rows("header\n").warnings.is_empty());
    }

    #[test]
    fn test_ids_follow_kept_rows_not_line_numbers() {
        let text = "h\nbad\nApr,1,2,3,4,5,6\n\nMay,7,8,9,10,11,12\n";
        let parsed = parse_csv_rows(text);

        let ids: Vec<u32> = parsed.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(parsed.records[1].name, "May");
        assert_eq!(parsed.records[1].overheads_actual, 12.0);
    }

    #[test]
    fn test_crlf_and_padded_names() {
        let parsed = parse_csv_rows("h\r\n  Jun ,10,20,30,40,50,60\r\n");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].name, "Jun");
        assert_eq!(parsed.records[0].overheads_actual, 60.0);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_bad_numbers_become_zero_with_warning() {
        let parsed = parse_csv_rows("h\nJul,abc,,300,x,200,190,extra");
        let jul = &parsed.records[0];

        assert_eq!(jul.sales_budget, 0.0);
        assert_eq!(jul.sales_actual, 0.0);
        assert_eq!(jul.wages_actual, 0.0);
        assert_eq!(jul.overheads_actual, 190.0);
        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(
            parsed.warnings[0],
            ParseWarning::InvalidNumber {
                line: Some(2),
                field: MonthField::SalesBudget,
                raw: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_numbers_with_units_keep_leading_value() {
        let parsed = parse_csv_rows("h\nJan,1000 GBP,900,300,280,200,190");
        let jan = &parsed.records[0];

        assert_eq!(jan.sales_budget, 1000.0);
        assert_eq!(jan.sales_actual, 900.0);
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::TrailingText {
                line: Some(2),
                field: MonthField::SalesBudget,
                raw: "1000 GBP".to_string(),
                value: 1000.0,
            }]
        );
    }
}
