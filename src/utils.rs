use crate::error::{BudgetToolError, Result};
use chrono::{Datelike, Month, NaiveDate};

/// Result of reading a currency figure leniently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedAmount {
    /// The whole text was a number (or empty, meaning zero).
    Number(f64),
    /// A leading number was read and trailing text ignored, e.g. `"1000 GBP"`.
    Prefix(f64),
    /// No finite leading number; stored as zero.
    Invalid,
}

impl ParsedAmount {
    /// The figure to store.
    pub fn value(self) -> f64 {
        match self {
            ParsedAmount::Number(value) | ParsedAmount::Prefix(value) => value,
            ParsedAmount::Invalid => 0.0,
        }
    }
}

/// Parses a user-entered or imported currency figure.
///
/// Surrounding whitespace is ignored and an empty field means zero. The
/// longest leading decimal number is taken, so `"12abc"` reads as 12;
/// callers report a [`crate::ParseWarning`] for anything but
/// [`ParsedAmount::Number`].
pub fn parse_amount(raw: &str) -> ParsedAmount {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedAmount::Number(0.0);
    }

    let len = numeric_prefix_len(trimmed);
    match trimmed[..len].parse::<f64>() {
        Ok(value) if value.is_finite() && len == trimmed.len() => ParsedAmount::Number(value),
        Ok(value) if value.is_finite() => ParsedAmount::Prefix(value),
        _ => ParsedAmount::Invalid,
    }
}

/// Byte length of the leading `[+-]digits[.digits][e[+-]digits]` run, or 0
/// when it holds no mantissa digit.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }
    end
}

/// Formats an amount the way the dashboard prints pounds: thousands grouped
/// with commas, at most three fraction digits, trailing zeros dropped.
///
/// # Examples
/// - `95000.0` -> `"95,000"`
/// - `150.5` -> `"150.5"`
/// - `-1234.5678` -> `"-1,234.568"`
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value * 1000.0).round() / 1000.0;
    let text = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Three-letter calendar label for the `index`-th month, wrapping every 12.
pub fn month_label(index: usize) -> String {
    let month = Month::try_from((index % 12 + 1) as u8).unwrap_or(Month::January);
    month.name()[..3].to_string()
}

pub fn validate_fiscal_year_start_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(BudgetToolError::InvalidFiscalYearStartMonth(month));
    }
    Ok(())
}

/// Label of the fiscal year containing `date`, e.g. `"25/26"` for May 2025
/// when the year starts in April.
pub fn fiscal_year_label(date: NaiveDate, start_month: u32) -> Result<String> {
    validate_fiscal_year_start_month(start_month)?;

    let start_year = if date.month() >= start_month {
        date.year()
    } else {
        date.year() - 1
    };

    // A January start keeps the whole year in one calendar year.
    let end_year = if start_month == 1 {
        start_year
    } else {
        start_year + 1
    };

    Ok(format!(
        "{:02}/{:02}",
        start_year.rem_euclid(100),
        end_year.rem_euclid(100)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_lenient_policy() {
        assert_eq!(parse_amount("150.5"), ParsedAmount::Number(150.5));
        assert_eq!(parse_amount("  900 "), ParsedAmount::Number(900.0));
        assert_eq!(parse_amount("190\r"), ParsedAmount::Number(190.0));
        assert_eq!(parse_amount(""), ParsedAmount::Number(0.0));
        assert_eq!(parse_amount("-12"), ParsedAmount::Number(-12.0));
        assert_eq!(parse_amount("+.5"), ParsedAmount::Number(0.5));
        assert_eq!(parse_amount("2.5e3"), ParsedAmount::Number(2500.0));
        assert_eq!(parse_amount("abc"), ParsedAmount::Invalid);
        assert_eq!(parse_amount("inf"), ParsedAmount::Invalid);
        assert_eq!(parse_amount("Infinity"), ParsedAmount::Invalid);
        assert_eq!(parse_amount("NaN"), ParsedAmount::Invalid);
        assert_eq!(parse_amount("1e999"), ParsedAmount::Invalid);
        assert_eq!(parse_amount("-"), ParsedAmount::Invalid);
        assert_eq!(parse_amount("."), ParsedAmount::Invalid);
        assert_eq!(ParsedAmount::Invalid.value(), 0.0);
    }

    #[test]
    fn test_parse_amount_reads_leading_number() {
        assert_eq!(parse_amount("12abc"), ParsedAmount::Prefix(12.0));
        assert_eq!(parse_amount("1000 GBP"), ParsedAmount::Prefix(1000.0));
        assert_eq!(parse_amount("1,500"), ParsedAmount::Prefix(1.0));
        assert_eq!(parse_amount("-3.75kg"), ParsedAmount::Prefix(-3.75));
        assert_eq!(parse_amount("7e"), ParsedAmount::Prefix(7.0));
        assert_eq!(parse_amount("7e+x"), ParsedAmount::Prefix(7.0));
        assert_eq!(parse_amount("0x10"), ParsedAmount::Prefix(0.0));
        assert_eq!(parse_amount("5."), ParsedAmount::Number(5.0));
        assert_eq!(parse_amount("1000 GBP").value(), 1000.0);
    }

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(950.0), "950");
        assert_eq!(format_amount(95_000.0), "95,000");
        assert_eq!(format_amount(1_234_567.0), "1,234,567");
        assert_eq!(format_amount(150.5), "150.5");
        assert_eq!(format_amount(-1_234.5678), "-1,234.568");
        assert_eq!(format_amount(-52_000.0), "-52,000");
    }

    #[test]
    fn test_month_label_wraps() {
        assert_eq!(month_label(0), "Jan");
        assert_eq!(month_label(3), "Apr");
        assert_eq!(month_label(11), "Dec");
        assert_eq!(month_label(12), "Jan");
    }

    #[test]
    fn test_fiscal_year_label() {
        let may = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
        assert_eq!(fiscal_year_label(may, 4).unwrap(), "25/26");
        assert_eq!(fiscal_year_label(feb, 4).unwrap(), "25/26");

        let nov = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        assert_eq!(fiscal_year_label(nov, 10).unwrap(), "24/25");
        assert_eq!(fiscal_year_label(nov, 1).unwrap(), "24/24");
    }

    #[test]
    fn test_fiscal_year_label_rejects_bad_month() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert!(fiscal_year_label(date, 0).is_err());
        assert!(fiscal_year_label(date, 13).is_err());
    }
}
