// Parsing and small-statistics helpers.
//
// All the "dirty" value handling lives here: best-effort field parsers
// that never fail (absent on bad input), the median/average helpers the
// reports share, and the display/serialization formatting hooks.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use serde::Serializer;

/// Parse a string-like value into `f64`, tolerating the formatting quirks
/// common in CSV exports.
///
/// - Accepts `Option<&str>` so callers can pass optional fields through.
/// - Trims whitespace and strips thousands-separator commas.
/// - Rejects values containing alphabetic characters, which also keeps
///   `inf`/`NaN` spellings out of the dataset.
/// - Returns `None` for anything that cannot be parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok()
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    // `?` propagates `None` early if the field is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // Dataset dates are `YYYY-MM-DD`; anything else is treated as absent.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn days_diff(start: NaiveDate, end: NaiveDate) -> i64 {
    // `NaiveDate` subtraction yields a duration in whole days. Negative
    // when `end` precedes `start`; callers do not clamp.
    (end - start).num_days()
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; 0 for an empty slice to avoid NaN.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn median(mut v: Vec<f64>) -> f64 {
    // Takes the `Vec` by value so it can sort in place without cloning at
    // the call site. Empty input yields 0.
    if v.is_empty() {
        return 0.0;
    }
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        v[mid]
    } else {
        (v[mid - 1] + v[mid]) / 2.0
    }
}

/// Round to two decimal places. Used where a stored value doubles as its
/// own display form (the digest).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fixed two-decimal rendering for report table cells.
///
/// Takes a reference so it can double as a `tabled` display hook.
pub fn fmt_2dp(value: &f64) -> String {
    format!("{:.2}", value)
}

/// Serde hook for report CSV fields: exactly two fraction digits, no
/// thousands separators.
pub fn ser_2dp<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&fmt_2dp(value))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_numbers_with_thousands_separators() {
        assert_eq!(parse_f64_safe(Some("1,234,567.89")), Some(1234567.89));
        assert_eq!(parse_f64_safe(Some(" 42 ")), Some(42.0));
    }

    #[test]
    fn rejects_text_empty_and_missing_numbers() {
        assert_eq!(parse_f64_safe(Some("12 months")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parses_years_best_effort() {
        assert_eq!(parse_i32_safe(Some("2021")), Some(2021));
        assert_eq!(parse_i32_safe(Some(" 2023 ")), Some(2023));
        assert_eq!(parse_i32_safe(Some("202x")), None);
        assert_eq!(parse_i32_safe(None), None);
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(parse_date_safe(Some("2022-07-15")), Some(date(2022, 7, 15)));
        assert_eq!(parse_date_safe(Some("15/07/2022")), None);
        assert_eq!(parse_date_safe(Some("")), None);
        assert_eq!(parse_date_safe(None), None);
    }

    #[test]
    fn day_difference_spans_calendar_months() {
        assert_eq!(days_diff(date(2022, 1, 1), date(2022, 3, 2)), 60);
        assert_eq!(days_diff(date(2022, 5, 5), date(2022, 5, 5)), 0);
        assert_eq!(days_diff(date(2022, 5, 5), date(2022, 5, 1)), -4);
    }

    #[test]
    fn median_of_empty_odd_and_even_lists() {
        assert_eq!(median(vec![]), 0.0);
        assert_eq!(median(vec![3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(vec![1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn average_of_empty_list_is_zero() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn two_decimal_rendering_pads_and_rounds() {
        assert_eq!(fmt_2dp(&1234.5), "1234.50");
        assert_eq!(fmt_2dp(&0.0), "0.00");
        assert_eq!(fmt_2dp(&-3.14159), "-3.14");
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(1.2345), 1.23);
        assert_eq!(round2(1.5), 1.5);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_int(9855_i64), "9,855");
        assert_eq!(format_int(12_i64), "12");
    }
}
