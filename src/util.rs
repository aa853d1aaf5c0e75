// Utility helpers for parsing, rounding and fingerprinting.
//
// This module centralizes all the "dirty" CSV/number/date handling so the
// rest of the engine can assume clean, typed values. Parsing here is
// deliberately fail-open: malformed telemetry becomes a default value
// instead of an error, so one bad cell never blocks validation of the rest
// of the record.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use num_format::{Locale, ToFormattedString};

/// Date formats tried in order, first success wins. ISO forms come first,
/// then slashed month-first (the upstream export's default for ambiguous
/// dates), then day-first variants, then datetime forms whose date part is
/// taken.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y",
];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Time-of-day formats tried in order: strict `HH:MM:SS`, then `HH:MM`.
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Coerce a string-like cell into a clean `f64`.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace and strips thousands separators like `","`.
/// - Null-like sentinels (`""`, `"nan"`, `"None"`) and anything else that
///   fails numeric parsing become `0.0`.
/// - Non-finite parses (`inf`, `NaN`) also become `0.0`; every value used
///   by a rule must be a finite float.
pub fn parse_f64_lenient(s: Option<&str>) -> f64 {
    let Some(s) = s else { return 0.0 };
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    let s = s.replace(',', "");
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parse a calendar date, trying `DATE_FORMATS` in order and falling back
/// to the date part of `DATETIME_FORMATS`. Returns `None` when nothing
/// matches; the duration calculator treats that record as zero hours.
pub fn parse_date(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse a time of day, strict `HH:MM:SS` first, then `HH:MM`.
///
/// Unlike dates, a bad time never disqualifies the record: callers fall
/// back to midnight.
pub fn parse_time(s: Option<&str>) -> Option<NaiveTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in TIME_FORMATS {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    None
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn mean(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

/// Content fingerprint for the memoization cache: digest of the raw bytes
/// plus the originating file identity and length, so re-loading the same
/// upload can skip the pipeline entirely.
pub fn content_fingerprint(name: &str, bytes: &[u8]) -> String {
    format!("{}:{}:{:x}", name, bytes.len(), md5::compute(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lenient_parse_strips_thousands_separators() {
        assert_eq!(parse_f64_lenient(Some("1,234.5")), 1234.5);
        assert_eq!(parse_f64_lenient(Some("12,345,678")), 12_345_678.0);
    }

    #[test]
    fn lenient_parse_trims_whitespace() {
        assert_eq!(parse_f64_lenient(Some("  42.5  ")), 42.5);
        assert_eq!(parse_f64_lenient(Some("\t-3.5")), -3.5);
    }

    #[test]
    fn lenient_parse_sentinels_become_zero() {
        assert_eq!(parse_f64_lenient(Some("")), 0.0);
        assert_eq!(parse_f64_lenient(Some("   ")), 0.0);
        assert_eq!(parse_f64_lenient(Some("nan")), 0.0);
        assert_eq!(parse_f64_lenient(Some("None")), 0.0);
        assert_eq!(parse_f64_lenient(None), 0.0);
    }

    #[test]
    fn lenient_parse_absorbs_garbage_and_non_finite() {
        assert_eq!(parse_f64_lenient(Some("n/a")), 0.0);
        assert_eq!(parse_f64_lenient(Some("12.3.4")), 0.0);
        assert_eq!(parse_f64_lenient(Some("inf")), 0.0);
        assert_eq!(parse_f64_lenient(Some("-inf")), 0.0);
    }

    #[test]
    fn lenient_parse_accepts_scientific_notation() {
        assert_eq!(parse_f64_lenient(Some("1e3")), 1000.0);
    }

    #[test]
    fn date_parsing_tries_formats_in_order() {
        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date(Some("2024-01-15")), Some(jan15));
        assert_eq!(parse_date(Some("2024/01/15")), Some(jan15));
        // Month-first wins for ambiguous slashed dates...
        assert_eq!(
            parse_date(Some("01/02/2024")),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        // ...but an impossible month falls through to day-first.
        assert_eq!(parse_date(Some("15/01/2024")), Some(jan15));
        assert_eq!(parse_date(Some("15-01-2024")), Some(jan15));
    }

    #[test]
    fn date_parsing_accepts_datetime_cells() {
        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date(Some("2024-01-15 06:30:00")), Some(jan15));
        assert_eq!(parse_date(Some("2024-01-15T06:30:00")), Some(jan15));
    }

    #[test]
    fn date_parsing_rejects_garbage() {
        assert_eq!(parse_date(Some("yesterday")), None);
        assert_eq!(parse_date(Some("")), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn time_parsing_strict_then_short_form() {
        let t = NaiveTime::from_hms_opt(6, 30, 15).unwrap();
        assert_eq!(parse_time(Some("06:30:15")), Some(t));
        let t = NaiveTime::from_hms_opt(6, 30, 0).unwrap();
        assert_eq!(parse_time(Some("06:30")), Some(t));
        assert_eq!(parse_time(Some("noonish")), None);
        assert_eq!(parse_time(Some("")), None);
    }

    #[test]
    fn round2_behaves() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(-1.234), -1.23);
        assert_eq!(round2(2.5), 2.5);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[300.0, 310.0, 305.0]), 305.0);
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = content_fingerprint("reports.csv", b"abc");
        let b = content_fingerprint("reports.csv", b"abc");
        let c = content_fingerprint("reports.csv", b"abd");
        let d = content_fingerprint("other.csv", b"abc");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    proptest! {
        // Any integer rendered with thousands separators round-trips
        // through the lenient parser (within f64's exact-integer range).
        #[test]
        fn grouped_integers_round_trip(n in -(1i64 << 53)..(1i64 << 53)) {
            let rendered = format_int(n);
            prop_assert_eq!(parse_f64_lenient(Some(&rendered)), n as f64);
        }

        // Purely alphabetic cells never leak through as numbers; this
        // covers the named sentinels and arbitrary free text alike.
        #[test]
        fn alphabetic_cells_become_zero(s in "[a-zA-Z]{1,12}") {
            prop_assert_eq!(parse_f64_lenient(Some(&s)), 0.0);
        }
    }
}
