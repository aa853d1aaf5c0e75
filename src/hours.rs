// Report duration.
use chrono::{NaiveDateTime, NaiveTime};

use crate::types::NoonReport;
use crate::util;

/// Hours covered by a report: the wall-clock span between the start and end
/// timestamps plus the reported time-zone shift, rounded to two decimals.
///
/// Either date failing to parse collapses the whole record to 0.0 hours,
/// shift included. A missing or garbled time falls back to midnight so
/// date-only reports still span whole days. A negative span (end before
/// start) is returned as-is; the running-hours rule sees it like any other
/// small value.
pub fn report_hours(report: &NoonReport) -> f64 {
    let (Some(start_date), Some(end_date)) = (
        util::parse_date(Some(&report.start_date)),
        util::parse_date(Some(&report.end_date)),
    ) else {
        return 0.0;
    };
    let start_time = util::parse_time(Some(&report.start_time)).unwrap_or(NaiveTime::MIN);
    let end_time = util::parse_time(Some(&report.end_time)).unwrap_or(NaiveTime::MIN);
    let start = NaiveDateTime::new(start_date, start_time);
    let end = NaiveDateTime::new(end_date, end_time);
    let hours = (end - start).num_seconds() as f64 / 3600.0;
    util::round2(hours + report.time_shift)
}
