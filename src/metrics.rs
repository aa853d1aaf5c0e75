// Derived consumption metrics.
//
// SFOC is grams of fuel per kWh produced: total main-engine fuel (MT) scaled
// to grams over average load (kW) times running hours. SCOC is the cylinder
// oil analogue, litres scaled by 1000 over the same energy term. Both are
// 0.0 whenever a factor is missing or non-positive, so downstream rules can
// use `> 0` as their "metric is computable" guard.
use crate::hours;
use crate::types::{DerivedMetrics, NoonReport};
use crate::util::round2;

pub fn sfoc(report: &NoonReport) -> f64 {
    let total_fuel: f64 = report.fuel_cons.iter().sum();
    let power = report.avg_load_kw;
    let rhrs = report.me_rhrs;
    if total_fuel <= 0.0 || power <= 0.0 || rhrs <= 0.0 {
        return 0.0;
    }
    let value = total_fuel * 1_000_000.0 / (power * rhrs);
    if !value.is_finite() {
        return 0.0;
    }
    round2(value)
}

pub fn scoc(report: &NoonReport) -> f64 {
    let litres = report.cyl_oil_cons;
    let power = report.avg_load_kw;
    let rhrs = report.me_rhrs;
    if litres <= 0.0 || power <= 0.0 || rhrs <= 0.0 {
        return 0.0;
    }
    let value = litres * 1000.0 / (power * rhrs);
    if !value.is_finite() {
        return 0.0;
    }
    round2(value)
}

/// All derived quantities for one report. SCOC is always computed; the
/// engine decides whether it is exported or checked.
pub fn derive(report: &NoonReport) -> DerivedMetrics {
    DerivedMetrics {
        report_hours: hours::report_hours(report),
        sfoc: sfoc(report),
        scoc: scoc(report),
    }
}
