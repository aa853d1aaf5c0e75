// Engineering-consistency rules.
//
// Each rule is a pure predicate over one normalized report plus its derived
// metrics. Rules never abort a record: they either produce an outcome or
// stay silent, and the evaluator accumulates everything that fired. A rule
// whose guard does not hold is "not applicable", which is a pass.
use crate::columns;
use crate::types::{DerivedMetrics, Evaluation, NoonReport};
use crate::util;

const SFOC_MIN: f64 = 150.0;
const SFOC_MAX: f64 = 200.0;
const SPEED_MIN: f64 = 0.0;
const SPEED_MAX: f64 = 20.0;
const EXHAUST_SPREAD_MAX: f64 = 50.0;
const RHRS_MARGIN_H: f64 = 1.0;
// Below ~half a day of main-engine running the performance figures are not
// meaningful, so the at-sea rules only engage above this.
const ACTIVE_RHRS_MIN: f64 = 12.0;
const AE_RATIO_MAX: f64 = 1.25;
const LOAD_PCT_MIN: f64 = 40.0;
const SCOC_MIN: f64 = 0.8;
const SCOC_MAX: f64 = 1.5;

/// What one triggered rule contributes to the verdict.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    pub reason: String,
    pub implicated: Vec<&'static str>,
}

/// Common guard for the at-sea performance rules: the vessel must be
/// underway with the main engine doing real work.
fn underway(report: &NoonReport) -> bool {
    report.report_type.is_at_sea() && report.me_rhrs > ACTIVE_RHRS_MIN
}

fn check_sfoc(report: &NoonReport, derived: &DerivedMetrics) -> Option<RuleOutcome> {
    if !underway(report) {
        return None;
    }
    let sfoc = derived.sfoc;
    if (SFOC_MIN..=SFOC_MAX).contains(&sfoc) {
        return None;
    }
    // An uncomputable SFOC is 0, which lands here too: a vessel underway
    // that long must report a plausible figure.
    Some(RuleOutcome {
        reason: format!("SFOC ({sfoc:.2}) out of 150-200 at sea with ME Rhrs > 12"),
        implicated: vec![columns::SFOC],
    })
}

fn check_speed(report: &NoonReport) -> Option<RuleOutcome> {
    if !underway(report) {
        return None;
    }
    let speed = report.avg_speed;
    if (SPEED_MIN..=SPEED_MAX).contains(&speed) {
        return None;
    }
    Some(RuleOutcome {
        reason: format!("Avg. Speed ({speed:.2}) out of 0-20 at sea with ME Rhrs > 12"),
        implicated: vec![columns::AVG_SPEED],
    })
}

/// Per-unit exhaust-temperature spread. Zero readings mean "unit not
/// fitted or not reported" and are excluded from both the mean and the
/// deviation check.
fn check_exhaust_spread(report: &NoonReport) -> Vec<RuleOutcome> {
    if !underway(report) {
        return Vec::new();
    }
    let active: Vec<f64> = report
        .exhaust_temps
        .iter()
        .copied()
        .filter(|t| *t != 0.0)
        .collect();
    if active.is_empty() {
        return Vec::new();
    }
    let avg = util::mean(&active);
    let mut outcomes = Vec::new();
    for (i, &temp) in report.exhaust_temps.iter().enumerate() {
        if temp == 0.0 {
            continue;
        }
        if (temp - avg).abs() > EXHAUST_SPREAD_MAX {
            outcomes.push(RuleOutcome {
                reason: format!(
                    "Exhaust temp deviation > ±50 from avg at Unit {} ({temp:.2} vs avg {avg:.2})",
                    i + 1
                ),
                implicated: vec![columns::EXHAUST_TEMP[i]],
            });
        }
    }
    outcomes
}

fn check_running_hours(report: &NoonReport, derived: &DerivedMetrics) -> Option<RuleOutcome> {
    if derived.report_hours <= 0.0 {
        return None;
    }
    let excess = report.me_rhrs - derived.report_hours;
    if excess <= RHRS_MARGIN_H {
        return None;
    }
    Some(RuleOutcome {
        reason: format!(
            "ME Rhrs ({:.2}) exceeds Report Hours ({:.2}) by {excess:.2}h (margin: ±1h)",
            report.me_rhrs, derived.report_hours
        ),
        implicated: vec![columns::ME_RHRS, columns::REPORT_HOURS],
    })
}

/// More than one auxiliary engine running relative to the reporting window
/// needs a sub-consumer to justify it.
fn check_aux_utilization(report: &NoonReport, derived: &DerivedMetrics) -> Option<RuleOutcome> {
    if !report.report_type.is_at_sea() || report.avg_load_pct <= LOAD_PCT_MIN {
        return None;
    }
    let ae_sum: f64 = report.ae_rhrs.iter().sum();
    let ratio = if derived.report_hours > 0.0 {
        ae_sum / derived.report_hours
    } else {
        0.0
    };
    let subs_sum: f64 = report.sub_consumers.iter().sum();
    if ratio <= AE_RATIO_MAX || subs_sum != 0.0 {
        return None;
    }
    Some(RuleOutcome {
        reason: format!(
            "Multiple Aux Engines operating at sea (AE Rhrs/Report Hours = {ratio:.2}) with ME Load > 40% but no sub-consumers reported. Please confirm operations and update sub-consumption fields if applicable"
        ),
        implicated: vec![
            columns::AVG_LOAD_PCT,
            columns::AE_RHRS[0],
            columns::AE_RHRS[1],
            columns::AE_RHRS[2],
            columns::SUB_CONSUMERS[0],
            columns::SUB_CONSUMERS[1],
        ],
    })
}

fn check_cylinder_oil(report: &NoonReport, derived: &DerivedMetrics) -> Option<RuleOutcome> {
    if !underway(report) || derived.scoc <= 0.0 {
        return None;
    }
    let scoc = derived.scoc;
    if scoc < SCOC_MIN {
        Some(RuleOutcome {
            reason: format!("SCOC ({scoc:.2}) below 0.8-1.5 range at sea with ME Rhrs > 12"),
            implicated: vec![columns::SCOC, columns::CYL_OIL_CONS],
        })
    } else if scoc > SCOC_MAX {
        Some(RuleOutcome {
            reason: format!("SCOC ({scoc:.2}) above 0.8-1.5 range at sea with ME Rhrs > 12"),
            implicated: vec![columns::SCOC, columns::CYL_OIL_CONS],
        })
    } else {
        None
    }
}

/// Run every rule against one report. Reasons accumulate in rule order;
/// implicated columns keep first-seen order without duplicates.
/// `cylinder_oil` switches the SCOC check on for fleets that report it.
pub fn evaluate(report: &NoonReport, derived: &DerivedMetrics, cylinder_oil: bool) -> Evaluation {
    let mut outcomes: Vec<RuleOutcome> = Vec::new();
    outcomes.extend(check_sfoc(report, derived));
    outcomes.extend(check_speed(report));
    outcomes.extend(check_exhaust_spread(report));
    outcomes.extend(check_running_hours(report, derived));
    outcomes.extend(check_aux_utilization(report, derived));
    if cylinder_oil {
        outcomes.extend(check_cylinder_oil(report, derived));
    }

    let mut evaluation = Evaluation::default();
    for outcome in outcomes {
        evaluation.reasons.push(outcome.reason);
        for col in outcome.implicated {
            if !evaluation.implicated.contains(&col) {
                evaluation.implicated.push(col);
            }
        }
    }
    evaluation
}
