// Batch validation driver.
use tracing::info;

use crate::assemble;
use crate::config::ValidatorConfig;
use crate::loader::LoadSummary;
use crate::metrics;
use crate::rules;
use crate::types::{NoonReport, ProcessedReport, ReportTable, ValidationSummary};
use crate::util::round2;

/// Everything one validation pass produces: the per-record verdicts, both
/// export tables, and the batch summary.
#[derive(Debug)]
pub struct ValidationOutcome {
    pub reports: Vec<ProcessedReport>,
    pub processed: ReportTable,
    pub failed: ReportTable,
    pub summary: ValidationSummary,
}

/// Derive metrics and evaluate every rule for each report, then assemble
/// the export views. Pure with respect to its inputs; records are never
/// mutated after normalization.
pub fn validate(
    reports: Vec<NoonReport>,
    load: &LoadSummary,
    config: &ValidatorConfig,
) -> ValidationOutcome {
    let cylinder_oil = config.rules.cylinder_oil;

    let mut evaluated: Vec<ProcessedReport> = Vec::with_capacity(reports.len());
    for report in reports {
        let derived = metrics::derive(&report);
        let evaluation = rules::evaluate(&report, &derived, cylinder_oil);
        evaluated.push(ProcessedReport {
            report,
            derived,
            evaluation,
        });
    }

    let processed = assemble::processed_table(&evaluated, &load.columns, cylinder_oil);
    let failed = assemble::failure_table(&evaluated, &load.columns, cylinder_oil);

    let total_reports = evaluated.len();
    let failed_count = evaluated.iter().filter(|r| !r.evaluation.passed()).count();
    let passed = total_reports - failed_count;
    let pass_rate_pct = if total_reports > 0 {
        round2(passed as f64 * 100.0 / total_reports as f64)
    } else {
        0.0
    };

    let mut vessels: Vec<&str> = Vec::new();
    for report in &evaluated {
        let name = report.report.ship_name.as_str();
        if !name.is_empty() && !vessels.contains(&name) {
            vessels.push(name);
        }
    }

    let summary = ValidationSummary {
        total_reports,
        passed,
        failed: failed_count,
        pass_rate_pct,
        vessels: vessels.len(),
        reasons: assemble::reason_counts(&evaluated),
    };

    info!(
        total = summary.total_reports,
        failed = summary.failed,
        vessels = summary.vessels,
        "Validated batch"
    );

    ValidationOutcome {
        reports: evaluated,
        processed,
        failed,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns;
    use crate::types::ReportType;

    fn load_summary() -> LoadSummary {
        LoadSummary {
            total_rows: 0,
            skipped_rows: 0,
            columns: vec![
                columns::SHIP_NAME.to_string(),
                columns::REPORT_TYPE.to_string(),
                columns::AVG_SPEED.to_string(),
                columns::ME_RHRS.to_string(),
                columns::AVG_LOAD_KW.to_string(),
                columns::FUEL_CONS[0].to_string(),
                columns::START_DATE.to_string(),
                columns::END_DATE.to_string(),
            ],
        }
    }

    fn sailing(ship: &str, speed: f64) -> NoonReport {
        NoonReport {
            ship_name: ship.to_string(),
            report_type: ReportType::AtSea,
            me_rhrs: 24.0,
            avg_load_kw: 5000.0,
            fuel_cons: [21.0, 0.0, 0.0], // SFOC 175 over 24h at 5 MW
            avg_speed: speed,
            start_date: "2024-03-01".into(),
            end_date: "2024-03-02".into(),
            ..NoonReport::default()
        }
    }

    #[test]
    fn mixed_batch_splits_pass_and_fail() {
        let reports = vec![
            sailing("Alpha", 14.0),
            sailing("Beta", 25.0), // speed out of range
            NoonReport {
                ship_name: "Gamma".into(),
                report_type: ReportType::AtPort,
                ..NoonReport::default()
            },
        ];
        let outcome = validate(reports, &load_summary(), &ValidatorConfig::default());

        assert_eq!(outcome.summary.total_reports, 3);
        assert_eq!(outcome.summary.passed, 2);
        assert_eq!(outcome.summary.failed, 1);
        assert_eq!(outcome.summary.pass_rate_pct, 66.67);
        assert_eq!(outcome.summary.vessels, 3);

        assert_eq!(outcome.processed.len(), 3);
        assert_eq!(outcome.failed.len(), 1);
        let ship = outcome.failed.column_index(columns::SHIP_NAME).unwrap();
        assert_eq!(outcome.failed.rows[0][ship], "Beta");

        assert_eq!(outcome.summary.reasons.len(), 1);
        assert!(outcome.summary.reasons[0].reason.starts_with("Avg. Speed"));
        assert_eq!(outcome.summary.reasons[0].count, 1);
    }

    #[test]
    fn derived_metrics_flow_into_the_export() {
        let outcome = validate(
            vec![sailing("Alpha", 14.0)],
            &load_summary(),
            &ValidatorConfig::default(),
        );
        let table = &outcome.processed;
        let hours = table.column_index(columns::REPORT_HOURS).unwrap();
        let sfoc = table.column_index(columns::SFOC).unwrap();
        assert_eq!(table.rows[0][hours], "24");
        assert_eq!(table.rows[0][sfoc], "175");
        // Reason cell is empty for a clean record.
        let reason = table.column_index(columns::REASON).unwrap();
        assert_eq!(table.rows[0][reason], "");
    }

    #[test]
    fn empty_batch_produces_a_zeroed_summary() {
        let outcome = validate(
            Vec::new(),
            &load_summary(),
            &ValidatorConfig::default(),
        );
        assert_eq!(outcome.summary.total_reports, 0);
        assert_eq!(outcome.summary.pass_rate_pct, 0.0);
        assert_eq!(outcome.summary.vessels, 0);
        assert!(outcome.processed.is_empty());
        assert!(outcome.failed.is_empty());
        // Layouts survive for the writers.
        assert!(!outcome.processed.columns.is_empty());
        assert_eq!(
            outcome.failed.columns.last().map(String::as_str),
            Some(columns::REASON)
        );
    }

    #[test]
    fn cylinder_oil_flag_activates_scoc_checks_and_column() {
        let mut config = ValidatorConfig::default();
        let mut report = sailing("Alpha", 14.0);
        report.cyl_oil_cons = 360.0; // SCOC 3.0, far above range
        let mut load = load_summary();
        load.columns.push(columns::CYL_OIL_CONS.to_string());

        let outcome = validate(vec![report.clone()], &load, &config);
        assert_eq!(outcome.summary.failed, 0);
        assert!(outcome.processed.column_index(columns::SCOC).is_none());

        config.rules.cylinder_oil = true;
        let outcome = validate(vec![report], &load, &config);
        assert_eq!(outcome.summary.failed, 1);
        let scoc = outcome.processed.column_index(columns::SCOC).unwrap();
        assert_eq!(outcome.processed.rows[0][scoc], "3");
    }
}
