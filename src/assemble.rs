// Export-table assembly.
//
// Turns processed reports into the two export views: the full processed
// table (every record, source columns plus derived) and the failure table
// (failed records only, projected down to context, exhaust, implicated and
// reason columns). Also aggregates reason counts for summaries and alerts.
use std::collections::HashMap;

use crate::columns;
use crate::types::{ProcessedReport, ReasonCount, ReportTable};

/// Column layout of the processed export: the known source columns in file
/// order, then the derived columns. SCOC only appears for fleets that
/// report cylinder oil.
pub fn export_columns(source_columns: &[String], cylinder_oil: bool) -> Vec<String> {
    let mut cols: Vec<String> = source_columns.to_vec();
    cols.push(columns::REPORT_HOURS.to_string());
    cols.push(columns::SFOC.to_string());
    if cylinder_oil {
        cols.push(columns::SCOC.to_string());
    }
    cols.push(columns::REASON.to_string());
    cols
}

pub fn processed_table(
    reports: &[ProcessedReport],
    source_columns: &[String],
    cylinder_oil: bool,
) -> ReportTable {
    let mut table = ReportTable::new(export_columns(source_columns, cylinder_oil));
    for report in reports {
        let row = table
            .columns
            .iter()
            .map(|c| report.cell(c).unwrap_or_default())
            .collect();
        table.rows.push(row);
    }
    table
}

/// Project the failed records down to the columns worth reviewing: the
/// fixed context block, every exhaust column the source reported, the
/// columns the rules implicated (first-seen order across records), and the
/// reason. Candidates missing from the export are dropped, duplicates keep
/// their first position, and `Ship Name` is forced to column A. The column
/// layout survives even when no record failed.
pub fn failure_table(
    reports: &[ProcessedReport],
    source_columns: &[String],
    cylinder_oil: bool,
) -> ReportTable {
    let failed: Vec<&ProcessedReport> = reports
        .iter()
        .filter(|r| !r.evaluation.passed())
        .collect();

    let mut implicated: Vec<&'static str> = Vec::new();
    for report in &failed {
        for col in &report.evaluation.implicated {
            if !implicated.contains(col) {
                implicated.push(col);
            }
        }
    }

    let mut wanted: Vec<&str> = Vec::new();
    wanted.extend(columns::CONTEXT);
    wanted.extend(columns::EXHAUST_TEMP);
    wanted.extend(implicated);
    wanted.push(columns::REASON);

    let available = export_columns(source_columns, cylinder_oil);
    let mut cols: Vec<String> = Vec::new();
    for col in wanted {
        if available.iter().any(|a| a == col) && !cols.iter().any(|c| c == col) {
            cols.push(col.to_string());
        }
    }
    if let Some(pos) = cols.iter().position(|c| c == columns::SHIP_NAME) {
        if pos > 0 {
            let ship = cols.remove(pos);
            cols.insert(0, ship);
        }
    }

    let mut table = ReportTable::new(cols);
    for report in failed {
        let row = table
            .columns
            .iter()
            .map(|c| report.cell(c).unwrap_or_default())
            .collect();
        table.rows.push(row);
    }
    table
}

/// Count individual failure reasons across the batch, most frequent first,
/// ties alphabetical.
pub fn reason_counts(reports: &[ProcessedReport]) -> Vec<ReasonCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for report in reports {
        for reason in &report.evaluation.reasons {
            *counts.entry(reason.clone()).or_insert(0) += 1;
        }
    }
    sort_counts(counts)
}

/// Same aggregation but over an already-projected table, where only the
/// joined `Reason` cell survives. Used for per-vessel alert bodies.
pub fn reason_counts_from_table(table: &ReportTable) -> Vec<ReasonCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    if let Some(i) = table.column_index(columns::REASON) {
        for row in &table.rows {
            let Some(cell) = row.get(i) else { continue };
            for reason in cell.split("; ") {
                let reason = reason.trim();
                if !reason.is_empty() {
                    *counts.entry(reason.to_string()).or_insert(0) += 1;
                }
            }
        }
    }
    sort_counts(counts)
}

fn sort_counts(counts: HashMap<String, usize>) -> Vec<ReasonCount> {
    let mut list: Vec<ReasonCount> = counts
        .into_iter()
        .map(|(reason, count)| ReasonCount { reason, count })
        .collect();
    list.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.reason.cmp(&b.reason)));
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DerivedMetrics, Evaluation, NoonReport};

    fn processed(ship: &str, reasons: Vec<&str>, implicated: Vec<&'static str>) -> ProcessedReport {
        ProcessedReport {
            report: NoonReport {
                ship_name: ship.to_string(),
                ..NoonReport::default()
            },
            derived: DerivedMetrics::default(),
            evaluation: Evaluation {
                reasons: reasons.into_iter().map(String::from).collect(),
                implicated,
            },
        }
    }

    fn source() -> Vec<String> {
        vec![
            columns::SHIP_NAME.to_string(),
            columns::REPORT_TYPE.to_string(),
            columns::AVG_SPEED.to_string(),
            columns::ME_RHRS.to_string(),
            columns::EXHAUST_TEMP[0].to_string(),
            columns::EXHAUST_TEMP[1].to_string(),
        ]
    }

    #[test]
    fn processed_layout_appends_derived_after_source_order() {
        let reports = vec![processed("Alpha", vec![], vec![])];
        let table = processed_table(&reports, &source(), false);
        assert_eq!(
            table.columns,
            vec![
                "Ship Name",
                "Report Type",
                "Avg. Speed",
                "ME Rhrs (From Last Report)",
                "Exh. Temp [°C] (Main Engine Unit 1)",
                "Exh. Temp [°C] (Main Engine Unit 2)",
                "Report Hours",
                "SFOC",
                "Reason",
            ]
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][0], "Alpha");
    }

    #[test]
    fn scoc_column_is_variant_only() {
        let reports = vec![processed("Alpha", vec![], vec![])];
        let without = processed_table(&reports, &source(), false);
        assert!(without.column_index(columns::SCOC).is_none());
        let with = processed_table(&reports, &source(), true);
        let scoc = with.column_index(columns::SCOC).unwrap();
        // Inserted between SFOC and Reason.
        assert_eq!(scoc, with.column_index(columns::SFOC).unwrap() + 1);
        assert_eq!(scoc + 1, with.column_index(columns::REASON).unwrap());
    }

    #[test]
    fn failure_table_keeps_failed_rows_only() {
        let reports = vec![
            processed("Alpha", vec![], vec![]),
            processed("Beta", vec!["bad speed"], vec![columns::AVG_SPEED]),
        ];
        let table = failure_table(&reports, &source(), false);
        assert_eq!(table.len(), 1);
        let ship = table.column_index(columns::SHIP_NAME).unwrap();
        assert_eq!(ship, 0);
        assert_eq!(table.rows[0][ship], "Beta");
    }

    #[test]
    fn failure_columns_context_exhaust_implicated_reason() {
        let reports = vec![processed(
            "Beta",
            vec!["bad speed"],
            vec![columns::AVG_SPEED, columns::ME_RHRS],
        )];
        let table = failure_table(&reports, &source(), false);
        assert_eq!(
            table.columns,
            vec![
                "Ship Name",
                "Report Type",
                "ME Rhrs (From Last Report)",
                "Report Hours",
                "Exh. Temp [°C] (Main Engine Unit 1)",
                "Exh. Temp [°C] (Main Engine Unit 2)",
                "Avg. Speed",
                "Reason",
            ]
        );
    }

    #[test]
    fn failure_layout_survives_a_clean_batch() {
        let reports = vec![processed("Alpha", vec![], vec![])];
        let table = failure_table(&reports, &source(), false);
        assert!(table.is_empty());
        assert_eq!(table.columns.first().map(String::as_str), Some("Ship Name"));
        assert_eq!(table.columns.last().map(String::as_str), Some("Reason"));
    }

    #[test]
    fn implicated_order_is_first_seen_across_records() {
        let reports = vec![
            processed("A", vec!["first"], vec![columns::SFOC, columns::AVG_SPEED]),
            processed("B", vec!["second"], vec![columns::AVG_SPEED, columns::AVG_LOAD_PCT]),
        ];
        let mut src = source();
        src.push(columns::AVG_LOAD_PCT.to_string());
        let table = failure_table(&reports, &src, false);
        let sfoc = table.column_index(columns::SFOC).unwrap();
        let speed = table.column_index(columns::AVG_SPEED).unwrap();
        assert!(sfoc < speed);
        // Average Load [%] sits in the context block, well before both.
        assert!(table.column_index(columns::AVG_LOAD_PCT).unwrap() < sfoc);
    }

    #[test]
    fn candidates_absent_from_the_source_are_dropped() {
        let reports = vec![processed("A", vec!["r"], vec![columns::CYL_OIL_CONS])];
        let table = failure_table(&reports, &source(), false);
        // Cylinder oil was never in the file, so it cannot be projected.
        assert!(table.column_index(columns::CYL_OIL_CONS).is_none());
        // Context columns missing from the source vanish too.
        assert!(table.column_index(columns::IMO_NO).is_none());
    }

    #[test]
    fn reason_counts_sort_by_count_then_text() {
        let reports = vec![
            processed("A", vec!["zeta", "alpha"], vec![]),
            processed("B", vec!["zeta"], vec![]),
            processed("C", vec!["beta"], vec![]),
        ];
        let counts = reason_counts(&reports);
        let summary: Vec<(&str, usize)> = counts
            .iter()
            .map(|c| (c.reason.as_str(), c.count))
            .collect();
        assert_eq!(summary, vec![("zeta", 2), ("alpha", 1), ("beta", 1)]);
    }

    #[test]
    fn table_reason_counts_split_joined_cells() {
        let mut table = ReportTable::new(vec!["Ship Name".into(), "Reason".into()]);
        table.rows.push(vec!["A".into(), "first; second".into()]);
        table.rows.push(vec!["B".into(), "first".into()]);
        table.rows.push(vec!["C".into(), String::new()]);
        let counts = reason_counts_from_table(&table);
        let summary: Vec<(&str, usize)> = counts
            .iter()
            .map(|c| (c.reason.as_str(), c.count))
            .collect();
        assert_eq!(summary, vec![("first", 2), ("second", 1)]);
    }
}
