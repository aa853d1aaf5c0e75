use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::columns;
use crate::error::ValidateError;
use crate::types::{NoonReport, RawReport, ReportType};
use crate::util::parse_f64_lenient;

/// Counters and header inventory from one ingestion pass.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub total_rows: usize,
    pub skipped_rows: usize,
    /// Known source columns present in the file, in file order. Drives the
    /// column layout of every export.
    pub columns: Vec<String>,
}

pub fn load_reports(path: &Path) -> Result<(Vec<NoonReport>, LoadSummary), ValidateError> {
    let bytes = std::fs::read(path).map_err(|e| ValidateError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_reports_from_bytes(&bytes, path)
}

/// Parse an in-memory CSV export. `origin` only labels error messages, so
/// callers that already hold the bytes (for fingerprinting) avoid a second
/// read.
pub fn load_reports_from_bytes(
    bytes: &[u8],
    origin: &Path,
) -> Result<(Vec<NoonReport>, LoadSummary), ValidateError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers = rdr
        .headers()
        .map_err(|e| ValidateError::TableRead {
            path: origin.to_path_buf(),
            source: e,
        })?
        .clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ValidateError::EmptyTable {
            path: origin.to_path_buf(),
        });
    }

    let known = columns::known_columns();
    let mut present: Vec<String> = Vec::new();
    for header in headers.iter() {
        if known.contains(&header) {
            present.push(header.to_string());
        } else {
            debug!(column = header, "Ignoring unrecognized column");
        }
    }

    let mut total_rows = 0usize;
    let mut skipped_rows = 0usize;
    let mut reports: Vec<NoonReport> = Vec::new();

    for result in rdr.deserialize::<RawReport>() {
        total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(e) => {
                skipped_rows += 1;
                warn!(row = total_rows, error = %e, "Skipping undecodable row");
                continue;
            }
        };
        reports.push(normalize(&raw));
    }

    let summary = LoadSummary {
        total_rows,
        skipped_rows,
        columns: present,
    };
    Ok((reports, summary))
}

fn clean_string(s: &Option<String>) -> String {
    s.as_deref().unwrap_or("").trim().to_string()
}

/// Collapse one raw row into the typed record the rules run on. String
/// fields are trimmed, numeric fields go through the lenient parser, so
/// every default the pipeline relies on is applied exactly once, here.
pub fn normalize(raw: &RawReport) -> NoonReport {
    NoonReport {
        ship_name: clean_string(&raw.ship_name),
        imo_no: clean_string(&raw.imo_no),
        report_type: ReportType::from_raw(raw.report_type.as_deref()),
        voyage_number: clean_string(&raw.voyage_number),
        time_zone: clean_string(&raw.time_zone),
        start_date: clean_string(&raw.start_date),
        start_time: clean_string(&raw.start_time),
        end_date: clean_string(&raw.end_date),
        end_time: clean_string(&raw.end_time),
        time_shift: parse_f64_lenient(raw.time_shift.as_deref()),
        distance_ground: clean_string(&raw.distance_ground),
        distance_sea: clean_string(&raw.distance_sea),
        avg_load_kw: parse_f64_lenient(raw.avg_load_kw.as_deref()),
        avg_load_pct: parse_f64_lenient(raw.avg_load_pct.as_deref()),
        avg_rpm: clean_string(&raw.avg_rpm),
        avg_speed: parse_f64_lenient(raw.avg_speed.as_deref()),
        me_rhrs: parse_f64_lenient(raw.me_rhrs.as_deref()),
        fuel_cons: [
            parse_f64_lenient(raw.fuel_cons_1.as_deref()),
            parse_f64_lenient(raw.fuel_cons_2.as_deref()),
            parse_f64_lenient(raw.fuel_cons_3.as_deref()),
        ],
        exhaust_temps: [
            parse_f64_lenient(raw.exh_temp_1.as_deref()),
            parse_f64_lenient(raw.exh_temp_2.as_deref()),
            parse_f64_lenient(raw.exh_temp_3.as_deref()),
            parse_f64_lenient(raw.exh_temp_4.as_deref()),
            parse_f64_lenient(raw.exh_temp_5.as_deref()),
            parse_f64_lenient(raw.exh_temp_6.as_deref()),
            parse_f64_lenient(raw.exh_temp_7.as_deref()),
            parse_f64_lenient(raw.exh_temp_8.as_deref()),
            parse_f64_lenient(raw.exh_temp_9.as_deref()),
            parse_f64_lenient(raw.exh_temp_10.as_deref()),
            parse_f64_lenient(raw.exh_temp_11.as_deref()),
            parse_f64_lenient(raw.exh_temp_12.as_deref()),
            parse_f64_lenient(raw.exh_temp_13.as_deref()),
            parse_f64_lenient(raw.exh_temp_14.as_deref()),
            parse_f64_lenient(raw.exh_temp_15.as_deref()),
            parse_f64_lenient(raw.exh_temp_16.as_deref()),
        ],
        ae_rhrs: [
            parse_f64_lenient(raw.ae_rhrs_1.as_deref()),
            parse_f64_lenient(raw.ae_rhrs_2.as_deref()),
            parse_f64_lenient(raw.ae_rhrs_3.as_deref()),
            parse_f64_lenient(raw.ae_rhrs_4.as_deref()),
            parse_f64_lenient(raw.ae_rhrs_5.as_deref()),
            parse_f64_lenient(raw.ae_rhrs_6.as_deref()),
        ],
        sub_consumers: [
            parse_f64_lenient(raw.tank_cleaning.as_deref()),
            parse_f64_lenient(raw.cargo_transfer.as_deref()),
            parse_f64_lenient(raw.maintaining_cargo_temp.as_deref()),
            parse_f64_lenient(raw.shaft_gen_propulsion.as_deref()),
            parse_f64_lenient(raw.raising_cargo_temp.as_deref()),
            parse_f64_lenient(raw.burning_sludge.as_deref()),
            parse_f64_lenient(raw.ballast_transfer.as_deref()),
            parse_f64_lenient(raw.fresh_water_prod.as_deref()),
            parse_f64_lenient(raw.others.as_deref()),
            parse_f64_lenient(raw.egcs_consumption.as_deref()),
        ],
        cyl_oil_cons: parse_f64_lenient(raw.cyl_oil_cons.as_deref()),
    }
}
