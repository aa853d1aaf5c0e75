use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::columns;

/// One CSV row exactly as exported, every cell optional and untyped.
/// Header names follow the fleet reporting template; anything the
/// template does not define is skipped by serde.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawReport {
    #[serde(rename = "Ship Name")]
    pub ship_name: Option<String>,
    #[serde(rename = "IMO_No")]
    pub imo_no: Option<String>,
    #[serde(rename = "Report Type")]
    pub report_type: Option<String>,
    #[serde(rename = "Voyage Number")]
    pub voyage_number: Option<String>,
    #[serde(rename = "Time Zone")]
    pub time_zone: Option<String>,
    #[serde(rename = "Start Date")]
    pub start_date: Option<String>,
    #[serde(rename = "Start Time")]
    pub start_time: Option<String>,
    #[serde(rename = "End Date")]
    pub end_date: Option<String>,
    #[serde(rename = "End Time")]
    pub end_time: Option<String>,
    #[serde(rename = "Time Shift")]
    pub time_shift: Option<String>,
    #[serde(rename = "Distance - Ground [NM]")]
    pub distance_ground: Option<String>,
    #[serde(rename = "Distance - Sea [NM]")]
    pub distance_sea: Option<String>,
    #[serde(rename = "Average Load [kW]")]
    pub avg_load_kw: Option<String>,
    #[serde(rename = "Average Load [%]")]
    pub avg_load_pct: Option<String>,
    #[serde(rename = "Average RPM")]
    pub avg_rpm: Option<String>,
    #[serde(rename = "Avg. Speed")]
    pub avg_speed: Option<String>,
    #[serde(rename = "ME Rhrs (From Last Report)")]
    pub me_rhrs: Option<String>,
    #[serde(rename = "Fuel Cons. [MT] (ME Cons 1)")]
    pub fuel_cons_1: Option<String>,
    #[serde(rename = "Fuel Cons. [MT] (ME Cons 2)")]
    pub fuel_cons_2: Option<String>,
    #[serde(rename = "Fuel Cons. [MT] (ME Cons 3)")]
    pub fuel_cons_3: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 1)")]
    pub exh_temp_1: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 2)")]
    pub exh_temp_2: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 3)")]
    pub exh_temp_3: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 4)")]
    pub exh_temp_4: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 5)")]
    pub exh_temp_5: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 6)")]
    pub exh_temp_6: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 7)")]
    pub exh_temp_7: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 8)")]
    pub exh_temp_8: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 9)")]
    pub exh_temp_9: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 10)")]
    pub exh_temp_10: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 11)")]
    pub exh_temp_11: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 12)")]
    pub exh_temp_12: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 13)")]
    pub exh_temp_13: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 14)")]
    pub exh_temp_14: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 15)")]
    pub exh_temp_15: Option<String>,
    #[serde(rename = "Exh. Temp [°C] (Main Engine Unit 16)")]
    pub exh_temp_16: Option<String>,
    #[serde(rename = "A.E. 1 Last Report [Rhrs] (Aux Engine Unit 1)")]
    pub ae_rhrs_1: Option<String>,
    #[serde(rename = "A.E. 2 Last Report [Rhrs] (Aux Engine Unit 2)")]
    pub ae_rhrs_2: Option<String>,
    #[serde(rename = "A.E. 3 Last Report [Rhrs] (Aux Engine Unit 3)")]
    pub ae_rhrs_3: Option<String>,
    #[serde(rename = "A.E. 4 Total [Rhrs] (Aux Engine Unit 4)")]
    pub ae_rhrs_4: Option<String>,
    #[serde(rename = "A.E. 5 Last Report [Rhrs] (Aux Engine Unit 5)")]
    pub ae_rhrs_5: Option<String>,
    #[serde(rename = "A.E. 6 Last Report [Rhrs] (Aux Engine Unit 6)")]
    pub ae_rhrs_6: Option<String>,
    #[serde(rename = "Tank Cleaning [MT]")]
    pub tank_cleaning: Option<String>,
    #[serde(rename = "Cargo Transfer [MT]")]
    pub cargo_transfer: Option<String>,
    #[serde(rename = "Maintaining Cargo Temp. [MT]")]
    pub maintaining_cargo_temp: Option<String>,
    #[serde(rename = "Shaft Gen. Propulsion [MT]")]
    pub shaft_gen_propulsion: Option<String>,
    #[serde(rename = "Raising Cargo Temp. [MT]")]
    pub raising_cargo_temp: Option<String>,
    #[serde(rename = "Burning Sludge [MT]")]
    pub burning_sludge: Option<String>,
    #[serde(rename = "Ballast Transfer [MT]")]
    pub ballast_transfer: Option<String>,
    #[serde(rename = "Fresh Water Prod. [MT]")]
    pub fresh_water_prod: Option<String>,
    #[serde(rename = "Others [MT]")]
    pub others: Option<String>,
    #[serde(rename = "EGCS Consumption [MT]")]
    pub egcs_consumption: Option<String>,
    #[serde(rename = "Cyl. Oil Cons. [Ltr]")]
    pub cyl_oil_cons: Option<String>,
}

/// Operational state declared by the report. Only `At Sea` activates the
/// voyage rules; the match is exact after trimming, so `AT SEA` or
/// `at sea` land in `Other` and are skipped like port calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportType {
    AtSea,
    AtPort,
    AtAnchorage,
    Other(String),
}

impl ReportType {
    pub fn from_raw(s: Option<&str>) -> Self {
        match s.map(str::trim).unwrap_or("") {
            "At Sea" => ReportType::AtSea,
            "At Port" => ReportType::AtPort,
            "At Anchorage" => ReportType::AtAnchorage,
            other => ReportType::Other(other.to_string()),
        }
    }

    pub fn is_at_sea(&self) -> bool {
        matches!(self, ReportType::AtSea)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReportType::AtSea => "At Sea",
            ReportType::AtPort => "At Port",
            ReportType::AtAnchorage => "At Anchorage",
            ReportType::Other(s) => s,
        }
    }
}

impl Default for ReportType {
    fn default() -> Self {
        ReportType::Other(String::new())
    }
}

/// A normalized noon report. Fields the rules compute with are clean
/// finite floats (missing or garbled cells already collapsed to zero);
/// identity and period fields stay as trimmed strings because they are
/// only parsed on demand or passed through to exports.
#[derive(Debug, Clone, Default)]
pub struct NoonReport {
    pub ship_name: String,
    pub imo_no: String,
    pub report_type: ReportType,
    pub voyage_number: String,
    pub time_zone: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub time_shift: f64,
    pub distance_ground: String,
    pub distance_sea: String,
    pub avg_load_kw: f64,
    pub avg_load_pct: f64,
    pub avg_rpm: String,
    pub avg_speed: f64,
    pub me_rhrs: f64,
    pub fuel_cons: [f64; 3],
    pub exhaust_temps: [f64; 16],
    pub ae_rhrs: [f64; 6],
    pub sub_consumers: [f64; 10],
    pub cyl_oil_cons: f64,
}

/// Quantities computed per report before rule evaluation, all rounded to
/// two decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedMetrics {
    pub report_hours: f64,
    pub sfoc: f64,
    pub scoc: f64,
}

/// Accumulated verdict of the rule pass over one report.
///
/// `implicated` keeps first-seen order across rules so the failure export
/// lists columns in the order the checks flagged them.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub reasons: Vec<String>,
    pub implicated: Vec<&'static str>,
}

impl Evaluation {
    pub fn passed(&self) -> bool {
        self.reasons.is_empty()
    }

    /// All reasons joined into the single `Reason` cell.
    pub fn reason_text(&self) -> String {
        self.reasons.join("; ")
    }
}

/// A report with its derived metrics and rule verdict, ready for export.
#[derive(Debug, Clone)]
pub struct ProcessedReport {
    pub report: NoonReport,
    pub derived: DerivedMetrics,
    pub evaluation: Evaluation,
}

impl ProcessedReport {
    /// Render the named column for export. Returns `None` for columns the
    /// engine does not know, which the assembler uses to drop extras.
    pub fn cell(&self, column: &str) -> Option<String> {
        let r = &self.report;
        if let Some(i) = columns::FUEL_CONS.iter().position(|c| *c == column) {
            return Some(r.fuel_cons[i].to_string());
        }
        if let Some(i) = columns::EXHAUST_TEMP.iter().position(|c| *c == column) {
            return Some(r.exhaust_temps[i].to_string());
        }
        if let Some(i) = columns::AE_RHRS.iter().position(|c| *c == column) {
            return Some(r.ae_rhrs[i].to_string());
        }
        if let Some(i) = columns::SUB_CONSUMERS.iter().position(|c| *c == column) {
            return Some(r.sub_consumers[i].to_string());
        }
        let value = match column {
            columns::SHIP_NAME => r.ship_name.clone(),
            columns::IMO_NO => r.imo_no.clone(),
            columns::REPORT_TYPE => r.report_type.as_str().to_string(),
            columns::VOYAGE_NUMBER => r.voyage_number.clone(),
            columns::TIME_ZONE => r.time_zone.clone(),
            columns::START_DATE => r.start_date.clone(),
            columns::START_TIME => r.start_time.clone(),
            columns::END_DATE => r.end_date.clone(),
            columns::END_TIME => r.end_time.clone(),
            columns::TIME_SHIFT => r.time_shift.to_string(),
            columns::DISTANCE_GROUND => r.distance_ground.clone(),
            columns::DISTANCE_SEA => r.distance_sea.clone(),
            columns::AVG_LOAD_KW => r.avg_load_kw.to_string(),
            columns::AVG_LOAD_PCT => r.avg_load_pct.to_string(),
            columns::AVG_RPM => r.avg_rpm.clone(),
            columns::AVG_SPEED => r.avg_speed.to_string(),
            columns::ME_RHRS => r.me_rhrs.to_string(),
            columns::CYL_OIL_CONS => r.cyl_oil_cons.to_string(),
            columns::REPORT_HOURS => self.derived.report_hours.to_string(),
            columns::SFOC => self.derived.sfoc.to_string(),
            columns::SCOC => self.derived.scoc.to_string(),
            columns::REASON => self.evaluation.reason_text(),
            _ => return None,
        };
        Some(value)
    }
}

/// A materialized export table: ordered header plus stringly rows. This is
/// what the CSV writer, the console preview and the mailer all consume.
#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(columns: Vec<String>) -> Self {
        ReportTable {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Rows whose cell under `column` equals `value`, header preserved.
    pub fn filter_eq(&self, column: &str, value: &str) -> ReportTable {
        let rows = match self.column_index(column) {
            Some(i) => self
                .rows
                .iter()
                .filter(|row| row.get(i).map(String::as_str) == Some(value))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        ReportTable {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Distinct values under `column` in first-seen order.
    pub fn distinct(&self, column: &str) -> Vec<String> {
        let Some(i) = self.column_index(column) else {
            return Vec::new();
        };
        let mut seen: Vec<String> = Vec::new();
        for row in &self.rows {
            if let Some(v) = row.get(i) {
                if !seen.iter().any(|s| s == v) {
                    seen.push(v.clone());
                }
            }
        }
        seen
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ReasonCount {
    #[serde(rename = "Reason")]
    #[tabled(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub total_reports: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate_pct: f64,
    pub vessels: usize,
    pub reasons: Vec<ReasonCount>,
}
