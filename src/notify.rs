// Alert-message assembly.
//
// Builds the complete notification for a vessel with validation failures:
// recipients, subject, HTML body and the CSV attachment of its failed
// rows. Actually sending mail is somebody else's job; the binary writes
// these out as preview files.
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use tracing::warn;

use crate::assemble;
use crate::columns;
use crate::error::ValidateError;
use crate::output;
use crate::types::{ReasonCount, ReportTable};

const ALERT_CONTACT: &str = "fleet.support@example.com";

/// A fully assembled mail message for whatever transport the operator
/// pastes it into.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One vessel's addresses from the mapping file.
#[derive(Debug, Clone)]
pub struct RecipientEntry {
    pub ship_name: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
}

/// One assembled alert, tagged with the vessel it belongs to.
#[derive(Debug, Clone)]
pub struct VesselAlert {
    pub vessel: String,
    pub message: EmailMessage,
}

/// Messages assembled for a whole fleet, plus the vessels that could not
/// be addressed and why.
#[derive(Debug, Default)]
pub struct BulkBuild {
    pub alerts: Vec<VesselAlert>,
    pub skipped: Vec<String>,
}

/// Split an address cell on commas, semicolons or newlines, dropping
/// blanks. Operators paste addresses in all three styles.
pub fn split_recipients(input: &str) -> Vec<String> {
    input
        .split([',', ';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Vessel name reduced to characters safe in generated file names.
pub fn safe_file_stem(vessel: &str) -> String {
    vessel
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn attachment_name(vessel: &str) -> String {
    format!("Failed_Validation_{}.csv", safe_file_stem(vessel))
}

/// Render the alert body for one vessel. `generated_at` is injected so the
/// footer timestamp is reproducible.
pub fn render_alert_body(
    ship_name: &str,
    failed_count: usize,
    reasons: &[ReasonCount],
    generated_at: DateTime<Utc>,
) -> String {
    let mut bullets = String::new();
    for rc in reasons {
        let plural = if rc.count > 1 { "s" } else { "" };
        bullets.push_str(&format!(
            "            <li>{} ({} occurrence{})</li>\n",
            rc.reason, rc.count, plural
        ));
    }

    format!(
        r#"<html>
    <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
        <h2 style="color: #2c3e50;">Vessel Report Validation Alert</h2>

        <p>Dear Captain and C/E of <strong>{ship_name}</strong>,</p>

        <p>This is an automated notification regarding recent validation failures in your vessel reports.</p>

        <div style="background-color: #fff3cd; border-left: 4px solid #ffc107; padding: 15px; margin: 20px 0;">
            <h3 style="margin-top: 0; color: #856404;">Validation Summary</h3>
            <p><strong>Failed Reports:</strong> {failed_count}</p>
        </div>

        <h3>Common Issues Detected:</h3>
        <ul>
{bullets}        </ul>

        <p>Please review the attached CSV file for detailed information about the failed validations.</p>

        <h4 style="color: #2c3e50;">Action Required:</h4>
        <ol>
            <li>Review the attached report carefully</li>
            <li>Correct the identified issues</li>
            <li>Resubmit corrected reports</li>
            <li>Contact the technical team if you need assistance</li>
        </ol>

        <hr style="border: none; border-top: 1px solid #ddd; margin: 30px 0;">

        <p style="color: #7f8c8d; font-size: 0.9em;">
            For any queries, please contact us at <strong><a href="mailto:{contact}">{contact}</a></strong>
        </p>

        <p style="color: #7f8c8d; font-size: 0.85em; margin-top: 10px;">
            This is an automated message. Generated on {generated}
        </p>
    </body>
</html>
"#,
        ship_name = ship_name,
        failed_count = failed_count,
        bullets = bullets,
        contact = ALERT_CONTACT,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// Package one vessel's failed rows into a complete alert: subject line,
/// HTML body with per-reason occurrence counts, and the rows themselves as
/// a CSV attachment.
pub fn build_vessel_alert(
    failed: &ReportTable,
    vessel: &str,
    to: Vec<String>,
    cc: Vec<String>,
    generated_at: DateTime<Utc>,
) -> Result<EmailMessage, ValidateError> {
    let vessel_failed = failed.filter_eq(columns::SHIP_NAME, vessel);
    let reasons = assemble::reason_counts_from_table(&vessel_failed);
    let html_body = render_alert_body(vessel, vessel_failed.len(), &reasons, generated_at);
    let filename = attachment_name(vessel);
    let bytes =
        output::table_to_csv_bytes(&vessel_failed).map_err(|source| ValidateError::TableWrite {
            path: PathBuf::from(&filename),
            source,
        })?;
    Ok(EmailMessage {
        to,
        cc,
        subject: format!("Vessel Report Validation Alert - {}", vessel),
        html_body,
        attachment: Some(Attachment { filename, bytes }),
    })
}

/// Parse the vessel → recipients mapping file. Requires a `Ship Name`
/// column and an `Email` (or `To`) column; every column whose name starts
/// with `CC` (any case) contributes carbon-copy addresses.
pub fn load_recipient_map(path: &Path) -> Result<Vec<RecipientEntry>, ValidateError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| ValidateError::TableRead {
            path: path.to_path_buf(),
            source,
        })?;
    let headers = rdr
        .headers()
        .map_err(|source| ValidateError::TableRead {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let ship_idx = headers
        .iter()
        .position(|h| h == columns::SHIP_NAME)
        .ok_or_else(|| ValidateError::MissingColumn {
            path: path.to_path_buf(),
            column: columns::SHIP_NAME.to_string(),
        })?;
    let email_idx = headers
        .iter()
        .position(|h| h == "Email")
        .or_else(|| headers.iter().position(|h| h == "To"))
        .ok_or_else(|| ValidateError::MissingColumn {
            path: path.to_path_buf(),
            column: "Email".to_string(),
        })?;
    let cc_idx: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.to_uppercase().starts_with("CC"))
        .map(|(i, _)| i)
        .collect();

    let mut entries = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Skipping undecodable mapping row");
                continue;
            }
        };
        let ship_name = record.get(ship_idx).unwrap_or("").trim().to_string();
        if ship_name.is_empty() {
            continue;
        }
        let to = split_recipients(record.get(email_idx).unwrap_or(""));
        let mut cc = Vec::new();
        for &i in &cc_idx {
            cc.extend(split_recipients(record.get(i).unwrap_or("")));
        }
        entries.push(RecipientEntry { ship_name, to, cc });
    }
    Ok(entries)
}

pub fn recipients_for<'a>(
    entries: &'a [RecipientEntry],
    vessel: &str,
) -> Option<&'a RecipientEntry> {
    entries.iter().find(|e| e.ship_name == vessel)
}

/// Build one alert per failing vessel using the mapping. Vessels without a
/// usable address are collected in `skipped` instead of failing the batch.
pub fn build_bulk_alerts(
    failed: &ReportTable,
    entries: &[RecipientEntry],
    generated_at: DateTime<Utc>,
) -> Result<BulkBuild, ValidateError> {
    let mut build = BulkBuild::default();
    for vessel in failed.distinct(columns::SHIP_NAME) {
        let Some(entry) = recipients_for(entries, &vessel) else {
            build.skipped.push(format!("{}: no email found in mapping", vessel));
            continue;
        };
        if entry.to.is_empty() {
            build.skipped.push(format!("{}: email is empty", vessel));
            continue;
        }
        let message = build_vessel_alert(
            failed,
            &vessel,
            entry.to.clone(),
            entry.cc.clone(),
            generated_at,
        )?;
        build.alerts.push(VesselAlert { vessel, message });
    }
    Ok(build)
}
