// Entry point and high-level CLI flow.
//
// - Option [1] loads the report table, runs every rule and prints a summary.
// - Option [2] exports the processed/failed tables and the JSON summary.
// - Option [3] builds per-vessel alert emails from a recipient mapping and
//   writes them to disk for review.
// - After exporting or building alerts, the user can choose to go back to
//   the menu or exit.
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use noon_validator::config::ValidatorConfig;
use noon_validator::engine::{self, ValidationOutcome};
use noon_validator::{loader, notify, output, util};

// Simple in-memory app state so a re-loaded, unchanged file does not get
// validated twice, and exports can run multiple times in a single session.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        config: ValidatorConfig::load(),
        last_fingerprint: None,
        outcome: None,
    })
});

struct AppState {
    config: ValidatorConfig,
    last_fingerprint: Option<String>,
    outcome: Option<ValidationOutcome>,
}

/// Read one menu selection after the shared "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Prompt for a path, falling back to `default` when the user just hits enter.
fn prompt_path(label: &str, default: &str) -> String {
    print!("{} [{}]: ", label, default);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    let trimmed = buf.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Ask the user whether to go back to the main menu after an export or
/// alert-building run.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Main Menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load the report table and validate it.
///
/// On success, the outcome is stored in `APP_STATE` together with a
/// fingerprint of the source bytes; loading the same unchanged file again
/// keeps the cached results instead of re-running the rules.
fn handle_load() {
    let (default_path, last_fingerprint) = {
        let state = APP_STATE.lock().unwrap();
        (
            state.config.input.path.clone(),
            state.last_fingerprint.clone(),
        )
    };

    let path = prompt_path("Report table path", &default_path);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Failed to read {}: {}\n", path, e);
            return;
        }
    };

    let fingerprint = util::content_fingerprint(&path, &bytes);
    if last_fingerprint.as_deref() == Some(fingerprint.as_str()) {
        debug!(%fingerprint, "Source fingerprint unchanged, reusing cached outcome");
        println!("File unchanged since last load. Keeping existing validation results.\n");
        return;
    }

    let (reports, load) = match loader::load_reports_from_bytes(&bytes, Path::new(&path)) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
            return;
        }
    };
    println!(
        "Processing reports... ({} rows loaded)",
        util::format_int(load.total_rows as i64)
    );
    if load.skipped_rows > 0 {
        println!(
            "Note: {} rows skipped due to parse errors.",
            util::format_int(load.skipped_rows as i64)
        );
    }

    let mut state = APP_STATE.lock().unwrap();
    let outcome = engine::validate(reports, &load, &state.config);
    println!(
        "Validation complete: {} passed, {} failed ({}% pass rate).",
        util::format_int(outcome.summary.passed as i64),
        util::format_int(outcome.summary.failed as i64),
        outcome.summary.pass_rate_pct
    );
    if !outcome.summary.reasons.is_empty() {
        println!("\nMost common failure reasons:");
        output::preview_rows(&outcome.summary.reasons, 5);
    }
    println!("");

    state.last_fingerprint = Some(fingerprint);
    state.outcome = Some(outcome);
}

/// Handle option [2]: export the processed table, the failure table and the
/// JSON summary, printing a Markdown preview of each table along the way.
fn handle_export() {
    let state = APP_STATE.lock().unwrap();
    let Some(outcome) = state.outcome.as_ref() else {
        println!("Error: No validation results. Please load the report table first (option 1).\n");
        return;
    };
    let export = &state.config.export;

    println!("Exporting validation results...");
    println!("Outputs saved to individual files...");

    if let Err(e) = output::write_table_csv(Path::new(&export.processed_csv), &outcome.processed) {
        eprintln!("Write error: {}", e);
    }
    output::preview_table("All Reports (Processed)", &outcome.processed, 2);
    println!("(Full table exported to {})\n", export.processed_csv);

    if let Err(e) = output::write_table_csv(Path::new(&export.failed_csv), &outcome.failed) {
        eprintln!("Write error: {}", e);
    }
    output::preview_table("Failed Validation", &outcome.failed, 2);
    println!("(Full table exported to {})\n", export.failed_csv);

    if let Err(e) = output::write_json(Path::new(&export.summary_json), &outcome.summary) {
        eprintln!("Write error: {}", e);
    }
    println!("Summary Stats ({}):", export.summary_json);
    println!(
        "{{\"total_reports\": {}, \"failed\": {}, \"pass_rate_pct\": {}}}\n",
        outcome.summary.total_reports, outcome.summary.failed, outcome.summary.pass_rate_pct
    );
}

/// Handle option [3]: build one alert email per failing vessel.
///
/// Each alert is written as an HTML body plus its CSV attachment so the
/// operator can review them before anything is sent.
fn handle_notify() {
    let state = APP_STATE.lock().unwrap();
    let Some(outcome) = state.outcome.as_ref() else {
        println!("Error: No validation results. Please load the report table first (option 1).\n");
        return;
    };
    if outcome.failed.is_empty() {
        println!("All reports passed validation. No alerts to build.\n");
        return;
    }

    let mapping_path = prompt_path("Recipient mapping CSV", "vessel_emails.csv");
    let entries = match notify::load_recipient_map(Path::new(&mapping_path)) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Failed to load mapping: {}\n", e);
            return;
        }
    };
    println!(
        "Loaded {} vessel contacts.\n",
        util::format_int(entries.len() as i64)
    );

    let build = match notify::build_bulk_alerts(&outcome.failed, &entries, Utc::now()) {
        Ok(build) => build,
        Err(e) => {
            eprintln!("Failed to build alerts: {}\n", e);
            return;
        }
    };
    for note in &build.skipped {
        println!("Skipped {}", note);
    }
    for alert in &build.alerts {
        let body_file = format!("Alert_{}.html", notify::safe_file_stem(&alert.vessel));
        if let Err(e) = output::write_text(Path::new(&body_file), &alert.message.html_body) {
            eprintln!("Write error: {}", e);
            continue;
        }
        if let Some(att) = &alert.message.attachment {
            if let Err(e) = output::write_bytes(Path::new(&att.filename), &att.bytes) {
                eprintln!("Write error: {}", e);
                continue;
            }
        }
        println!(
            "{}: alert for {} written to {}",
            alert.vessel,
            alert.message.to.join(", "),
            body_file
        );
    }
    println!("");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    loop {
        println!("Noon Report Validation:");
        println!("[1] Load & validate report table");
        println!("[2] Export validation results");
        println!("[3] Build vessel email alerts\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!("");
                handle_export();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                println!("");
                handle_notify();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2 or 3.\n");
            }
        }
    }
}
