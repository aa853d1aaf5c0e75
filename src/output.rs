use std::path::Path;

use serde::Serialize;
use tabled::builder::Builder;
use tabled::{settings::Style, Table, Tabled};

use crate::error::ValidateError;
use crate::types::ReportTable;
use crate::util::format_int;

/// Write a dynamic table as CSV, header first. An empty table still gets
/// its header row so downstream tooling sees the expected columns.
pub fn write_table_csv(path: &Path, table: &ReportTable) -> Result<(), ValidateError> {
    write_table_inner(path, table).map_err(|source| ValidateError::TableWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn write_table_inner(path: &Path, table: &ReportTable) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    write_records(&mut wtr, table)?;
    wtr.flush()?;
    Ok(())
}

/// Render a table to CSV bytes in memory, for attachments.
pub fn table_to_csv_bytes(table: &ReportTable) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    write_records(&mut wtr, table)?;
    wtr.into_inner().map_err(|e| e.into_error().into())
}

fn write_records<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    table: &ReportTable,
) -> Result<(), csv::Error> {
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ValidateError> {
    let s = serde_json::to_string_pretty(value).map_err(|source| ValidateError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, s).map_err(|source| ValidateError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_text(path: &Path, contents: &str) -> Result<(), ValidateError> {
    std::fs::write(path, contents).map_err(|source| ValidateError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), ValidateError> {
    std::fs::write(path, bytes).map_err(|source| ValidateError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Print the first `max_rows` of a table to the console as markdown.
pub fn preview_table(title: &str, table: &ReportTable, max_rows: usize) {
    println!("\n{}", title);
    if table.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(table.columns.clone());
    for row in table.rows.iter().take(max_rows) {
        builder.push_record(row.clone());
    }
    let rendered = builder.build().with(Style::markdown()).to_string();
    println!("{}", rendered);
    if table.len() > max_rows {
        println!("... and {} more rows", format_int(table.len() - max_rows));
    }
    println!();
}

pub fn preview_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ReportTable {
        let mut table = ReportTable::new(vec!["Ship Name".into(), "Reason".into()]);
        table.rows.push(vec!["Alpha".into(), "a; b".into()]);
        table
            .rows
            .push(vec!["Beta, the second".into(), String::new()]);
        table
    }

    #[test]
    fn csv_round_trips_including_quoted_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table_csv(&path, &sample_table()).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        assert_eq!(
            rdr.headers().unwrap().iter().collect::<Vec<_>>(),
            vec!["Ship Name", "Reason"]
        );
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "Beta, the second");
        assert_eq!(&rows[1][1], "");
    }

    #[test]
    fn empty_table_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let table = ReportTable::new(vec!["Ship Name".into(), "Reason".into()]);
        write_table_csv(&path, &table).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim_end(), "Ship Name,Reason");
    }

    #[test]
    fn csv_bytes_match_file_output() {
        let bytes = table_to_csv_bytes(&sample_table()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("Ship Name,Reason\n"));
        assert!(text.contains("\"Beta, the second\""));
    }

    #[test]
    fn json_is_pretty_and_parseable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let value = serde_json::json!({ "total_reports": 3, "failed": 1 });
        write_json(&path, &value).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["total_reports"], 3);
        assert!(text.contains('\n'));
    }
}
