use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the validation pipeline.
///
/// Only structural problems become errors: an unreadable file, a table with
/// no header, a failed export. Row-level data issues (bad numbers, missing
/// cells, unparseable dates) are normalized away instead, so a single dirty
/// record never aborts a batch.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("failed to read report table {path:?}")]
    TableRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("report table {path:?} has no header row")]
    EmptyTable { path: PathBuf },

    #[error("failed to read {path:?}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write table {path:?}")]
    TableWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write {path:?}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path:?} is missing required column {column:?}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("invalid configuration in {path:?}: {message}")]
    Config { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_path() {
        let err = ValidateError::EmptyTable {
            path: PathBuf::from("noon.csv"),
        };
        assert!(err.to_string().contains("noon.csv"));

        let err = ValidateError::Config {
            path: PathBuf::from("validator.toml"),
            message: "missing [input] path".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("validator.toml"));
        assert!(msg.contains("missing [input] path"));
    }
}
