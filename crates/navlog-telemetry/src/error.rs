//! Telemetry error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("No logs found in {0}. Run `navlog simulate` first.")]
    NoLogs(PathBuf),

    #[error("No usable data: none of {0} log file(s) could be read")]
    NoUsableData(usize),

    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("could not decode {path} (tried {tried})")]
    Decode { path: PathBuf, tried: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
