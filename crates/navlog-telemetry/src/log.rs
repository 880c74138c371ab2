//! Append-only CSV event log for one session

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use chrono::{DateTime, Local};

use crate::error::TelemetryResult;
use crate::types::{EventRecord, LOG_HEADER};

const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Handle to one session's event log.
///
/// Every call to [`EventLog::log`] appends a row and flushes it, so the file is
/// complete even if the process is killed mid-session.
#[derive(Debug)]
pub struct EventLog {
    path: PathBuf,
    started_at: Instant,
    last_ts: Mutex<Option<DateTime<Local>>>,
}

impl EventLog {
    /// Create `dir/run_<YYYYmmdd_HHMMSS>.csv` and write the header
    pub fn create(dir: &Path) -> TelemetryResult<Self> {
        std::fs::create_dir_all(dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

        // Two sessions started within the same second get a zero-padded
        // suffix, which sorts after the unsuffixed name and in creation order.
        let mut attempt = 0usize;
        let (path, file) = loop {
            let name = if attempt == 0 {
                format!("run_{stamp}.csv")
            } else {
                format!("run_{stamp}_{attempt:03}.csv")
            };
            let path = dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        };

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(LOG_HEADER)?;
        writer.flush()?;

        tracing::info!(path = %path.display(), "event log created");
        Ok(Self::with_path(path))
    }

    /// Open an existing log for appending, writing the header if the file is new or empty
    pub fn open(path: &Path) -> TelemetryResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let is_empty = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
        if is_empty {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let mut writer = csv::Writer::from_writer(file);
            writer.write_record(LOG_HEADER)?;
            writer.flush()?;
        }
        Ok(Self::with_path(path.to_path_buf()))
    }

    fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            started_at: Instant::now(),
            last_ts: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Session file name, which doubles as the session identifier
    pub fn session_id(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Instant the log was opened; cold-start latency is measured from here
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Milliseconds elapsed since the log was opened
    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    /// Append one event row
    pub fn log(&self, event_type: &str, label: &str, value: &str) -> TelemetryResult<EventRecord> {
        let record = EventRecord::new(self.next_timestamp(), event_type, label, value);

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(&record)?;
        writer.flush()?;

        tracing::debug!(event = event_type, label, value, "logged");
        Ok(record)
    }

    /// Append a timed event
    pub fn log_ms(&self, event_type: &str, label: &str, ms: u64) -> TelemetryResult<EventRecord> {
        self.log(event_type, label, &ms.to_string())
    }

    /// Append an event without label or value (`click_next`, `arrived`, ...)
    pub fn log_event(&self, event_type: &str) -> TelemetryResult<EventRecord> {
        self.log(event_type, "", "")
    }

    /// Current local time, clamped so timestamps never go backwards within this log
    fn next_timestamp(&self) -> String {
        let now = Local::now();
        let mut last = self.last_ts.lock().unwrap_or_else(|e| e.into_inner());
        let ts = match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        *last = Some(ts);
        ts.format(TS_FORMAT).to_string()
    }
}
