//! Combine many session logs into one table

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{TelemetryError, TelemetryResult};
use crate::io::read_event_log;
use crate::types::EventRecord;

/// An event tagged with the session it came from
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub session: String,
    pub event: EventRecord,
}

/// Events of one or more sessions, in load order
#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    rows: Vec<SessionEvent>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding a single session's events
    pub fn from_events(session: &str, events: impl IntoIterator<Item = EventRecord>) -> Self {
        let mut table = Self::new();
        table.extend(session, events);
        table
    }

    pub fn extend(&mut self, session: &str, events: impl IntoIterator<Item = EventRecord>) {
        self.rows.extend(events.into_iter().map(|event| SessionEvent {
            session: session.to_string(),
            event,
        }));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct session ids, sorted (file names sort chronologically)
    pub fn sessions(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.rows.iter().map(|r| r.session.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Copy of the table restricted to one session
    pub fn only_session(&self, session: &str) -> SessionTable {
        SessionTable {
            rows: self
                .rows
                .iter()
                .filter(|r| r.session == session)
                .cloned()
                .collect(),
        }
    }

    pub fn events<'a>(&'a self, event_type: &'a str) -> impl Iterator<Item = &'a SessionEvent> + 'a {
        self.rows
            .iter()
            .filter(move |r| r.event.event_type == event_type)
    }

    /// Numeric values of `event_type` across every session in the table
    pub fn values(&self, event_type: &str) -> Vec<f64> {
        self.events(event_type).filter_map(|r| r.event.value()).collect()
    }

    /// Numeric values of `event_type` within one session
    pub fn session_values(&self, session: &str, event_type: &str) -> Vec<f64> {
        self.events(event_type)
            .filter(|r| r.session == session)
            .filter_map(|r| r.event.value())
            .collect()
    }

    /// Whether `session` logged at least one `event_type` event
    pub fn session_has(&self, session: &str, event_type: &str) -> bool {
        self.events(event_type).any(|r| r.session == session)
    }

    /// Numeric values of `event_type` grouped by label
    pub fn values_by_label(&self, event_type: &str) -> BTreeMap<String, Vec<f64>> {
        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for row in self.events(event_type) {
            if let Some(v) = row.event.value() {
                groups.entry(row.event.label.clone()).or_default().push(v);
            }
        }
        groups
    }

    /// Last numeric value of `event_type`, in write order
    pub fn last_value(&self, event_type: &str) -> Option<f64> {
        self.events(event_type)
            .filter_map(|r| r.event.value())
            .last()
    }
}

/// A log file that was skipped while loading
#[derive(Debug, Clone, PartialEq)]
pub struct LoadWarning {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a multi-file load: the combined table plus per-file warnings
#[derive(Debug, Clone)]
pub struct LoadedSessions {
    pub table: SessionTable,
    /// Ids of every log that loaded, sorted, including logs with no rows
    pub sessions: Vec<String>,
    pub warnings: Vec<LoadWarning>,
}

impl LoadedSessions {
    /// Most recent loaded log, even when it holds no events yet
    pub fn latest_session(&self) -> Option<&str> {
        self.sessions.last().map(String::as_str)
    }
}

/// Load every log in `paths` into one table tagged by file name.
///
/// Files that cannot be read or parsed are skipped with a warning. Fails only
/// when `paths` is empty or no file could be read at all.
pub fn load_sessions(paths: &[PathBuf]) -> TelemetryResult<LoadedSessions> {
    let mut table = SessionTable::new();
    let mut sessions = Vec::new();
    let mut warnings = Vec::new();

    for path in paths {
        match read_event_log(path) {
            Ok(events) => {
                let id = session_id(path);
                table.extend(&id, events);
                sessions.push(id);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable log");
                warnings.push(LoadWarning {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if sessions.is_empty() {
        return Err(TelemetryError::NoUsableData(paths.len()));
    }
    sessions.sort_unstable();
    sessions.dedup();

    tracing::debug!(files = sessions.len(), rows = table.len(), "sessions loaded");
    Ok(LoadedSessions {
        table,
        sessions,
        warnings,
    })
}

fn session_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_log(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut content = String::from("ts,type,label,value_ms\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_skips_corrupt_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let a = write_log(
            temp.path(),
            "run_20250101_100000.csv",
            &["2025-01-01T10:00:00,cold_start_ms,,900"],
        );
        let corrupt = temp.path().join("run_20250101_110000.csv");
        std::fs::write(&corrupt, "garbage without a header\n1,2,3\n").unwrap();
        let b = write_log(
            temp.path(),
            "run_20250101_120000.csv",
            &[
                "2025-01-01T12:00:00,cold_start_ms,,1000",
                "2025-01-01T12:00:01,click_next,step_1,",
            ],
        );

        let loaded = load_sessions(&[a, corrupt.clone(), b]).unwrap();
        assert_eq!(loaded.table.len(), 3);
        assert_eq!(
            loaded.table.sessions(),
            vec!["run_20250101_100000.csv", "run_20250101_120000.csv"]
        );
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].path, corrupt);
    }

    #[test]
    fn test_header_only_log_is_still_the_latest() {
        let temp = tempfile::TempDir::new().unwrap();
        let older = write_log(
            temp.path(),
            "run_20250101_090000.csv",
            &["2025-01-01T09:00:00,cold_start_ms,,1000"],
        );
        let newest = write_log(temp.path(), "run_20250101_100000.csv", &[]);

        let loaded = load_sessions(&[older, newest]).unwrap();
        assert!(loaded.warnings.is_empty());
        assert_eq!(
            loaded.sessions,
            vec!["run_20250101_090000.csv", "run_20250101_100000.csv"]
        );
        assert_eq!(loaded.latest_session(), Some("run_20250101_100000.csv"));
        assert_eq!(loaded.table.sessions(), vec!["run_20250101_090000.csv"]);
        assert!(loaded
            .table
            .only_session("run_20250101_100000.csv")
            .is_empty());
    }

    #[test]
    fn test_load_empty_input_is_fatal() {
        let err = load_sessions(&[]).unwrap_err();
        assert!(matches!(err, TelemetryError::NoUsableData(0)));
    }

    #[test]
    fn test_load_all_unreadable_is_fatal() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("run_20250101_100000.csv");
        let err = load_sessions(&[missing]).unwrap_err();
        assert!(matches!(err, TelemetryError::NoUsableData(1)));
    }

    #[test]
    fn test_table_queries() {
        let temp = tempfile::TempDir::new().unwrap();
        let a = write_log(
            temp.path(),
            "run_20250101_100000.csv",
            &[
                "t1,tts_start_latency_ms,step_1,120",
                "t2,tts_start_latency_ms,step_2,140",
                "t3,tts_prewarm_ms,,55",
                "t4,battery_start_pct,,80",
                "t5,battery_start_pct,,78",
            ],
        );
        let b = write_log(
            temp.path(),
            "run_20250102_100000.csv",
            &["t1,tts_start_latency_ms,step_1,300"],
        );

        let loaded = load_sessions(&[a, b]).unwrap();
        assert_eq!(loaded.latest_session(), Some("run_20250102_100000.csv"));
        let table = loaded.table;
        assert_eq!(table.values("tts_start_latency_ms"), vec![120.0, 140.0, 300.0]);
        assert_eq!(
            table.session_values("run_20250101_100000.csv", "tts_start_latency_ms"),
            vec![120.0, 140.0]
        );
        assert!(table.session_has("run_20250101_100000.csv", "tts_prewarm_ms"));
        assert!(!table.session_has("run_20250102_100000.csv", "tts_prewarm_ms"));
        assert_eq!(table.last_value("battery_start_pct"), Some(78.0));

        let by_label = table.values_by_label("tts_start_latency_ms");
        assert_eq!(by_label["step_1"], vec![120.0, 300.0]);
        assert_eq!(by_label["step_2"], vec![140.0]);

        let latest = table.only_session("run_20250102_100000.csv");
        assert_eq!(latest.len(), 1);
    }
}
