//! Event log records, the CSV log sink, and the multi-session loader

mod error;
mod io;
mod loader;
mod log;
mod paths;
mod types;

pub use error::{TelemetryError, TelemetryResult};
pub use io::{atomic_write, parse_events, read_decoded, read_event_log, TextEncoding};
pub use loader::{load_sessions, LoadWarning, LoadedSessions, SessionEvent, SessionTable};
pub use log::EventLog;
pub use paths::{list_session_logs, Paths};
pub use types::{event_types, EventRecord, LOG_HEADER};
