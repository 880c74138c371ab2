//! CSV decoding with explicit encoding candidates, and atomic file writes

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, GBK, UTF_8, WINDOWS_1252};

use crate::error::{TelemetryError, TelemetryResult};
use crate::types::EventRecord;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encodings tried, in order, when reading CSV input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 with an optional byte-order mark, which is stripped
    Utf8Sig,
    Utf8,
    Windows1252,
    Gbk,
}

impl TextEncoding {
    pub const CANDIDATES: [TextEncoding; 4] = [
        TextEncoding::Utf8Sig,
        TextEncoding::Utf8,
        TextEncoding::Windows1252,
        TextEncoding::Gbk,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1252 => "cp1252",
            TextEncoding::Gbk => "gbk",
        }
    }

    fn encoding(&self) -> &'static Encoding {
        match self {
            TextEncoding::Utf8Sig | TextEncoding::Utf8 => UTF_8,
            TextEncoding::Windows1252 => WINDOWS_1252,
            TextEncoding::Gbk => GBK,
        }
    }

    /// Decode without replacement characters; `None` if the bytes are not valid
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        let body = match self {
            TextEncoding::Utf8Sig => bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
            _ => bytes,
        };
        self.encoding()
            .decode_without_bom_handling_and_without_replacement(body)
    }
}

/// Read `path` and hand its text to `parse`, trying each candidate encoding in
/// order. The first encoding that both decodes and parses wins.
///
/// When no encoding decodes the bytes the result is [`TelemetryError::Decode`];
/// when some decoded but none parsed, the last parse error is returned.
pub fn read_decoded<T, F>(path: &Path, mut parse: F) -> TelemetryResult<T>
where
    F: FnMut(&str) -> TelemetryResult<T>,
{
    let bytes = std::fs::read(path)?;
    let mut last_err = None;

    for encoding in TextEncoding::CANDIDATES {
        let Some(text) = encoding.decode(&bytes) else {
            continue;
        };
        match parse(&text) {
            Ok(value) => {
                tracing::debug!(path = %path.display(), encoding = encoding.name(), "decoded");
                return Ok(value);
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| TelemetryError::Decode {
        path: path.to_path_buf(),
        tried: TextEncoding::CANDIDATES
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>()
            .join(", "),
    }))
}

/// Parse event log text. Requires `ts` and `type` columns; ragged rows are errors.
pub fn parse_events(text: &str) -> TelemetryResult<Vec<EventRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    for required in ["ts", "type"] {
        if !headers.iter().any(|h| h == required) {
            return Err(TelemetryError::MissingColumn(required.to_string()));
        }
    }

    let mut records: Vec<EventRecord> = Vec::new();
    for row in reader.deserialize::<EventRecord>() {
        records.push(row?);
    }
    Ok(records)
}

/// Read one event log file
pub fn read_event_log(path: &Path) -> TelemetryResult<Vec<EventRecord>> {
    read_decoded(path, parse_events)
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}
