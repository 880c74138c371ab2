//! Event record types

use serde::{Deserialize, Serialize};

/// Header row of every event log
pub const LOG_HEADER: [&str; 4] = ["ts", "type", "label", "value_ms"];

/// Event type names written by the navigation session and read by the reports
pub mod event_types {
    pub const COLD_START_MS: &str = "cold_start_ms";
    pub const WARM_START_MS: &str = "warm_start_ms";
    pub const TTS_START_LATENCY_MS: &str = "tts_start_latency_ms";
    pub const REROUTE_LATENCY_MS: &str = "reroute_latency_ms";
    pub const TTS_PREWARM_MS: &str = "tts_prewarm_ms";
    pub const TTS_DONE_MS: &str = "tts_done_ms";
    pub const BATTERY_START_PCT: &str = "battery_start_pct";
    pub const BATTERY_END_PCT: &str = "battery_end_pct";

    pub const CLICK_START_NAV: &str = "click_start_nav";
    pub const CLICK_NEXT: &str = "click_next";
    pub const CLICK_REROUTE: &str = "click_reroute";
    pub const ARRIVED: &str = "arrived";

    /// Prefix of setting-change events (`settings_contrast`, ...)
    pub const SETTINGS_PREFIX: &str = "settings_";

    /// The four latency metrics that carry acceptance thresholds, in report order
    pub const LATENCY_METRICS: [&str; 4] = [
        COLD_START_MS,
        WARM_START_MS,
        TTS_START_LATENCY_MS,
        REROUTE_LATENCY_MS,
    ];
}

/// A single row of an event log.
///
/// `value_ms` is kept as written: timed events store milliseconds, battery
/// events store a percentage, and settings events store the new option name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub ts: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value_ms: String,
}

impl EventRecord {
    pub fn new(
        ts: impl Into<String>,
        event_type: impl Into<String>,
        label: impl Into<String>,
        value_ms: impl Into<String>,
    ) -> Self {
        Self {
            ts: ts.into(),
            event_type: event_type.into(),
            label: label.into(),
            value_ms: value_ms.into(),
        }
    }

    /// Numeric value of `value_ms`, or `None` when blank or not a finite number
    pub fn value(&self) -> Option<f64> {
        self.value_ms
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_coercion() {
        let timed = EventRecord::new("t", event_types::COLD_START_MS, "", "1234");
        assert_eq!(timed.value(), Some(1234.0));

        let blank = EventRecord::new("t", event_types::CLICK_NEXT, "step_1", "");
        assert_eq!(blank.value(), None);

        let setting = EventRecord::new("t", "settings_contrast", "", "high");
        assert_eq!(setting.value(), None);

        let nan = EventRecord::new("t", event_types::WARM_START_MS, "", "NaN");
        assert_eq!(nan.value(), None);
    }

    #[test]
    fn test_value_tolerates_whitespace_and_decimals() {
        let record = EventRecord::new("t", event_types::TTS_DONE_MS, "", " 401.5 ");
        assert_eq!(record.value(), Some(401.5));
    }
}
