//! A/B comparison of a metric between sessions with and without a marker event

use serde::Serialize;
use std::fmt;

use navlog_telemetry::SessionTable;

use crate::percentile::median;
use crate::robust::{interval95, Bootstrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Condition {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::On => f.write_str("ON"),
            Condition::Off => f.write_str("OFF"),
        }
    }
}

/// Per-session median of the target metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMedian {
    pub session: String,
    pub condition: Condition,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbComparison {
    pub marker: String,
    pub target: String,
    pub sessions: Vec<SessionMedian>,
    /// Median of the ON group's per-session medians
    pub on_median: f64,
    pub off_median: f64,
    /// Median of the bootstrapped ON - OFF differences
    pub diff_median: Option<f64>,
    pub ci_low: Option<f64>,
    pub ci_high: Option<f64>,
    /// `(on / off - 1) * 100`; `None` when the OFF median is zero
    pub relative_change_pct: Option<f64>,
}

impl AbComparison {
    pub fn on_sessions(&self) -> usize {
        self.count(Condition::On)
    }

    pub fn off_sessions(&self) -> usize {
        self.count(Condition::Off)
    }

    fn count(&self, condition: Condition) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.condition == condition)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AbOutcome {
    /// One of the groups has no session with target values; nothing to compare
    Insufficient {
        on_sessions: usize,
        off_sessions: usize,
    },
    Compared(AbComparison),
}

/// Classify every session by `marker` and take the median of its `target` values.
/// Sessions without any `target` value are left out.
pub fn session_medians(table: &SessionTable, marker: &str, target: &str) -> Vec<SessionMedian> {
    table
        .sessions()
        .into_iter()
        .filter_map(|session| {
            let med = median(&table.session_values(session, target))?;
            let condition = if table.session_has(session, marker) {
                Condition::On
            } else {
                Condition::Off
            };
            Some(SessionMedian {
                session: session.to_string(),
                condition,
                median: med,
            })
        })
        .collect()
}

/// Compare `target` between sessions that logged `marker` (ON) and those that did not (OFF)
pub fn compare_ab(
    table: &SessionTable,
    marker: &str,
    target: &str,
    boot: &mut Bootstrap,
) -> AbOutcome {
    let sessions = session_medians(table, marker, target);
    let group = |condition: Condition| -> Vec<f64> {
        sessions
            .iter()
            .filter(|s| s.condition == condition)
            .map(|s| s.median)
            .collect()
    };
    let on = group(Condition::On);
    let off = group(Condition::Off);

    let (Some(on_median), Some(off_median)) = (median(&on), median(&off)) else {
        tracing::info!(
            on = on.len(),
            off = off.len(),
            "A/B comparison needs sessions in both groups"
        );
        return AbOutcome::Insufficient {
            on_sessions: on.len(),
            off_sessions: off.len(),
        };
    };

    let diffs = boot.median_differences(&on, &off);
    let diff_median = median(&diffs);
    let (ci_low, ci_high) = interval95(&diffs);

    let relative_change_pct = if off_median == 0.0 {
        None
    } else {
        Some((on_median / off_median - 1.0) * 100.0)
    };

    AbOutcome::Compared(AbComparison {
        marker: marker.to_string(),
        target: target.to_string(),
        sessions,
        on_median,
        off_median,
        diff_median,
        ci_low,
        ci_high,
        relative_change_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use navlog_telemetry::EventRecord;

    fn session(table: &mut SessionTable, name: &str, prewarm: bool, latencies: &[f64]) {
        let mut events = Vec::new();
        if prewarm {
            events.push(EventRecord::new("t0", "tts_prewarm_ms", "", "52"));
        }
        for v in latencies {
            events.push(EventRecord::new("t1", "tts_start_latency_ms", "step_1", v.to_string()));
        }
        table.extend(name, events);
    }

    #[test]
    fn test_prewarm_halves_latency() {
        let mut table = SessionTable::new();
        session(&mut table, "run_1.csv", true, &[100.0]);
        session(&mut table, "run_2.csv", true, &[120.0]);
        session(&mut table, "run_3.csv", false, &[200.0]);
        session(&mut table, "run_4.csv", false, &[220.0]);

        let outcome = compare_ab(
            &table,
            "tts_prewarm_ms",
            "tts_start_latency_ms",
            &mut Bootstrap::default(),
        );
        let AbOutcome::Compared(ab) = outcome else {
            panic!("expected comparison");
        };
        assert_eq!(ab.on_median, 110.0);
        assert_eq!(ab.off_median, 210.0);
        assert_eq!(ab.on_sessions(), 2);
        assert_eq!(ab.off_sessions(), 2);

        let rel = ab.relative_change_pct.unwrap();
        assert!((rel - (-47.619)).abs() < 0.01, "got {rel}");

        let (low, high) = (ab.ci_low.unwrap(), ab.ci_high.unwrap());
        assert!(low <= ab.diff_median.unwrap() && ab.diff_median.unwrap() <= high);
        assert!(high < 0.0);
    }

    #[test]
    fn test_single_group_is_insufficient() {
        let mut table = SessionTable::new();
        session(&mut table, "run_1.csv", false, &[200.0]);
        session(&mut table, "run_2.csv", false, &[240.0]);

        let outcome = compare_ab(
            &table,
            "tts_prewarm_ms",
            "tts_start_latency_ms",
            &mut Bootstrap::default(),
        );
        assert_eq!(
            outcome,
            AbOutcome::Insufficient {
                on_sessions: 0,
                off_sessions: 2
            }
        );
    }

    #[test]
    fn test_sessions_without_target_are_skipped() {
        let mut table = SessionTable::new();
        session(&mut table, "run_1.csv", true, &[]);
        session(&mut table, "run_2.csv", false, &[180.0, 200.0]);

        let medians = session_medians(&table, "tts_prewarm_ms", "tts_start_latency_ms");
        assert_eq!(medians.len(), 1);
        assert_eq!(medians[0].condition, Condition::Off);
        assert_eq!(medians[0].median, 190.0);

        let outcome = compare_ab(
            &table,
            "tts_prewarm_ms",
            "tts_start_latency_ms",
            &mut Bootstrap::default(),
        );
        assert!(matches!(outcome, AbOutcome::Insufficient { on_sessions: 0, .. }));
    }

    #[test]
    fn test_zero_off_median_gives_undefined_change() {
        let mut table = SessionTable::new();
        session(&mut table, "run_1.csv", true, &[15.0]);
        session(&mut table, "run_2.csv", false, &[0.0]);

        let outcome = compare_ab(
            &table,
            "tts_prewarm_ms",
            "tts_start_latency_ms",
            &mut Bootstrap::new(100, 1),
        );
        let AbOutcome::Compared(ab) = outcome else {
            panic!("expected comparison");
        };
        assert_eq!(ab.off_median, 0.0);
        assert_eq!(ab.relative_change_pct, None);
        assert_eq!(ab.diff_median, Some(15.0));
    }

    #[test]
    fn test_condition_display() {
        assert_eq!(Condition::On.to_string(), "ON");
        assert_eq!(Condition::Off.to_string(), "OFF");
    }
}
