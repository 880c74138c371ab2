//! Summary CSV artifacts and the per-session median table

use std::path::Path;

use navlog_stats::{median, AbComparison, SummaryStat};
use navlog_telemetry::{atomic_write, SessionTable};

use crate::error::ReportResult;

pub const SUMMARY_FILE: &str = "summary_metrics.csv";
pub const AB_SUMMARY_FILE: &str = "ab_prewarm_summary.csv";

/// Render a value for CSV output: rounded to three decimals, blank when undefined
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let rounded = (v * 1000.0).round() / 1000.0;
            // Avoid "-0"
            if rounded == 0.0 {
                "0".to_string()
            } else {
                rounded.to_string()
            }
        }
        _ => String::new(),
    }
}

fn csv_text(header: &[&str], rows: Vec<Vec<String>>) -> ReportResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `metric,median_ms,IQR_ms,CI95_low_ms,CI95_high_ms,n`
pub fn summary_csv(stats: &[SummaryStat]) -> ReportResult<String> {
    let rows = stats
        .iter()
        .map(|s| {
            vec![
                s.metric.clone(),
                format_value(s.median),
                format_value(s.iqr),
                format_value(s.ci_low),
                format_value(s.ci_high),
                s.n.to_string(),
            ]
        })
        .collect();
    csv_text(
        &["metric", "median_ms", "IQR_ms", "CI95_low_ms", "CI95_high_ms", "n"],
        rows,
    )
}

/// `cond,value` rows describing an A/B comparison
pub fn ab_csv(ab: &AbComparison) -> ReportResult<String> {
    let rows = [
        ("ON_median", Some(ab.on_median)),
        ("OFF_median", Some(ab.off_median)),
        ("ON-OFF_median", ab.diff_median),
        ("ON_vs_OFF_%change", ab.relative_change_pct),
        ("CI95_low", ab.ci_low),
        ("CI95_high", ab.ci_high),
    ]
    .into_iter()
    .map(|(cond, value)| vec![cond.to_string(), format_value(value)])
    .collect();
    csv_text(&["cond", "value"], rows)
}

pub fn write_summary(dir: &Path, stats: &[SummaryStat]) -> ReportResult<std::path::PathBuf> {
    let path = dir.join(SUMMARY_FILE);
    atomic_write(&path, summary_csv(stats)?.as_bytes())?;
    tracing::debug!(path = %path.display(), "summary written");
    Ok(path)
}

pub fn write_ab_summary(dir: &Path, ab: &AbComparison) -> ReportResult<std::path::PathBuf> {
    let path = dir.join(AB_SUMMARY_FILE);
    atomic_write(&path, ab_csv(ab)?.as_bytes())?;
    tracing::debug!(path = %path.display(), "A/B summary written");
    Ok(path)
}

/// One session's medians for a fixed list of metrics
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMedianRow {
    pub session: String,
    pub medians: Vec<Option<f64>>,
}

/// Per-session medians of `metrics`; cells without samples are `None`
pub fn session_median_rows(table: &SessionTable, metrics: &[&str]) -> Vec<SessionMedianRow> {
    table
        .sessions()
        .into_iter()
        .map(|session| SessionMedianRow {
            session: session.to_string(),
            medians: metrics
                .iter()
                .map(|m| median(&table.session_values(session, m)))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use navlog_stats::{AbComparison, SessionMedian};
    use navlog_telemetry::EventRecord;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(1100.0)), "1100");
        assert_eq!(format_value(Some(-47.61904761904762)), "-47.619");
        assert_eq!(format_value(Some(12.5)), "12.5");
        assert_eq!(format_value(Some(-0.0001)), "0");
        assert_eq!(format_value(None), "");
        assert_eq!(format_value(Some(f64::NAN)), "");
    }

    #[test]
    fn test_summary_csv_layout() {
        let stats = vec![
            SummaryStat {
                metric: "cold_start_ms".to_string(),
                median: Some(1100.0),
                iqr: Some(100.0),
                ci_low: Some(1000.0),
                ci_high: Some(1200.0),
                n: 3,
            },
            SummaryStat::undefined("reroute_latency_ms"),
        ];
        let text = summary_csv(&stats).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "metric,median_ms,IQR_ms,CI95_low_ms,CI95_high_ms,n");
        assert_eq!(lines[1], "cold_start_ms,1100,100,1000,1200,3");
        assert_eq!(lines[2], "reroute_latency_ms,,,,,0");
    }

    #[test]
    fn test_ab_csv_layout() {
        let ab = AbComparison {
            marker: "tts_prewarm_ms".to_string(),
            target: "tts_start_latency_ms".to_string(),
            sessions: vec![SessionMedian {
                session: "run_1.csv".to_string(),
                condition: navlog_stats::Condition::On,
                median: 110.0,
            }],
            on_median: 110.0,
            off_median: 210.0,
            diff_median: Some(-100.0),
            ci_low: Some(-120.0),
            ci_high: Some(-80.0),
            relative_change_pct: None,
        };
        let text = ab_csv(&ab).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "cond,value");
        assert_eq!(lines[1], "ON_median,110");
        assert_eq!(lines[4], "ON_vs_OFF_%change,");
        assert_eq!(lines[6], "CI95_high,-80");
    }

    #[test]
    fn test_write_summary_creates_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("charts");
        let path = write_summary(&dir, &[SummaryStat::undefined("warm_start_ms")]).unwrap();
        assert!(path.ends_with(SUMMARY_FILE));
        assert!(std::fs::read_to_string(path).unwrap().contains("warm_start_ms"));
    }

    #[test]
    fn test_session_median_rows() {
        let mut table = SessionTable::new();
        table.extend(
            "run_a.csv",
            [
                EventRecord::new("t", "cold_start_ms", "", "900"),
                EventRecord::new("t", "cold_start_ms", "", "1000"),
            ],
        );
        table.extend("run_b.csv", [EventRecord::new("t", "warm_start_ms", "", "300")]);

        let rows = session_median_rows(&table, &["cold_start_ms", "warm_start_ms"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].medians, vec![Some(950.0), None]);
        assert_eq!(rows[1].medians, vec![None, Some(300.0)]);
    }
}
