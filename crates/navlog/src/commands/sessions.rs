use std::path::Path;

use navlog_report::{session_median_rows, SessionMedianRow};
use navlog_telemetry::event_types;

use crate::commands::{fmt_opt, load_logs};

pub fn run(logs_dir: &Path) -> anyhow::Result<()> {
    let loaded = load_logs(logs_dir)?;
    let rows = session_median_rows(&loaded.table, &event_types::LATENCY_METRICS);
    println!("{}", build_table(&rows));
    Ok(())
}

pub(crate) fn build_table(rows: &[SessionMedianRow]) -> String {
    let mut lines = vec![format!(
        "{:<28}{}",
        "session",
        event_types::LATENCY_METRICS
            .iter()
            .map(|m| format!("{m:>22}"))
            .collect::<String>()
    )];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{:<28}{}",
            row.session,
            row.medians
                .iter()
                .map(|m| format!("{:>22}", fmt_opt(*m, 1)))
                .collect::<String>()
        )
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_layout() {
        let rows = vec![
            SessionMedianRow {
                session: "run_20250101_100000.csv".to_string(),
                medians: vec![Some(1100.0), None, Some(210.0), None],
            },
            SessionMedianRow {
                session: "run_20250101_110000.csv".to_string(),
                medians: vec![None, Some(400.0), None, Some(305.5)],
            },
        ];
        let table = build_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("session"));
        assert!(lines[0].contains("reroute_latency_ms"));
        assert!(lines[1].contains("1100.0"));
        assert!(lines[1].contains("—"));
        assert!(lines[2].contains("305.5"));
    }
}
