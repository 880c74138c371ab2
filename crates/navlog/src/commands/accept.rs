use std::path::Path;

use navlog_core::AnalysisConfig;
use navlog_stats::{check_acceptance, AcceptanceReport};

use crate::commands::{fmt_opt, load_logs};

pub fn run(logs_dir: &Path, config: &AnalysisConfig, json: bool) -> anyhow::Result<()> {
    let (session, report) = evaluate(logs_dir, config)?;
    if json {
        let output = serde_json::json!({
            "session": session,
            "verdicts": report.verdicts,
            "passed": report.passed(),
            "evaluated": report.evaluated(),
            "ratio": report.ratio(),
        });
        println!("{output}");
    } else {
        println!("{}", build_report(&session, &report));
    }
    Ok(())
}

/// Acceptance verdicts for the most recent readable session.
///
/// A latest log without events reports every metric as missing.
pub fn evaluate(logs_dir: &Path, config: &AnalysisConfig) -> anyhow::Result<(String, AcceptanceReport)> {
    let loaded = load_logs(logs_dir)?;
    let Some(latest) = loaded.latest_session() else {
        anyhow::bail!("no readable logs in {}", logs_dir.display());
    };
    let report = check_acceptance(&loaded.table.only_session(latest), &config.thresholds);
    Ok((latest.to_string(), report))
}

fn build_report(session: &str, report: &AcceptanceReport) -> String {
    let mut lines = vec![
        format!("Session: {session}"),
        "=== Medians (ms) ===".to_string(),
    ];
    for v in &report.verdicts {
        lines.push(format!("{:<22}{:>10}", v.metric, fmt_opt(v.median, 1)));
    }

    lines.push("=== Threshold Check ===".to_string());
    for v in &report.verdicts {
        let status = match v.passed {
            Some(true) => "PASS",
            Some(false) => "FAIL",
            None => "missing",
        };
        lines.push(format!("{:<22}<= {:<8}{status}", v.metric, v.threshold));
    }

    lines.push(format!(
        "Acceptance: {:.0}% of targets met ({}/{})",
        report.ratio() * 100.0,
        report.passed(),
        report.evaluated()
    ));
    lines.join("\n")
}
