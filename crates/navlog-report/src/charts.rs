//! Named charts built from the session table and survey scores.
//!
//! Each builder returns `None` when its input has nothing to draw, and the
//! emit functions skip those charts instead of writing empty figures.

use std::path::{Path, PathBuf};

use navlog_stats::surveys::{MarsScores, SusScores};
use navlog_stats::median;
use navlog_telemetry::{atomic_write, event_types, SessionTable};

use crate::error::ReportResult;
use crate::svg::{BarChart, Histogram};

pub const STARTUP_CHART: &str = "P1_startup.svg";
pub const TTS_CHART: &str = "P2_tts.svg";
pub const REROUTE_CHART: &str = "P3_reroute.svg";
pub const BATTERY_CHART: &str = "P4_battery.svg";
pub const MARS_CHART: &str = "P5_mars.svg";
pub const SUS_CHART: &str = "P6_sus.svg";
pub const PREWARM_CHART: &str = "P7_prewarm.svg";

/// A chart ready to be written under its file name
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Bars(BarChart),
    Hist(Histogram),
}

impl Chart {
    pub fn render(&self) -> String {
        match self {
            Chart::Bars(c) => c.render(),
            Chart::Hist(h) => h.render(),
        }
    }
}

/// Cold vs warm start medians
pub fn startup_chart(table: &SessionTable) -> Option<Chart> {
    let bars: Vec<(String, f64)> = [
        ("cold", event_types::COLD_START_MS),
        ("warm", event_types::WARM_START_MS),
    ]
    .into_iter()
    .filter_map(|(name, metric)| median(&table.values(metric)).map(|m| (name.to_string(), m)))
    .collect();
    if bars.is_empty() {
        return None;
    }
    Some(Chart::Bars(BarChart::new(
        "P1 Cold vs Warm (median ms)",
        "ms",
        bars,
    )))
}

/// TTS start latency median per step label, smallest first
pub fn tts_chart(table: &SessionTable) -> Option<Chart> {
    let mut bars: Vec<(String, f64)> = table
        .values_by_label(event_types::TTS_START_LATENCY_MS)
        .into_iter()
        .filter_map(|(label, values)| median(&values).map(|m| (label, m)))
        .collect();
    if bars.is_empty() {
        return None;
    }
    // Stable sort keeps label order for equal medians
    bars.sort_by(|a, b| a.1.total_cmp(&b.1));
    Some(Chart::Bars(BarChart::new(
        "P2 TTS Start Latency by Step (median ms)",
        "ms",
        bars,
    )))
}

fn value_histogram(table: &SessionTable, metric: &str, title: &str, bins: usize) -> Option<Chart> {
    let values = table.values(metric);
    if values.is_empty() {
        return None;
    }
    Some(Chart::Hist(Histogram::new(title, "ms", values, bins)))
}

pub fn reroute_chart(table: &SessionTable) -> Option<Chart> {
    value_histogram(
        table,
        event_types::REROUTE_LATENCY_MS,
        "P3 Reroute Latency Distribution",
        10,
    )
}

/// Last logged battery start and end percentage; both are required
pub fn battery_chart(table: &SessionTable) -> Option<Chart> {
    let start = table.last_value(event_types::BATTERY_START_PCT)?;
    let end = table.last_value(event_types::BATTERY_END_PCT)?;
    Some(Chart::Bars(
        BarChart::new(
            "P4 Battery % (session)",
            "%",
            vec![("start(%)".to_string(), start), ("end(%)".to_string(), end)],
        )
        .with_y_max(100.0),
    ))
}

pub fn prewarm_chart(table: &SessionTable) -> Option<Chart> {
    value_histogram(
        table,
        event_types::TTS_PREWARM_MS,
        "P7 TTS Prewarm (ms)",
        10,
    )
}

/// MARS subscale means on the 0-5 scale; undefined subscales are left out
pub fn mars_chart(scores: &MarsScores) -> Option<Chart> {
    let bars: Vec<(String, f64)> = scores
        .subscales()
        .into_iter()
        .filter_map(|(name, mean)| mean.map(|m| (name.to_string(), m)))
        .collect();
    if bars.is_empty() {
        return None;
    }
    Some(Chart::Bars(
        BarChart::new("P5 MARS subscales", "Mean (1-5)", bars).with_y_max(5.0),
    ))
}

pub fn sus_chart(scores: &SusScores) -> Option<Chart> {
    if scores.scores.is_empty() {
        return None;
    }
    Some(Chart::Hist(Histogram::new(
        "P6 SUS distribution",
        "SUS score (0-100)",
        scores.scores.clone(),
        5,
    )))
}

fn write_charts(
    dir: &Path,
    charts: Vec<(&'static str, Option<Chart>)>,
) -> ReportResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (name, chart) in charts {
        let Some(chart) = chart else {
            tracing::debug!(chart = name, "no data, skipped");
            continue;
        };
        let path = dir.join(name);
        atomic_write(&path, chart.render().as_bytes())?;
        written.push(path);
    }
    Ok(written)
}

/// Write P1-P4 and P7 for `table` into `dir`
pub fn emit_session_charts(table: &SessionTable, dir: &Path) -> ReportResult<Vec<PathBuf>> {
    write_charts(
        dir,
        vec![
            (STARTUP_CHART, startup_chart(table)),
            (TTS_CHART, tts_chart(table)),
            (REROUTE_CHART, reroute_chart(table)),
            (BATTERY_CHART, battery_chart(table)),
            (PREWARM_CHART, prewarm_chart(table)),
        ],
    )
}

/// Write P5 and P6 for whichever survey scores are available
pub fn emit_survey_charts(
    mars: Option<&MarsScores>,
    sus: Option<&SusScores>,
    dir: &Path,
) -> ReportResult<Vec<PathBuf>> {
    write_charts(
        dir,
        vec![
            (MARS_CHART, mars.and_then(mars_chart)),
            (SUS_CHART, sus.and_then(sus_chart)),
        ],
    )
}
