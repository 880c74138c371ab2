//! Threshold check of a session's latency medians

use serde::Serialize;

use navlog_core::Thresholds;
use navlog_telemetry::SessionTable;

use crate::percentile::median;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricVerdict {
    pub metric: String,
    pub median: Option<f64>,
    pub threshold: f64,
    /// `None` when the metric has no samples and was not evaluated
    pub passed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptanceReport {
    pub verdicts: Vec<MetricVerdict>,
}

impl AcceptanceReport {
    pub fn evaluated(&self) -> usize {
        self.verdicts.iter().filter(|v| v.passed.is_some()).count()
    }

    pub fn passed(&self) -> usize {
        self.verdicts
            .iter()
            .filter(|v| v.passed == Some(true))
            .count()
    }

    /// Fraction of evaluated metrics that met their threshold; 0 when none were evaluated
    pub fn ratio(&self) -> f64 {
        match self.evaluated() {
            0 => 0.0,
            n => self.passed() as f64 / n as f64,
        }
    }

    pub fn verdict(&self, metric: &str) -> Option<&MetricVerdict> {
        self.verdicts.iter().find(|v| v.metric == metric)
    }
}

/// Compare each metric's median in `table` against its threshold.
///
/// A metric passes when its median is at most the threshold. Metrics without
/// samples are reported but excluded from the ratio.
pub fn check_acceptance(table: &SessionTable, thresholds: &Thresholds) -> AcceptanceReport {
    let verdicts = thresholds
        .entries()
        .into_iter()
        .map(|(metric, threshold)| {
            let med = median(&table.values(metric));
            MetricVerdict {
                metric: metric.to_string(),
                median: med,
                threshold,
                passed: med.map(|m| m <= threshold),
            }
        })
        .collect();

    AcceptanceReport { verdicts }
}
