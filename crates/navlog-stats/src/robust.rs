//! Median, IQR and bootstrap confidence intervals for one metric

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::percentile::{iqr, percentile, sorted_finite};

pub const DEFAULT_N_BOOT: usize = 2000;
pub const DEFAULT_SEED: u64 = 42;

/// Robust summary of one metric in one scope.
///
/// Every statistic is `None` when the sample set is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStat {
    pub metric: String,
    pub median: Option<f64>,
    pub iqr: Option<f64>,
    pub ci_low: Option<f64>,
    pub ci_high: Option<f64>,
    pub n: usize,
}

impl SummaryStat {
    pub fn undefined(metric: &str) -> Self {
        Self {
            metric: metric.to_string(),
            median: None,
            iqr: None,
            ci_low: None,
            ci_high: None,
            n: 0,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.n > 0
    }
}

/// Seeded resampler shared by every bootstrap in a report run.
///
/// Draws happen in call order, so a run that computes the same statistics in
/// the same order reproduces its intervals exactly.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    n_boot: usize,
    rng: StdRng,
    scratch: Vec<f64>,
}

impl Bootstrap {
    pub fn new(n_boot: usize, seed: u64) -> Self {
        Self {
            n_boot,
            rng: StdRng::seed_from_u64(seed),
            scratch: Vec::new(),
        }
    }

    /// Median of one resample (with replacement, same size) of `values`
    pub fn resample_median(&mut self, values: &[f64]) -> f64 {
        self.scratch.clear();
        for _ in 0..values.len() {
            let idx = self.rng.gen_range(0..values.len());
            self.scratch.push(values[idx]);
        }
        self.scratch.sort_by(f64::total_cmp);
        percentile(&self.scratch, 50.0).unwrap_or(f64::NAN)
    }

    /// Medians of `n_boot` resamples of `values`
    pub fn medians(&mut self, values: &[f64]) -> Vec<f64> {
        if values.is_empty() {
            return Vec::new();
        }
        (0..self.n_boot).map(|_| self.resample_median(values)).collect()
    }

    /// `n_boot` draws of `median(on*) - median(off*)`, resampling each group independently
    pub fn median_differences(&mut self, on: &[f64], off: &[f64]) -> Vec<f64> {
        if on.is_empty() || off.is_empty() {
            return Vec::new();
        }
        (0..self.n_boot)
            .map(|_| {
                let on_med = self.resample_median(on);
                let off_med = self.resample_median(off);
                on_med - off_med
            })
            .collect()
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new(DEFAULT_N_BOOT, DEFAULT_SEED)
    }
}

/// 95% percentile interval `[p2.5, p97.5]` of bootstrap draws
pub(crate) fn interval95(draws: &[f64]) -> (Option<f64>, Option<f64>) {
    let sorted = sorted_finite(draws);
    (percentile(&sorted, 2.5), percentile(&sorted, 97.5))
}

/// Median, IQR and bootstrap 95% CI of `values`.
///
/// Non-finite values are dropped first. An empty sample set gives an
/// undefined summary with `n = 0` rather than an error.
pub fn robust_stats(metric: &str, values: &[f64], boot: &mut Bootstrap) -> SummaryStat {
    let sorted = sorted_finite(values);
    if sorted.is_empty() {
        return SummaryStat::undefined(metric);
    }

    let medians = boot.medians(&sorted);
    let (ci_low, ci_high) = interval95(&medians);

    SummaryStat {
        metric: metric.to_string(),
        median: percentile(&sorted, 50.0),
        iqr: iqr(&sorted),
        ci_low,
        ci_high,
        n: sorted.len(),
    }
}
