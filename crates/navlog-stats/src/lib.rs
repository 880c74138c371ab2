//! Robust statistics over session logs: summaries, A/B comparison,
//! acceptance thresholds and survey scoring

mod ab;
mod acceptance;
mod percentile;
mod robust;
pub mod surveys;

pub use ab::{compare_ab, session_medians, AbComparison, AbOutcome, Condition, SessionMedian};
pub use acceptance::{check_acceptance, AcceptanceReport, MetricVerdict};
pub use percentile::{iqr, median, percentile, sorted_finite};
pub use robust::{robust_stats, Bootstrap, SummaryStat, DEFAULT_N_BOOT, DEFAULT_SEED};
