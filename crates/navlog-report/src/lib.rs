//! Report artifacts: summary CSVs and SVG charts

pub mod charts;
mod error;
mod summary;
mod svg;

pub use error::{ReportError, ReportResult};
pub use summary::{
    ab_csv, format_value, session_median_rows, summary_csv, write_ab_summary, write_summary,
    SessionMedianRow, AB_SUMMARY_FILE, SUMMARY_FILE,
};
pub use svg::{histogram, BarChart, Histogram};
