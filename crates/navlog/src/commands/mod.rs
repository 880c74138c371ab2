pub mod accept;
pub mod analyze;
pub mod sessions;
pub mod simulate;
pub mod surveys;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::Context;
use navlog_core::AnalysisConfig;
use navlog_telemetry::{list_session_logs, load_sessions, LoadedSessions, Paths, TelemetryError};

/// Explicit `--config` must exist; otherwise `navlog.json` is optional
pub fn load_config(paths: &Paths, explicit: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    match explicit {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => AnalysisConfig::load_or_default(&paths.config_file())
            .context("failed to load navlog.json"),
    }
}

/// Flag, then config, then the workspace default
pub fn resolve_dir(flag: Option<PathBuf>, configured: Option<&PathBuf>, default: PathBuf) -> PathBuf {
    flag.or_else(|| configured.cloned()).unwrap_or(default)
}

pub fn logs_dir(paths: &Paths, config: &AnalysisConfig, flag: Option<PathBuf>) -> PathBuf {
    resolve_dir(flag, config.logs_dir.as_ref(), paths.logs_dir())
}

/// Load every `run_*.csv` in `dir`; fails when there are none or none are readable
pub fn load_logs(dir: &Path) -> anyhow::Result<LoadedSessions> {
    let files = list_session_logs(dir)
        .with_context(|| format!("failed to list logs in {}", dir.display()))?;
    if files.is_empty() {
        return Err(TelemetryError::NoLogs(dir.to_path_buf()).into());
    }
    let loaded = load_sessions(&files)?;
    for warning in &loaded.warnings {
        println!("[warn] skip {}: {}", warning.path.display(), warning.reason);
    }
    Ok(loaded)
}

/// Console rendering of an optional value; undefined prints as `—`
pub fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => "—".to_string(),
    }
}
