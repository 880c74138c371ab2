use std::path::{Path, PathBuf};

use navlog_core::AnalysisConfig;
use navlog_report::charts::emit_survey_charts;
use navlog_stats::surveys::{load_mars, load_sus, MarsScores, SurveyOutcome, SusScores};
use navlog_telemetry::Paths;

use crate::commands::{fmt_opt, resolve_dir};

pub const MARS_FILE: &str = "mars.csv";
pub const SUS_FILE: &str = "sus.csv";

pub fn run(
    paths: &Paths,
    config: &AnalysisConfig,
    dir: Option<PathBuf>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let dir = resolve_dir(dir, config.surveys_dir.as_ref(), paths.surveys_dir());
    let out = resolve_dir(out, config.charts_dir.as_ref(), paths.charts_dir());

    let scored = score_surveys(&dir, &out)?;
    for line in &scored.messages {
        println!("{line}");
    }
    if scored.written.is_empty() {
        println!("[info] No survey results to chart.");
    } else {
        println!("Charts saved -> {}", out.display());
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct ScoredSurveys {
    pub mars: Option<MarsScores>,
    pub sus: Option<SusScores>,
    pub messages: Vec<String>,
    pub written: Vec<PathBuf>,
}

fn describe_skip<T>(name: &str, outcome: SurveyOutcome<T>, messages: &mut Vec<String>) -> Option<T> {
    match outcome {
        SurveyOutcome::Scored(scores) => Some(scores),
        SurveyOutcome::NotFound(path) => {
            messages.push(format!("[info] {} not found (skip {name}).", path.display()));
            None
        }
        SurveyOutcome::Unreadable { path, reason } => {
            messages.push(format!("[warn] could not read {}: {reason}", path.display()));
            None
        }
        SurveyOutcome::MissingHeaders { found, missing } => {
            messages.push(format!(
                "[warn] {name} file missing headers {missing:?}. Got: {found:?}"
            ));
            None
        }
    }
}

/// Score `mars.csv` and `sus.csv` in `dir` and chart whatever was scored into `out`
pub fn score_surveys(dir: &Path, out: &Path) -> anyhow::Result<ScoredSurveys> {
    let mut result = ScoredSurveys::default();

    result.mars = describe_skip("MARS", load_mars(&dir.join(MARS_FILE)), &mut result.messages);
    if let Some(m) = &result.mars {
        result.messages.push(format!(
            "[MARS] n={} (excluded {})  E={} F={} A={} I={} Overall={}",
            m.n,
            m.excluded,
            fmt_opt(m.engagement, 2),
            fmt_opt(m.functionality, 2),
            fmt_opt(m.aesthetics, 2),
            fmt_opt(m.information, 2),
            fmt_opt(m.overall, 2)
        ));
    }

    result.sus = describe_skip("SUS", load_sus(&dir.join(SUS_FILE)), &mut result.messages);
    if let Some(s) = &result.sus {
        result.messages.push(format!(
            "[SUS] n={} (excluded {})  mean={}",
            s.n(),
            s.excluded,
            fmt_opt(s.mean(), 1)
        ));
    }

    result.written = emit_survey_charts(result.mars.as_ref(), result.sus.as_ref(), out)?;
    Ok(result)
}
