use std::path::{Path, PathBuf};

use navlog_core::AnalysisConfig;
use navlog_report::charts::emit_session_charts;
use navlog_report::{session_median_rows, write_ab_summary, write_summary, SessionMedianRow};
use navlog_stats::{compare_ab, robust_stats, AbOutcome, Bootstrap, SummaryStat};
use navlog_telemetry::{event_types, Paths, SessionTable};

use crate::cli::AnalyzeArgs;
use crate::commands::sessions::build_table;
use crate::commands::{fmt_opt, load_logs, logs_dir, resolve_dir};

pub fn run(paths: &Paths, mut config: AnalysisConfig, args: &AnalyzeArgs) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let logs = logs_dir(paths, &config, args.logs.clone());
    let out = resolve_dir(args.out.clone(), config.charts_dir.as_ref(), paths.charts_dir());

    let analysis = analyze(&logs, &out, &config)?;
    println!("{}", build_report(&analysis));
    Ok(())
}

/// Which sessions the charts and robust stats were computed over
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    Latest(String),
    All(usize),
}

#[derive(Debug)]
pub struct Analysis {
    pub per_session: Vec<SessionMedianRow>,
    pub scope: Scope,
    pub stats: Vec<SummaryStat>,
    pub ab: AbOutcome,
    pub written: Vec<PathBuf>,
}

/// Run the full pipeline over the logs in `logs_dir`, writing artifacts to `out_dir`.
///
/// One bootstrap RNG is shared by the summary metrics (in their fixed order)
/// and then the A/B comparison, so reruns over the same logs are identical.
pub fn analyze(logs_dir: &Path, out_dir: &Path, config: &AnalysisConfig) -> anyhow::Result<Analysis> {
    let loaded = load_logs(logs_dir)?;
    let all = &loaded.table;

    let per_session = session_median_rows(all, &event_types::LATENCY_METRICS);

    let (scope, scoped): (Scope, SessionTable) = match loaded.latest_session() {
        Some(latest) if config.use_latest_only => {
            (Scope::Latest(latest.to_string()), all.only_session(latest))
        }
        _ => (Scope::All(loaded.sessions.len()), all.clone()),
    };

    let mut boot = Bootstrap::new(config.n_boot, config.seed);
    let stats: Vec<SummaryStat> = event_types::LATENCY_METRICS
        .iter()
        .map(|metric| robust_stats(metric, &scoped.values(metric), &mut boot))
        .collect();

    let mut written = emit_session_charts(&scoped, out_dir)?;
    written.push(write_summary(out_dir, &stats)?);

    let ab = compare_ab(all, &config.ab_marker, &config.ab_target, &mut boot);
    if let AbOutcome::Compared(cmp) = &ab {
        written.push(write_ab_summary(out_dir, cmp)?);
    }

    tracing::info!(
        sessions = loaded.sessions.len(),
        artifacts = written.len(),
        "analysis complete"
    );
    Ok(Analysis {
        per_session,
        scope,
        stats,
        ab,
        written,
    })
}

fn build_report(analysis: &Analysis) -> String {
    let mut sections = Vec::new();

    let table = format!(
        "=== Per-session medians (ms) ===\n{}",
        build_table(&analysis.per_session)
    );
    sections.push(table);

    sections.push(match &analysis.scope {
        Scope::Latest(session) => {
            format!("[info] Using latest session for charts & robust stats: {session}")
        }
        Scope::All(n) => format!("[info] Using all {n} sessions for charts & robust stats"),
    });

    let mut stats = String::from("=== Enhanced stats (median / IQR / 95% CI) ===");
    for s in &analysis.stats {
        stats.push_str(&format!(
            "\n{:<22} median {:>9}  IQR {:>8}  CI95 [{}, {}]  n={}",
            s.metric,
            fmt_opt(s.median, 1),
            fmt_opt(s.iqr, 1),
            fmt_opt(s.ci_low, 1),
            fmt_opt(s.ci_high, 1),
            s.n
        ));
    }
    sections.push(stats);

    sections.push(match &analysis.ab {
        AbOutcome::Insufficient {
            on_sessions,
            off_sessions,
        } => format!(
            "[info] A/B: need sessions with both ON and OFF to compare (ON={on_sessions}, OFF={off_sessions})."
        ),
        AbOutcome::Compared(ab) => {
            let change = match ab.relative_change_pct {
                Some(pct) => format!("{pct:+.1}%  (negative is better)"),
                None => "— (OFF median is zero)".to_string(),
            };
            format!(
                "=== A/B {} (per-session median of {}) ===\n\
                 ON  median: {:.1} ms over {} session(s)\n\
                 OFF median: {:.1} ms over {} session(s)\n\
                 Median difference (ON - OFF): {} ms  [95% CI {}, {}]\n\
                 Relative change: {}",
                ab.marker,
                ab.target,
                ab.on_median,
                ab.on_sessions(),
                ab.off_median,
                ab.off_sessions(),
                fmt_opt(ab.diff_median, 1),
                fmt_opt(ab.ci_low, 1),
                fmt_opt(ab.ci_high, 1),
                change
            )
        }
    });

    let saved: Vec<String> = analysis
        .written
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect();
    sections.push(format!("Saved:\n{}", saved.join("\n")));

    sections.join("\n\n")
}
