use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use navlog_core::AnalysisConfig;

#[derive(Parser)]
#[command(name = "navlog")]
#[command(version)]
#[command(about = "Timing logs, statistics and acceptance checks for the navigation prototype")]
pub struct Cli {
    /// Analysis config (JSON); defaults to ./navlog.json when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a simulated navigation session and write its event log
    Simulate(SimulateArgs),

    /// Summary statistics, A/B comparison and charts over all session logs
    Analyze(AnalyzeArgs),

    /// Check the latest session's medians against the latency thresholds
    Accept {
        /// Directory holding run_*.csv logs
        #[arg(long)]
        logs: Option<PathBuf>,

        /// Print the verdicts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Per-session medians of the latency metrics
    Sessions {
        #[arg(long)]
        logs: Option<PathBuf>,
    },

    /// Score MARS and SUS questionnaires
    Surveys {
        /// Directory holding mars.csv and sus.csv
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output directory for charts
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Directory receiving the new run_*.csv
    #[arg(long)]
    pub logs: Option<PathBuf>,

    /// Route fixture; defaults to data/route.json, then the built-in route
    #[arg(long)]
    pub route: Option<PathBuf>,

    /// Warm the speech engine before navigating
    #[arg(long)]
    pub prewarm: bool,

    /// Trigger one reroute halfway through the route
    #[arg(long)]
    pub reroute: bool,

    /// Duration of one simulated utterance
    #[arg(long, default_value_t = 400)]
    pub speech_ms: u64,

    /// Simulated route computation time
    #[arg(long, default_value_t = 300)]
    pub reroute_ms: u64,

    /// Apply a setting before navigating, e.g. `contrast=high` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Battery level to record at session start
    #[arg(long)]
    pub battery_start: Option<f64>,

    /// Battery level to record on arrival
    #[arg(long)]
    pub battery_end: Option<f64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    #[arg(long)]
    pub logs: Option<PathBuf>,

    /// Output directory for summaries and charts
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Use every session for charts and robust stats instead of the latest
    #[arg(long)]
    pub all_sessions: bool,

    /// Bootstrap iterations
    #[arg(long)]
    pub n_boot: Option<usize>,

    /// Bootstrap seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Event type marking a session as ON
    #[arg(long)]
    pub marker: Option<String>,

    /// Metric compared between ON and OFF sessions
    #[arg(long)]
    pub target: Option<String>,
}

impl AnalyzeArgs {
    /// Apply the command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(n) = self.n_boot {
            config.n_boot = n;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(marker) = &self.marker {
            config.ab_marker = marker.clone();
        }
        if let Some(target) = &self.target {
            config.ab_target = target.clone();
        }
        if self.all_sessions {
            config.use_latest_only = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::try_parse_from(["navlog", "version"]);
        assert!(cli.is_ok());
        assert!(matches!(cli.unwrap().command, Commands::Version));
    }

    #[test]
    fn test_cli_parse_simulate() {
        let cli = Cli::try_parse_from([
            "navlog",
            "simulate",
            "--prewarm",
            "--speech-ms",
            "50",
            "--set",
            "contrast=high",
            "--set",
            "haptic_strength=strong",
        ])
        .unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("Expected Simulate command");
        };
        assert!(args.prewarm);
        assert!(!args.reroute);
        assert_eq!(args.speech_ms, 50);
        assert_eq!(args.reroute_ms, 300);
        assert_eq!(args.settings, vec!["contrast=high", "haptic_strength=strong"]);
    }

    #[test]
    fn test_cli_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["navlog", "accept", "--config", "alt.json", "--json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.json")));
        assert!(matches!(cli.command, Commands::Accept { json: true, .. }));
    }

    #[test]
    fn test_analyze_overrides() {
        let cli = Cli::try_parse_from([
            "navlog",
            "analyze",
            "--all-sessions",
            "--n-boot",
            "500",
            "--seed",
            "7",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("Expected Analyze command");
        };

        let mut config = AnalysisConfig::new();
        args.apply(&mut config);
        assert_eq!(config.n_boot, 500);
        assert_eq!(config.seed, 7);
        assert!(!config.use_latest_only);
        assert_eq!(config.ab_marker, "tts_prewarm_ms");
    }
}
