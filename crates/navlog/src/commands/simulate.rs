use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use navlog_core::{
    AnalysisConfig, NavSession, NoopHaptics, RouteModel, Settings, SimulatedSpeaker, StepOutcome,
};
use navlog_telemetry::{event_types, EventLog, Paths};

use crate::cli::SimulateArgs;
use crate::commands::{logs_dir, resolve_dir};

pub fn run(paths: &Paths, config: &AnalysisConfig, args: &SimulateArgs) -> anyhow::Result<()> {
    let logs = logs_dir(paths, config, args.logs.clone());
    let route_file = resolve_dir(args.route.clone(), None, paths.route_file());
    let route = RouteModel::load_or_demo(&route_file)
        .with_context(|| format!("failed to load route {}", route_file.display()))?;

    let options = SimulateOptions::from_args(args)?;
    let summary = simulate(&logs, &route, &options)?;

    println!("Session log: {}", summary.path.display());
    println!(
        "Steps announced: {}  reroute: {}  prewarm: {}",
        summary.steps_announced,
        summary
            .reroute_ms
            .map_or_else(|| "—".to_string(), |ms| format!("{ms} ms")),
        summary
            .prewarm_ms
            .map_or_else(|| "—".to_string(), |ms| format!("{ms} ms"))
    );
    Ok(())
}

/// Knobs of one simulated session
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub speaker: SimulatedSpeaker,
    /// Delay between process start and the first frame
    pub startup: Duration,
    /// Delay between tapping Start and the navigation screen
    pub screen_switch: Duration,
    pub prewarm: bool,
    /// Route computation time of the reroute, if one is triggered
    pub reroute: Option<Duration>,
    pub settings: Vec<(String, String)>,
    pub battery_start: Option<f64>,
    pub battery_end: Option<f64>,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            speaker: SimulatedSpeaker::default(),
            startup: Duration::from_millis(250),
            screen_switch: Duration::from_millis(60),
            prewarm: false,
            reroute: None,
            settings: Vec::new(),
            battery_start: None,
            battery_end: None,
        }
    }
}

impl SimulateOptions {
    pub fn from_args(args: &SimulateArgs) -> anyhow::Result<Self> {
        let settings = args
            .settings
            .iter()
            .map(|pair| parse_setting(pair))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut speaker = SimulatedSpeaker::default();
        speaker.utterance = Duration::from_millis(args.speech_ms);

        Ok(Self {
            speaker,
            prewarm: args.prewarm,
            reroute: args
                .reroute
                .then(|| Duration::from_millis(args.reroute_ms)),
            settings,
            battery_start: args.battery_start,
            battery_end: args.battery_end,
            ..Self::default()
        })
    }
}

fn parse_setting(pair: &str) -> anyhow::Result<(String, String)> {
    let Some((key, value)) = pair.split_once('=') else {
        anyhow::bail!("expected KEY=VALUE, got `{pair}`");
    };
    Ok((key.trim().to_string(), value.trim().to_string()))
}

#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub path: PathBuf,
    pub steps_announced: usize,
    pub prewarm_ms: Option<u64>,
    pub reroute_ms: Option<u64>,
}

/// Drive one session through `route`, logging into a new `run_*.csv` under `logs_dir`.
///
/// The sequence mirrors a manual test run: app start, optional settings and
/// prewarm, tap Start, step through the route (rerouting once at the midpoint
/// when requested), then arrival.
pub fn simulate(
    logs_dir: &Path,
    route: &RouteModel,
    options: &SimulateOptions,
) -> anyhow::Result<SimulationSummary> {
    let log = EventLog::create(logs_dir)?;

    std::thread::sleep(options.startup);
    log.log_ms(event_types::COLD_START_MS, "", log.elapsed_ms())?;
    if let Some(pct) = options.battery_start {
        log.log(event_types::BATTERY_START_PCT, "", &pct.to_string())?;
    }

    let mut settings = Settings::new();
    for (key, value) in &options.settings {
        settings
            .set_and_log(key, value, &log)
            .with_context(|| format!("cannot apply setting {key}={value}"))?;
    }

    let mut session = NavSession::new(
        route.steps.clone(),
        settings,
        &log,
        Box::new(options.speaker.clone()),
        Box::new(NoopHaptics),
    );

    let prewarm_ms = if options.prewarm {
        Some(session.prewarm()?)
    } else {
        None
    };

    let tap = Instant::now();
    log.log_event(event_types::CLICK_START_NAV)?;
    std::thread::sleep(options.screen_switch);
    log.log_ms(
        event_types::WARM_START_MS,
        "",
        tap.elapsed().as_millis() as u64,
    )?;

    let reroute_at = route.len() / 2;
    let mut reroute_ms = None;
    let mut steps_announced = 0usize;
    loop {
        if let Some(compute) = options.reroute {
            if reroute_ms.is_none() && steps_announced == reroute_at.max(1) {
                reroute_ms = Some(session.reroute(compute)?);
            }
        }
        let outcome = session.next_step()?;
        steps_announced += 1;
        if outcome == StepOutcome::Arrived {
            break;
        }
    }
    log.log_event(event_types::ARRIVED)?;

    if let Some(pct) = options.battery_end {
        log.log(event_types::BATTERY_END_PCT, "", &pct.to_string())?;
    }

    tracing::info!(
        session = %log.session_id(),
        steps = steps_announced,
        "simulated session complete"
    );
    Ok(SimulationSummary {
        path: log.path().to_path_buf(),
        steps_announced,
        prewarm_ms,
        reroute_ms,
    })
}
