//! Step-through navigation session that emits the timing events

use std::time::{Duration, Instant};

use navlog_telemetry::{event_types, EventLog, TelemetryError};

use crate::config::Settings;
use crate::route::RouteStep;
use crate::types::{HapticStrength, StepKind};

pub const REROUTE_PROMPT: &str = "Recalculating route, please return to the corridor and proceed.";

/// Speech output capability
pub trait Speaker {
    /// Speak `text`, calling `on_start` as soon as audio begins.
    /// Returns once the utterance has finished.
    fn speak(&mut self, text: &str, on_start: &mut dyn FnMut());

    /// Warm the speech engine with a minimal utterance
    fn prewarm(&mut self) {
        self.speak("Ready", &mut || {});
    }
}

/// Vibration capability; `pattern` is a list of pulse durations in ms
pub trait Haptics {
    fn vibrate(&mut self, pattern: &[u64]);
}

/// Haptics for hosts without a vibration motor
#[derive(Debug, Default)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn vibrate(&mut self, _pattern: &[u64]) {}
}

/// Speaker that sleeps instead of producing audio.
///
/// The engine start-up delay is `cold_delay` until the first utterance or
/// prewarm, and `warm_delay` afterwards.
#[derive(Debug, Clone)]
pub struct SimulatedSpeaker {
    pub cold_delay: Duration,
    pub warm_delay: Duration,
    pub utterance: Duration,
    warmed: bool,
}

impl SimulatedSpeaker {
    pub fn new(cold_delay: Duration, warm_delay: Duration, utterance: Duration) -> Self {
        Self {
            cold_delay,
            warm_delay,
            utterance,
            warmed: false,
        }
    }

    pub fn is_warm(&self) -> bool {
        self.warmed
    }
}

impl Default for SimulatedSpeaker {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(120),
            Duration::from_millis(20),
            Duration::from_millis(400),
        )
    }
}

impl Speaker for SimulatedSpeaker {
    fn speak(&mut self, _text: &str, on_start: &mut dyn FnMut()) {
        let delay = if self.warmed {
            self.warm_delay
        } else {
            self.cold_delay
        };
        std::thread::sleep(delay);
        self.warmed = true;
        on_start();
        std::thread::sleep(self.utterance);
    }

    fn prewarm(&mut self) {
        // Only the engine start-up cost, not a full utterance
        let delay = if self.warmed {
            self.warm_delay
        } else {
            self.cold_delay
        };
        std::thread::sleep(delay);
        self.warmed = true;
    }
}

/// Vibration pulses for a step kind, scaled by strength
pub fn haptic_pattern(kind: StepKind, strength: HapticStrength) -> Vec<u64> {
    let base: &[u64] = match kind {
        StepKind::Forward => &[200],
        StepKind::Left => &[120, 100, 120],
        StepKind::Right => &[300, 120, 300],
        StepKind::Arrive => &[600],
    };
    base.iter()
        .map(|&ms| (ms as f64 * strength.factor()) as u64)
        .collect()
}

/// What the navigation screen currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavView {
    pub text: String,
    pub step: usize,
    pub total: usize,
    /// Font multiplier from the text scale setting
    pub font_scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Arrived,
}

/// Walks a route one instruction at a time, logging latency events
pub struct NavSession<'a> {
    steps: Vec<RouteStep>,
    idx: usize,
    settings: Settings,
    log: &'a EventLog,
    speaker: Box<dyn Speaker + 'a>,
    haptics: Box<dyn Haptics + 'a>,
    view: NavView,
}

impl<'a> NavSession<'a> {
    pub fn new(
        steps: Vec<RouteStep>,
        settings: Settings,
        log: &'a EventLog,
        speaker: Box<dyn Speaker + 'a>,
        haptics: Box<dyn Haptics + 'a>,
    ) -> Self {
        let view = NavView {
            text: "Press 'Next Instruction' to begin.".to_string(),
            step: 0,
            total: steps.len(),
            font_scale: settings.text_scale.font_factor(),
        };
        Self {
            steps,
            idx: 0,
            settings,
            log,
            speaker,
            haptics,
            view,
        }
    }

    pub fn view(&self) -> &NavView {
        &self.view
    }

    pub fn position(&self) -> usize {
        self.idx
    }

    pub fn is_arrived(&self) -> bool {
        self.idx >= self.steps.len()
    }

    /// Announce the next instruction.
    ///
    /// Logs `click_next`, then `tts_start_latency_ms` (at least 1 ms) when
    /// speech starts and `tts_done_ms` when it ends.
    pub fn next_step(&mut self) -> Result<StepOutcome, TelemetryError> {
        if self.is_arrived() {
            return Ok(StepOutcome::Arrived);
        }
        let click = Instant::now();

        let step = self.steps[self.idx].clone();
        let label = step.label();
        self.view = NavView {
            text: step.text.clone(),
            step: self.idx + 1,
            total: self.steps.len(),
            font_scale: self.settings.text_scale.font_factor(),
        };
        self.log.log(event_types::CLICK_NEXT, &label, "")?;

        let log = self.log;
        let mut started: Option<Instant> = None;
        let mut start_logged: Result<(), TelemetryError> = Ok(());
        self.speaker.speak(&step.text, &mut || {
            let now = Instant::now();
            started = Some(now);
            let latency = (now.duration_since(click).as_millis() as u64).max(1);
            start_logged = log
                .log_ms(event_types::TTS_START_LATENCY_MS, &label, latency)
                .map(|_| ());
        });
        start_logged?;
        if let Some(t0) = started {
            let spoken = t0.elapsed().as_millis() as u64;
            self.log.log_ms(event_types::TTS_DONE_MS, &label, spoken)?;
        }

        self.haptics
            .vibrate(&haptic_pattern(step.kind, self.settings.haptic_strength));

        self.idx += 1;
        Ok(if self.is_arrived() {
            StepOutcome::Arrived
        } else {
            StepOutcome::Continue
        })
    }

    /// Simulate a reroute taking `compute`, then restart from the first step.
    ///
    /// Returns the logged `reroute_latency_ms`.
    pub fn reroute(&mut self, compute: Duration) -> Result<u64, TelemetryError> {
        let click = Instant::now();
        self.log.log_event(event_types::CLICK_REROUTE)?;
        std::thread::sleep(compute);
        let latency = click.elapsed().as_millis() as u64;
        self.log
            .log_ms(event_types::REROUTE_LATENCY_MS, "reroute", latency)?;

        self.idx = 0;
        self.view = NavView {
            text: REROUTE_PROMPT.to_string(),
            step: 0,
            total: self.steps.len(),
            font_scale: self.settings.text_scale.font_factor(),
        };
        self.speaker.speak(REROUTE_PROMPT, &mut || {});
        self.haptics.vibrate(&haptic_pattern(
            StepKind::Forward,
            self.settings.haptic_strength,
        ));
        Ok(latency)
    }

    /// Warm the speech engine and log how long it took as `tts_prewarm_ms`
    pub fn prewarm(&mut self) -> Result<u64, TelemetryError> {
        let t0 = Instant::now();
        self.speaker.prewarm();
        let ms = t0.elapsed().as_millis() as u64;
        self.log.log_ms(event_types::TTS_PREWARM_MS, "", ms)?;
        Ok(ms)
    }
}
