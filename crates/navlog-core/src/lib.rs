//! Configuration, route fixtures and the event-emitting navigation session

mod config;
mod nav;
mod route;
mod types;

pub use config::{AnalysisConfig, ConfigError, Settings, Thresholds};
pub use nav::{
    haptic_pattern, Haptics, NavSession, NavView, NoopHaptics, SimulatedSpeaker, Speaker,
    StepOutcome, REROUTE_PROMPT,
};
pub use route::{RouteModel, RouteStep};
pub use types::{Contrast, HapticStrength, Persona, StepKind, TextScale};
