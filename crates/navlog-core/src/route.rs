//! Static turn-by-turn route fixtures

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ConfigError;
use crate::types::StepKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub id: u32,
    #[serde(rename = "type", default)]
    pub kind: StepKind,
    pub text: String,
}

impl RouteStep {
    pub fn new(id: u32, kind: StepKind, text: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            text: text.into(),
        }
    }

    /// Label used for this step's events (`step_<id>`)
    pub fn label(&self) -> String {
        format!("step_{}", self.id)
    }
}

/// Route loaded from `{"steps": [{"id", "type", "text"}, ...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteModel {
    pub steps: Vec<RouteStep>,
}

impl RouteModel {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let route: Self = serde_json::from_str(&contents)?;
        if route.steps.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "route {} has no steps",
                path.display()
            )));
        }
        Ok(route)
    }

    /// Built-in demo route, used when no fixture file is present
    pub fn demo() -> Self {
        Self {
            steps: vec![
                RouteStep::new(1, StepKind::Forward, "Walk straight ahead for 20 metres along the corridor."),
                RouteStep::new(2, StepKind::Left, "Turn left at the lift lobby."),
                RouteStep::new(3, StepKind::Forward, "Continue past the information desk."),
                RouteStep::new(4, StepKind::Right, "Turn right towards Lecture Theatre 2."),
                RouteStep::new(5, StepKind::Arrive, "You have arrived at Lecture Theatre 2."),
            ],
        }
    }

    /// Load `path` if it exists, otherwise the demo route
    pub fn load_or_demo(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "route fixture not found, using demo route");
            Ok(Self::demo())
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
