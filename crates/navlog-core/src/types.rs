//! Accessibility option enums and route step kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// Display contrast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contrast {
    #[default]
    Normal,
    High,
}

/// Text size; large text scales fonts by 1.3
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextScale {
    #[default]
    Normal,
    Large,
}

/// Haptic strength multiplier applied to vibration patterns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticStrength {
    Light,
    #[default]
    Normal,
    Strong,
}

/// Target user persona
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persona {
    #[default]
    Blind,
    LowVision,
}

impl Contrast {
    pub fn as_str(&self) -> &'static str {
        match self {
            Contrast::Normal => "normal",
            Contrast::High => "high",
        }
    }
}

impl TextScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextScale::Normal => "normal",
            TextScale::Large => "large",
        }
    }

    pub fn font_factor(&self) -> f64 {
        match self {
            TextScale::Normal => 1.0,
            TextScale::Large => 1.3,
        }
    }
}

impl HapticStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            HapticStrength::Light => "light",
            HapticStrength::Normal => "normal",
            HapticStrength::Strong => "strong",
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            HapticStrength::Light => 0.6,
            HapticStrength::Normal => 1.0,
            HapticStrength::Strong => 1.5,
        }
    }
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Blind => "blind",
            Persona::LowVision => "low-vision",
        }
    }
}

macro_rules! option_from_str {
    ($ty:ty, $key:literal, [$($text:literal => $variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($variant),)+
                    other => Err(ConfigError::InvalidOption {
                        key: $key.to_string(),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

option_from_str!(Contrast, "contrast", ["normal" => Contrast::Normal, "high" => Contrast::High]);
option_from_str!(TextScale, "textscale", ["normal" => TextScale::Normal, "large" => TextScale::Large]);
option_from_str!(HapticStrength, "haptic_strength", [
    "light" => HapticStrength::Light,
    "normal" => HapticStrength::Normal,
    "strong" => HapticStrength::Strong,
]);
option_from_str!(Persona, "persona", ["blind" => Persona::Blind, "low-vision" => Persona::LowVision]);

/// Kind of route step; selects the haptic pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepKind {
    #[default]
    Forward,
    Left,
    Right,
    Arrive,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Forward => "forward",
            StepKind::Left => "left",
            StepKind::Right => "right",
            StepKind::Arrive => "arrive",
        }
    }
}

// Unknown kinds fall back to the forward pattern
impl From<String> for StepKind {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => StepKind::Left,
            "right" => StepKind::Right,
            "arrive" => StepKind::Arrive,
            _ => StepKind::Forward,
        }
    }
}

impl From<StepKind> for String {
    fn from(kind: StepKind) -> Self {
        kind.as_str().to_string()
    }
}
