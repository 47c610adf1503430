//! Game settings and scoring rules
//!
//! Persisted separately from progress in LocalStorage (web) or a JSON file (native).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::ReportPolicy;

/// Ruleset preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RulesetPreset {
    /// Current rules: no tracing penalties, gains-only counter
    #[default]
    Standard,
    /// First-release rules: tracing penalties, stricter basket motion
    Classic,
}

impl RulesetPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            RulesetPreset::Standard => "Standard",
            RulesetPreset::Classic => "Classic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "std" => Some(RulesetPreset::Standard),
            "classic" => Some(RulesetPreset::Classic),
            _ => None,
        }
    }

    pub fn ruleset(&self) -> Ruleset {
        match self {
            RulesetPreset::Standard => Ruleset::standard(),
            RulesetPreset::Classic => Ruleset::classic(),
        }
    }
}

/// When the toss basket slides back and forth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasketMotion {
    /// Moves while the ball rests; from level 3 it keeps moving mid-flight
    Escalating,
    /// Level 2+ only, and only while the ball rests
    RestingOnly,
}

/// Final score of a finished shape-matching round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeScoring {
    /// Final score is exactly the completion award
    Flat,
    /// Placement awards plus the completion award
    Additive,
}

/// How the tracing game pays out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceScoring {
    /// Points for distance along the path, topped up to the level award at the end
    Progress,
    /// +1 for every frame on the path; reaching the end adds nothing
    PerFrame,
}

/// Final score of a finished color-filling round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorScoring {
    /// Fill awards plus a completion bonus
    Bonus,
    /// Final score is exactly the completion award
    Flat,
}

/// Scoring and motion policies shared by the sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Points lost per frame the tracing cursor is off the path
    pub trace_off_path_penalty: u32,
    /// Points lost when releasing the pointer mid-trace
    pub trace_release_penalty: u32,
    pub trace_scoring: TraceScoring,
    /// Points lost for painting a region the wrong color
    pub color_wrong_penalty: u32,
    pub color_scoring: ColorScoring,
    pub basket_motion: BasketMotion,
    pub shape_scoring: ShapeScoring,
    pub report_policy: ReportPolicy,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::standard()
    }
}

impl Ruleset {
    /// Current rules
    pub fn standard() -> Self {
        Self {
            trace_off_path_penalty: 0,
            trace_release_penalty: 0,
            trace_scoring: TraceScoring::Progress,
            color_wrong_penalty: 0,
            color_scoring: ColorScoring::Bonus,
            basket_motion: BasketMotion::Escalating,
            shape_scoring: ShapeScoring::Flat,
            report_policy: ReportPolicy::PositiveOnly,
        }
    }

    /// First-release rules, every policy taken from that release
    pub fn classic() -> Self {
        Self {
            trace_off_path_penalty: 1,
            trace_release_penalty: 50,
            trace_scoring: TraceScoring::PerFrame,
            color_wrong_penalty: 20,
            color_scoring: ColorScoring::Flat,
            basket_motion: BasketMotion::RestingOnly,
            shape_scoring: ShapeScoring::Flat,
            report_policy: ReportPolicy::AllDeltas,
        }
    }
}

/// Player-facing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Selected rules preset
    pub preset: RulesetPreset,
    /// Individual overrides on top of the preset (None = use preset)
    #[serde(default)]
    pub custom_rules: Option<Ruleset>,
    /// Auto-pause when the page loses focus
    #[serde(default = "default_true")]
    pub pause_on_blur: bool,
    /// Fixed seed for generated layouts (None = fresh seed per session)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: RulesetPreset::Standard,
            custom_rules: None,
            pause_on_blur: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a preset
    pub fn from_preset(preset: RulesetPreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    /// Rules in effect (overrides win over the preset)
    pub fn ruleset(&self) -> Ruleset {
        self.custom_rules.unwrap_or_else(|| self.preset.ruleset())
    }

    /// Parse settings JSON; anything unreadable falls back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "mini_arcade_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
            log::info!("Settings saved");
        }
    }

    /// Load settings from a JSON file (native)
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(_) => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
