//! Mini Arcade - five casual mini-games with level progression
//!
//! Core modules:
//! - `sim`: Deterministic game sessions (rules, physics, scoring)
//! - `host`: Screen flow and the single active session
//! - `progress`: Per-game unlock level and last scores
//! - `persistence`: Storage backends for progress
//! - `autoplay`: Scripted players for demo mode and the native runner
//! - `platform`: Logger setup, default storage, browser bindings

pub mod autoplay;
pub mod error;
pub mod host;
pub mod persistence;
pub mod platform;
pub mod progress;
pub mod settings;
pub mod sim;

pub use error::{HostError, StorageError};
pub use host::{Screen, SessionHost};
pub use progress::{ProgressRecord, ProgressStore};
pub use settings::{Ruleset, RulesetPreset, Settings};

/// Shared configuration constants
pub mod consts {
    /// Play area dimensions (every game uses the same canvas)
    pub const CANVAS_WIDTH: f32 = 700.0;
    pub const CANVAS_HEIGHT: f32 = 500.0;

    /// Fixed frame step (60 Hz display refresh)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Maximum frames delivered per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Levels per game
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 4;

    /// Delay between the finishing move and the completion report
    pub const COMPLETION_DELAY_MS: f64 = 1500.0;
}

/// Clamp a raw level number into the playable range
#[inline]
pub fn clamp_level(level: u8) -> u8 {
    level.clamp(consts::MIN_LEVEL, consts::MAX_LEVEL)
}
