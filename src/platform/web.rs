//! JS bindings
//!
//! The page owns the canvas and the animation loop. It forwards elapsed time
//! and pointer events in canvas coordinates (700x500) and reads back the
//! screen state as JSON for drawing.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::host::{NextLevel, Screen, SessionHost};
use crate::progress::ProgressStore;
use crate::settings::{RulesetPreset, Settings};
use crate::sim::GameKind;

#[wasm_bindgen(start)]
pub fn start() {
    super::init_logging();
    log::info!("Mini Arcade loaded");
}

/// Arcade instance held by the page
#[wasm_bindgen]
pub struct WebArcade {
    host: SessionHost,
    settings: Settings,
}

#[wasm_bindgen]
impl WebArcade {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebArcade {
        let settings = Settings::load();
        let progress = ProgressStore::load(super::default_progress_backend());
        let seed = js_sys::Date::now() as u64;
        WebArcade {
            host: SessionHost::new(progress, &settings, seed),
            settings,
        }
    }

    /// Game ids in menu order
    pub fn games() -> js_sys::Array {
        GameKind::ALL
            .iter()
            .map(|kind| JsValue::from_str(kind.as_str()))
            .collect()
    }

    pub fn select_game(&mut self, id: &str) -> Result<(), JsValue> {
        let kind = GameKind::from_str(id)
            .ok_or_else(|| JsValue::from_str(&crate::HostError::UnknownGame(id.to_string()).to_string()))?;
        self.host.select_game(kind);
        Ok(())
    }

    /// Rejected levels return the message to show the player
    pub fn select_level(&mut self, level: u8) -> Result<(), JsValue> {
        self.host
            .select_level(level)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn is_level_unlocked(&self, id: &str, level: u8) -> bool {
        GameKind::from_str(id).is_some_and(|kind| self.host.progress().is_level_unlocked(kind, level))
    }

    pub fn instructions(&self) -> js_sys::Array {
        self.host
            .instructions()
            .iter()
            .map(|line| JsValue::from_str(line))
            .collect()
    }

    pub fn start_playing(&mut self) -> Result<(), JsValue> {
        self.host
            .start_playing()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Called from requestAnimationFrame with the time since the last call
    pub fn advance(&mut self, elapsed_ms: f32) {
        self.host.advance(elapsed_ms);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.host.pointer_down(Vec2::new(x, y));
    }

    pub fn pointer_drag(&mut self, x: f32, y: f32) {
        self.host.pointer_drag(Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.host.pointer_up(Vec2::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.host.pointer_move(Vec2::new(x, y));
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.host.toggle_pause()
    }

    /// Window lost focus
    pub fn on_blur(&mut self) {
        if self.settings.pause_on_blur && self.host.screen() == Screen::Playing && !self.host.is_paused() {
            self.host.toggle_pause();
        }
    }

    pub fn quit(&mut self) {
        self.host.quit();
    }

    pub fn back_to_menu(&mut self) {
        self.host.back_to_menu();
    }

    pub fn back_to_levels(&mut self) {
        self.host.back_to_levels();
    }

    pub fn retry_level(&mut self) -> Result<(), JsValue> {
        self.host
            .retry_level()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// False when the last level was just finished
    pub fn next_level(&mut self) -> Result<bool, JsValue> {
        match self.host.next_level() {
            Ok(NextLevel::Ready(_)) => Ok(true),
            Ok(NextLevel::AllComplete) => Ok(false),
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }

    /// Screen, selection and score as JSON
    pub fn status_json(&self) -> String {
        let (screen, final_score) = match self.host.screen() {
            Screen::Menu => ("menu", None),
            Screen::LevelSelect => ("levels", None),
            Screen::Instructions => ("instructions", None),
            Screen::Playing => ("playing", None),
            Screen::Complete { final_score } => ("complete", Some(final_score)),
        };
        let status = serde_json::json!({
            "screen": screen,
            "game": self.host.game().map(|k| k.as_str()),
            "level": self.host.level(),
            "score": self.host.live_score(),
            "final_score": final_score,
            "paused": self.host.is_paused(),
        });
        status.to_string()
    }

    /// Preset id ("standard" or "classic"); unknown ids are ignored
    pub fn set_preset(&mut self, id: &str) {
        let Some(preset) = RulesetPreset::from_str(id) else {
            log::warn!("Unknown rules preset '{id}'");
            return;
        };
        self.settings.preset = preset;
        self.settings.custom_rules = None;
        self.settings.save();
        self.host.apply_settings(&self.settings);
    }

    pub fn reset_progress(&mut self) {
        self.host.progress_mut().clear();
    }
}

impl Default for WebArcade {
    fn default() -> Self {
        Self::new()
    }
}
