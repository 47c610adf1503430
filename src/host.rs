//! Screen flow and the single active session
//!
//! The host is the only owner of a running [`GameSession`]. It feeds the
//! session frames and pointer events, forwards score deltas to the reporter,
//! and on completion writes the result into the progress store.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::error::HostError;
use crate::progress::ProgressStore;
use crate::settings::{Ruleset, Settings};
use crate::sim::{GameKind, GameSession, ScoreCounter, ScoreReporter, SessionEvent, create_session};

/// Which screen the shell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    LevelSelect,
    Instructions,
    Playing,
    Complete { final_score: u32 },
}

/// Outcome of asking for the next level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextLevel {
    /// Instructions for this level are showing
    Ready(u8),
    /// The last level was already done; back at the menu
    AllComplete,
}

/// Owns the screen state, the progress store and at most one session
pub struct SessionHost<R: ScoreReporter = ScoreCounter> {
    progress: ProgressStore,
    reporter: R,
    rules: Ruleset,
    screen: Screen,
    game: Option<GameKind>,
    level: u8,
    session: Option<Box<dyn GameSession>>,
    paused: bool,
    /// Unconsumed frame time (ms)
    accumulator: f32,
    /// Seeds for new sessions
    seeds: Pcg32,
    fixed_seed: Option<u64>,
}

impl SessionHost<ScoreCounter> {
    /// Host with the built-in live counter
    pub fn new(progress: ProgressStore, settings: &Settings, seed: u64) -> Self {
        let counter = ScoreCounter::new(settings.ruleset().report_policy);
        Self::with_reporter(progress, settings, seed, counter)
    }

    /// Value on the in-game score display
    pub fn live_score(&self) -> i64 {
        self.reporter.total()
    }
}

impl<R: ScoreReporter> SessionHost<R> {
    pub fn with_reporter(progress: ProgressStore, settings: &Settings, seed: u64, reporter: R) -> Self {
        Self {
            progress,
            reporter,
            rules: settings.ruleset(),
            screen: Screen::Menu,
            game: None,
            level: MIN_LEVEL,
            session: None,
            paused: false,
            accumulator: 0.0,
            seeds: Pcg32::seed_from_u64(seed),
            fixed_seed: settings.seed,
        }
    }

    /// Switch rules; takes effect from the next session
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.rules = settings.ruleset();
        self.fixed_seed = settings.seed;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn game(&self) -> Option<GameKind> {
        self.game
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn session(&self) -> Option<&dyn GameSession> {
        self.session.as_deref()
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressStore {
        &mut self.progress
    }

    /// Instruction lines for the selected game
    pub fn instructions(&self) -> &'static [&'static str] {
        self.game.map(|kind| kind.instructions()).unwrap_or(&[])
    }

    /// Pick a game and show its level list
    pub fn select_game(&mut self, kind: GameKind) {
        self.dispose_session();
        log::info!("Selected {}", kind.title());
        self.game = Some(kind);
        self.screen = Screen::LevelSelect;
    }

    /// Pick a level; locked levels are rejected without changing anything
    pub fn select_level(&mut self, level: u8) -> Result<(), HostError> {
        let kind = self.game.ok_or(HostError::NoGameSelected)?;
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(HostError::LevelOutOfRange(level));
        }
        if !self.progress.is_level_unlocked(kind, level) {
            log::info!("{kind} level {level} is locked");
            return Err(HostError::LevelLocked { kind, level });
        }
        self.level = level;
        self.screen = Screen::Instructions;
        Ok(())
    }

    /// Leave the instructions and start a fresh session
    pub fn start_playing(&mut self) -> Result<(), HostError> {
        let kind = self.game.ok_or(HostError::NoGameSelected)?;
        self.dispose_session();

        let seed = self.fixed_seed.unwrap_or_else(|| self.seeds.random());
        self.reporter.set_policy(self.rules.report_policy);
        self.reporter.reset();
        self.session = Some(create_session(kind, self.level, seed, &self.rules));
        self.paused = false;
        self.accumulator = 0.0;
        self.screen = Screen::Playing;
        Ok(())
    }

    /// Feed wall-clock time; delivers whole frames at the fixed step
    pub fn advance(&mut self, elapsed_ms: f32) {
        if self.screen != Screen::Playing || self.paused {
            return;
        }
        // Long stalls (tab in background) are not replayed
        self.accumulator += elapsed_ms.clamp(0.0, 100.0);

        let mut substeps = 0;
        while self.accumulator >= FRAME_MS && substeps < MAX_SUBSTEPS {
            self.frame();
            self.accumulator -= FRAME_MS;
            substeps += 1;
            if self.screen != Screen::Playing {
                self.accumulator = 0.0;
                break;
            }
        }
    }

    /// Deliver exactly one frame
    pub fn frame(&mut self) {
        if self.screen != Screen::Playing || self.paused {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.on_frame(FRAME_MS);
        }
        self.pump_events();
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.relay(|s| s.pointer_down(pos));
    }

    pub fn pointer_drag(&mut self, pos: Vec2) {
        self.relay(|s| s.pointer_drag(pos));
    }

    pub fn pointer_up(&mut self, pos: Vec2) {
        self.relay(|s| s.pointer_up(pos));
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.relay(|s| s.pointer_move(pos));
    }

    fn relay(&mut self, f: impl FnOnce(&mut dyn GameSession)) {
        if self.screen != Screen::Playing || self.paused {
            return;
        }
        if let Some(session) = self.session.as_deref_mut() {
            f(session);
        }
        self.pump_events();
    }

    /// Forward session events; completion ends the session
    fn pump_events(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for event in session.drain_events() {
            match event {
                SessionEvent::Score(points) => self.reporter.report_delta(points),
                SessionEvent::Completed(final_score) => {
                    self.end_session(final_score);
                    return;
                }
            }
        }
    }

    /// Tear down the session, record the result, show the completion screen
    pub fn end_session(&mut self, final_score: u32) {
        self.dispose_session();
        if let Some(kind) = self.game {
            self.progress.record_completion(kind, self.level, final_score);
        }
        self.screen = Screen::Complete { final_score };
    }

    /// Pause or resume; returns the new paused state
    pub fn toggle_pause(&mut self) -> bool {
        if self.screen == Screen::Playing {
            self.paused = !self.paused;
            log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        }
        self.paused
    }

    /// Abandon the round without recording anything
    pub fn quit(&mut self) {
        if self.session.is_some() {
            log::info!("Quit {:?} level {}", self.game, self.level);
        }
        self.back_to_menu();
    }

    pub fn back_to_menu(&mut self) {
        self.dispose_session();
        self.game = None;
        self.screen = Screen::Menu;
    }

    pub fn back_to_levels(&mut self) {
        self.dispose_session();
        self.screen = if self.game.is_some() {
            Screen::LevelSelect
        } else {
            Screen::Menu
        };
    }

    /// Play the same level again
    pub fn retry_level(&mut self) -> Result<(), HostError> {
        self.game.ok_or(HostError::NoGameSelected)?;
        self.dispose_session();
        self.screen = Screen::Instructions;
        Ok(())
    }

    /// Move on to the following level, or back to the menu after the last one
    pub fn next_level(&mut self) -> Result<NextLevel, HostError> {
        if self.level >= MAX_LEVEL {
            log::info!("Every level of {:?} completed", self.game);
            self.back_to_menu();
            return Ok(NextLevel::AllComplete);
        }
        self.dispose_session();
        self.select_level(self.level + 1)?;
        Ok(NextLevel::Ready(self.level))
    }

    fn dispose_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.teardown();
        }
        self.paused = false;
        self.accumulator = 0.0;
    }
}
