//! Session contract shared by the five games
//!
//! A session owns all mutable round state. It never touches the display or the
//! progress store: score changes and the terminal outcome leave as
//! [`SessionEvent`]s that the host drains after every call.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catch::CatchGame;
use super::color::ColorGame;
use super::shapes::ShapeGame;
use super::timer::Scheduler;
use super::toss::TossGame;
use super::trace::TraceGame;
use crate::settings::Ruleset;

/// The five games
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Trace,
    Catch,
    Color,
    Shapes,
    Basket,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Trace,
        GameKind::Catch,
        GameKind::Color,
        GameKind::Shapes,
        GameKind::Basket,
    ];

    /// Stable id used for storage keys and the web API
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Trace => "trace",
            GameKind::Catch => "catch",
            GameKind::Color => "color",
            GameKind::Shapes => "shapes",
            GameKind::Basket => "basket",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(GameKind::Trace),
            "catch" => Some(GameKind::Catch),
            "color" | "colour" => Some(GameKind::Color),
            "shapes" => Some(GameKind::Shapes),
            "basket" => Some(GameKind::Basket),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Trace => "✏️ Border Tracing",
            GameKind::Catch => "🎯 Object Catching",
            GameKind::Color => "🎨 Color Filling",
            GameKind::Shapes => "🔷 Shape Matching",
            GameKind::Basket => "🧺 Basket Toss",
        }
    }

    /// How-to-play lines shown before a round starts
    pub fn instructions(&self) -> &'static [&'static str] {
        match self {
            GameKind::Trace => &[
                "Press on the green circle to start",
                "Follow the dotted line to the red circle",
                "Stay inside the borders",
                "Higher levels have trickier, narrower paths",
            ],
            GameKind::Catch => &[
                "Move the basket left and right",
                "Catch the falling fruit",
                "Avoid the bombs!",
                "Higher levels are faster",
            ],
            GameKind::Color => &[
                "Pick a color from the palette at the bottom",
                "Press an area to fill it",
                "Match the sample colors",
                "Fill every area correctly to win",
            ],
            GameKind::Shapes => &[
                "Drag each shape onto its matching outline",
                "Match all shapes to win",
                "Higher levels have more shapes",
            ],
            GameKind::Basket => &[
                "Press the ball and drag back to aim",
                "Release to throw",
                "Land it in the basket!",
                "Higher levels have faster baskets",
            ],
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound notifications from a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Score changed by this many points
    Score(i32),
    /// Round is over; the only terminal signal a session sends
    Completed(u32),
}

/// Deferred work a session can queue on its own clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    ReportCompletion,
    ResetBall,
}

/// State every game carries regardless of its rules
#[derive(Debug, Clone)]
pub struct SessionCore {
    pub level: u8,
    /// Running score (may dip below zero in the catching game)
    pub score: i32,
    /// Session clock: sum of delivered frame time
    pub clock_ms: f64,
    /// Frames delivered so far
    pub frames: u64,
    active: bool,
    finished: bool,
    reported: bool,
    events: Vec<SessionEvent>,
    timers: Scheduler<SessionAction>,
}

impl SessionCore {
    pub fn new(level: u8) -> Self {
        Self {
            level: crate::clamp_level(level),
            score: 0,
            clock_ms: 0.0,
            frames: 0,
            active: true,
            finished: false,
            reported: false,
            events: Vec::new(),
            timers: Scheduler::new(),
        }
    }

    /// Change the score and tell the counter
    pub fn award(&mut self, points: i32) {
        if points == 0 {
            return;
        }
        self.score += points;
        self.emit_delta(points);
    }

    /// Tell the counter without touching the session score
    pub fn emit_delta(&mut self, points: i32) {
        log::debug!("score delta {points:+} (level {})", self.level);
        self.events.push(SessionEvent::Score(points));
    }

    /// Terminal condition reached: freeze and report after `delay_ms`
    pub fn finish(&mut self, delay_ms: f64) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.timers
            .schedule(self.clock_ms, delay_ms, SessionAction::ReportCompletion);
    }

    pub fn schedule(&mut self, delay_ms: f64, action: SessionAction) {
        self.timers.schedule(self.clock_ms, delay_ms, action);
    }

    /// Advance the clock one frame and run due actions.
    ///
    /// Completion reports are handled here; the remaining actions are handed
    /// back to the game.
    pub fn tick_clock(&mut self, dt_ms: f32) -> Vec<SessionAction> {
        if !self.active {
            return Vec::new();
        }
        self.clock_ms += dt_ms as f64;
        self.frames += 1;

        let mut rest = Vec::new();
        for action in self.timers.poll(self.clock_ms) {
            match action {
                SessionAction::ReportCompletion => self.report_completion(),
                other => rest.push(other),
            }
        }
        rest
    }

    fn report_completion(&mut self) {
        if self.reported || !self.active {
            return;
        }
        self.reported = true;
        let final_score = self.final_score();
        log::info!("Round complete at level {} with {final_score} points", self.level);
        self.events.push(SessionEvent::Completed(final_score));
    }

    /// Reported score, never negative
    pub fn final_score(&self) -> u32 {
        self.score.max(0) as u32
    }

    /// Still receiving frames and input
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Terminal condition reached (report may still be pending)
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Completion has been emitted
    pub fn is_reported(&self) -> bool {
        self.reported
    }

    /// Input is accepted only while the round is live
    pub fn accepts_input(&self) -> bool {
        self.active && !self.finished
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Stop the session: pending actions are dropped and nothing fires again
    pub fn teardown(&mut self) {
        self.active = false;
        self.timers.cancel();
        self.events.clear();
    }
}

/// Borrowed description of what to draw this frame
#[derive(Debug, Clone, Copy)]
pub enum SessionView<'a> {
    Trace(&'a TraceGame),
    Catch(&'a CatchGame),
    Color(&'a ColorGame),
    Shapes(&'a ShapeGame),
    Basket(&'a TossGame),
}

/// One active play-through driven by frames and pointer events
pub trait GameSession {
    fn kind(&self) -> GameKind;
    fn core(&self) -> &SessionCore;
    fn core_mut(&mut self) -> &mut SessionCore;

    /// Advance one display frame
    fn on_frame(&mut self, dt_ms: f32);
    fn pointer_down(&mut self, pos: Vec2);
    fn pointer_drag(&mut self, pos: Vec2);
    fn pointer_up(&mut self, pos: Vec2);
    /// Pointer moved without a button held
    fn pointer_move(&mut self, _pos: Vec2) {}

    fn view(&self) -> SessionView<'_>;

    fn level(&self) -> u8 {
        self.core().level
    }

    fn score(&self) -> i32 {
        self.core().score
    }

    fn is_completed(&self) -> bool {
        self.core().is_finished()
    }

    fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.core_mut().drain_events()
    }

    fn teardown(&mut self) {
        self.core_mut().teardown();
    }
}

/// Build a fresh session for `kind` at `level`
pub fn create_session(kind: GameKind, level: u8, seed: u64, rules: &Ruleset) -> Box<dyn GameSession> {
    log::info!("Creating {kind} session at level {level} (seed {seed})");
    match kind {
        GameKind::Trace => Box::new(TraceGame::new(level, seed, rules)),
        GameKind::Catch => Box::new(CatchGame::new(level, seed)),
        GameKind::Color => Box::new(ColorGame::new(level, seed, rules)),
        GameKind::Shapes => Box::new(ShapeGame::new(level, seed, rules)),
        GameKind::Basket => Box::new(TossGame::new(level, rules)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_kind_ids_roundtrip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_str(kind.as_str()), Some(kind));
            assert!(!kind.instructions().is_empty());
        }
        assert_eq!(GameKind::from_str("Colour"), Some(GameKind::Color));
        assert_eq!(GameKind::from_str("pong"), None);
        assert_eq!(serde_json::to_string(&GameKind::Shapes).unwrap(), "\"shapes\"");
    }

    #[test]
    fn test_completion_reported_once_after_delay() {
        let mut core = SessionCore::new(1);
        core.award(30);
        core.finish(100.0);
        core.finish(100.0);
        assert!(!core.accepts_input());

        core.tick_clock(60.0);
        assert_eq!(core.drain_events(), vec![SessionEvent::Score(30)]);
        core.tick_clock(60.0);
        assert_eq!(core.drain_events(), vec![SessionEvent::Completed(30)]);
        core.tick_clock(1000.0);
        assert!(core.drain_events().is_empty());
        assert!(core.is_reported());
    }

    #[test]
    fn test_final_score_clamped() {
        let mut core = SessionCore::new(2);
        core.award(-15);
        assert_eq!(core.score, -15);
        assert_eq!(core.final_score(), 0);
    }

    #[test]
    fn test_teardown_suppresses_pending_report() {
        let mut core = SessionCore::new(1);
        core.finish(1500.0);
        core.teardown();
        assert!(core.tick_clock(5000.0).is_empty());
        assert!(core.drain_events().is_empty());
        assert!(!core.is_reported());
    }

    #[test]
    fn test_level_clamped_into_range() {
        assert_eq!(SessionCore::new(0).level, 1);
        assert_eq!(SessionCore::new(9).level, 4);
    }

    #[test]
    fn test_factory_builds_every_kind() {
        for kind in GameKind::ALL {
            let session = create_session(kind, 2, 7, &Ruleset::standard());
            assert_eq!(session.kind(), kind);
            assert_eq!(session.level(), 2);
            assert_eq!(session.score(), 0);
            assert!(!session.is_completed());
        }
    }
}
