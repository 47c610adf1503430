//! Border tracing: follow a wavy path from the green dot to the red dot
//!
//! Progress along the path only moves forward. Each frame the pointer is
//! projected onto the part of the path at or ahead of the current position,
//! so dragging backward never changes anything.

use std::cmp::Ordering;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::{Projection, distance_to_segment, project_onto_segment};
use super::session::{GameKind, GameSession, SessionCore, SessionView};
use crate::consts::*;
use crate::settings::{Ruleset, TraceScoring};

/// Horizontal inset of the path endpoints
pub const EDGE_INSET: f32 = 50.0;
/// Press radius around the start point
pub const START_RADIUS: f32 = 30.0;
/// Reach radius around the end point (per-frame scoring)
pub const END_RADIUS: f32 = 30.0;
/// Progress on the final segment that counts as reaching the end
pub const FINISH_PROGRESS: f32 = 0.95;
/// Points per unit of path progress (one unit = one segment)
const PROGRESS_POINTS: f32 = 10.0;

/// Band width for a level
pub fn path_width(level: u8) -> f32 {
    (40.0 - 5.0 * level as f32).max(20.0)
}

/// Award for finishing the path
pub fn completion_score(level: u8) -> i32 {
    500 + 100 * level as i32
}

/// Tracing state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracePhase {
    /// Waiting for a press on the start point
    Idle,
    Tracing,
    Completed,
}

/// Position along the path: segment index plus fraction through it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TraceProgress {
    pub segment: usize,
    pub progress: f32,
}

impl TraceProgress {
    /// Continuous position in segments
    pub fn position(&self) -> f32 {
        self.segment as f32 + self.progress
    }
}

impl PartialOrd for TraceProgress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.segment.cmp(&other.segment) {
            Ordering::Equal => self.progress.partial_cmp(&other.progress),
            ord => Some(ord),
        }
    }
}

/// Generate the polyline for a level: `5 + 2*level` points, flat endpoints,
/// sinusoidal interior whose amplitude grows with level
pub fn generate_path(level: u8, rng: &mut impl Rng) -> Vec<Vec2> {
    let count = 5 + 2 * level as usize;
    let mid_y = CANVAS_HEIGHT / 2.0;
    let step = (CANVAS_WIDTH - 2.0 * EDGE_INSET) / (count - 1) as f32;
    let amplitude = 40.0 + 25.0 * level as f32;
    let frequency = 0.9 + 0.15 * level as f32;
    let phase = rng.random_range(0.0..TAU);

    (0..count)
        .map(|i| {
            let x = EDGE_INSET + step * i as f32;
            let y = if i == 0 || i == count - 1 {
                mid_y
            } else {
                mid_y + amplitude * (phase + frequency * i as f32).sin()
            };
            Vec2::new(x, y)
        })
        .collect()
}

/// Border tracing session
#[derive(Debug, Clone)]
pub struct TraceGame {
    pub core: SessionCore,
    pub path: Vec<Vec2>,
    pub path_width: f32,
    pub phase: TracePhase,
    pub progress: TraceProgress,
    /// Last known pointer position
    pub pointer: Vec2,
    /// Whether the pointer was inside the band on the last traced frame
    pub on_path: bool,
    /// Highest progress score already paid out
    progress_awarded: i32,
    off_path_penalty: u32,
    release_penalty: u32,
    scoring: TraceScoring,
}

impl TraceGame {
    pub fn new(level: u8, seed: u64, rules: &Ruleset) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let core = SessionCore::new(level);
        let path = generate_path(core.level, &mut rng);
        Self::with_path(core, path, rules)
    }

    /// Session over a fixed path
    pub fn with_path(core: SessionCore, path: Vec<Vec2>, rules: &Ruleset) -> Self {
        let path_width = path_width(core.level);
        let pointer = path.first().copied().unwrap_or(Vec2::ZERO);
        Self {
            core,
            path,
            path_width,
            phase: TracePhase::Idle,
            progress: TraceProgress::default(),
            pointer,
            on_path: true,
            progress_awarded: 0,
            off_path_penalty: rules.trace_off_path_penalty,
            release_penalty: rules.trace_release_penalty,
            scoring: rules.trace_scoring,
        }
    }

    pub fn start_point(&self) -> Option<Vec2> {
        self.path.first().copied()
    }

    pub fn end_point(&self) -> Option<Vec2> {
        self.path.last().copied()
    }

    /// Index of the final segment
    fn last_segment(&self) -> usize {
        self.path.len().saturating_sub(2)
    }

    /// Closest admissible point at or ahead of the current progress
    pub fn nearest_ahead(&self, pointer: Vec2) -> Option<(usize, Projection)> {
        let mut best: Option<(usize, Projection)> = None;
        for segment in self.progress.segment..self.path.len().saturating_sub(1) {
            let min_t = if segment == self.progress.segment {
                self.progress.progress
            } else {
                0.0
            };
            let Some(proj) =
                project_onto_segment(pointer, self.path[segment], self.path[segment + 1], min_t)
            else {
                continue;
            };
            if best.is_none_or(|(_, b)| proj.distance < b.distance) {
                best = Some((segment, proj));
            }
        }
        best
    }

    /// Lose up to `points` without going below zero
    fn penalize(&mut self, points: u32) {
        let loss = (points as i32).min(self.core.score.max(0));
        if loss > 0 {
            self.core.award(-loss);
        }
    }

    /// Move progress toward the pointer; false when the pointer is outside the band
    fn advance_progress(&mut self) -> bool {
        let Some((segment, proj)) = self.nearest_ahead(self.pointer) else {
            return false;
        };
        if proj.distance > self.path_width / 2.0 {
            return false;
        }
        let candidate = TraceProgress {
            segment,
            progress: proj.t,
        };
        if candidate > self.progress {
            self.progress = candidate;
        }
        true
    }

    fn trace_step(&mut self) {
        match self.scoring {
            TraceScoring::Progress => self.progress_step(),
            TraceScoring::PerFrame => self.per_frame_step(),
        }
    }

    fn progress_step(&mut self) {
        self.on_path = self.advance_progress();
        if !self.on_path {
            self.penalize(self.off_path_penalty);
            return;
        }

        let progress_score = (self.progress.position() * PROGRESS_POINTS).floor() as i32;
        if progress_score > self.progress_awarded {
            self.core.award(progress_score - self.progress_awarded);
            self.progress_awarded = progress_score;
        }

        if self.progress.segment == self.last_segment() && self.progress.progress >= FINISH_PROGRESS {
            self.complete();
        }
    }

    /// One point per frame inside the band anywhere on the path; done near the end dot
    fn per_frame_step(&mut self) {
        self.advance_progress();
        let half_width = self.path_width / 2.0;
        let pointer = self.pointer;
        self.on_path = self
            .path
            .windows(2)
            .any(|w| distance_to_segment(pointer, w[0], w[1]) < half_width);
        if self.on_path {
            self.core.award(1);
        } else {
            self.penalize(self.off_path_penalty);
        }

        if self.end_point().is_some_and(|end| pointer.distance(end) < END_RADIUS) {
            self.phase = TracePhase::Completed;
            log::info!("Reached the end dot at level {}", self.core.level);
            self.core.finish(COMPLETION_DELAY_MS);
        }
    }

    fn complete(&mut self) {
        self.phase = TracePhase::Completed;
        let target = completion_score(self.core.level);
        if self.core.score < target {
            self.core.award(target - self.core.score);
        }
        log::info!("Path traced at level {}", self.core.level);
        self.core.finish(COMPLETION_DELAY_MS);
    }
}

impl GameSession for TraceGame {
    fn kind(&self) -> GameKind {
        GameKind::Trace
    }

    fn core(&self) -> &SessionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SessionCore {
        &mut self.core
    }

    fn on_frame(&mut self, dt_ms: f32) {
        self.core.tick_clock(dt_ms);
        if self.phase == TracePhase::Tracing && self.core.accepts_input() {
            self.trace_step();
        }
    }

    fn pointer_down(&mut self, pos: Vec2) {
        if !self.core.accepts_input() {
            return;
        }
        self.pointer = pos;
        let Some(start) = self.start_point() else {
            return;
        };
        if self.phase == TracePhase::Idle && pos.distance(start) < START_RADIUS {
            self.phase = TracePhase::Tracing;
            self.progress = TraceProgress::default();
            self.on_path = true;
        }
    }

    fn pointer_drag(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    fn pointer_up(&mut self, pos: Vec2) {
        self.pointer = pos;
        if self.phase != TracePhase::Tracing || !self.core.accepts_input() {
            return;
        }
        self.phase = TracePhase::Idle;
        if self.release_penalty > 0 {
            log::debug!("Released mid-trace, -{}", self.release_penalty);
            self.penalize(self.release_penalty);
        }
    }

    fn pointer_move(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    fn view(&self) -> SessionView<'_> {
        SessionView::Trace(self)
    }
}
