//! Shape matching: drag each shape onto the outline of the same kind

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::session::{GameKind, GameSession, SessionCore, SessionView};
use crate::consts::*;
use crate::settings::{Ruleset, ShapeScoring};

/// Press radius around a shape's center that starts a drag
pub const GRAB_RADIUS: f32 = 30.0;
/// Drop radius around a slot center that snaps a shape in
pub const SNAP_RADIUS: f32 = 40.0;
pub const PLACE_POINTS: i32 = 100;
pub const COMPLETION_AWARD: i32 = 1000;

const SLOT_COLUMNS: usize = 4;
const SLOT_ORIGIN: Vec2 = Vec2::new(110.0, 110.0);
const SLOT_SPACING: Vec2 = Vec2::new(160.0, 140.0);
/// Row of loose shapes near the bottom
const TRAY_Y: f32 = 420.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Star,
    Heart,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Star,
        ShapeKind::Heart,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraggableShape {
    pub kind: ShapeKind,
    pub pos: Vec2,
    pub placed: bool,
    /// Slot index once placed
    pub slot: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub kind: ShapeKind,
    pub pos: Vec2,
    pub filled: bool,
}

/// A drag in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub shape: usize,
    /// Shape center minus pointer at grab time
    pub offset: Vec2,
}

/// Shape matching session
#[derive(Debug, Clone)]
pub struct ShapeGame {
    pub core: SessionCore,
    pub shapes: Vec<DraggableShape>,
    pub slots: Vec<Slot>,
    pub dragging: Option<Drag>,
    scoring: ShapeScoring,
}

/// Slot centers on the grid
fn slot_position(index: usize) -> Vec2 {
    let col = (index % SLOT_COLUMNS) as f32;
    let row = (index / SLOT_COLUMNS) as f32;
    SLOT_ORIGIN + Vec2::new(col * SLOT_SPACING.x, row * SLOT_SPACING.y)
}

impl ShapeGame {
    pub fn new(level: u8, seed: u64, rules: &Ruleset) -> Self {
        let core = SessionCore::new(level);
        let count = 3 + core.level as usize;
        let mut rng = Pcg32::seed_from_u64(seed);

        let slots: Vec<Slot> = (0..count)
            .map(|i| Slot {
                kind: ShapeKind::ALL[i % ShapeKind::ALL.len()],
                pos: slot_position(i),
                filled: false,
            })
            .collect();

        let mut kinds: Vec<ShapeKind> = slots.iter().map(|s| s.kind).collect();
        kinds.shuffle(&mut rng);
        let spacing = CANVAS_WIDTH / (count + 1) as f32;
        let shapes = kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| DraggableShape {
                kind,
                pos: Vec2::new(spacing * (i + 1) as f32, TRAY_Y),
                placed: false,
                slot: None,
            })
            .collect();

        Self::with_layout(core, shapes, slots, rules)
    }

    pub fn with_layout(
        core: SessionCore,
        shapes: Vec<DraggableShape>,
        slots: Vec<Slot>,
        rules: &Ruleset,
    ) -> Self {
        Self {
            core,
            shapes,
            slots,
            dragging: None,
            scoring: rules.shape_scoring,
        }
    }

    pub fn placed_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.placed).count()
    }

    /// First unfilled slot of `kind` within snap range of `pos`
    fn snap_target(&self, kind: ShapeKind, pos: Vec2) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| !slot.filled && slot.kind == kind && slot.pos.distance(pos) < SNAP_RADIUS)
    }

    fn drop_shape(&mut self, index: usize) {
        let (kind, pos) = {
            let shape = &self.shapes[index];
            (shape.kind, shape.pos)
        };
        let Some(slot_index) = self.snap_target(kind, pos) else {
            return;
        };

        let slot = &mut self.slots[slot_index];
        slot.filled = true;
        let shape = &mut self.shapes[index];
        shape.pos = slot.pos;
        shape.placed = true;
        shape.slot = Some(slot_index);
        self.core.award(PLACE_POINTS);

        if self.placed_count() == self.shapes.len() {
            self.complete();
        }
    }

    fn complete(&mut self) {
        // The live counter always sees the completion award on top of the
        // placement awards; only the session's own score differs per rule.
        self.core.emit_delta(COMPLETION_AWARD);
        self.core.score = match self.scoring {
            ShapeScoring::Flat => COMPLETION_AWARD,
            ShapeScoring::Additive => self.core.score + COMPLETION_AWARD,
        };
        log::info!("All shapes matched, final score {}", self.core.score);
        self.core.finish(COMPLETION_DELAY_MS);
    }
}

impl GameSession for ShapeGame {
    fn kind(&self) -> GameKind {
        GameKind::Shapes
    }

    fn core(&self) -> &SessionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SessionCore {
        &mut self.core
    }

    fn on_frame(&mut self, dt_ms: f32) {
        self.core.tick_clock(dt_ms);
    }

    fn pointer_down(&mut self, pos: Vec2) {
        if !self.core.accepts_input() || self.dragging.is_some() {
            return;
        }
        self.dragging = self
            .shapes
            .iter()
            .position(|s| !s.placed && s.pos.distance(pos) < GRAB_RADIUS)
            .map(|shape| Drag {
                shape,
                offset: self.shapes[shape].pos - pos,
            });
    }

    fn pointer_drag(&mut self, pos: Vec2) {
        if !self.core.accepts_input() {
            return;
        }
        if let Some(drag) = self.dragging {
            self.shapes[drag.shape].pos = pos + drag.offset;
        }
    }

    fn pointer_up(&mut self, pos: Vec2) {
        let Some(drag) = self.dragging.take() else {
            return;
        };
        if !self.core.accepts_input() {
            return;
        }
        self.shapes[drag.shape].pos = pos + drag.offset;
        self.drop_shape(drag.shape);
    }

    fn view(&self) -> SessionView<'_> {
        SessionView::Shapes(self)
    }
}
