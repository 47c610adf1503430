//! Object catching: slide a basket under falling fruit, dodge the bombs

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::Rect;
use super::session::{GameKind, GameSession, SessionCore, SessionView};
use crate::consts::*;

/// Round length
pub const ROUND_MS: f64 = 30_000.0;
/// Delay between time-up and the completion report
pub const REPORT_DELAY_MS: f64 = 2000.0;
/// Share of spawns that are fruit
pub const BENEFICIAL_CHANCE: f64 = 0.8;
pub const CATCH_POINTS: i32 = 10;
pub const BOMB_PENALTY: i32 = -5;

pub const BASKET_HEIGHT: f32 = 30.0;
/// Basket top edge distance from the canvas bottom
const BASKET_OFFSET: f32 = 50.0;
/// Spawn margin from the canvas sides
const SPAWN_MARGIN: f32 = 20.0;
const SPAWN_Y: f32 = -20.0;

/// Frames between spawns
pub fn spawn_interval(level: u8) -> u32 {
    (60 - 10 * level as i32).max(30) as u32
}

/// Fall speed in units per frame
pub fn fall_speed(level: u8) -> f32 {
    1.5 * level as f32
}

pub fn basket_width(level: u8) -> f32 {
    100.0 - 10.0 * level as f32
}

/// What a falling object looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Apple,
    Orange,
    Banana,
    Grapes,
    Bomb,
}

impl Glyph {
    pub const FRUIT: [Glyph; 4] = [Glyph::Apple, Glyph::Orange, Glyph::Banana, Glyph::Grapes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Glyph::Apple => "🍎",
            Glyph::Orange => "🍊",
            Glyph::Banana => "🍌",
            Glyph::Grapes => "🍇",
            Glyph::Bomb => "💣",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallingObject {
    pub id: u32,
    pub pos: Vec2,
    pub beneficial: bool,
    pub glyph: Glyph,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Basket {
    /// Center x
    pub x: f32,
    /// Top edge y
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Basket {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x - self.w / 2.0, self.y, self.w, self.h)
    }

    /// Follow the pointer without leaving the canvas
    pub fn track(&mut self, pointer_x: f32) {
        self.x = pointer_x.clamp(self.w / 2.0, CANVAS_WIDTH - self.w / 2.0);
    }
}

/// Object catching session
#[derive(Debug, Clone)]
pub struct CatchGame {
    pub core: SessionCore,
    pub basket: Basket,
    /// Sorted by id
    pub objects: Vec<FallingObject>,
    pub remaining_ms: f64,
    pub caught: u32,
    pub bombs_hit: u32,
    spawn_counter: u32,
    spawn_every: u32,
    speed: f32,
    next_id: u32,
    rng: Pcg32,
}

impl CatchGame {
    pub fn new(level: u8, seed: u64) -> Self {
        let core = SessionCore::new(level);
        let level = core.level;
        let w = basket_width(level);
        Self {
            core,
            basket: Basket {
                x: CANVAS_WIDTH / 2.0,
                y: CANVAS_HEIGHT - BASKET_OFFSET,
                w,
                h: BASKET_HEIGHT,
            },
            objects: Vec::new(),
            remaining_ms: ROUND_MS,
            caught: 0,
            bombs_hit: 0,
            spawn_counter: 0,
            spawn_every: spawn_interval(level),
            speed: fall_speed(level),
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Whole seconds left, rounded up for the HUD
    pub fn seconds_left(&self) -> u32 {
        (self.remaining_ms / 1000.0).ceil() as u32
    }

    /// Drop a new object at `x`
    pub fn spawn_at(&mut self, x: f32, beneficial: bool) {
        let glyph = if beneficial {
            Glyph::FRUIT[self.rng.random_range(0..Glyph::FRUIT.len())]
        } else {
            Glyph::Bomb
        };
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(FallingObject {
            id,
            pos: Vec2::new(x, SPAWN_Y),
            beneficial,
            glyph,
        });
    }

    fn spawn_random(&mut self) {
        let x = self
            .rng
            .random_range(SPAWN_MARGIN..CANVAS_WIDTH - SPAWN_MARGIN);
        let beneficial = self.rng.random_bool(BENEFICIAL_CHANCE);
        self.spawn_at(x, beneficial);
    }

    fn step_objects(&mut self) {
        let catch_zone = self.basket.bounds();
        let speed = self.speed;
        let mut hits = Vec::new();

        self.objects.retain_mut(|obj| {
            obj.pos.y += speed;
            if catch_zone.contains(obj.pos) {
                hits.push(obj.beneficial);
                return false;
            }
            obj.pos.y <= CANVAS_HEIGHT
        });

        // One delta per catch so gains and losses reach the counter separately
        for beneficial in hits {
            if beneficial {
                self.caught += 1;
                self.core.award(CATCH_POINTS);
            } else {
                self.bombs_hit += 1;
                self.core.award(BOMB_PENALTY);
            }
        }
    }
}

impl GameSession for CatchGame {
    fn kind(&self) -> GameKind {
        GameKind::Catch
    }

    fn core(&self) -> &SessionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SessionCore {
        &mut self.core
    }

    fn on_frame(&mut self, dt_ms: f32) {
        self.core.tick_clock(dt_ms);
        if !self.core.accepts_input() {
            return;
        }

        self.remaining_ms = (self.remaining_ms - dt_ms as f64).max(0.0);
        if self.remaining_ms <= 0.0 {
            log::info!(
                "Time up: {} caught, {} bombs, score {}",
                self.caught,
                self.bombs_hit,
                self.core.score
            );
            self.core.finish(REPORT_DELAY_MS);
            return;
        }

        self.spawn_counter += 1;
        if self.spawn_counter >= self.spawn_every {
            self.spawn_counter = 0;
            self.spawn_random();
        }

        self.step_objects();
    }

    fn pointer_down(&mut self, pos: Vec2) {
        if self.core.accepts_input() {
            self.basket.track(pos.x);
        }
    }

    fn pointer_drag(&mut self, pos: Vec2) {
        if self.core.accepts_input() {
            self.basket.track(pos.x);
        }
    }

    fn pointer_up(&mut self, _pos: Vec2) {}

    fn pointer_move(&mut self, pos: Vec2) {
        if self.core.accepts_input() {
            self.basket.track(pos.x);
        }
    }

    fn view(&self) -> SessionView<'_> {
        SessionView::Catch(self)
    }
}
