//! Color filling: paint each area with the color shown in the sample strip
//!
//! A correctly painted region locks for good, so it can never score twice.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::{Rect, circle_contains, triangle_contains};
use super::session::{GameKind, GameSession, SessionCore, SessionView};
use crate::consts::*;
use crate::settings::{ColorScoring, Ruleset};

pub const CORRECT_POINTS: i32 = 100;
pub const COMPLETION_BONUS: i32 = 500;
/// Final score under flat completion scoring
pub const FLAT_COMPLETION_SCORE: i32 = 1000;

/// Region grid layout
const GRID_COLUMNS: usize = 4;
const GRID_ORIGIN: Vec2 = Vec2::new(40.0, 110.0);
const CELL_W: f32 = 160.0;
const CELL_H: f32 = 150.0;
const REGION_MIN: f32 = 70.0;
const REGION_MAX: f32 = 110.0;

/// Palette swatch layout
const SWATCH_X: f32 = 20.0;
const SWATCH_SPACING: f32 = 60.0;
const SWATCH_W: f32 = 50.0;
const SWATCH_H: f32 = 40.0;
const SWATCH_BOTTOM_OFFSET: f32 = 50.0;

/// The five paint colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintColor {
    Coral,
    Teal,
    Sunflower,
    Mint,
    Salmon,
}

impl PaintColor {
    pub const PALETTE: [PaintColor; 5] = [
        PaintColor::Coral,
        PaintColor::Teal,
        PaintColor::Sunflower,
        PaintColor::Mint,
        PaintColor::Salmon,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            PaintColor::Coral => "#FF6B6B",
            PaintColor::Teal => "#4ECDC4",
            PaintColor::Sunflower => "#FFE66D",
            PaintColor::Mint => "#95E1D3",
            PaintColor::Salmon => "#F38181",
        }
    }

    /// Position in the palette strip
    pub fn index(&self) -> usize {
        Self::PALETTE.iter().position(|c| c == self).unwrap_or(0)
    }
}

/// Bounds of palette swatch `index`
pub fn swatch_rect(index: usize) -> Rect {
    Rect::new(
        SWATCH_X + SWATCH_SPACING * index as f32,
        CANVAS_HEIGHT - SWATCH_BOTTOM_OFFSET,
        SWATCH_W,
        SWATCH_H,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionShape {
    Rectangle,
    Circle,
    Triangle,
}

impl RegionShape {
    const ALL: [RegionShape; 3] = [RegionShape::Rectangle, RegionShape::Circle, RegionShape::Triangle];
}

/// One paintable area
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub shape: RegionShape,
    pub bounds: Rect,
    pub target: PaintColor,
    pub current: Option<PaintColor>,
    pub is_correct: bool,
    pub is_locked: bool,
}

impl Region {
    pub fn new(shape: RegionShape, bounds: Rect, target: PaintColor) -> Self {
        Self {
            shape,
            bounds,
            target,
            current: None,
            is_correct: false,
            is_locked: false,
        }
    }

    /// Exact hit test for the drawn shape
    pub fn contains(&self, p: Vec2) -> bool {
        let b = &self.bounds;
        match self.shape {
            RegionShape::Rectangle => b.contains(p),
            RegionShape::Circle => circle_contains(b.center(), b.w.min(b.h) / 2.0, p),
            RegionShape::Triangle => triangle_contains(
                Vec2::new(b.x + b.w / 2.0, b.y),
                Vec2::new(b.x, b.y + b.h),
                Vec2::new(b.x + b.w, b.y + b.h),
                p,
            ),
        }
    }

    /// A point guaranteed to hit this region
    pub fn interior_point(&self) -> Vec2 {
        match self.shape {
            // Centroid sits lower than the box center for an upward triangle
            RegionShape::Triangle => Vec2::new(
                self.bounds.x + self.bounds.w / 2.0,
                self.bounds.y + self.bounds.h * 2.0 / 3.0,
            ),
            _ => self.bounds.center(),
        }
    }
}

/// Result of applying paint to a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    Correct,
    Wrong,
    /// Region already correct; nothing changed
    Locked,
}

/// Color filling session
#[derive(Debug, Clone)]
pub struct ColorGame {
    pub core: SessionCore,
    pub regions: Vec<Region>,
    pub selected: Option<PaintColor>,
    wrong_penalty: u32,
    scoring: ColorScoring,
}

impl ColorGame {
    pub fn new(level: u8, seed: u64, rules: &Ruleset) -> Self {
        let core = SessionCore::new(level);
        let mut rng = Pcg32::seed_from_u64(seed);
        let regions = generate_regions(core.level, &mut rng);
        Self::with_regions(core, regions, rules)
    }

    pub fn with_regions(core: SessionCore, regions: Vec<Region>, rules: &Ruleset) -> Self {
        Self {
            core,
            regions,
            selected: None,
            wrong_penalty: rules.color_wrong_penalty,
            scoring: rules.color_scoring,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.regions.iter().filter(|r| r.is_correct).count()
    }

    pub fn select(&mut self, color: PaintColor) {
        self.selected = Some(color);
    }

    /// Paint region `index` with `color`
    pub fn fill(&mut self, index: usize, color: PaintColor) -> Option<FillOutcome> {
        let region = self.regions.get_mut(index)?;
        if region.is_locked {
            return Some(FillOutcome::Locked);
        }
        region.current = Some(color);
        if color != region.target {
            self.core.award(-(self.wrong_penalty as i32));
            return Some(FillOutcome::Wrong);
        }

        region.is_correct = true;
        region.is_locked = true;
        self.core.award(CORRECT_POINTS);

        if self.regions.iter().all(|r| r.is_correct) {
            log::info!("All {} regions painted", self.regions.len());
            match self.scoring {
                ColorScoring::Bonus => self.core.award(COMPLETION_BONUS),
                ColorScoring::Flat => {
                    self.core.emit_delta(FLAT_COMPLETION_SCORE);
                    self.core.score = FLAT_COMPLETION_SCORE;
                }
            }
            self.core.finish(COMPLETION_DELAY_MS);
        }
        Some(FillOutcome::Correct)
    }
}

/// Lay out `3 + level` regions with random shapes and target colors
pub fn generate_regions(level: u8, rng: &mut impl Rng) -> Vec<Region> {
    let count = 3 + level as usize;
    (0..count)
        .map(|i| {
            let col = (i % GRID_COLUMNS) as f32;
            let row = (i / GRID_COLUMNS) as f32;
            let w = rng.random_range(REGION_MIN..REGION_MAX);
            let h = rng.random_range(REGION_MIN..REGION_MAX);
            let cell = GRID_ORIGIN + Vec2::new(col * CELL_W, row * CELL_H);
            let shape = RegionShape::ALL[rng.random_range(0..RegionShape::ALL.len())];
            let target = PaintColor::PALETTE[rng.random_range(0..PaintColor::PALETTE.len())];
            Region::new(shape, Rect::new(cell.x, cell.y, w, h), target)
        })
        .collect()
}

impl GameSession for ColorGame {
    fn kind(&self) -> GameKind {
        GameKind::Color
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
        if !self.core.accepts_input() {
            return;
        }

        if let Some(color) = PaintColor::PALETTE
            .iter()
            .enumerate()
            .find(|(i, _)| swatch_rect(*i).contains(pos))
            .map(|(_, c)| *c)
        {
            self.select(color);
            return;
        }

        let Some(color) = self.selected else {
            return;
        };
        if let Some(index) = self.regions.iter().position(|r| r.contains(pos)) {
            self.fill(index, color);
        }
    }

    fn pointer_drag(&mut self, _pos: Vec2) {}

    fn pointer_up(&mut self, _pos: Vec2) {}

    fn view(&self) -> SessionView<'_> {
        SessionView::Color(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SessionEvent;

    fn two_region_game() -> ColorGame {
        two_region_game_with(&Ruleset::standard())
    }

    fn two_region_game_with(rules: &Ruleset) -> ColorGame {
        let regions = vec![
            Region::new(
                RegionShape::Rectangle,
                Rect::new(50.0, 100.0, 100.0, 100.0),
                PaintColor::Teal,
            ),
            Region::new(
                RegionShape::Circle,
                Rect::new(250.0, 100.0, 100.0, 100.0),
                PaintColor::Coral,
            ),
        ];
        ColorGame::with_regions(SessionCore::new(1), regions, rules)
    }

    fn press_swatch(game: &mut ColorGame, color: PaintColor) {
        game.pointer_down(swatch_rect(color.index()).center());
    }

    #[test]
    fn test_generated_layout() {
        let mut rng = Pcg32::seed_from_u64(11);
        let regions = generate_regions(4, &mut rng);
        assert_eq!(regions.len(), 7);
        for (i, a) in regions.iter().enumerate() {
            assert!(a.bounds.x + a.bounds.w < CANVAS_WIDTH);
            assert!(a.bounds.y + a.bounds.h < CANVAS_HEIGHT - SWATCH_BOTTOM_OFFSET);
            assert!(a.contains(a.interior_point()));
            for b in &regions[i + 1..] {
                assert!(!b.contains(a.interior_point()));
            }
        }
    }

    #[test]
    fn test_palette_press_selects() {
        let mut game = two_region_game();
        press_swatch(&mut game, PaintColor::Mint);
        assert_eq!(game.selected, Some(PaintColor::Mint));
    }

    #[test]
    fn test_press_without_color_does_nothing() {
        let mut game = two_region_game();
        game.pointer_down(Vec2::new(100.0, 150.0));
        assert_eq!(game.regions[0].current, None);
    }

    #[test]
    fn test_wrong_color_stays_retryable() {
        let mut game = two_region_game();
        press_swatch(&mut game, PaintColor::Coral);
        game.pointer_down(Vec2::new(100.0, 150.0));
        let region = &game.regions[0];
        assert_eq!(region.current, Some(PaintColor::Coral));
        assert!(!region.is_correct && !region.is_locked);
        assert_eq!(game.score(), 0);

        press_swatch(&mut game, PaintColor::Teal);
        game.pointer_down(Vec2::new(100.0, 150.0));
        assert!(game.regions[0].is_correct);
        assert_eq!(game.score(), 100);
    }

    #[test]
    fn test_locked_region_is_idempotent() {
        let mut game = two_region_game();
        assert_eq!(game.fill(0, PaintColor::Teal), Some(FillOutcome::Correct));
        assert_eq!(game.fill(0, PaintColor::Coral), Some(FillOutcome::Locked));
        assert_eq!(game.fill(0, PaintColor::Teal), Some(FillOutcome::Locked));
        assert_eq!(game.regions[0].current, Some(PaintColor::Teal));
        assert_eq!(game.score(), 100);
        assert_eq!(game.fill(9, PaintColor::Teal), None);
    }

    #[test]
    fn test_circle_corner_misses() {
        let game = two_region_game();
        assert!(!game.regions[1].contains(Vec2::new(255.0, 105.0)));
        assert!(game.regions[1].contains(Vec2::new(300.0, 150.0)));
    }

    #[test]
    fn test_all_correct_completes_with_bonus() {
        let mut game = two_region_game();
        game.fill(0, PaintColor::Teal);
        game.fill(1, PaintColor::Coral);
        assert!(game.is_completed());
        assert_eq!(game.score(), 700);

        let mut events = game.drain_events();
        for _ in 0..100 {
            game.on_frame(FRAME_MS);
            events.extend(game.drain_events());
        }
        assert_eq!(
            events,
            vec![
                SessionEvent::Score(100),
                SessionEvent::Score(100),
                SessionEvent::Score(500),
                SessionEvent::Completed(700),
            ]
        );

        // Frozen once finished
        press_swatch(&mut game, PaintColor::Mint);
        assert_eq!(game.selected, None);
    }

    #[test]
    fn test_classic_round_penalizes_and_scores_flat() {
        let mut game = two_region_game_with(&Ruleset::classic());
        assert_eq!(game.fill(0, PaintColor::Mint), Some(FillOutcome::Wrong));
        assert_eq!(game.score(), -20);
        game.fill(0, PaintColor::Teal);
        game.fill(1, PaintColor::Salmon);
        game.fill(1, PaintColor::Coral);
        assert!(game.is_completed());
        assert_eq!(game.score(), 1000);

        let mut events = game.drain_events();
        for _ in 0..100 {
            game.on_frame(FRAME_MS);
            events.extend(game.drain_events());
        }
        assert_eq!(
            events,
            vec![
                SessionEvent::Score(-20),
                SessionEvent::Score(100),
                SessionEvent::Score(-20),
                SessionEvent::Score(100),
                SessionEvent::Score(1000),
                SessionEvent::Completed(1000),
            ]
        );
    }
}
