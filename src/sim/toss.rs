//! Basket toss: drag back from the ball to aim, release to throw
//!
//! Ten throws per round. The ball flies under constant gravity with a little
//! horizontal drag; the basket slides between two x-bounds.

use glam::Vec2;

use super::geometry::Rect;
use super::session::{GameKind, GameSession, SessionAction, SessionCore, SessionView};
use crate::consts::*;
use crate::settings::{BasketMotion, Ruleset};

pub const ATTEMPTS: u32 = 10;
pub const HIT_POINTS: i32 = 100;
pub const BALL_RADIUS: f32 = 20.0;
/// Release vector to launch velocity
pub const THROW_SCALE: f32 = 0.2;
/// Downward acceleration per frame
pub const GRAVITY: f32 = 0.5;
/// Horizontal velocity multiplier per frame
pub const AIR_DRAG: f32 = 0.99;
/// Delay before a scored ball comes back
pub const RESET_DELAY_MS: f64 = 500.0;
/// Delay between the last throw and the completion report
pub const REPORT_DELAY_MS: f64 = 1000.0;

pub const BASKET_W: f32 = 80.0;
pub const BASKET_H: f32 = 60.0;
/// Basket travel range (center x)
pub const BASKET_MIN_X: f32 = 200.0;
pub const BASKET_MAX_X: f32 = CANVAS_WIDTH - 100.0;
/// How far past the canvas edge a ball may go before the throw counts as lost
const OUT_MARGIN: f32 = 50.0;

/// Where the ball rests between throws
pub fn launch_position() -> Vec2 {
    Vec2::new(100.0, CANVAS_HEIGHT - 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallState {
    /// Waiting at the launch position
    Resting,
    /// Player is dragging back from the ball
    Aiming { pointer: Vec2 },
    InFlight,
    /// Landed in the basket, waiting for the reset
    Scored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl Ball {
    fn at_rest() -> Self {
        Self {
            pos: launch_position(),
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            state: BallState::Resting,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.state == BallState::InFlight
    }

    /// One frame of flight
    fn integrate(&mut self) {
        self.vel.x *= AIR_DRAG;
        self.vel.y += GRAVITY;
        self.pos += self.vel;
    }

    fn out_of_bounds(&self) -> bool {
        self.pos.y > CANVAS_HEIGHT + OUT_MARGIN
            || self.pos.x < -OUT_MARGIN
            || self.pos.x > CANVAS_WIDTH + OUT_MARGIN
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Basket {
    pub pos: Vec2,
    pub w: f32,
    pub h: f32,
    pub speed: f32,
    /// +1 right, -1 left
    pub direction: f32,
}

impl Basket {
    fn new(level: u8) -> Self {
        Self {
            pos: Vec2::new(CANVAS_WIDTH - 150.0, CANVAS_HEIGHT - 100.0),
            w: BASKET_W,
            h: BASKET_H,
            speed: 0.5 * level as f32,
            direction: 1.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.w, self.h)
    }

    /// Slide one frame, bouncing off the travel bounds
    fn slide(&mut self) {
        self.pos.x += self.speed * self.direction;
        if self.pos.x < BASKET_MIN_X || self.pos.x > BASKET_MAX_X {
            self.direction = -self.direction;
            self.pos.x = self.pos.x.clamp(BASKET_MIN_X, BASKET_MAX_X);
        }
    }
}

/// Basket toss session
#[derive(Debug, Clone)]
pub struct TossGame {
    pub core: SessionCore,
    pub ball: Ball,
    pub basket: Basket,
    pub attempts_left: u32,
    pub hits: u32,
    motion: BasketMotion,
}

impl TossGame {
    pub fn new(level: u8, rules: &Ruleset) -> Self {
        let core = SessionCore::new(level);
        let basket = Basket::new(core.level);
        Self {
            core,
            ball: Ball::at_rest(),
            basket,
            attempts_left: ATTEMPTS,
            hits: 0,
            motion: rules.basket_motion,
        }
    }

    /// Throw the resting ball with `velocity`
    pub fn launch(&mut self, velocity: Vec2) {
        if !self.core.accepts_input()
            || !matches!(self.ball.state, BallState::Resting | BallState::Aiming { .. })
        {
            return;
        }
        self.ball.vel = velocity;
        self.ball.state = BallState::InFlight;
    }

    /// Release point that produces `velocity`
    pub fn release_point_for(&self, velocity: Vec2) -> Vec2 {
        self.ball.pos - velocity / THROW_SCALE
    }

    fn basket_moves(&self) -> bool {
        let in_flight = self.ball.in_flight();
        match self.motion {
            BasketMotion::Escalating => !in_flight || self.core.level >= 3,
            BasketMotion::RestingOnly => self.core.level >= 2 && !in_flight,
        }
    }

    fn use_attempt(&mut self) {
        self.attempts_left = self.attempts_left.saturating_sub(1);
        if self.attempts_left == 0 {
            log::info!("Out of throws: {} baskets", self.hits);
            self.core.finish(REPORT_DELAY_MS);
        }
    }

    fn step_ball(&mut self) {
        self.ball.integrate();

        if self.basket.bounds().contains(self.ball.pos) {
            self.hits += 1;
            self.core.award(HIT_POINTS);
            self.ball.vel = Vec2::ZERO;
            self.ball.state = BallState::Scored;
            self.use_attempt();
            if self.attempts_left > 0 {
                self.core.schedule(RESET_DELAY_MS, SessionAction::ResetBall);
            }
        } else if self.ball.out_of_bounds() {
            self.ball.state = BallState::Resting;
            self.use_attempt();
            if self.attempts_left > 0 {
                self.ball = Ball::at_rest();
            }
        }
    }
}

impl GameSession for TossGame {
    fn kind(&self) -> GameKind {
        GameKind::Basket
    }

    fn core(&self) -> &SessionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SessionCore {
        &mut self.core
    }

    fn on_frame(&mut self, dt_ms: f32) {
        for action in self.core.tick_clock(dt_ms) {
            if action == SessionAction::ResetBall && self.attempts_left > 0 {
                self.ball = Ball::at_rest();
            }
        }
        if !self.core.accepts_input() {
            return;
        }

        if self.basket_moves() {
            self.basket.slide();
        }
        if self.ball.in_flight() {
            self.step_ball();
        }
    }

    fn pointer_down(&mut self, pos: Vec2) {
        if !self.core.accepts_input() || self.ball.state != BallState::Resting {
            return;
        }
        if pos.distance(self.ball.pos) < self.ball.radius {
            self.ball.state = BallState::Aiming { pointer: pos };
        }
    }

    fn pointer_drag(&mut self, pos: Vec2) {
        if let BallState::Aiming { ref mut pointer } = self.ball.state {
            *pointer = pos;
        }
    }

    fn pointer_up(&mut self, pos: Vec2) {
        if matches!(self.ball.state, BallState::Aiming { .. }) {
            let velocity = (self.ball.pos - pos) * THROW_SCALE;
            self.launch(velocity);
        }
    }

    fn view(&self) -> SessionView<'_> {
        SessionView::Basket(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SessionEvent;

    fn run_frames(game: &mut TossGame, frames: usize, events: &mut Vec<SessionEvent>) {
        for _ in 0..frames {
            game.on_frame(FRAME_MS);
            events.extend(game.drain_events());
        }
    }

    #[test]
    fn test_drag_release_sets_velocity() {
        let mut game = TossGame::new(1, &Ruleset::standard());
        let ball = game.ball.pos;
        game.pointer_down(ball + Vec2::new(5.0, 5.0));
        game.pointer_drag(ball + Vec2::new(-30.0, 40.0));
        game.pointer_up(ball + Vec2::new(-50.0, 50.0));
        assert!(game.ball.in_flight());
        assert_eq!(game.ball.vel, Vec2::new(10.0, -10.0));
    }

    #[test]
    fn test_press_outside_ball_does_not_aim() {
        let mut game = TossGame::new(1, &Ruleset::standard());
        game.pointer_down(game.ball.pos + Vec2::new(25.0, 0.0));
        assert_eq!(game.ball.state, BallState::Resting);
        game.pointer_up(Vec2::ZERO);
        assert_eq!(game.ball.state, BallState::Resting);
    }

    #[test]
    fn test_flight_integration() {
        let mut game = TossGame::new(1, &Ruleset::standard());
        game.launch(Vec2::new(10.0, -10.0));
        let start = game.ball.pos;
        game.on_frame(FRAME_MS);
        assert!((game.ball.vel.x - 9.9).abs() < 1e-5);
        assert!((game.ball.vel.y - -9.5).abs() < 1e-5);
        assert!((game.ball.pos - (start + Vec2::new(9.9, -9.5))).length() < 1e-4);
    }

    #[test]
    fn test_ten_misses_complete_once_with_zero() {
        let mut game = TossGame::new(1, &Ruleset::standard());
        let mut events = Vec::new();
        for throw in 0..ATTEMPTS {
            assert_eq!(game.ball.state, BallState::Resting);
            let ball = game.ball.pos;
            game.pointer_down(ball);
            game.pointer_up(ball + Vec2::new(100.0, 0.0));
            assert!(game.ball.in_flight(), "throw {throw}");
            run_frames(&mut game, 30, &mut events);
        }
        assert_eq!(game.attempts_left, 0);
        assert!(game.is_completed());
        run_frames(&mut game, 120, &mut events);

        assert_eq!(events, vec![SessionEvent::Completed(0)]);
    }

    #[test]
    fn test_hit_scores_and_resets_after_delay() {
        let mut game = TossGame::new(1, &Ruleset::standard());
        game.ball.pos = game.basket.pos - Vec2::new(5.0, 5.0);
        game.launch(Vec2::ZERO);

        let mut events = Vec::new();
        run_frames(&mut game, 1, &mut events);
        assert_eq!(game.hits, 1);
        assert_eq!(game.attempts_left, ATTEMPTS - 1);
        assert_eq!(game.ball.state, BallState::Scored);
        assert_eq!(events, vec![SessionEvent::Score(100)]);

        // Cannot aim while the scored ball sits in the basket
        game.pointer_down(game.ball.pos);
        assert_eq!(game.ball.state, BallState::Scored);

        run_frames(&mut game, 31, &mut events);
        assert_eq!(game.ball.state, BallState::Resting);
        assert_eq!(game.ball.pos, launch_position());
    }

    #[test]
    fn test_basket_bounces_between_bounds() {
        let mut game = TossGame::new(4, &Ruleset::standard());
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        let mut events = Vec::new();
        for _ in 0..400 {
            run_frames(&mut game, 1, &mut events);
            min_x = min_x.min(game.basket.pos.x);
            max_x = max_x.max(game.basket.pos.x);
        }
        assert!(min_x >= BASKET_MIN_X && max_x <= BASKET_MAX_X);
        assert_eq!(max_x, BASKET_MAX_X);
        assert!(min_x < CANVAS_WIDTH - 150.0);
    }

    #[test]
    fn test_motion_policy_by_level() {
        let rules = Ruleset::standard();
        for (level, moves_mid_flight) in [(1, false), (2, false), (3, true), (4, true)] {
            let mut game = TossGame::new(level, &rules);
            game.launch(Vec2::new(0.0, -20.0));
            let x = game.basket.pos.x;
            game.on_frame(FRAME_MS);
            assert_eq!(game.basket.pos.x != x, moves_mid_flight, "level {level}");
        }

        let classic = Ruleset::classic();
        let mut game = TossGame::new(1, &classic);
        let x = game.basket.pos.x;
        game.on_frame(FRAME_MS);
        assert_eq!(game.basket.pos.x, x);

        let mut game = TossGame::new(3, &classic);
        game.launch(Vec2::new(0.0, -20.0));
        let x = game.basket.pos.x;
        game.on_frame(FRAME_MS);
        assert_eq!(game.basket.pos.x, x);
    }

    #[test]
    fn test_frozen_after_last_throw() {
        let mut game = TossGame::new(2, &Ruleset::standard());
        game.attempts_left = 1;
        game.launch(Vec2::new(-30.0, 0.0));
        let mut events = Vec::new();
        run_frames(&mut game, 20, &mut events);
        assert!(game.is_completed());

        let x = game.basket.pos.x;
        run_frames(&mut game, 10, &mut events);
        assert_eq!(game.basket.pos.x, x);
        game.pointer_down(game.ball.pos);
        assert_eq!(game.ball.state, BallState::Resting);
    }
}
