//! Deterministic game sessions
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-driven clock only (no wall time)
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering, storage or platform dependencies

pub mod catch;
pub mod color;
pub mod geometry;
pub mod score;
pub mod session;
pub mod shapes;
pub mod timer;
pub mod toss;
pub mod trace;

pub use catch::CatchGame;
pub use color::{ColorGame, PaintColor, Region, RegionShape};
pub use geometry::Rect;
pub use score::{ReportPolicy, ScoreCounter, ScoreReporter};
pub use session::{
    GameKind, GameSession, SessionAction, SessionCore, SessionEvent, SessionView, create_session,
};
pub use shapes::{ShapeGame, ShapeKind};
pub use timer::Scheduler;
pub use toss::TossGame;
pub use trace::{TraceGame, TracePhase, TraceProgress};
