//! Scripted players for demo/attract mode and the native runner
//!
//! Each frame the autoplayer looks at the session view and decides which
//! pointer events to send. It only uses what a player could see on screen.

use glam::Vec2;

use crate::host::{Screen, SessionHost};
use crate::sim::color::swatch_rect;
use crate::sim::toss::{ATTEMPTS, BallState, TossGame};
use crate::sim::{
    CatchGame, ColorGame, GameSession, ScoreReporter, SessionView, ShapeGame, TraceGame, TracePhase,
};

/// How far ahead of the current progress the tracing pointer leads
const TRACE_LEAD: f32 = 8.0;
/// Frames a simulated throw may take before it is written off
const THROW_HORIZON: usize = 240;

/// Pointer event produced by the autoplayer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(Vec2),
    Drag(Vec2),
    Up(Vec2),
    Move(Vec2),
}

/// Pointer events to send before the next frame
pub fn next_inputs(view: SessionView<'_>) -> Vec<PointerInput> {
    match view {
        SessionView::Trace(game) => trace_inputs(game),
        SessionView::Catch(game) => catch_inputs(game),
        SessionView::Color(game) => color_inputs(game),
        SessionView::Shapes(game) => shape_inputs(game),
        SessionView::Basket(game) => toss_inputs(game),
    }
}

/// Apply `inputs` to the host in order
pub fn send<R: ScoreReporter>(host: &mut SessionHost<R>, inputs: &[PointerInput]) {
    for input in inputs {
        match *input {
            PointerInput::Down(p) => host.pointer_down(p),
            PointerInput::Drag(p) => host.pointer_drag(p),
            PointerInput::Up(p) => host.pointer_up(p),
            PointerInput::Move(p) => host.pointer_move(p),
        }
    }
}

/// Play the host's current session until it reports or `max_frames` pass.
///
/// Returns the final score shown on the completion screen.
pub fn play_round<R: ScoreReporter>(host: &mut SessionHost<R>, max_frames: u32) -> Option<u32> {
    for _ in 0..max_frames {
        if let Screen::Complete { final_score } = host.screen() {
            return Some(final_score);
        }
        let inputs = host
            .session()
            .filter(|s| !s.is_completed())
            .map(|s| next_inputs(s.view()))
            .unwrap_or_default();
        send(host, &inputs);
        host.frame();
    }
    match host.screen() {
        Screen::Complete { final_score } => Some(final_score),
        _ => None,
    }
}

fn trace_inputs(game: &TraceGame) -> Vec<PointerInput> {
    match game.phase {
        TracePhase::Idle => game
            .start_point()
            .map(|start| vec![PointerInput::Down(start)])
            .unwrap_or_default(),
        TracePhase::Tracing => vec![PointerInput::Drag(point_ahead(game, TRACE_LEAD))],
        TracePhase::Completed => Vec::new(),
    }
}

/// Point `lead` units further along the path than the current progress
fn point_ahead(game: &TraceGame, lead: f32) -> Vec2 {
    let path = &game.path;
    let mut segment = game.progress.segment;
    if segment + 1 >= path.len() {
        return path.last().copied().unwrap_or(game.pointer);
    }
    let mut at = path[segment].lerp(path[segment + 1], game.progress.progress);
    let mut remaining = lead;
    while segment + 1 < path.len() {
        let end = path[segment + 1];
        let left = at.distance(end);
        if left >= remaining {
            return at + (end - at).normalize_or_zero() * remaining;
        }
        remaining -= left;
        at = end;
        segment += 1;
    }
    at
}

fn catch_inputs(game: &CatchGame) -> Vec<PointerInput> {
    let catch_line = game.basket.y;
    // Lowest fruit still above the basket
    let target = game
        .objects
        .iter()
        .filter(|o| o.beneficial && o.pos.y < catch_line)
        .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(std::cmp::Ordering::Equal));
    match target {
        Some(object) => vec![PointerInput::Move(Vec2::new(object.pos.x, catch_line))],
        None => Vec::new(),
    }
}

fn color_inputs(game: &ColorGame) -> Vec<PointerInput> {
    let Some(region) = game.regions.iter().find(|r| !r.is_correct) else {
        return Vec::new();
    };
    if game.selected == Some(region.target) {
        vec![PointerInput::Down(region.interior_point())]
    } else {
        vec![PointerInput::Down(swatch_rect(region.target.index()).center())]
    }
}

fn shape_inputs(game: &ShapeGame) -> Vec<PointerInput> {
    let Some(shape) = game.shapes.iter().find(|s| !s.placed) else {
        return Vec::new();
    };
    let Some(slot) = game.slots.iter().find(|s| !s.filled && s.kind == shape.kind) else {
        return Vec::new();
    };
    vec![
        PointerInput::Down(shape.pos),
        PointerInput::Drag(shape.pos.lerp(slot.pos, 0.5)),
        PointerInput::Up(slot.pos),
    ]
}

fn toss_inputs(game: &TossGame) -> Vec<PointerInput> {
    if game.ball.state != BallState::Resting {
        return Vec::new();
    }
    let velocity = find_throw(game).unwrap_or(Vec2::new(10.0, -10.0));
    vec![
        PointerInput::Down(game.ball.pos),
        PointerInput::Up(game.release_point_for(velocity)),
    ]
}

/// Search integer launch velocities for one that lands in the basket.
///
/// Every candidate is played out on a copy of the session, so basket motion
/// during the flight is accounted for.
pub fn find_throw(game: &TossGame) -> Option<Vec2> {
    for vy in (2..=25).map(|v| -(v as f32)) {
        for vx in (2..=30).map(|v| v as f32) {
            let velocity = Vec2::new(vx, vy);
            if throw_scores(game, velocity) {
                return Some(velocity);
            }
        }
    }
    None
}

fn throw_scores(game: &TossGame, velocity: Vec2) -> bool {
    play_out(game, velocity).hits > game.hits
}

/// Fly `velocity` on a copy of the session until the ball lands or leaves.
///
/// The copy has a full attempt budget so a miss never ends its round.
fn play_out(game: &TossGame, velocity: Vec2) -> TossGame {
    let mut trial = game.clone();
    trial.attempts_left = ATTEMPTS;
    trial.launch(velocity);
    for _ in 0..THROW_HORIZON {
        trial.on_frame(crate::consts::FRAME_MS);
        if trial.hits > game.hits || !trial.ball.in_flight() {
            break;
        }
    }
    trial
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryBackend;
    use crate::progress::ProgressStore;
    use crate::settings::{Ruleset, Settings};
    use crate::sim::GameKind;

    fn start(kind: GameKind, level: u8) -> SessionHost {
        let mut progress = ProgressStore::load(Box::new(MemoryBackend::new()));
        for done in 1..level {
            progress.record_completion(kind, done, 0);
        }
        let mut host = SessionHost::new(progress, &Settings::default(), 5);
        host.select_game(kind);
        host.select_level(level).unwrap();
        host.start_playing().unwrap();
        host
    }

    #[test]
    fn test_autoplay_traces_path() {
        let mut host = start(GameKind::Trace, 1);
        assert_eq!(play_round(&mut host, 2000), Some(600));
        let mut host = start(GameKind::Trace, 4);
        assert_eq!(play_round(&mut host, 4000), Some(900));
    }

    #[test]
    fn test_autoplay_paints_regions() {
        let mut host = start(GameKind::Color, 3);
        let regions = match host.session().map(|s| s.view()) {
            Some(SessionView::Color(game)) => game.regions.len() as u32,
            _ => panic!("expected a color session"),
        };
        assert_eq!(play_round(&mut host, 1000), Some(regions * 100 + 500));
    }

    #[test]
    fn test_autoplay_matches_shapes() {
        let mut host = start(GameKind::Shapes, 2);
        assert_eq!(play_round(&mut host, 1000), Some(1000));
        assert!(host.progress().is_level_unlocked(GameKind::Shapes, 3));
    }

    #[test]
    fn test_autoplay_catches_fruit() {
        let mut host = start(GameKind::Catch, 1);
        let score = play_round(&mut host, 2500);
        assert!(score.is_some_and(|s| s > 0), "{score:?}");
    }

    #[test]
    fn test_throw_search_lands_in_basket() {
        let game = TossGame::new(1, &Ruleset::standard());
        let velocity = find_throw(&game).unwrap();
        assert!(throw_scores(&game, velocity));
    }

    #[test]
    fn test_trial_throws_leave_last_attempt_alone() {
        let mut game = TossGame::new(2, &Ruleset::standard());
        game.attempts_left = 1;

        let miss = play_out(&game, Vec2::new(-30.0, 0.0));
        assert!(!miss.ball.in_flight());
        assert!(!miss.core.is_finished());
        assert!(find_throw(&game).is_some());

        assert_eq!(game.attempts_left, 1);
        assert!(!game.core.is_finished());
    }

    #[test]
    fn test_autoplay_tosses() {
        let mut host = start(GameKind::Basket, 1);
        let score = play_round(&mut host, 5000);
        assert!(score.is_some_and(|s| s >= 100), "{score:?}");
    }

    #[test]
    fn test_point_ahead_turns_corners() {
        let core = crate::sim::SessionCore::new(1);
        let path = vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), Vec2::new(5.0, 100.0)];
        let game = TraceGame::with_path(core, path, &Ruleset::standard());
        let p = point_ahead(&game, 8.0);
        assert!((p - Vec2::new(5.0, 3.0)).length() < 1e-4);
    }
}
