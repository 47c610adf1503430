//! Hit-testing and projection helpers shared by the games
//!
//! Everything here is pure and works in canvas units with y pointing down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Squared lengths below this are treated as a zero-length segment
const DEGENERATE_EPSILON: f32 = 1e-6;

/// Result of projecting a point onto a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Parameter along the segment, clamped to [0, 1]
    pub t: f32,
    /// Closest point on the segment
    pub point: Vec2,
    /// Distance from the query point to `point`
    pub distance: f32,
}

/// Project `p` onto segment `a -> b`, restricting the parameter to `t >= min_t`.
///
/// Returns `None` for a zero-length segment so callers can skip it instead of
/// dividing by zero.
pub fn project_onto_segment(p: Vec2, a: Vec2, b: Vec2, min_t: f32) -> Option<Projection> {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < DEGENERATE_EPSILON {
        return None;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(min_t.clamp(0.0, 1.0), 1.0);
    let point = a + ab * t;
    Some(Projection {
        t,
        point,
        distance: p.distance(point),
    })
}

/// Distance from `p` to segment `a -> b` (distance to `a` when degenerate)
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    project_onto_segment(p, a, b, 0.0)
        .map(|proj| proj.distance)
        .unwrap_or_else(|| p.distance(a))
}

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size `w x h` centered on `center`
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict containment (points on the border are outside)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.x + self.w && p.y > self.y && p.y < self.y + self.h
    }
}

/// Circle containment, strict
#[inline]
pub fn circle_contains(center: Vec2, radius: f32, p: Vec2) -> bool {
    center.distance(p) < radius
}

/// Point-in-triangle using edge signs (border counts as inside)
pub fn triangle_contains(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> bool {
    let d1 = (p - b).perp_dot(a - b);
    let d2 = (p - c).perp_dot(b - c);
    let d3 = (p - a).perp_dot(c - a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
