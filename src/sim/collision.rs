//! Collision detection and response against axis-aligned obstacles
//!
//! Particles are circles, obstacles are rectangles snapshotted from layout
//! regions. The response is a single-axis push-out against the shallowest
//! penetrated edge, not an exact circle/rectangle solve. Fast particles can
//! tunnel through thin obstacles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PUSH_OUT_MARGIN;

/// Axis-aligned rectangle in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whether `pos` lies strictly inside the rect grown by `radius` on every side
    #[inline]
    pub fn contains_expanded(&self, pos: Vec2, radius: f32) -> bool {
        pos.x > self.left - radius
            && pos.x < self.right + radius
            && pos.y > self.top - radius
            && pos.y < self.bottom + radius
    }

    /// Closest point on or inside the rect (axis-aligned clamp)
    #[inline]
    pub fn clamp_point(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            pos.x.max(self.left).min(self.right),
            pos.y.max(self.top).min(self.bottom),
        )
    }
}

/// Edge an overlapping particle was pushed out through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Penetration depth past each edge, in tie-break order
fn penetrations(pos: Vec2, radius: f32, rect: &Rect) -> [(Edge, f32); 4] {
    [
        (Edge::Left, (pos.x + radius) - rect.left),
        (Edge::Right, rect.right - (pos.x - radius)),
        (Edge::Top, (pos.y + radius) - rect.top),
        (Edge::Bottom, rect.bottom - (pos.y - radius)),
    ]
}

/// The shallowest penetrated edge; earlier edges win ties
pub fn shallowest_edge(pos: Vec2, radius: f32, rect: &Rect) -> Edge {
    let depths = penetrations(pos, radius, rect);
    let mut best = depths[0];
    for candidate in &depths[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best.0
}

/// Push a particle out of one obstacle it overlaps
///
/// Clamps the coordinate to just outside the shallowest edge and inverts the
/// velocity component only if it points into the obstacle.
/// Returns the edge used, or None if the particle was clear.
pub fn resolve_obstacle(pos: &mut Vec2, vel: &mut Vec2, radius: f32, rect: &Rect) -> Option<Edge> {
    if !rect.contains_expanded(*pos, radius) {
        return None;
    }

    let edge = shallowest_edge(*pos, radius, rect);
    match edge {
        Edge::Left => {
            pos.x = rect.left - radius - PUSH_OUT_MARGIN;
            if vel.x > 0.0 {
                vel.x = -vel.x;
            }
        }
        Edge::Right => {
            pos.x = rect.right + radius + PUSH_OUT_MARGIN;
            if vel.x < 0.0 {
                vel.x = -vel.x;
            }
        }
        Edge::Top => {
            pos.y = rect.top - radius - PUSH_OUT_MARGIN;
            if vel.y > 0.0 {
                vel.y = -vel.y;
            }
        }
        Edge::Bottom => {
            pos.y = rect.bottom + radius + PUSH_OUT_MARGIN;
            if vel.y < 0.0 {
                vel.y = -vel.y;
            }
        }
    }
    Some(edge)
}

/// Resolve against every obstacle in order
pub fn resolve_obstacles(pos: &mut Vec2, vel: &mut Vec2, radius: f32, obstacles: &[Rect]) {
    for rect in obstacles {
        resolve_obstacle(pos, vel, radius, rect);
    }
}

/// Nearest obstacle boundary point within `max_dist`
///
/// Returns the point and its distance. Points inside a rect clamp to
/// themselves (distance 0). Earlier obstacles win ties.
pub fn nearest_surface_point(pos: Vec2, obstacles: &[Rect], max_dist: f32) -> Option<(Vec2, f32)> {
    let mut best: Option<(Vec2, f32)> = None;
    for rect in obstacles {
        let point = rect.clamp_point(pos);
        let dist = pos.distance(point);
        if dist < max_dist && best.is_none_or(|(_, d)| dist < d) {
            best = Some((point, dist));
        }
    }
    best
}

/// Velocity impulse pushing a particle away from the pointer
///
/// Magnitude is `(radius - dist) / radius * force`: zero at the radius
/// edge, `force` at the pointer itself.
pub fn repulsion_impulse(pos: Vec2, pointer: Vec2, radius: f32, force: f32) -> Vec2 {
    let away = pos - pointer;
    let dist_sq = away.length_squared();
    if dist_sq >= radius * radius {
        return Vec2::ZERO;
    }
    let dist = dist_sq.sqrt();
    let strength = (radius - dist) / radius * force;
    // Directly under the pointer: push left
    let dir = away.try_normalize().unwrap_or(Vec2::NEG_X);
    dir * strength
}

/// Toroidal wrap of one coordinate into [0, extent)
#[inline]
pub fn wrap_coord(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to extent for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Toroidal wrap of a position into [0, bounds.x) x [0, bounds.y)
#[inline]
pub fn wrap_position(pos: Vec2, bounds: Vec2) -> Vec2 {
    Vec2::new(wrap_coord(pos.x, bounds.x), wrap_coord(pos.y, bounds.y))
}
