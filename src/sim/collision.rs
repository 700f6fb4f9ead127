//! Circle collision against the static obstacle field
//!
//! Every moving body (player and agents) is resolved through
//! [`resolve_position`]: one unordered push-out pass over all obstacles,
//! then a clamp to the world rectangle. The pass is not iterated to
//! convergence, so in tight corners a body may keep a sliver of overlap
//! with one obstacle after another obstacle's push.

use glam::Vec2;

use super::world::World;
use crate::consts::COLLISION_SKIN;

/// Whether two circles touch or overlap
#[inline]
pub fn circle_hit(a: Vec2, ar: f32, b: Vec2, br: f32) -> bool {
    let rr = ar + br;
    a.distance_squared(b) <= rr * rr
}

/// Whether a circle comes within `margin` of any obstacle
pub fn overlaps_obstacle(world: &World, pos: Vec2, radius: f32, margin: f32) -> bool {
    world
        .obstacles
        .iter()
        .any(|o| pos.distance(o.pos) < o.radius + radius + margin)
}

/// Correct a desired position against obstacles and world bounds
pub fn resolve_position(world: &World, desired: Vec2, radius: f32) -> Vec2 {
    let mut pos = desired;

    for o in &world.obstacles {
        let delta = pos - o.pos;
        let min_dist = radius + o.radius + COLLISION_SKIN;
        let dist = delta.length();
        if dist > 0.0 && dist < min_dist {
            pos += delta * ((min_dist - dist) / dist);
        }
    }

    world.clamp(pos, radius)
}
