//! Landing hit test
//!
//! The ball's world position is projected from its orbit angle, then tested
//! against every non-current pillar in index order. The orbit radius is not
//! fixed: it stretches to the nearest other pillar's center so that every
//! attempted jump is geometrically plausible.

use glam::Vec2;

use crate::config::GameConfig;
use crate::orbit_position;
use crate::sim::state::{GamePhase, GameState, Pillar};

/// Orbit radius for the current frame: distance from the occupied pillar's
/// center to the nearest other pillar's center, falling back to the
/// configured rotation radius when no other pillar exists.
pub fn dynamic_orbit_radius(pillars: &[Pillar], config: &GameConfig) -> f32 {
    let Some(current) = pillars.first() else {
        return config.rotation_radius;
    };
    pillars[1..]
        .iter()
        .map(|p| current.pos.distance(p.pos))
        .min_by(|a, b| a.total_cmp(b))
        .unwrap_or(config.rotation_radius)
}

/// Ball world position projected from the current orbit angle
pub fn ball_position(state: &GameState, config: &GameConfig) -> Vec2 {
    let center = state
        .current_pillar()
        .map(|p| p.pos)
        .unwrap_or(Vec2::ZERO);
    let radius = dynamic_orbit_radius(&state.pillars, config);
    orbit_position(center, state.ball_angle, radius)
}

/// Test the ball against every candidate landing pillar.
///
/// Returns the FIRST index (ascending scan from 1) whose center lies within
/// `radius * landing_tolerance` of the ball, or `None` on a miss. Index
/// order is the tie-break, not distance order - a reproducible rule the
/// rest of the game depends on.
///
/// Not engaged unless the ball is orbiting.
pub fn check_ball_collision(state: &GameState, config: &GameConfig) -> Option<usize> {
    if state.phase != GamePhase::Orbiting || state.pillars.is_empty() {
        return None;
    }

    let ball = ball_position(state, config);
    state.pillars[1..]
        .iter()
        .position(|p| ball.distance(p.pos) <= p.radius * config.landing_tolerance)
        .map(|i| i + 1)
}
