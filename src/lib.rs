//! Pillar Valley - deterministic core for an orbit-and-jump arcade game
//!
//! A ball orbits the current pillar at increasing angular speed; the player
//! taps to launch it toward the next pillar, and the run ends on a miss.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state machine, collision, pillar field)
//! - `config`: Data-driven game balance
//! - `highscores`: Best-score leaderboard (storage I/O is the host's)
//!
//! Rendering, UI, haptics and persistence live in the host. The core is
//! invoked synchronously once per rendered frame plus once per input event,
//! and communicates back through drained [`sim::GameEvent`]s.

pub mod config;
pub mod highscores;
pub mod sim;

pub use config::GameConfig;
pub use highscores::HighScores;

use glam::Vec2;

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_angle_deg(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

/// Position on a circle of `radius` around `center`, at `angle_deg` degrees.
///
/// The ground plane is (x, z); `Vec2.y` carries the z coordinate.
#[inline]
pub fn orbit_position(center: Vec2, angle_deg: f32, radius: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    center + Vec2::new(rad.cos(), rad.sin()) * radius
}
