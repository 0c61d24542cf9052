//! Data-driven game balance
//!
//! Every constant the simulation depends on lives here and is passed down
//! explicitly by the host. No hidden globals: two runs with the same seed and
//! the same config play out identically.

use serde::{Deserialize, Serialize};

/// Full tunable surface of the simulation core.
///
/// Defaults are the shipped balance. `pillar_height` and `ball_radius` do not
/// affect the simulation; they are carried so the host has a single source of
/// truth for its own geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Pillars kept alive at any time (index 0 = occupied pillar)
    pub pillar_count: usize,
    /// Center-to-center step of the random walk
    pub pillar_distance: f32,
    /// Pillar radius range (uniform)
    pub pillar_radius_min: f32,
    pub pillar_radius_max: f32,
    /// Render-only: cylinder height
    pub pillar_height: f32,

    /// Render-only: ball mesh radius
    pub ball_radius: f32,
    /// Orbit radius fallback when only one pillar exists
    pub rotation_radius: f32,
    /// Ball scale at the start of each orbit
    pub scale_start: f32,
    /// Scale floor; reaching it ends the run
    pub scale_min: f32,
    /// Multiplicative shrink applied per completed 360° rotation
    pub shrink_per_rotation: f32,

    /// Angular speed at score 0 (degrees per 1/60 s, see `sim::tick`)
    pub base_speed: f32,
    /// Linear speed ramp per score point
    pub speed_per_score: f32,
    /// Alternate model: speed bonus per second on the pillar
    pub speed_per_second: f32,

    /// Minimum gap between pillar rims during placement
    pub clearance_margin: f32,
    /// Multiplicative slack on a pillar's radius when testing a landing
    pub landing_tolerance: f32,
    /// Walk direction range, radians (forward-biased with lateral variance)
    pub walk_angle_min: f32,
    pub walk_angle_max: f32,
    /// Overlap-rejection retry budget; the last candidate is accepted after
    /// exhaustion rather than failing generation
    pub max_placement_attempts: u32,

    /// Points between theme-change signals
    pub theme_change_interval: u32,
    /// Frame delta clamp, prevents large jumps when the host resumes from
    /// background
    pub max_frame_dt: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pillar_count: 6,
            pillar_distance: 12.0,
            pillar_radius_min: 3.0,
            pillar_radius_max: 6.0,
            pillar_height: 18.0,

            ball_radius: 1.69,
            rotation_radius: 10.0,
            scale_start: 1.0,
            scale_min: 0.2,
            shrink_per_rotation: 0.95,

            base_speed: 2.0,
            speed_per_score: 0.2,
            speed_per_second: 0.1,

            clearance_margin: 3.0,
            landing_tolerance: 1.2,
            walk_angle_min: std::f32::consts::FRAC_PI_3,
            walk_angle_max: std::f32::consts::FRAC_PI_2,
            max_placement_attempts: 10,

            theme_change_interval: 10,
            max_frame_dt: 1.0 / 30.0,
        }
    }
}
