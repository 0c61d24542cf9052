//! Difficulty and derived-value rules
//!
//! Pure functions, exposed separately from the state machine so balance can
//! be tested without driving frames. The frame advance uses rotation-based
//! shrink (see `tick`); the time-based functions here are the alternate
//! model, available to hosts that want a projection of where a run is
//! heading.

use crate::config::GameConfig;

/// Linear speed ramp: base + score * increment
pub fn base_speed_for_score(score: u32, config: &GameConfig) -> f32 {
    config.base_speed + score as f32 * config.speed_per_score
}

/// Alternate time-based shrink: one shrink cycle per full second on the
/// pillar, floored at the minimum scale
pub fn ball_scale_after_secs(secs_on_pillar: f32, config: &GameConfig) -> f32 {
    let cycles = secs_on_pillar.max(0.0).floor() as i32;
    (config.scale_start * config.shrink_per_rotation.powi(cycles)).max(config.scale_min)
}

/// Alternate time-based speed bonus: one increment per full second on the
/// pillar
pub fn time_speed_bonus(secs_on_pillar: f32, config: &GameConfig) -> f32 {
    secs_on_pillar.max(0.0).floor() * config.speed_per_second
}
