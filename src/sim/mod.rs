//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by the state
//! - Stable pillar order (index 0 = occupied pillar)
//! - No rendering or platform dependencies
//!
//! The host drives it with [`tick`] once per rendered frame, [`jump`] on tap
//! release, and [`on_pillar_reached`] once its jump animation completes.

pub mod collision;
pub mod pillars;
pub mod scaling;
pub mod state;
pub mod tick;

pub use collision::{ball_position, check_ball_collision, dynamic_orbit_radius};
pub use pillars::{PillarGenError, PillarSource, WalkGenerator, create_initial_pillars};
pub use scaling::{ball_scale_after_secs, base_speed_for_score, time_speed_bonus};
pub use state::{GameEvent, GameOverReason, GamePhase, GameState, Pillar};
pub use tick::{TickInput, jump, on_pillar_reached, on_pillar_reached_with, tick};
