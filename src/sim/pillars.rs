//! Procedural pillar placement
//!
//! Pillars advance along a directed random walk: each new pillar sits one
//! step from the previous one, in a direction sampled from a forward-biased
//! cone so the path never doubles straight back. Overlap with the existing
//! field is a soft constraint - candidates are resampled up to a retry
//! budget, then the last candidate is accepted regardless. Generation never
//! fails outright; a rare overlap is a visual artifact, not an error.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::sim::state::Pillar;

/// Error surfaced by a faulty [`PillarSource`].
///
/// The built-in [`WalkGenerator`] never returns it; the seam exists so hosts
/// and tests can inject failing sources and exercise the all-or-nothing
/// landing transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillarGenError(pub &'static str);

impl std::fmt::Display for PillarGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pillar generation failed: {}", self.0)
    }
}

impl std::error::Error for PillarGenError {}

/// Source of replacement pillars during the landing transition
pub trait PillarSource {
    fn next_pillar(
        &mut self,
        existing: &[Pillar],
        rng: &mut Pcg32,
        id: u64,
        config: &GameConfig,
    ) -> Result<Pillar, PillarGenError>;
}

/// The standard directed-random-walk generator
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkGenerator;

impl PillarSource for WalkGenerator {
    fn next_pillar(
        &mut self,
        existing: &[Pillar],
        rng: &mut Pcg32,
        id: u64,
        config: &GameConfig,
    ) -> Result<Pillar, PillarGenError> {
        let last = existing.last().ok_or(PillarGenError("empty pillar field"))?;
        Ok(place_after(last, existing, rng, id, config))
    }
}

/// True when `candidate` sits closer to any existing pillar than the sum of
/// radii plus the clearance margin
fn has_overlap(candidate: &Pillar, existing: &[Pillar], clearance: f32) -> bool {
    existing.iter().any(|p| {
        candidate.pos.distance(p.pos) < candidate.radius + p.radius + clearance
    })
}

/// One step of the walk: sample direction and radius, resample on overlap up
/// to the retry budget, accept the last candidate after exhaustion
fn place_after(
    last: &Pillar,
    existing: &[Pillar],
    rng: &mut Pcg32,
    id: u64,
    config: &GameConfig,
) -> Pillar {
    let mut candidate = sample_candidate(last, rng, id, config);
    let mut attempts = 1;
    while has_overlap(&candidate, existing, config.clearance_margin)
        && attempts < config.max_placement_attempts
    {
        candidate = sample_candidate(last, rng, id, config);
        attempts += 1;
    }
    candidate
}

fn sample_candidate(last: &Pillar, rng: &mut Pcg32, id: u64, config: &GameConfig) -> Pillar {
    let angle = rng.random_range(config.walk_angle_min..config.walk_angle_max);
    let radius = rng.random_range(config.pillar_radius_min..config.pillar_radius_max);
    let pos = last.pos + Vec2::new(angle.cos(), angle.sin()) * config.pillar_distance;
    Pillar::new(id, pos, radius)
}

/// Build the starting field: pillar 0 at the origin, then one walk step per
/// remaining slot. IDs are sequential from 0.
pub fn create_initial_pillars(rng: &mut Pcg32, config: &GameConfig) -> Vec<Pillar> {
    let mut pillars = Vec::with_capacity(config.pillar_count);
    let r0 = rng.random_range(config.pillar_radius_min..config.pillar_radius_max);
    pillars.push(Pillar::new(0, Vec2::ZERO, r0));

    for i in 1..config.pillar_count {
        let last = pillars[i - 1];
        let next = place_after(&last, &pillars, rng, i as u64, config);
        pillars.push(next);
    }

    pillars
}
