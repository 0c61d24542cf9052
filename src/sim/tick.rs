//! Frame advance and landing transition
//!
//! The host calls [`tick`] once per rendered frame while a run is live,
//! [`jump`] on tap release, and [`on_pillar_reached`] once its own jump
//! animation finishes. Exactly one `on_pillar_reached` call is expected per
//! jump; the core ignores out-of-phase calls.

use crate::config::GameConfig;
use crate::normalize_angle_deg;
use crate::sim::collision::check_ball_collision;
use crate::sim::pillars::{PillarSource, WalkGenerator};
use crate::sim::scaling::base_speed_for_score;
use crate::sim::state::{GameEvent, GameOverReason, GamePhase, GameState, Pillar};

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Tap released (launch toward a landing pillar)
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game by one frame.
///
/// Angle moves by `speed * direction * dt * 60`; the ×60 normalizes the
/// per-second rate against the 60 fps-tuned balance constants and must not
/// change, or the game stops feeling like itself. A completed rotation is
/// detected by observing the wraparound edge, never by accumulating angle
/// increments (accumulation drifts).
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, config: &GameConfig) {
    if input.pause && state.playing() {
        state.paused = !state.paused;
    }
    if !state.playing() || state.paused {
        return;
    }

    // Recover rather than propagate bad numerics (host bugs, resume glitches)
    if !state.ball_angle.is_finite() {
        log::warn!("non-finite ball angle, resetting to 0");
        state.ball_angle = 0.0;
    }
    let dt = if dt.is_finite() && dt > 0.0 {
        dt.min(config.max_frame_dt)
    } else {
        0.0
    };

    let old_angle = state.ball_angle;
    let increment = state.ball_speed * state.ball_direction * dt * 60.0;
    let new_angle = normalize_angle_deg(old_angle + increment);

    // Wraparound edge = one completed 360° cycle
    let completed_rotation = (state.ball_direction > 0.0
        && old_angle > 270.0
        && new_angle < 90.0)
        || (state.ball_direction < 0.0 && old_angle < 90.0 && new_angle > 270.0);

    let mut new_scale = state.ball_scale;
    let mut rotations = state.rotation_count;
    if completed_rotation {
        rotations += 1;
        new_scale = (new_scale * config.shrink_per_rotation).max(config.scale_min);
    }

    // Scale floor ends the run immediately; this frame's movement is not
    // applied
    if new_scale <= config.scale_min {
        state.end_game(GameOverReason::BallTooSmall);
        return;
    }

    state.ball_angle = new_angle;
    state.ball_scale = new_scale;
    state.rotation_count = rotations;
    state.time_on_pillar += dt;

    if input.jump {
        jump(state, config);
    }
}

/// Tap release: run the hit test and either begin a jump or end the run.
///
/// Only acts while orbiting - repeat taps mid-jump are ignored, which is
/// what serializes the one-`on_pillar_reached`-per-jump contract.
pub fn jump(state: &mut GameState, config: &GameConfig) -> Option<usize> {
    if state.paused || state.phase != GamePhase::Orbiting {
        return None;
    }
    match check_ball_collision(state, config) {
        Some(target) => {
            state.phase = GamePhase::Jumping { target };
            state.events.push(GameEvent::JumpStarted { target });
            Some(target)
        }
        None => {
            state.end_game(GameOverReason::Missed);
            None
        }
    }
}

/// Landing transition with the standard generator
pub fn on_pillar_reached(state: &mut GameState, config: &GameConfig) {
    on_pillar_reached_with(state, &mut WalkGenerator, config)
}

/// Commit a completed jump: score, pillar replenishment, direction flip,
/// speed ramp, theme watermark.
///
/// All-or-nothing: every output is computed into locals and committed only
/// once replenishment has fully succeeded. A failing or misbehaving
/// [`PillarSource`] leaves the state exactly as it was.
pub fn on_pillar_reached_with(
    state: &mut GameState,
    source: &mut dyn PillarSource,
    config: &GameConfig,
) {
    let GamePhase::Jumping { target } = state.phase else {
        return;
    };
    if target == 0 || target >= state.pillars.len() {
        log::warn!("jump target {target} out of range, ignoring landing");
        return;
    }

    // Drop the passed pillars, then replenish to the configured count.
    // The RNG is cloned so a failed attempt consumes nothing.
    let mut pillars: Vec<Pillar> = state.pillars[target..].to_vec();
    let mut rng = state.rng.clone();
    let mut next_id = state.next_pillar_id;
    while pillars.len() < config.pillar_count {
        match source.next_pillar(&pillars, &mut rng, next_id, config) {
            Ok(p) if p.is_finite() => {
                pillars.push(p);
                next_id += 1;
            }
            Ok(p) => {
                log::warn!("generator produced non-finite pillar {:?}, landing aborted", p.id);
                return;
            }
            Err(e) => {
                log::warn!("{e}, landing aborted");
                return;
            }
        }
    }

    let gained = target as u32;
    let score = state.score + gained;

    state.pillars = pillars;
    state.rng = rng;
    state.next_pillar_id = next_id;
    state.score = score;
    state.best = state.best.max(score);
    state.ball_speed = base_speed_for_score(score, config);
    state.ball_scale = config.scale_start;
    // Reverse orbit and restart from the opposite side each landing
    state.ball_direction = -state.ball_direction;
    state.ball_angle = normalize_angle_deg(state.ball_angle + 180.0);
    state.rotation_count = 0;
    state.time_on_pillar = 0.0;
    state.phase = GamePhase::Orbiting;

    state.events.push(GameEvent::PillarReached { gained, score });

    // Watermark, not a modulo: a multi-pillar jump that overshoots the
    // boundary still triggers exactly once
    if score > 0 && score >= state.last_theme_score + config.theme_change_interval {
        state.last_theme_score = score;
        state.events.push(GameEvent::ThemeChange);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pillars::PillarGenError;
    use glam::Vec2;
    use rand_pcg::Pcg32;

    const FRAME: f32 = 1.0 / 30.0;

    fn started(seed: u64) -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::new(seed, &config);
        state.start(&config);
        (state, config)
    }

    struct FailingSource;
    impl PillarSource for FailingSource {
        fn next_pillar(
            &mut self,
            _existing: &[Pillar],
            _rng: &mut Pcg32,
            _id: u64,
            _config: &GameConfig,
        ) -> Result<Pillar, PillarGenError> {
            Err(PillarGenError("injected fault"))
        }
    }

    /// Fails on the second call, so a partial replenishment must roll back
    struct FlakySource(u32);
    impl PillarSource for FlakySource {
        fn next_pillar(
            &mut self,
            existing: &[Pillar],
            rng: &mut Pcg32,
            id: u64,
            config: &GameConfig,
        ) -> Result<Pillar, PillarGenError> {
            self.0 += 1;
            if self.0 >= 2 {
                return Err(PillarGenError("injected fault"));
            }
            WalkGenerator.next_pillar(existing, rng, id, config)
        }
    }

    #[test]
    fn test_rotation_edge_detection() {
        let (mut state, config) = started(1);
        state.ball_angle = 350.0;
        state.ball_speed = 20.0; // 40° per frame at dt = 1/30

        tick(&mut state, &TickInput::default(), FRAME, &config);
        assert!((state.ball_angle - 30.0).abs() < 1e-3);
        assert_eq!(state.rotation_count, 1);
        assert!((state.ball_scale - 0.95).abs() < 1e-6);

        // Second frame: 30° -> 70°, no wraparound
        tick(&mut state, &TickInput::default(), FRAME, &config);
        assert_eq!(state.rotation_count, 1);
        assert!((state.ball_scale - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_edge_negative_direction() {
        let (mut state, config) = started(1);
        state.ball_angle = 30.0;
        state.ball_direction = -1.0;
        state.ball_speed = 20.0;

        tick(&mut state, &TickInput::default(), FRAME, &config);
        assert!((state.ball_angle - 350.0).abs() < 1e-3);
        assert_eq!(state.rotation_count, 1);
        assert!((state.ball_scale - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_no_rotation_mid_sweep() {
        let (mut state, config) = started(1);
        state.ball_angle = 100.0;
        state.ball_speed = 20.0;

        tick(&mut state, &TickInput::default(), FRAME, &config);
        assert_eq!(state.rotation_count, 0);
        assert!((state.ball_scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ball_too_small_ends_run() {
        let (mut state, config) = started(1);
        state.ball_angle = 350.0;
        state.ball_speed = 20.0;
        state.ball_scale = 0.21; // next shrink lands on the floor

        tick(&mut state, &TickInput::default(), FRAME, &config);
        assert_eq!(state.phase, GamePhase::Idle);
        // Movement not applied on the terminating frame
        assert!((state.ball_angle - 350.0).abs() < 1e-6);
        assert!(state.drain_events().contains(&GameEvent::GameOver {
            reason: GameOverReason::BallTooSmall
        }));
    }

    #[test]
    fn test_pause_suspends_advance() {
        let (mut state, config) = started(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, FRAME, &config);
        assert!(state.paused);

        let angle = state.ball_angle;
        let time = state.time_on_pillar;
        tick(&mut state, &TickInput::default(), FRAME, &config);
        assert_eq!(state.ball_angle, angle);
        assert_eq!(state.time_on_pillar, time);

        // Unpause resumes without losing anything
        tick(&mut state, &pause, FRAME, &config);
        assert!(!state.paused);
        tick(&mut state, &TickInput::default(), FRAME, &config);
        assert!(state.ball_angle != angle);
    }

    #[test]
    fn test_dt_clamp() {
        let (mut state, config) = started(1);
        state.ball_angle = 0.0;
        state.ball_speed = 2.0;

        // A 2-second hitch advances no further than one clamped frame
        tick(&mut state, &TickInput::default(), 2.0, &config);
        let expected = 2.0 * 1.0 * config.max_frame_dt * 60.0;
        assert!((state.ball_angle - expected).abs() < 1e-4);
    }

    #[test]
    fn test_non_finite_angle_recovers() {
        let (mut state, config) = started(1);
        state.ball_angle = f32::NAN;
        tick(&mut state, &TickInput::default(), FRAME, &config);
        assert!(state.ball_angle.is_finite());
        assert_eq!(state.phase, GamePhase::Orbiting);
    }

    fn aim_at_index_one(state: &mut GameState) {
        // Deterministic geometry: candidate straight along +x from the
        // occupied pillar, ball at angle 0
        state.pillars = vec![
            Pillar::new(0, Vec2::ZERO, 4.0),
            Pillar::new(1, Vec2::new(12.0, 0.0), 4.0),
            Pillar::new(2, Vec2::new(24.0, 0.0), 4.0),
            Pillar::new(3, Vec2::new(36.0, 0.0), 4.0),
            Pillar::new(4, Vec2::new(48.0, 0.0), 4.0),
            Pillar::new(5, Vec2::new(60.0, 0.0), 4.0),
        ];
        state.next_pillar_id = 6;
        state.ball_angle = 0.0;
    }

    #[test]
    fn test_jump_hit_starts_transition() {
        let (mut state, config) = started(1);
        aim_at_index_one(&mut state);

        assert_eq!(jump(&mut state, &config), Some(1));
        assert_eq!(state.phase, GamePhase::Jumping { target: 1 });
        assert!(state.drain_events().contains(&GameEvent::JumpStarted { target: 1 }));

        // Re-entrant tap mid-jump is ignored
        assert_eq!(jump(&mut state, &config), None);
        assert_eq!(state.phase, GamePhase::Jumping { target: 1 });
    }

    #[test]
    fn test_jump_miss_ends_run_and_updates_best() {
        let (mut state, config) = started(1);
        aim_at_index_one(&mut state);
        state.ball_angle = 180.0; // opposite side, nothing there
        state.score = 5;
        state.best = 3;

        assert_eq!(jump(&mut state, &config), None);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.best, 5);
        assert!(state.drain_events().contains(&GameEvent::GameOver {
            reason: GameOverReason::Missed
        }));
    }

    #[test]
    fn test_landing_scenario() {
        // Defaults, one jump landing at index 2: score 2, speed 2.4,
        // direction flipped, angle +180, 6 pillars with the 4 trailing
        // originals retained.
        let (mut state, config) = started(42);
        let before = state.pillars.clone();
        state.ball_angle = 37.0;
        state.phase = GamePhase::Jumping { target: 2 };

        on_pillar_reached(&mut state, &config);

        assert_eq!(state.score, 2);
        assert!((state.ball_speed - 2.4).abs() < 1e-6);
        assert_eq!(state.ball_direction, -1.0);
        assert!((state.ball_angle - 217.0).abs() < 1e-4);
        assert_eq!(state.phase, GamePhase::Orbiting);
        assert_eq!(state.pillars.len(), 6);
        // First 4 are the originally-trailing pillars, then 2 fresh IDs
        let kept: Vec<u64> = state.pillars[..4].iter().map(|p| p.id).collect();
        let expected: Vec<u64> = before[2..].iter().map(|p| p.id).collect();
        assert_eq!(kept, expected);
        assert_eq!(state.pillars[4].id, 6);
        assert_eq!(state.pillars[5].id, 7);
        assert_eq!(state.rotation_count, 0);
        assert_eq!(state.time_on_pillar, 0.0);
        assert!((state.ball_scale - config.scale_start).abs() < 1e-6);
    }

    #[test]
    fn test_all_or_nothing_on_generator_failure() {
        let (mut state, config) = started(42);
        state.phase = GamePhase::Jumping { target: 3 };
        let before = state.clone();

        on_pillar_reached_with(&mut state, &mut FailingSource, &config);
        assert_eq!(state, before);

        // Partial success then failure must also roll everything back
        on_pillar_reached_with(&mut state, &mut FlakySource(0), &config);
        assert_eq!(state, before);

        // The same landing still commits once the source behaves
        on_pillar_reached(&mut state, &config);
        assert_eq!(state.score, 3);
        assert_eq!(state.pillars.len(), config.pillar_count);
    }

    #[test]
    fn test_score_monotonic_and_theme_watermark() {
        let (mut state, config) = started(7);
        let mut last_score = 0;
        let mut theme_changes = 0;

        for target in [3usize, 3, 4, 1, 2] {
            state.phase = GamePhase::Jumping { target };
            on_pillar_reached(&mut state, &config);
            assert!(state.score >= last_score);
            last_score = state.score;
            theme_changes += state
                .drain_events()
                .iter()
                .filter(|e| **e == GameEvent::ThemeChange)
                .count();
        }

        // Score ran 3, 6, 10, 11, 13: one crossing of 10, none at 11/13
        assert_eq!(state.score, 13);
        assert_eq!(theme_changes, 1);
        assert_eq!(state.last_theme_score, 10);
        assert_eq!(state.best, 13);
    }

    #[test]
    fn test_determinism() {
        let config = GameConfig::default();
        let mut a = GameState::new(99, &config);
        let mut b = GameState::new(99, &config);
        a.start(&config);
        b.start(&config);
        assert_eq!(a.pillars, b.pillars);

        for _ in 0..120 {
            tick(&mut a, &TickInput::default(), FRAME, &config);
            tick(&mut b, &TickInput::default(), FRAME, &config);
        }
        a.phase = GamePhase::Jumping { target: 2 };
        b.phase = GamePhase::Jumping { target: 2 };
        on_pillar_reached(&mut a, &config);
        on_pillar_reached(&mut b, &config);

        assert_eq!(a, b);
    }
}
