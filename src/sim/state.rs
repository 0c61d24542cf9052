//! Game state and core simulation types
//!
//! Everything needed to replay or resume a run lives here. One canonical
//! record with all fields always present; the host owns the value and the
//! `sim` functions mutate it in place.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::sim::pillars::create_initial_pillars;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run in progress (fresh state or game over)
    Idle,
    /// Ball rotating around `pillars[0]`, waiting for input
    Orbiting,
    /// Ball transiting toward `pillars[target]`; the visual interpolation is
    /// the host's, the authoritative transition happens in `on_pillar_reached`
    Jumping { target: usize },
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Jump released with no pillar within landing tolerance
    Missed,
    /// Ball shrank to the scale floor
    BallTooSmall,
}

/// Outputs for the host, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Successful hit test; the host starts its jump animation toward
    /// `pillars[target]`
    JumpStarted { target: usize },
    /// Landing transition committed
    PillarReached { gained: u32, score: u32 },
    /// Score crossed a theme-change boundary
    ThemeChange,
    /// Run ended; the host stops frame advancement and shows end-of-run UI
    GameOver { reason: GameOverReason },
}

/// A cylindrical platform on the ground plane.
///
/// Immutable once created; passed pillars are discarded, never mutated.
/// `pos` is (x, z).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pillar {
    pub id: u64,
    pub pos: Vec2,
    pub radius: f32,
}

impl Pillar {
    pub fn new(id: u64, pos: Vec2, radius: f32) -> Self {
        Self { id, pos, radius }
    }

    /// NaN/Infinity guard for host-supplied or generated geometry
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.radius.is_finite() && self.radius > 0.0
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG for procedural placement; serialized so a resumed run continues
    /// the same sequence
    pub rng: Pcg32,

    /// Current phase
    pub phase: GamePhase,
    /// Pause suspends the per-frame advance; no state is lost
    pub paused: bool,

    /// Score of the current run
    pub score: u32,
    /// Best score seen by this state, non-decreasing across runs
    pub best: u32,

    /// Ball angle around `pillars[0]`, degrees in [0, 360)
    pub ball_angle: f32,
    /// Angular speed (degrees per 1/60 s frame)
    pub ball_speed: f32,
    /// +1.0 or -1.0; flipped on each landing
    pub ball_direction: f32,
    /// Shrinks per completed rotation; the floor ends the run
    pub ball_scale: f32,

    /// Index 0 is always the pillar the ball rests on
    pub pillars: Vec<Pillar>,
    /// Completed 360° cycles since the last landing
    pub rotation_count: u32,
    /// Seconds since the last landing (feeds the alternate time-based
    /// models in `scaling`; not used by the frame advance itself)
    pub time_on_pillar: f32,
    /// Watermark for the every-N-points theme signal
    pub last_theme_score: u32,
    /// Monotone pillar ID allocator, unique across the run
    pub next_pillar_id: u64,

    /// Pending outputs for the host
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle state with no pillar field. Call [`GameState::start`]
    /// to begin a run.
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            paused: false,
            score: 0,
            best: 0,
            ball_angle: 0.0,
            ball_speed: config.base_speed,
            ball_direction: 1.0,
            ball_scale: config.scale_start,
            pillars: Vec::new(),
            rotation_count: 0,
            time_on_pillar: 0.0,
            last_theme_score: 0,
            next_pillar_id: 0,
            events: Vec::new(),
        }
    }

    /// Begin a fresh run. Best score carries over; everything else resets and
    /// the pillar field is regenerated.
    pub fn start(&mut self, config: &GameConfig) {
        self.best = self.best.max(self.score);
        self.score = 0;
        self.paused = false;
        self.ball_angle = 0.0;
        self.ball_speed = config.base_speed;
        self.ball_direction = 1.0;
        self.ball_scale = config.scale_start;
        self.rotation_count = 0;
        self.time_on_pillar = 0.0;
        self.last_theme_score = 0;
        self.pillars = create_initial_pillars(&mut self.rng, config);
        self.next_pillar_id = self.pillars.len() as u64;
        self.phase = GamePhase::Orbiting;
        self.events.clear();
        log::info!("run started (seed {}, best {})", self.seed, self.best);
    }

    /// Whether a run is live (orbiting or mid-jump)
    pub fn playing(&self) -> bool {
        self.phase != GamePhase::Idle
    }

    /// Jump target index, 0 when not jumping
    pub fn target_pillar(&self) -> usize {
        match self.phase {
            GamePhase::Jumping { target } => target,
            _ => 0,
        }
    }

    /// The pillar the ball currently occupies
    pub fn current_pillar(&self) -> Option<&Pillar> {
        self.pillars.first()
    }

    /// End the current run. Terminal for this run; a new run goes through
    /// [`GameState::start`].
    pub fn end_game(&mut self, reason: GameOverReason) {
        if self.phase == GamePhase::Idle {
            return;
        }
        self.best = self.best.max(self.score);
        self.phase = GamePhase::Idle;
        self.events.push(GameEvent::GameOver { reason });
        log::info!(
            "game over ({:?}): score {}, best {}",
            reason,
            self.score,
            self.best
        );
    }

    /// Replace the pillar field from the host, validating first.
    ///
    /// Rejects wrong-length or malformed (non-finite) lists and keeps the
    /// previous valid field. Returns whether the update was applied.
    pub fn replace_pillars(&mut self, pillars: Vec<Pillar>, config: &GameConfig) -> bool {
        if pillars.len() != config.pillar_count || pillars.iter().any(|p| !p.is_finite()) {
            log::warn!("rejected invalid pillar list ({} entries)", pillars.len());
            return false;
        }
        self.pillars = pillars;
        true
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
