//! Session state and core simulation types
//!
//! Everything the tick mutates lives in one `Session` aggregate, owned by
//! the host for the lifetime of a play-through.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::{Bounds, Rect};
use super::pool::Pool;
use super::spawn::{FireSchedule, formation};
use crate::config::GameConfig;
use crate::consts::SHAKE_EPSILON;
use crate::error::ConfigError;

/// Coarse session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for a start signal
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen, resumable
    Paused,
    /// Terminal - a new session is required to play again
    GameOver,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Multishot,
}

/// Horizontal movement intent for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveIntent {
    #[default]
    None,
    Left,
    Right,
}

impl MoveIntent {
    pub fn sign(self) -> f32 {
        match self {
            MoveIntent::None => 0.0,
            MoveIntent::Left => -1.0,
            MoveIntent::Right => 1.0,
        }
    }
}

/// Discrete signals for the audio/effects collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    /// A shot was accepted (one event regardless of multishot fan-out)
    ShotFired { bullets: u32 },
    /// An enemy died at this position (also the renderer's explosion cue)
    EnemyExploded { pos: Vec2 },
    PowerUpCollected { kind: PowerUpKind },
    /// An enemy bullet struck the ship
    PlayerHit { lives: u32 },
    LevelAdvanced { level: u32 },
    SessionEnded { final_score: u64 },
}

/// The player's craft
#[derive(Debug, Clone)]
pub struct Ship {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal units per tick
    pub speed: f32,
    /// Multishot power-up active
    pub multishot: bool,
    /// Wall-clock time (ms) after which multishot lapses
    pub power_up_expires_at: u64,
    /// Wall-clock time (ms) of the last accepted shot
    pub last_shot_at: Option<u64>,
}

impl Ship {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::new(
                config.surface_width / 2.0 - config.ship_width / 2.0,
                config.surface_height - config.ship_bottom_offset,
            ),
            size: config.ship_size(),
            speed: config.ship_speed,
            multishot: false,
            power_up_expires_at: 0,
            last_shot_at: None,
        }
    }
}

impl Bounds for Ship {
    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

#[derive(Debug, Clone)]
pub struct PlayerBullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Negative = upward
    pub vy: f32,
}

impl Bounds for PlayerBullet {
    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

#[derive(Debug, Clone)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Positive = downward
    pub vy: f32,
}

impl Bounds for EnemyBullet {
    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A formation member. Once dead, stays dead.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal drift direction (+1 right, -1 left) when drift is enabled
    pub drift: Option<f32>,
    alive: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, size: Vec2, drift: Option<f32>) -> Self {
        Self {
            pos,
            size,
            drift,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Flip alive to dead. Returns false (and changes nothing) if already dead.
    pub fn kill(&mut self) -> bool {
        if !self.alive {
            log::warn!("Ignoring kill of already-dead enemy at {:?}", self.pos);
            return false;
        }
        self.alive = false;
        true
    }
}

impl Bounds for Enemy {
    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A particle for explosion effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in ticks
    pub life: u32,
}

/// A falling power-up capsule
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
    /// Wall-clock time (ms) the capsule dropped
    pub spawned_at: u64,
}

impl Bounds for PowerUp {
    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Decaying screen-shake magnitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenShake {
    pub magnitude: f32,
    pub decay: f32,
}

impl ScreenShake {
    pub fn new(decay: f32) -> Self {
        Self {
            magnitude: 0.0,
            decay,
        }
    }

    pub fn impulse(&mut self, power: f32) {
        self.magnitude = power;
    }

    /// Draw this tick's render offset from [-m/2, m/2] on both axes, then decay
    pub fn sample_and_decay<R: Rng>(&mut self, rng: &mut R) -> Vec2 {
        if self.magnitude <= 0.0 {
            return Vec2::ZERO;
        }
        let half = self.magnitude / 2.0;
        let offset = Vec2::new(rng.random_range(-half..=half), rng.random_range(-half..=half));
        self.magnitude *= self.decay;
        if self.magnitude < SHAKE_EPSILON {
            self.magnitude = 0.0;
        }
        offset
    }
}

/// One play-through, from menu to game over
#[derive(Debug, Clone)]
pub struct Session {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: SessionPhase,
    pub score: u64,
    pub lives: u32,
    /// Current level (1-based)
    pub level: u32,
    /// Ticks spent in `Playing`
    pub time_ticks: u64,
    /// Wall-clock time (ms) seen by the latest tick
    pub now_ms: u64,
    pub ship: Ship,
    pub bullets: Pool<PlayerBullet>,
    pub enemy_bullets: Pool<EnemyBullet>,
    /// Current formation (dead members remain until the next level)
    pub enemies: Pool<Enemy>,
    pub particles: Pool<Particle>,
    pub power_ups: Pool<PowerUp>,
    pub shake: ScreenShake,
    /// Render offset sampled this tick
    pub shake_offset: Vec2,
    pub fire_schedule: FireSchedule,
    /// Enemy-fire requests queued by an external timer
    pub(crate) pending_enemy_fire: u32,
    /// Wall-clock time the session was paused at
    pub(crate) paused_at: Option<u64>,
    /// Gameplay randomness (fire selection, drops, particles)
    pub(crate) rng: Pcg32,
    /// Cosmetic randomness (shake offsets); never affects gameplay
    pub(crate) fx_rng: Pcg32,
}

impl Session {
    /// Create a session in the menu with a fresh formation
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = Self {
            seed,
            phase: SessionPhase::Menu,
            score: 0,
            lives: config.starting_lives,
            level: 1,
            time_ticks: 0,
            now_ms: 0,
            ship: Ship::new(&config),
            bullets: Pool::new(),
            enemy_bullets: Pool::new(),
            enemies: formation(&config),
            particles: Pool::new(),
            power_ups: Pool::new(),
            shake: ScreenShake::new(config.shake_decay),
            shake_offset: Vec2::ZERO,
            fire_schedule: FireSchedule::new(config.enemy_fire_interval_ms),
            pending_enemy_fire: 0,
            paused_at: None,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed.rotate_left(32) ^ 0x9e37_79b9_7f4a_7c15),
            config,
        };
        log::info!(
            "New session (seed {}): {}x{} formation",
            seed,
            session.config.formation_rows,
            session.config.formation_cols
        );
        Ok(session)
    }

    /// Queue one enemy shot for the next tick boundary.
    ///
    /// For hosts that drive enemy fire from their own timer instead of the
    /// built-in schedule. Requests arriving outside `Playing` are dropped.
    pub fn request_enemy_fire(&mut self) {
        self.pending_enemy_fire = self.pending_enemy_fire.saturating_add(1);
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }
}
