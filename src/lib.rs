//! Pirates - a fixed-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawners, collisions, session state)
//! - `config`: Data-driven game tuning
//! - `audio`: Sound cue mapping for simulation events
//! - `highscores`: Persistent leaderboard fed from finished sessions

pub mod audio;
pub mod config;
pub mod error;
pub mod highscores;
pub mod sim;

pub use config::GameConfig;
pub use error::ConfigError;
pub use highscores::HighScores;

/// Default tuning values
pub mod consts {
    /// Target host frame rate
    pub const TARGET_HZ: u32 = 60;
    /// Wall-clock length of one frame at the target rate (ms)
    pub const FRAME_MS: u64 = 1000 / TARGET_HZ as u64;

    /// Playfield dimensions
    pub const SURFACE_WIDTH: f32 = 480.0;
    pub const SURFACE_HEIGHT: f32 = 640.0;

    /// Player ship
    pub const SHIP_WIDTH: f32 = 48.0;
    pub const SHIP_HEIGHT: f32 = 48.0;
    /// Distance from the bottom edge to the ship's top
    pub const SHIP_BOTTOM_OFFSET: f32 = 60.0;
    pub const SHIP_SPEED: f32 = 6.0;
    pub const STARTING_LIVES: u32 = 3;
    pub const FIRE_COOLDOWN_MS: u64 = 280;

    /// Player bullets (negative velocity = upward)
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 12.0;
    pub const BULLET_VELOCITY: f32 = -7.0;

    /// Enemy formation
    pub const FORMATION_ROWS: u32 = 4;
    pub const FORMATION_COLS: u32 = 8;
    pub const FORMATION_MARGIN_X: f32 = 40.0;
    pub const FORMATION_MARGIN_Y: f32 = 40.0;
    pub const FORMATION_STEP_X: f32 = 48.0;
    pub const FORMATION_STEP_Y: f32 = 40.0;
    pub const ENEMY_WIDTH: f32 = 36.0;
    pub const ENEMY_HEIGHT: f32 = 28.0;

    /// Enemy fire
    pub const ENEMY_FIRE_INTERVAL_MS: u64 = 1200;
    pub const ENEMY_BULLET_VELOCITY: f32 = 3.0;

    /// Power-ups
    pub const POWER_UP_DROP_CHANCE: f64 = 0.15;
    pub const POWER_UP_DURATION_MS: u64 = 5000;
    pub const POWER_UP_SIZE: f32 = 16.0;
    pub const POWER_UP_FALL_SPEED: f32 = 2.0;
    pub const MULTISHOT_BULLETS: u32 = 3;
    pub const MULTISHOT_SPACING: f32 = 12.0;

    /// Explosion particles
    pub const PARTICLE_COUNT: u32 = 14;
    pub const PARTICLE_SPEED: f32 = 2.0;
    pub const PARTICLE_LIFETIME: u32 = 35;
    pub const PARTICLE_SIZE: f32 = 2.0;

    /// Scoring
    pub const SCORE_PER_ENEMY: u64 = 10;

    /// Screen shake
    pub const SHAKE_IMPULSE: f32 = 6.0;
    pub const SHAKE_DECAY: f32 = 0.9;
    /// Below this the shake snaps to zero
    pub const SHAKE_EPSILON: f32 = 0.01;
}
