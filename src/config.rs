//! Game tuning
//!
//! Every gameplay constant the simulation reads lives here, so variants of
//! the game are data rather than code. Partial JSON documents override the
//! defaults field by field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Horizontal formation drift (disabled unless present in the config)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Horizontal units per tick
    pub speed: f32,
    /// Vertical step taken each time the formation bounces off an edge
    #[serde(default)]
    pub drop: f32,
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub surface_width: f32,
    pub surface_height: f32,

    // === Player ===
    pub ship_width: f32,
    pub ship_height: f32,
    /// Distance from the bottom edge of the surface to the top of the ship
    pub ship_bottom_offset: f32,
    pub ship_speed: f32,
    pub starting_lives: u32,
    /// Minimum wall-clock interval between accepted shots (ms)
    pub fire_cooldown_ms: u64,
    pub bullet_width: f32,
    pub bullet_height: f32,
    /// Vertical velocity of player bullets (negative = upward)
    pub bullet_velocity: f32,

    // === Formation ===
    pub formation_rows: u32,
    pub formation_cols: u32,
    pub formation_margin_x: f32,
    pub formation_margin_y: f32,
    pub formation_step_x: f32,
    pub formation_step_y: f32,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_drift: Option<DriftConfig>,

    // === Enemy fire ===
    pub enemy_fire_interval_ms: u64,
    pub enemy_bullet_width: f32,
    pub enemy_bullet_height: f32,
    /// Vertical velocity of enemy bullets (positive = downward)
    pub enemy_bullet_velocity: f32,

    // === Power-ups ===
    pub power_up_drop_chance: f64,
    pub power_up_duration_ms: u64,
    pub power_up_size: f32,
    pub power_up_fall_speed: f32,
    /// Uncollected power-ups vanish after this long (ms), if set
    pub power_up_ttl_ms: Option<u64>,
    pub multishot_bullets: u32,
    pub multishot_spacing: f32,

    // === Effects ===
    pub particle_count: u32,
    /// Per-axis particle velocity range is [-speed, speed]
    pub particle_speed: f32,
    /// Particle lifetime in ticks
    pub particle_lifetime: u32,
    pub shake_impulse: f32,
    pub shake_decay: f32,

    // === Scoring ===
    pub score_per_enemy: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,

            ship_width: SHIP_WIDTH,
            ship_height: SHIP_HEIGHT,
            ship_bottom_offset: SHIP_BOTTOM_OFFSET,
            ship_speed: SHIP_SPEED,
            starting_lives: STARTING_LIVES,
            fire_cooldown_ms: FIRE_COOLDOWN_MS,
            bullet_width: BULLET_WIDTH,
            bullet_height: BULLET_HEIGHT,
            bullet_velocity: BULLET_VELOCITY,

            formation_rows: FORMATION_ROWS,
            formation_cols: FORMATION_COLS,
            formation_margin_x: FORMATION_MARGIN_X,
            formation_margin_y: FORMATION_MARGIN_Y,
            formation_step_x: FORMATION_STEP_X,
            formation_step_y: FORMATION_STEP_Y,
            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,
            enemy_drift: None,

            enemy_fire_interval_ms: ENEMY_FIRE_INTERVAL_MS,
            enemy_bullet_width: BULLET_WIDTH,
            enemy_bullet_height: BULLET_HEIGHT,
            enemy_bullet_velocity: ENEMY_BULLET_VELOCITY,

            power_up_drop_chance: POWER_UP_DROP_CHANCE,
            power_up_duration_ms: POWER_UP_DURATION_MS,
            power_up_size: POWER_UP_SIZE,
            power_up_fall_speed: POWER_UP_FALL_SPEED,
            power_up_ttl_ms: None,
            multishot_bullets: MULTISHOT_BULLETS,
            multishot_spacing: MULTISHOT_SPACING,

            particle_count: PARTICLE_COUNT,
            particle_speed: PARTICLE_SPEED,
            particle_lifetime: PARTICLE_LIFETIME,
            shake_impulse: SHAKE_IMPULSE,
            shake_decay: SHAKE_DECAY,

            score_per_enemy: SCORE_PER_ENEMY,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("surface_width", self.surface_width)?;
        positive("surface_height", self.surface_height)?;

        positive("ship_width", self.ship_width)?;
        positive("ship_height", self.ship_height)?;
        if self.ship_width > self.surface_width {
            return Err(ConfigError::invalid(
                "ship_width",
                format!("{} exceeds surface width {}", self.ship_width, self.surface_width),
            ));
        }
        if self.ship_height > self.surface_height {
            return Err(ConfigError::invalid(
                "ship_height",
                format!("{} exceeds surface height {}", self.ship_height, self.surface_height),
            ));
        }
        non_negative("ship_bottom_offset", self.ship_bottom_offset)?;
        if self.ship_bottom_offset > self.surface_height {
            return Err(ConfigError::invalid(
                "ship_bottom_offset",
                "ship would start above the surface",
            ));
        }
        if self.ship_bottom_offset < self.ship_height {
            return Err(ConfigError::invalid(
                "ship_bottom_offset",
                format!(
                    "{} leaves the {} high ship below the bottom edge",
                    self.ship_bottom_offset, self.ship_height
                ),
            ));
        }
        positive("ship_speed", self.ship_speed)?;
        if self.starting_lives == 0 {
            return Err(ConfigError::invalid("starting_lives", "must be at least 1"));
        }
        positive("bullet_width", self.bullet_width)?;
        positive("bullet_height", self.bullet_height)?;
        if !(self.bullet_velocity.is_finite() && self.bullet_velocity < 0.0) {
            return Err(ConfigError::invalid("bullet_velocity", "must be negative (upward)"));
        }

        if self.formation_rows == 0 {
            return Err(ConfigError::invalid("formation_rows", "must be at least 1"));
        }
        if self.formation_cols == 0 {
            return Err(ConfigError::invalid("formation_cols", "must be at least 1"));
        }
        non_negative("formation_margin_x", self.formation_margin_x)?;
        non_negative("formation_margin_y", self.formation_margin_y)?;
        non_negative("formation_step_x", self.formation_step_x)?;
        non_negative("formation_step_y", self.formation_step_y)?;
        positive("enemy_width", self.enemy_width)?;
        positive("enemy_height", self.enemy_height)?;
        let extent = self.formation_extent();
        if extent.x > self.surface_width {
            return Err(ConfigError::invalid(
                "formation_cols",
                format!("formation spans {} of {} surface width", extent.x, self.surface_width),
            ));
        }
        if extent.y > self.surface_height {
            return Err(ConfigError::invalid(
                "formation_rows",
                format!("formation spans {} of {} surface height", extent.y, self.surface_height),
            ));
        }
        if let Some(drift) = &self.enemy_drift {
            positive("enemy_drift.speed", drift.speed)?;
            non_negative("enemy_drift.drop", drift.drop)?;
        }

        if self.enemy_fire_interval_ms == 0 {
            return Err(ConfigError::invalid("enemy_fire_interval_ms", "must be non-zero"));
        }
        positive("enemy_bullet_width", self.enemy_bullet_width)?;
        positive("enemy_bullet_height", self.enemy_bullet_height)?;
        positive("enemy_bullet_velocity", self.enemy_bullet_velocity)?;

        if !(0.0..=1.0).contains(&self.power_up_drop_chance) {
            return Err(ConfigError::invalid(
                "power_up_drop_chance",
                format!("{} is not a probability", self.power_up_drop_chance),
            ));
        }
        positive("power_up_size", self.power_up_size)?;
        non_negative("power_up_fall_speed", self.power_up_fall_speed)?;
        if self.multishot_bullets == 0 {
            return Err(ConfigError::invalid("multishot_bullets", "must be at least 1"));
        }
        non_negative("multishot_spacing", self.multishot_spacing)?;

        non_negative("particle_speed", self.particle_speed)?;
        if self.particle_lifetime == 0 {
            return Err(ConfigError::invalid("particle_lifetime", "must be at least 1 tick"));
        }
        non_negative("shake_impulse", self.shake_impulse)?;
        if !(0.0..=1.0).contains(&self.shake_decay) {
            return Err(ConfigError::invalid("shake_decay", "must lie in [0, 1]"));
        }

        Ok(())
    }

    pub fn ship_size(&self) -> Vec2 {
        Vec2::new(self.ship_width, self.ship_height)
    }

    pub fn bullet_size(&self) -> Vec2 {
        Vec2::new(self.bullet_width, self.bullet_height)
    }

    pub fn enemy_size(&self) -> Vec2 {
        Vec2::new(self.enemy_width, self.enemy_height)
    }

    pub fn enemy_bullet_size(&self) -> Vec2 {
        Vec2::new(self.enemy_bullet_width, self.enemy_bullet_height)
    }

    pub fn power_up_size(&self) -> Vec2 {
        Vec2::splat(self.power_up_size)
    }

    /// Total enemies in one formation
    pub fn formation_len(&self) -> usize {
        (self.formation_rows * self.formation_cols) as usize
    }

    /// Right and bottom edges of a freshly laid out formation
    pub fn formation_extent(&self) -> Vec2 {
        Vec2::new(
            self.formation_margin_x
                + self.formation_cols.saturating_sub(1) as f32 * self.formation_step_x
                + self.enemy_width,
            self.formation_margin_y
                + self.formation_rows.saturating_sub(1) as f32 * self.formation_step_y
                + self.enemy_height,
        )
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must not be negative")))
    }
}
