//! Spawners: formation layout, enemy fire, power-up drops and explosions

use glam::Vec2;
use rand::Rng;

use super::pool::Pool;
use super::state::{Enemy, EnemyBullet, Particle, PowerUp, PowerUpKind};
use crate::config::{DriftConfig, GameConfig};

/// Lay out a fresh formation, row-major, every member alive
pub fn formation(config: &GameConfig) -> Pool<Enemy> {
    let drift = config.enemy_drift.map(|_| 1.0);
    let size = config.enemy_size();
    let mut enemies = Pool::new();
    for row in 0..config.formation_rows {
        for col in 0..config.formation_cols {
            let pos = Vec2::new(
                config.formation_margin_x + col as f32 * config.formation_step_x,
                config.formation_margin_y + row as f32 * config.formation_step_y,
            );
            enemies.push(Enemy::new(pos, size, drift));
        }
    }
    enemies
}

/// Slide the formation sideways; on touching an edge, reverse and step down.
pub fn drift_formation(enemies: &mut Pool<Enemy>, drift: &DriftConfig, surface_width: f32) {
    let Some(dir) = enemies.iter().find_map(|e| e.drift) else {
        return;
    };
    let dx = dir * drift.speed;

    let hits_edge = enemies
        .iter()
        .filter(|e| e.is_alive())
        .any(|e| e.pos.x + dx < 0.0 || e.pos.x + e.size.x + dx > surface_width);

    for enemy in enemies.iter_mut() {
        if hits_edge {
            enemy.drift = Some(-dir);
            enemy.pos.y += drift.drop;
        } else {
            enemy.pos.x += dx;
        }
    }
}

/// Periodic wall-clock timer for enemy fire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireSchedule {
    pub interval_ms: u64,
    /// Next deadline; `None` until armed
    pub next_at: Option<u64>,
}

impl FireSchedule {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            next_at: None,
        }
    }

    /// Start counting from `now`
    pub fn arm(&mut self, now: u64) {
        self.next_at = Some(now + self.interval_ms);
    }

    /// True at most once per call when a deadline has passed. Missed
    /// deadlines are skipped rather than fired in a burst.
    pub fn poll(&mut self, now: u64) -> bool {
        let Some(next) = self.next_at else {
            return false;
        };
        if now < next {
            return false;
        }
        let missed = (now - next) / self.interval_ms;
        self.next_at = Some(next + (missed + 1) * self.interval_ms);
        true
    }

    /// Push the deadline back by a paused interval
    pub fn shift(&mut self, by_ms: u64) {
        if let Some(next) = self.next_at.as_mut() {
            *next += by_ms;
        }
    }
}

/// Uniformly choose a living enemy, if any
pub fn pick_shooter<R: Rng>(enemies: &Pool<Enemy>, rng: &mut R) -> Option<usize> {
    let alive: Vec<usize> = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_alive())
        .map(|(i, _)| i)
        .collect();
    if alive.is_empty() {
        return None;
    }
    Some(alive[rng.random_range(0..alive.len())])
}

/// A bullet leaving the bottom centre of an enemy
pub fn enemy_shot(enemy: &Enemy, config: &GameConfig) -> EnemyBullet {
    let size = config.enemy_bullet_size();
    EnemyBullet {
        pos: Vec2::new(
            enemy.pos.x + enemy.size.x / 2.0 - size.x / 2.0,
            enemy.pos.y + enemy.size.y,
        ),
        size,
        vy: config.enemy_bullet_velocity,
    }
}

/// Roll the drop chance for a power-up at a death position
pub fn roll_power_up<R: Rng>(
    pos: Vec2,
    now: u64,
    config: &GameConfig,
    rng: &mut R,
) -> Option<PowerUp> {
    if !rng.random_bool(config.power_up_drop_chance) {
        return None;
    }
    Some(PowerUp {
        pos,
        size: config.power_up_size(),
        kind: PowerUpKind::Multishot,
        spawned_at: now,
    })
}

/// Explosion particles at a death position
pub fn particle_burst<R: Rng>(pos: Vec2, config: &GameConfig, rng: &mut R) -> Vec<Particle> {
    let s = config.particle_speed;
    (0..config.particle_count)
        .map(|_| Particle {
            pos,
            vel: Vec2::new(rng.random_range(-s..=s), rng.random_range(-s..=s)),
            life: config.particle_lifetime,
        })
        .collect()
}
