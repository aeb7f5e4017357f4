//! Render-ready view of a session
//!
//! Everything a renderer needs for one frame, detached from the session.

use glam::Vec2;
use serde::Serialize;

use super::geom::{Bounds, Rect};
use super::state::{PowerUpKind, Session, SessionPhase};
use crate::consts::PARTICLE_SIZE;

#[derive(Debug, Clone, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub size: f32,
    /// Remaining lifetime in ticks
    pub life: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PowerUpView {
    pub rect: Rect,
    pub kind: PowerUpKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub ship: Rect,
    pub multishot: bool,
    pub bullets: Vec<Rect>,
    pub enemy_bullets: Vec<Rect>,
    /// Living enemies only
    pub enemies: Vec<Rect>,
    pub particles: Vec<ParticleView>,
    pub power_ups: Vec<PowerUpView>,
    /// Offset to translate the whole frame by
    pub shake_offset: Vec2,
}

impl Session {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            level: self.level,
            ship: self.ship.rect(),
            multishot: self.ship.multishot,
            bullets: self.bullets.iter().map(Bounds::rect).collect(),
            enemy_bullets: self.enemy_bullets.iter().map(Bounds::rect).collect(),
            enemies: self
                .enemies
                .iter()
                .filter(|e| e.is_alive())
                .map(Bounds::rect)
                .collect(),
            particles: self
                .particles
                .iter()
                .map(|p| ParticleView {
                    pos: p.pos,
                    size: PARTICLE_SIZE,
                    life: p.life,
                })
                .collect(),
            power_ups: self
                .power_ups
                .iter()
                .map(|p| PowerUpView {
                    rect: p.rect(),
                    kind: p.kind,
                })
                .collect(),
            shake_offset: self.shake_offset,
        }
    }
}
