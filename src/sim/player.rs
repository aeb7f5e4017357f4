//! Player controller: movement, rate-limited fire, power-up timing

use glam::Vec2;

use super::state::{MoveIntent, PlayerBullet, PowerUpKind, Ship};
use crate::config::GameConfig;

impl Ship {
    /// Move by `speed` in the held direction, then clamp to the playfield
    pub fn steer(&mut self, intent: MoveIntent, surface_width: f32) {
        self.pos.x += self.speed * intent.sign();
        self.clamp_to(surface_width);
    }

    pub fn clamp_to(&mut self, surface_width: f32) {
        self.pos.x = self.pos.x.clamp(0.0, (surface_width - self.size.x).max(0.0));
    }

    /// Attempt a shot at wall-clock `now`.
    ///
    /// Returns the bullets to spawn, or an empty vec if still cooling down.
    /// Multishot fans out into parallel bullets centred on the single shot.
    pub fn try_fire(&mut self, now: u64, config: &GameConfig) -> Vec<PlayerBullet> {
        if let Some(last) = self.last_shot_at {
            if now.saturating_sub(last) < config.fire_cooldown_ms || now < last {
                return Vec::new();
            }
        }
        self.last_shot_at = Some(now);

        let size = config.bullet_size();
        let center = Vec2::new(self.pos.x + self.size.x / 2.0 - size.x / 2.0, self.pos.y);
        let count = if self.multishot {
            config.multishot_bullets
        } else {
            1
        };
        let first = -(count as f32 - 1.0) / 2.0 * config.multishot_spacing;
        (0..count)
            .map(|i| PlayerBullet {
                pos: center + Vec2::new(first + i as f32 * config.multishot_spacing, 0.0),
                size,
                vy: config.bullet_velocity,
            })
            .collect()
    }

    pub fn grant_power_up(&mut self, kind: PowerUpKind, now: u64, duration_ms: u64) {
        match kind {
            PowerUpKind::Multishot => {
                self.multishot = true;
                self.power_up_expires_at = now + duration_ms;
            }
        }
    }

    /// Clear the power-up once its wall-clock expiry has passed
    pub fn expire_power_up(&mut self, now: u64) {
        if self.multishot && now > self.power_up_expires_at {
            log::debug!("Multishot expired at {now}ms");
            self.multishot = false;
        }
    }

    /// Push wall-clock timers back by a paused interval
    pub fn shift_timers(&mut self, by_ms: u64) {
        if self.multishot {
            self.power_up_expires_at += by_ms;
        }
        if let Some(last) = self.last_shot_at.as_mut() {
            *last += by_ms;
        }
    }
}
