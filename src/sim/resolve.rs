//! Collision resolution
//!
//! Scans projectiles against targets using the pool state at the start of
//! the pass. Removals are marked and compacted afterwards; anything spawned
//! by a hit (particles, power-ups) is deferred until the scan is over.

use glam::Vec2;

use super::geom::{Bounds, overlaps};
use super::spawn::{particle_burst, roll_power_up};
use super::state::{GameEvent, Particle, PowerUp, Session};

/// Resolve every pair of overlapping entities for this tick
pub fn resolve(session: &mut Session, events: &mut Vec<GameEvent>) {
    let deaths = bullets_vs_enemies(session);

    let mut particles: Vec<Particle> = Vec::new();
    let mut power_ups: Vec<PowerUp> = Vec::new();
    for pos in deaths {
        particles.extend(particle_burst(pos, &session.config, &mut session.rng));
        if let Some(drop) = roll_power_up(pos, session.now_ms, &session.config, &mut session.rng) {
            power_ups.push(drop);
        }
        session.score = session.score.saturating_add(session.config.score_per_enemy);
        session.shake.impulse(session.config.shake_impulse);
        log::debug!("Enemy destroyed at {pos:?}, score {}", session.score);
        events.push(GameEvent::EnemyExploded { pos });
    }

    enemy_bullets_vs_ship(session, events);
    power_ups_vs_ship(session, events);

    session.bullets.compact();
    session.enemy_bullets.compact();
    session.power_ups.compact();

    session.particles.extend(particles);
    session.power_ups.extend(power_ups);
}

/// First living enemy in formation order wins each bullet.
/// Returns the death positions in resolution order.
fn bullets_vs_enemies(session: &mut Session) -> Vec<Vec2> {
    let Session {
        bullets, enemies, ..
    } = session;

    let mut deaths = Vec::new();
    for bi in 0..bullets.len() {
        if bullets.is_marked(bi) {
            continue;
        }
        let Some(bullet_rect) = bullets.get(bi).map(|b| b.rect()) else {
            continue;
        };
        let target = enemies
            .iter_mut()
            .find(|e| e.is_alive() && overlaps(&bullet_rect, &e.rect()));
        if let Some(enemy) = target {
            if enemy.kill() {
                deaths.push(enemy.pos);
            }
            bullets.mark(bi);
        }
    }
    deaths
}

fn enemy_bullets_vs_ship(session: &mut Session, events: &mut Vec<GameEvent>) {
    let ship_rect = session.ship.rect();
    let hits: Vec<usize> = session
        .enemy_bullets
        .live()
        .filter(|(_, b)| overlaps(&b.rect(), &ship_rect))
        .map(|(i, _)| i)
        .collect();

    for bi in hits {
        session.enemy_bullets.mark(bi);
        if session.lives == 0 {
            log::warn!("Ship hit with no lives left; clamping at 0");
            continue;
        }
        session.lives -= 1;
        log::debug!("Ship hit, {} lives left", session.lives);
        events.push(GameEvent::PlayerHit {
            lives: session.lives,
        });
    }
}

fn power_ups_vs_ship(session: &mut Session, events: &mut Vec<GameEvent>) {
    let ship_rect = session.ship.rect();
    let picked: Vec<usize> = session
        .power_ups
        .live()
        .filter(|(_, p)| overlaps(&p.rect(), &ship_rect))
        .map(|(i, _)| i)
        .collect();

    for pi in picked {
        let Some(kind) = session.power_ups.get(pi).map(|p| p.kind) else {
            continue;
        };
        session.power_ups.mark(pi);
        session
            .ship
            .grant_power_up(kind, session.now_ms, session.config.power_up_duration_ms);
        log::debug!("Collected {kind:?}");
        events.push(GameEvent::PowerUpCollected { kind });
    }
}
