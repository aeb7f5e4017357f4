//! Per-frame simulation tick
//!
//! Single entry point the host calls once per frame. Order within a
//! playing tick: player -> kinematics -> spawners -> collisions -> session
//! rules.

use super::resolve::resolve;
use super::spawn::{drift_formation, enemy_shot, formation, pick_shooter};
use super::state::{GameEvent, MoveIntent, Session, SessionPhase};

/// Host input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Current wall-clock time (ms, monotonic)
    pub now_ms: u64,
    /// Held movement direction
    pub movement: MoveIntent,
    /// Fire button held
    pub fire: bool,
    /// Pause toggle (edge)
    pub pause: bool,
    /// Start / resume (edge)
    pub start: bool,
}

/// Advance the session by one frame and return the events it produced
pub fn tick(session: &mut Session, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    session.now_ms = input.now_ms;

    handle_transitions(session, input);

    if session.phase != SessionPhase::Playing {
        session.pending_enemy_fire = 0;
        return events;
    }

    session.shake_offset = session.shake.sample_and_decay(&mut session.fx_rng);

    session.time_ticks += 1;
    let now = input.now_ms;

    // Player
    session.ship.expire_power_up(now);
    session
        .ship
        .steer(input.movement, session.config.surface_width);
    if input.fire {
        let shots = session.ship.try_fire(now, &session.config);
        if !shots.is_empty() {
            log::debug!("Shot fired ({} bullets)", shots.len());
            events.push(GameEvent::ShotFired {
                bullets: shots.len() as u32,
            });
            session.bullets.extend(shots);
        }
    }

    advance(session);
    fire_enemies(session);
    resolve(session, &mut events);
    evaluate_rules(session, &mut events);

    events
}

/// Apply start/pause edges. Only guarded transitions are taken.
fn handle_transitions(session: &mut Session, input: &TickInput) {
    let now = input.now_ms;
    if input.start && session.phase == SessionPhase::Menu {
        session.phase = SessionPhase::Playing;
        session.fire_schedule.arm(now);
        log::info!("Session started at level {}", session.level);
    } else if (input.start || input.pause) && session.phase == SessionPhase::Paused {
        resume(session, now);
    } else if input.pause && session.phase == SessionPhase::Playing {
        session.phase = SessionPhase::Paused;
        session.paused_at = Some(now);
        log::info!("Paused");
    }
}

fn resume(session: &mut Session, now: u64) {
    let paused_for = session
        .paused_at
        .take()
        .map(|at| now.saturating_sub(at))
        .unwrap_or(0);
    session.fire_schedule.shift(paused_for);
    session.ship.shift_timers(paused_for);
    for power_up in session.power_ups.iter_mut() {
        power_up.spawned_at += paused_for;
    }
    session.phase = SessionPhase::Playing;
    log::info!("Resumed after {paused_for}ms");
}

/// Move every projectile, particle, power-up and (if enabled) the formation
fn advance(session: &mut Session) {
    let height = session.config.surface_height;

    for bullet in session.bullets.iter_mut() {
        bullet.pos.y += bullet.vy;
    }
    session.bullets.remove_where(|b| b.pos.y < 0.0);

    for bullet in session.enemy_bullets.iter_mut() {
        bullet.pos.y += bullet.vy;
    }
    session.enemy_bullets.remove_where(|b| b.pos.y > height);

    if let Some(drift) = session.config.enemy_drift {
        drift_formation(&mut session.enemies, &drift, session.config.surface_width);
    }

    for particle in session.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life = particle.life.saturating_sub(1);
    }
    session.particles.remove_where(|p| p.life == 0);

    let fall = session.config.power_up_fall_speed;
    for power_up in session.power_ups.iter_mut() {
        power_up.pos.y += fall;
    }
    let now = session.now_ms;
    let ttl = session.config.power_up_ttl_ms;
    session.power_ups.remove_where(|p| {
        p.pos.y > height || ttl.is_some_and(|ttl| now.saturating_sub(p.spawned_at) >= ttl)
    });
}

/// Scheduled and externally requested enemy shots
fn fire_enemies(session: &mut Session) {
    let mut shots = std::mem::take(&mut session.pending_enemy_fire);
    if session.fire_schedule.poll(session.now_ms) {
        shots += 1;
    }
    for _ in 0..shots {
        let Some(index) = pick_shooter(&session.enemies, &mut session.rng) else {
            break;
        };
        if let Some(enemy) = session.enemies.get(index) {
            let bullet = enemy_shot(enemy, &session.config);
            session.enemy_bullets.push(bullet);
        }
    }
}

/// Game over on zero lives; otherwise advance the level on a cleared formation
fn evaluate_rules(session: &mut Session, events: &mut Vec<GameEvent>) {
    if session.lives == 0 {
        session.phase = SessionPhase::GameOver;
        log::info!(
            "Game over: score {} at level {}",
            session.score,
            session.level
        );
        events.push(GameEvent::SessionEnded {
            final_score: session.score,
        });
        return;
    }

    if session.enemies.iter().all(|e| !e.is_alive()) {
        session.level += 1;
        session.enemies = formation(&session.config);
        log::info!("Level {} begins", session.level);
        events.push(GameEvent::LevelAdvanced {
            level: session.level,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::{EnemyBullet, Particle, PlayerBullet, PowerUp, PowerUpKind};
    use glam::Vec2;

    fn playing(config: GameConfig) -> Session {
        let mut session = Session::new(config, 12345).unwrap();
        tick(
            &mut session,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(session.phase, SessionPhase::Playing);
        session
    }

    fn at(now_ms: u64) -> TickInput {
        TickInput {
            now_ms,
            ..Default::default()
        }
    }

    #[test]
    fn test_menu_to_playing() {
        let mut session = Session::new(GameConfig::default(), 1).unwrap();
        tick(&mut session, &at(0));
        assert_eq!(session.phase, SessionPhase::Menu);
        assert_eq!(session.time_ticks, 0);

        // Pause does nothing from the menu
        tick(
            &mut session,
            &TickInput {
                pause: true,
                ..Default::default()
            },
        );
        assert_eq!(session.phase, SessionPhase::Menu);

        tick(
            &mut session,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(session.phase, SessionPhase::Playing);
        assert_eq!(session.fire_schedule.next_at, Some(1200));
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let mut session = playing(GameConfig::default());
        session.bullets.push(PlayerBullet {
            pos: Vec2::new(5.0, 400.0),
            size: Vec2::new(4.0, 12.0),
            vy: -7.0,
        });

        let pause = TickInput {
            now_ms: 100,
            pause: true,
            ..Default::default()
        };
        tick(&mut session, &pause);
        assert_eq!(session.phase, SessionPhase::Paused);
        let frozen_y = session.bullets.get(0).unwrap().pos.y;
        let ticks = session.time_ticks;

        for now in 101..200 {
            tick(
                &mut session,
                &TickInput {
                    now_ms: now,
                    fire: true,
                    movement: MoveIntent::Left,
                    ..Default::default()
                },
            );
        }
        assert_eq!(session.bullets.len(), 1);
        assert_eq!(session.bullets.get(0).unwrap().pos.y, frozen_y);
        assert_eq!(session.time_ticks, ticks);

        let resume = TickInput {
            now_ms: 5100,
            pause: true,
            ..Default::default()
        };
        tick(&mut session, &resume);
        assert_eq!(session.phase, SessionPhase::Playing);
        // Fire schedule shifted by the 5000ms pause
        assert_eq!(session.fire_schedule.next_at, Some(6200));
        assert_eq!(session.bullets.get(0).unwrap().pos.y, frozen_y - 7.0);
    }

    #[test]
    fn test_start_also_resumes() {
        let mut session = playing(GameConfig::default());
        tick(
            &mut session,
            &TickInput {
                pause: true,
                ..Default::default()
            },
        );
        tick(
            &mut session,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(session.phase, SessionPhase::Playing);
    }

    #[test]
    fn test_power_up_ttl_survives_pause() {
        let config = GameConfig {
            power_up_ttl_ms: Some(1000),
            power_up_fall_speed: 0.0,
            ..Default::default()
        };
        let mut session = playing(config);
        session.power_ups.push(PowerUp {
            pos: Vec2::new(5.0, 300.0),
            size: Vec2::splat(16.0),
            kind: PowerUpKind::Multishot,
            spawned_at: 0,
        });
        tick(&mut session, &at(100));
        tick(
            &mut session,
            &TickInput {
                now_ms: 100,
                pause: true,
                ..Default::default()
            },
        );
        tick(
            &mut session,
            &TickInput {
                now_ms: 10_000,
                pause: true,
                ..Default::default()
            },
        );
        assert_eq!(session.phase, SessionPhase::Playing);
        assert_eq!(session.fire_schedule.next_at, Some(11_100));
        assert_eq!(session.power_ups.len(), 1);
        assert_eq!(session.power_ups.get(0).unwrap().spawned_at, 9900);

        // 100ms were played before the pause, so 900ms remain
        tick(&mut session, &at(10_899));
        assert_eq!(session.power_ups.len(), 1);
        tick(&mut session, &at(10_900));
        assert!(session.power_ups.is_empty());
    }

    #[test]
    fn test_multishot_and_cooldown_survive_pause() {
        let mut session = playing(GameConfig::default());
        session.ship.grant_power_up(PowerUpKind::Multishot, 0, 5000);
        let fire = |now_ms| TickInput {
            now_ms,
            fire: true,
            ..Default::default()
        };

        let events = tick(&mut session, &fire(100));
        assert_eq!(events, vec![GameEvent::ShotFired { bullets: 3 }]);
        tick(
            &mut session,
            &TickInput {
                now_ms: 200,
                pause: true,
                ..Default::default()
            },
        );

        // Paused for 8000ms, longer than the whole multishot duration
        let events = tick(
            &mut session,
            &TickInput {
                now_ms: 8200,
                pause: true,
                fire: true,
                ..Default::default()
            },
        );
        assert_eq!(session.phase, SessionPhase::Playing);
        assert!(session.ship.multishot);
        assert_eq!(session.ship.power_up_expires_at, 13_000);
        // Cooldown resumes too: only 100ms of play since the last shot
        assert!(events.is_empty());
        assert_eq!(session.bullets.len(), 3);

        let events = tick(&mut session, &fire(8380));
        assert_eq!(events, vec![GameEvent::ShotFired { bullets: 3 }]);

        tick(&mut session, &at(13_000));
        assert!(session.ship.multishot);
        tick(&mut session, &at(13_001));
        assert!(!session.ship.multishot);
    }

    #[test]
    fn test_shake_holds_while_paused() {
        let mut session = playing(GameConfig::default());
        session.shake.impulse(6.0);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut session, &pause);
        assert_eq!(session.phase, SessionPhase::Paused);
        for _ in 0..30 {
            tick(&mut session, &at(0));
        }
        assert_eq!(session.shake.magnitude, 6.0);

        tick(&mut session, &pause);
        assert_eq!(session.phase, SessionPhase::Playing);
        assert!((session.shake.magnitude - 5.4).abs() < 1e-5);
        assert!(session.shake_offset.abs().max_element() <= 3.0);
    }

    #[test]
    fn test_fire_rate_limit() {
        let mut session = playing(GameConfig::default());
        let fire = |now_ms| TickInput {
            now_ms,
            fire: true,
            ..Default::default()
        };

        let events = tick(&mut session, &fire(1000));
        assert_eq!(events, vec![GameEvent::ShotFired { bullets: 1 }]);
        tick(&mut session, &fire(1100));
        assert_eq!(session.bullets.len(), 1);
        tick(&mut session, &fire(1280));
        assert_eq!(session.bullets.len(), 2);
    }

    #[test]
    fn test_bullet_removed_off_top() {
        let mut session = playing(GameConfig::default());
        session.bullets.push(PlayerBullet {
            pos: Vec2::new(5.0, 6.0),
            size: Vec2::new(4.0, 12.0),
            vy: -7.0,
        });
        tick(&mut session, &at(0));
        assert!(session.bullets.is_empty());
    }

    #[test]
    fn test_enemy_bullet_removed_off_bottom() {
        let mut session = playing(GameConfig::default());
        session.enemy_bullets.push(EnemyBullet {
            pos: Vec2::new(5.0, 638.0),
            size: Vec2::new(4.0, 12.0),
            vy: 3.0,
        });
        tick(&mut session, &at(0));
        assert!(session.enemy_bullets.is_empty());
    }

    #[test]
    fn test_enemy_fire_on_schedule() {
        let mut session = playing(GameConfig::default());
        tick(&mut session, &at(1199));
        assert!(session.enemy_bullets.is_empty());
        tick(&mut session, &at(1200));
        assert_eq!(session.enemy_bullets.len(), 1);
        tick(&mut session, &at(1216));
        assert_eq!(session.enemy_bullets.len(), 1);
        tick(&mut session, &at(2400));
        assert_eq!(session.enemy_bullets.len(), 2);
    }

    #[test]
    fn test_no_enemy_fire_without_living_enemies() {
        let mut session = playing(GameConfig::default());
        for enemy in session.enemies.iter_mut() {
            enemy.kill();
        }
        session.request_enemy_fire();
        fire_enemies(&mut session);
        assert!(session.enemy_bullets.is_empty());
    }

    #[test]
    fn test_requested_fire_dropped_outside_playing() {
        let mut session = Session::new(GameConfig::default(), 3).unwrap();
        session.request_enemy_fire();
        tick(&mut session, &at(0));
        assert!(session.enemy_bullets.is_empty());
        assert_eq!(session.pending_enemy_fire, 0);
    }

    #[test]
    fn test_requested_fire_applied_at_tick() {
        let mut session = playing(GameConfig::default());
        session.request_enemy_fire();
        tick(&mut session, &at(10));
        assert_eq!(session.enemy_bullets.len(), 1);
        assert_eq!(session.pending_enemy_fire, 0);
    }

    #[test]
    fn test_particle_lifetime() {
        let mut session = playing(GameConfig::default());
        session.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.5),
            life: 3,
        });
        tick(&mut session, &at(0));
        assert_eq!(session.particles.get(0).unwrap().life, 2);
        assert_eq!(session.particles.get(0).unwrap().pos, Vec2::new(1.0, 0.5));
        tick(&mut session, &at(0));
        assert_eq!(session.particles.get(0).unwrap().life, 1);
        tick(&mut session, &at(0));
        assert!(session.particles.is_empty());
    }

    #[test]
    fn test_power_up_ttl() {
        let config = GameConfig {
            power_up_ttl_ms: Some(1000),
            power_up_fall_speed: 0.0,
            ..Default::default()
        };
        let mut session = playing(config);
        session.power_ups.push(PowerUp {
            pos: Vec2::new(5.0, 300.0),
            size: Vec2::splat(16.0),
            kind: PowerUpKind::Multishot,
            spawned_at: 0,
        });
        tick(&mut session, &at(999));
        assert_eq!(session.power_ups.len(), 1);
        tick(&mut session, &at(1000));
        assert!(session.power_ups.is_empty());
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut session = playing(GameConfig::default());
        session.lives = 1;
        let pos = session.ship.pos;
        session.enemy_bullets.push(EnemyBullet {
            pos,
            size: Vec2::new(4.0, 12.0),
            vy: 0.0,
        });
        session.score = 70;

        let events = tick(&mut session, &at(0));
        assert_eq!(session.phase, SessionPhase::GameOver);
        assert!(events.contains(&GameEvent::SessionEnded { final_score: 70 }));

        let ship_x = session.ship.pos.x;
        for input in [
            TickInput {
                start: true,
                ..Default::default()
            },
            TickInput {
                pause: true,
                ..Default::default()
            },
            TickInput {
                movement: MoveIntent::Right,
                fire: true,
                now_ms: 10_000,
                ..Default::default()
            },
        ] {
            assert!(tick(&mut session, &input).is_empty());
            assert_eq!(session.phase, SessionPhase::GameOver);
        }
        assert_eq!(session.ship.pos.x, ship_x);
        assert!(session.bullets.is_empty());
    }

    #[test]
    fn test_level_advance() {
        let mut session = playing(GameConfig::default());
        for enemy in session.enemies.iter_mut() {
            enemy.kill();
        }
        let events = tick(&mut session, &at(0));
        assert_eq!(session.level, 2);
        assert_eq!(session.alive_enemies(), 32);
        assert_eq!(events, vec![GameEvent::LevelAdvanced { level: 2 }]);
        assert_eq!(session.phase, SessionPhase::Playing);
    }

    #[test]
    fn test_game_over_wins_over_cleared_formation() {
        let mut session = playing(GameConfig::default());
        session.lives = 1;
        for enemy in session.enemies.iter_mut() {
            enemy.kill();
        }
        session.enemy_bullets.push(EnemyBullet {
            pos: session.ship.pos,
            size: Vec2::new(4.0, 12.0),
            vy: 0.0,
        });

        let events = tick(&mut session, &at(0));
        assert_eq!(session.phase, SessionPhase::GameOver);
        assert_eq!(session.level, 1);
        assert_eq!(session.alive_enemies(), 0);
        assert_eq!(
            events,
            vec![
                GameEvent::PlayerHit { lives: 0 },
                GameEvent::SessionEnded { final_score: 0 },
            ]
        );
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(GameConfig::default());
        let mut b = playing(GameConfig::default());

        for frame in 0..600u64 {
            let input = TickInput {
                now_ms: frame * 16,
                fire: true,
                movement: if frame % 120 < 60 {
                    MoveIntent::Left
                } else {
                    MoveIntent::Right
                },
                ..Default::default()
            };
            assert_eq!(tick(&mut a, &input), tick(&mut b, &input));
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.particles.len(), b.particles.len());
        assert_eq!(a.ship.pos, b.ship.pos);
    }
}
