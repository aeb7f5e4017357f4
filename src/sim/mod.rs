//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in through `TickInput` only
//! - Seeded RNG only
//! - Stable iteration order (pool insertion order)
//! - No rendering, audio or platform dependencies

pub mod geom;
pub mod player;
pub mod pool;
pub mod resolve;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use geom::{Bounds, Rect, overlaps};
pub use pool::Pool;
pub use snapshot::{ParticleView, PowerUpView, Snapshot};
pub use spawn::FireSchedule;
pub use state::{
    Enemy, EnemyBullet, GameEvent, MoveIntent, Particle, PlayerBullet, PowerUp, PowerUpKind,
    ScreenShake, Session, SessionPhase, Ship,
};
pub use tick::{TickInput, tick};
