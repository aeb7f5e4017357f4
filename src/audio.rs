//! Sound cues for simulation events
//!
//! The simulation never plays audio itself. Hosts hand each tick's events to
//! an `AudioSink`; playback is fire-and-forget and never awaited.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player shot accepted
    Shoot,
    /// Enemy destroyed
    Explode,
    /// Ship struck by an enemy bullet
    Impact,
    /// Power-up collected
    PowerUp,
    /// Session over
    GameOver,
}

impl SoundEffect {
    /// Asset name the host should play for this cue
    pub fn asset(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "shoot",
            SoundEffect::Explode => "explosion",
            SoundEffect::Impact => "impact",
            SoundEffect::PowerUp => "powerup",
            SoundEffect::GameOver => "gameover",
        }
    }

    /// The cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired { .. } => Some(SoundEffect::Shoot),
            GameEvent::EnemyExploded { .. } => Some(SoundEffect::Explode),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::Impact),
            GameEvent::PowerUpCollected { .. } => Some(SoundEffect::PowerUp),
            GameEvent::SessionEnded { .. } => Some(SoundEffect::GameOver),
            GameEvent::LevelAdvanced { .. } => None,
        }
    }
}

/// Host-side audio backend
pub trait AudioSink {
    /// Start playing a cue. Must not block.
    fn play(&mut self, effect: SoundEffect);
}

/// Sink that only logs cues (headless runs, tests)
#[derive(Debug, Default)]
pub struct LogAudio {
    muted: bool,
    played: u64,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Cues played so far
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        self.played += 1;
        log::trace!("play {}", effect.asset());
    }
}

/// Forward every event with a cue to the sink
pub fn dispatch(events: &[GameEvent], sink: &mut impl AudioSink) {
    for effect in events.iter().filter_map(SoundEffect::for_event) {
        sink.play(effect);
    }
}
