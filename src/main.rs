//! Pirates headless runner
//!
//! Drives a session at 60 Hz of synthetic wall-clock time with a simple
//! autopilot, routes events to a logging audio sink and records the final
//! score on the leaderboard.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use pirates::audio::{LogAudio, dispatch};
use pirates::consts::FRAME_MS;
use pirates::sim::{MoveIntent, Session, SessionPhase, TickInput, tick};
use pirates::{GameConfig, HighScores};

#[derive(Parser, Debug)]
#[command(name = "pirates")]
#[command(about = "Headless autopilot run of the Pirates simulation")]
struct Options {
    /// JSON tuning file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// High score file to record the final score in
    #[arg(long)]
    scores: Option<PathBuf>,
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    /// Stop after this many ticks even if the session is still running
    #[arg(long = "ticks", default_value_t = 60 * 60 * 5)]
    max_ticks: u64,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Game instance holding all state
struct Game {
    session: Session,
    audio: LogAudio,
    now_ms: u64,
    last_phase: SessionPhase,
}

impl Game {
    fn new(session: Session) -> Self {
        let last_phase = session.phase;
        Self {
            session,
            audio: LogAudio::new(),
            now_ms: 0,
            last_phase,
        }
    }

    /// Pick this frame's input: chase the lowest living enemy, sidestep
    /// incoming fire, keep the trigger held.
    fn autopilot(&self) -> TickInput {
        let s = &self.session;
        let ship = s.ship.pos.x + s.ship.size.x / 2.0;

        let threat = s.enemy_bullets.iter().find(|b| {
            let dx = b.pos.x - ship;
            let dy = s.ship.pos.y - b.pos.y;
            dx.abs() < s.ship.size.x && (0.0..120.0).contains(&dy)
        });
        let target = s
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.pos.x + e.size.x / 2.0);

        let movement = match (threat, target) {
            (Some(bullet), _) if bullet.pos.x >= ship => MoveIntent::Left,
            (Some(_), _) => MoveIntent::Right,
            (None, Some(x)) if x < ship - s.ship.speed => MoveIntent::Left,
            (None, Some(x)) if x > ship + s.ship.speed => MoveIntent::Right,
            _ => MoveIntent::None,
        };

        TickInput {
            now_ms: self.now_ms,
            movement,
            fire: true,
            start: s.phase == SessionPhase::Menu,
            pause: false,
        }
    }

    fn update(&mut self) -> bool {
        let input = self.autopilot();
        let events = tick(&mut self.session, &input);
        dispatch(&events, &mut self.audio);
        self.now_ms += FRAME_MS;

        let phase = self.session.phase;
        if phase != self.last_phase {
            log::debug!("Phase {:?} -> {:?}", self.last_phase, phase);
            self.last_phase = phase;
        }
        phase != SessionPhase::GameOver
    }
}

fn run(opts: Options) -> Result<()> {
    let config = match &opts.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            GameConfig::from_json_str(&json)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    let session = Session::new(config, opts.seed).context("starting session")?;
    let mut game = Game::new(session);

    let mut ticks = 0;
    while ticks < opts.max_ticks && game.update() {
        ticks += 1;
    }

    let s = &game.session;
    log::info!(
        "Finished after {} ticks: {:?}, score {}, level {}, lives {}, {} cues played",
        ticks,
        s.phase,
        s.score,
        s.level,
        s.lives,
        game.audio.played()
    );

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&s.snapshot())?);
    } else {
        println!("score {} level {} ({:?})", s.score, s.level, s.phase);
    }

    if let Some(path) = &opts.scores {
        let mut scores = HighScores::load(path)
            .with_context(|| format!("reading high scores {}", path.display()))?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        if let Some(rank) = scores.add_score(s.score, s.level, timestamp) {
            println!("new high score, rank #{rank}");
            scores
                .save(path)
                .with_context(|| format!("writing high scores {}", path.display()))?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Pirates (headless) starting...");
    run(Options::parse())
}
