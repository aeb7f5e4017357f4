//! High score leaderboard
//!
//! Lives outside the simulation: hosts feed it the final score from
//! `GameEvent::SessionEnded`. Persisted as JSON, tracks the top 10 scores.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a score if it qualifies. Returns the rank achieved (1-indexed).
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                level,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a JSON file. A missing file is an empty board; a corrupt
    /// one is logged and replaced with an empty board.
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                return Ok(Self::new());
            }
            Err(err) => return Err(err),
        };
        match serde_json::from_str::<HighScores>(&json) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                Ok(scores)
            }
            Err(err) => {
                log::warn!("Discarding unreadable high scores at {}: {err}", path.display());
                Ok(Self::new())
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(0, 1, 0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sorted_insert_and_truncate() {
        let mut scores = HighScores::new();
        for s in 1..=12u64 {
            scores.add_score(s * 10, 1, s);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(120));
        assert_eq!(scores.entries.last().unwrap().score, 30);
        assert!(!scores.qualifies(30));
        assert_eq!(scores.potential_rank(55), Some(8));
        assert_eq!(scores.add_score(55, 2, 99), Some(8));
        assert_eq!(scores.entries.last().unwrap().score, 40);
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut scores = HighScores::new();
        scores.add_score(50, 1, 0);
        assert_eq!(scores.add_score(50, 2, 1), Some(2));
        assert_eq!(scores.entries[0].level, 1);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("pirates-hs-{}.json", std::process::id()));
        let mut scores = HighScores::new();
        scores.add_score(320, 3, 1_700_000_000_000);
        scores.save(&path).unwrap();

        let loaded = HighScores::load(&path).unwrap();
        assert_eq!(loaded.entries, scores.entries);
        fs::remove_file(&path).unwrap();

        assert!(HighScores::load(&path).unwrap().is_empty());
    }
}
