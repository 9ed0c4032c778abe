//! Score collaborator and high score leaderboard
//!
//! The simulation only keeps the running score of a run. Whatever drives it
//! reports score changes and finished runs to a [`ScoreSink`]; persisting the
//! leaderboard is the caller's business (see `persistence`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};
use crate::sim::{RunPhase, RunState};
use crate::tuning::Difficulty;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Receives score notifications from the run driver
pub trait ScoreSink {
    /// Running score of the current run changed
    fn score_changed(&mut self, score: u64);

    /// A run ended. Returns true if `score` is a new best.
    fn run_finished(&mut self, score: u64, difficulty: Difficulty, won: bool, timestamp: u64) -> bool;
}

/// Report a run to `sink` once it has ended.
///
/// Returns `None` while the run is still going (a timed-out demo run never
/// reaches the leaderboard), otherwise whether it set a new best.
pub fn report_finished_run<S: ScoreSink + ?Sized>(
    sink: &mut S,
    state: &RunState,
    difficulty: Difficulty,
    timestamp: u64,
) -> Option<bool> {
    let won = match state.phase {
        RunPhase::Running => return None,
        RunPhase::Won => true,
        RunPhase::Lost => false,
    };
    Some(sink.run_finished(state.score, difficulty, won, timestamp))
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    pub difficulty: Difficulty,
    /// Reached the goal (as opposed to running out of lives)
    pub won: bool,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
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
        // Must beat the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a score to the leaderboard if it qualifies.
    /// Returns the rank achieved (1-indexed).
    pub fn add_score(&mut self, score: u64, difficulty: Difficulty, won: bool, timestamp: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                difficulty,
                won,
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

    /// Best score recorded on one difficulty
    pub fn best_for(&self, difficulty: Difficulty) -> Option<u64> {
        self.entries
            .iter()
            .filter(|e| e.difficulty == difficulty)
            .map(|e| e.score)
            .max()
    }

    /// Load the leaderboard from `path`, empty if missing or corrupt
    pub fn load(path: &Path) -> Self {
        let scores: Self = persistence::load_or_default(path);
        log::info!("{} high scores on record", scores.entries.len());
        scores
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::save_json(path, self)
    }
}

/// Current score plus the best score seen, backed by a leaderboard
#[derive(Debug, Clone, Default)]
pub struct ScoreKeeper {
    current: u64,
    high: u64,
    board: HighScores,
}

impl ScoreKeeper {
    /// Start from a loaded leaderboard; the best score comes from its top entry
    pub fn new(board: HighScores) -> Self {
        Self {
            current: 0,
            high: board.top_score().unwrap_or(0),
            board,
        }
    }

    pub fn add_points(&mut self, points: u64) {
        self.current = self.current.saturating_add(points);
    }

    pub fn reset_current(&mut self) {
        self.current = 0;
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    pub fn board(&self) -> &HighScores {
        &self.board
    }

    pub fn into_board(self) -> HighScores {
        self.board
    }

    /// Raise the best score to the current one. Returns true if it moved.
    pub fn update_high_score_if_needed(&mut self) -> bool {
        if self.current > self.high {
            self.high = self.current;
            log::info!("New high score: {}", self.high);
            true
        } else {
            false
        }
    }
}

impl ScoreSink for ScoreKeeper {
    fn score_changed(&mut self, score: u64) {
        self.current = score;
    }

    fn run_finished(&mut self, score: u64, difficulty: Difficulty, won: bool, timestamp: u64) -> bool {
        self.current = score;
        if let Some(rank) = self.board.add_score(score, difficulty, won, timestamp) {
            log::info!("Score {} entered the leaderboard at #{}", score, rank);
        }
        self.update_high_score_if_needed()
    }
}
