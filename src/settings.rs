//! Run settings and preferences
//!
//! Persisted as JSON next to the high scores.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_FRAME_DT;
use crate::persistence;
use crate::tuning::Difficulty;

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty used when none is given on the command line
    pub difficulty: Difficulty,
    /// Fixed level seed; a fresh one per run when `None`
    pub seed: Option<u64>,
    /// Largest frame delta fed to the simulation (seconds)
    pub max_frame_dt: f32,
    /// Demo runs give up after this many simulated seconds
    pub max_run_secs: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            seed: None,
            max_frame_dt: MAX_FRAME_DT,
            max_run_secs: 300.0,
        }
    }
}

impl Settings {
    /// Create settings for a difficulty, everything else default
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Frame delta cap, never below zero and never absurdly large
    pub fn effective_max_frame_dt(&self) -> f32 {
        if self.max_frame_dt.is_finite() {
            self.max_frame_dt.clamp(0.0, 0.25)
        } else {
            MAX_FRAME_DT
        }
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        persistence::load_or_default(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), persistence::PersistError> {
        persistence::save_json(path, self)
    }
}
