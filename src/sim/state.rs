//! Run state and core simulation types
//!
//! A run owns its level, its player and the RNG that drives hazard respawns.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::generator::generate_for;
use super::level::Level;
use super::player::Player;
use crate::consts::*;
use crate::tuning::Difficulty;

/// PCG stream for in-run randomness, kept apart from the generator's stream
const RUN_RNG_STREAM: u64 = 0x5851_f42d_4c95_7f2d;

/// Current phase of a run. `Won` and `Lost` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Running,
    Won,
    Lost,
}

impl RunPhase {
    pub fn is_over(&self) -> bool {
        !matches!(self, RunPhase::Running)
    }
}

/// What a single tick amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameResult {
    Continue,
    /// A life was lost; carries the points scored during the same tick
    LifeLost(u64),
    /// Final score
    Won(u64),
    /// Final score
    Lost(u64),
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    ItemCollected { value: u32 },
    Damaged { lives: u8 },
    Respawned { x: f32 },
    CheckpointAdvanced { x: f32 },
    Won { score: u64 },
    Lost { score: u64 },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct RunState {
    pub seed: u64,
    pub level: Level,
    pub player: Player,
    pub score: u64,
    /// Furthest x reached while grounded; never decreases
    pub checkpoint_x: f32,
    pub phase: RunPhase,
    /// Simulated seconds since the run started
    pub elapsed: f32,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl RunState {
    /// Start a run on a freshly generated level
    pub fn new(difficulty: Difficulty, seed: u64) -> Result<Self, SimError> {
        let level = generate_for(difficulty, seed)?;
        Ok(Self::with_level(level, seed))
    }

    /// Start a run on an existing level; the player spawns at `SPAWN_X`
    pub fn with_level(level: Level, seed: u64) -> Self {
        let spawn_x = SPAWN_X.min((level.width - PLAYER_WIDTH).max(0.0));
        let player = Player::spawn(spawn_x, level.ground_y);
        Self {
            seed,
            checkpoint_x: player.pos.x,
            level,
            player,
            score: 0,
            phase: RunPhase::Running,
            elapsed: 0.0,
            rng: Pcg32::new(seed, RUN_RNG_STREAM),
            events: Vec::new(),
        }
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Left edge of a camera that keeps the player a third into the view
    pub fn camera_x(&self, viewport_width: f32) -> f32 {
        let max = (self.level.width - viewport_width).max(0.0);
        (self.player.pos.x - viewport_width / 3.0).clamp(0.0, max)
    }

    /// Terminal result for a finished run
    pub fn final_result(&self) -> Option<FrameResult> {
        match self.phase {
            RunPhase::Running => None,
            RunPhase::Won => Some(FrameResult::Won(self.score)),
            RunPhase::Lost => Some(FrameResult::Lost(self.score)),
        }
    }
}
