//! Jumpi Quest - A side-scrolling platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, collisions, run state)
//! - `tuning`: Difficulty profiles driving level generation
//! - `settings`: Run configuration
//! - `highscores`: Score collaborator and leaderboard
//! - `persistence`: JSON save/load for settings and scores
//! - `platform`: Fixed-timestep frame clock

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, ScoreKeeper, ScoreSink};
pub use settings::Settings;
pub use tuning::{Difficulty, DifficultyProfile};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World layout
    pub const GROUND_Y: f32 = 500.0;
    pub const SPAWN_X: f32 = 100.0;
    /// Obstacle-free stretch before the end of every level
    pub const SAFE_ZONE: f32 = 600.0;

    /// Player visual size
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    /// Hitbox = visual size * scale, centered
    pub const HITBOX_SCALE: f32 = 0.65;
    pub const MAX_LIVES: u8 = 3;

    /// Player physics
    pub const RUN_SPEED: f32 = 240.0;
    pub const JUMP_SPEED: f32 = 600.0;
    pub const GRAVITY: f32 = 1600.0;
    /// Horizontal knock-back applied when hurt (pixels/s, leftward)
    pub const DAMAGE_RECOIL: f32 = 150.0;
    pub const INVINCIBILITY_SECS: f32 = 2.0;
    pub const BLINK_INTERVAL: f32 = 0.1;

    /// Walls
    pub const WALL_WIDTH: f32 = 40.0;
    /// Fraction of wall width trimmed from each side of the collision box
    pub const WALL_INSET_X: f32 = 0.2;
    /// Fraction of wall height trimmed from the top of the collision box
    pub const WALL_INSET_TOP: f32 = 0.25;
    /// Walls keep this far from either platform edge
    pub const WALL_EDGE_MARGIN: f32 = 60.0;
    /// Platforms shorter than this never get a wall
    pub const WALL_MIN_PLATFORM: f32 = 140.0;

    /// Moving hazards
    pub const HAZARD_WIDTH: f32 = 100.0;
    pub const HAZARD_HEIGHT: f32 = 80.0;
    pub const HAZARD_SPEED: f32 = 140.0;
    /// Respawn offset range beyond the right edge of the level
    pub const HAZARD_RESPAWN_MIN: f32 = 50.0;
    pub const HAZARD_RESPAWN_MAX: f32 = 300.0;

    /// Collectibles
    pub const ITEM_SIZE: f32 = 64.0;
    pub const ITEM_VALUE: u32 = 10;
    pub const ITEM_JITTER: f32 = 80.0;
    /// Gap between the ground and the lowest item
    pub const ITEM_MIN_LIFT: f32 = 10.0;
    pub const ITEM_MAX_LIFT: f32 = 100.0;

    /// Goal structure
    pub const GOAL_WIDTH: f32 = 160.0;
    pub const GOAL_HEIGHT: f32 = 140.0;
    /// Reaching this close to the goal counts as arrival
    pub const GOAL_REACH_OFFSET: f32 = 10.0;

    /// Respawn this far behind the last checkpoint
    pub const RESPAWN_BACKOFF: f32 = 100.0;
}
