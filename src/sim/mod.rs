//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` handed to `advance`
//! - Seeded RNG only
//! - Stable iteration order (level order, left to right)
//! - No rendering, audio, storage or platform dependencies

pub mod autopilot;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;

pub use autopilot::{Autopilot, autopilot};
pub use error::SimError;
pub use generator::{generate, generate_for};
pub use geometry::{Rect, overlaps};
pub use level::{Collectible, Goal, HazardMotion, HazardSkin, Level, MovingHazard, Obstacle};
pub use player::{AnimState, Intents, Player};
pub use state::{FrameResult, GameEvent, RunPhase, RunState};
pub use tick::advance;
