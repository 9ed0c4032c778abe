//! Data-driven game balance
//!
//! Every generation range and probability lives in a [`DifficultyProfile`].
//! The built-in profiles are selected through [`Difficulty`].

use serde::{Deserialize, Serialize};

use crate::consts::SAFE_ZONE;
use crate::sim::SimError;

/// Difficulty levels offered to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" | "facile" => Some(Difficulty::Easy),
            "medium" | "med" | "m" | "moyen" => Some(Difficulty::Medium),
            "hard" | "h" | "difficile" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Built-in balance table for this difficulty
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                level_width: 4000.0,
                platform_len: Band::new(350.0, 650.0),
                hole_width: Band::new(60.0, 100.0),
                hole_chance: 0.35,
                wall_chance: 0.45,
                wall_height: Band::new(50.0, 75.0),
                gap_bands: [
                    Band::new(60.0, 100.0),
                    Band::new(100.0, 160.0),
                    Band::new(160.0, 220.0),
                ],
                item_count: 12,
                goal_x: 3700.0,
                hazard_slots: vec![1100.0, 2300.0],
            },
            Difficulty::Medium => DifficultyProfile {
                level_width: 5500.0,
                platform_len: Band::new(250.0, 500.0),
                hole_width: Band::new(80.0, 130.0),
                hole_chance: 0.5,
                wall_chance: 0.6,
                wall_height: Band::new(60.0, 90.0),
                gap_bands: [
                    Band::new(40.0, 80.0),
                    Band::new(80.0, 140.0),
                    Band::new(140.0, 200.0),
                ],
                item_count: 9,
                goal_x: 5200.0,
                hazard_slots: vec![900.0, 1900.0, 2900.0, 3900.0],
            },
            Difficulty::Hard => DifficultyProfile {
                level_width: 7000.0,
                platform_len: Band::new(180.0, 380.0),
                hole_width: Band::new(100.0, 150.0),
                hole_chance: 0.65,
                wall_chance: 0.75,
                wall_height: Band::new(70.0, 105.0),
                gap_bands: [
                    Band::new(30.0, 60.0),
                    Band::new(60.0, 120.0),
                    Band::new(120.0, 180.0),
                ],
                item_count: 6,
                goal_x: 6700.0,
                hazard_slots: vec![800.0, 1700.0, 2600.0, 3400.0, 4300.0, 5200.0, 6100.0],
            },
        }
    }
}

/// Closed range `[min, max]` used for uniform draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }
}

/// Everything the level generator needs to know about a difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Total level width in world units
    pub level_width: f32,
    /// Length of each generated ground platform
    pub platform_len: Band,
    /// Width of a pit carved at the end of a platform
    pub hole_width: Band,
    /// Probability that a platform ends in a pit
    pub hole_chance: f64,
    /// Probability that a long enough platform gets a wall
    pub wall_chance: f64,
    pub wall_height: Band,
    /// Short, medium and long spacing between consecutive platforms
    pub gap_bands: [Band; 3],
    /// Number of collectibles spread over the level
    pub item_count: u32,
    /// Preferred goal position, clamped into the level
    pub goal_x: f32,
    /// Candidate spawn x-positions for moving hazards
    pub hazard_slots: Vec<f32>,
}

impl DifficultyProfile {
    /// Reject profiles the generator cannot turn into a solvable level
    pub fn validate(&self) -> Result<(), SimError> {
        let bad = |reason: &str| {
            Err(SimError::InvalidProfile {
                reason: reason.to_string(),
            })
        };

        if !self.level_width.is_finite() || self.level_width <= SAFE_ZONE {
            return bad("level width must exceed the safe zone");
        }
        if !self.platform_len.is_valid() || self.platform_len.min <= 0.0 {
            return bad("platform length range");
        }
        if !self.hole_width.is_valid() {
            return bad("hole width range");
        }
        if !self.wall_height.is_valid() || self.wall_height.min <= 0.0 {
            return bad("wall height range");
        }
        if self.gap_bands.iter().any(|b| !b.is_valid()) {
            return bad("gap band");
        }
        if !(0.0..=1.0).contains(&self.hole_chance) || !(0.0..=1.0).contains(&self.wall_chance) {
            return bad("probability outside [0, 1]");
        }
        if self.item_count == 0 {
            return bad("item count must be positive");
        }
        if !self.goal_x.is_finite() || self.hazard_slots.iter().any(|x| !x.is_finite()) {
            return bad("non-finite position");
        }
        Ok(())
    }

    /// Smallest and largest possible platform-to-platform gap
    pub fn gap_bounds(&self) -> Band {
        let min = self.gap_bands.iter().map(|b| b.min).fold(f32::INFINITY, f32::min);
        let max = self.gap_bands.iter().map(|b| b.max).fold(0.0, f32::max);
        Band::new(min, max)
    }
}
