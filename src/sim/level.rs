//! Level layout: ground obstacles, moving hazards, collectibles and the goal
//!
//! Obstacles are immutable once generated. Hazards move and items disappear,
//! both mutated in place by the tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::geometry::{Rect, is_valid_size, overlaps};
use crate::consts::*;

/// How deep pits and platforms extend below the ground line (for bounds only)
const GROUND_DEPTH: f32 = 200.0;

/// Static piece of level geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    /// Block standing on the ground
    Wall { x: f32, w: f32, h: f32 },
    /// Missing stretch of ground
    Hole { x: f32, w: f32 },
    /// Solid ground segment
    Platform { x: f32, w: f32 },
}

impl Obstacle {
    pub fn x(&self) -> f32 {
        match *self {
            Obstacle::Wall { x, .. } | Obstacle::Hole { x, .. } | Obstacle::Platform { x, .. } => x,
        }
    }

    pub fn width(&self) -> f32 {
        match *self {
            Obstacle::Wall { w, .. } | Obstacle::Hole { w, .. } | Obstacle::Platform { w, .. } => w,
        }
    }

    pub fn right(&self) -> f32 {
        self.x() + self.width()
    }

    /// Collision bounds relative to the ground line.
    ///
    /// Walls are trimmed by `WALL_INSET_X` of their width on each side and
    /// `WALL_INSET_TOP` of their height from the top, so brushing the edge
    /// of the visual block is forgiven.
    pub fn bounds(&self, ground_y: f32) -> Rect {
        match *self {
            Obstacle::Wall { x, w, h } => {
                let inset_x = w * WALL_INSET_X;
                let inset_top = h * WALL_INSET_TOP;
                Rect::new(
                    x + inset_x,
                    ground_y - h + inset_top,
                    w - 2.0 * inset_x,
                    h - inset_top,
                )
            }
            Obstacle::Hole { x, w } | Obstacle::Platform { x, w } => {
                Rect::new(x, ground_y, w, GROUND_DEPTH)
            }
        }
    }

    /// Full visual footprint, for drawing
    pub fn visual_bounds(&self, ground_y: f32) -> Rect {
        match *self {
            Obstacle::Wall { x, w, h } => Rect::new(x, ground_y - h, w, h),
            _ => self.bounds(ground_y),
        }
    }
}

/// Movement rule shared by every hazard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardMotion {
    /// Constant leftward drift, reappearing past the right edge after
    /// leaving the level on the left
    DriftWrap { speed: f32 },
}

/// Presentation-only look of a hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardSkin {
    Sheep,
    Chicken,
    Cow,
}

impl HazardSkin {
    pub fn pick<R: Rng>(rng: &mut R) -> Self {
        match rng.random_range(0..3) {
            0 => HazardSkin::Sheep,
            1 => HazardSkin::Chicken,
            _ => HazardSkin::Cow,
        }
    }
}

/// A hazard patrolling the ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingHazard {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub motion: HazardMotion,
    pub skin: HazardSkin,
}

impl MovingHazard {
    pub fn new(x: f32, y: f32, w: f32, h: f32, skin: HazardSkin) -> Result<Self, SimError> {
        if !is_valid_size(w, h) {
            return Err(SimError::InvalidSize {
                entity: "hazard",
                w,
                h,
            });
        }
        Ok(Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            motion: HazardMotion::DriftWrap {
                speed: HAZARD_SPEED,
            },
            skin,
        })
    }

    /// Hazard sitting on the ground line at `x`
    pub fn on_ground(x: f32, ground_y: f32, skin: HazardSkin) -> Result<Self, SimError> {
        Self::new(x, ground_y - HAZARD_HEIGHT, HAZARD_WIDTH, HAZARD_HEIGHT, skin)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Advance by `dt` seconds; wraps to `level_width + U(50, 300)` once
    /// fully past the left edge
    pub fn update<R: Rng>(&mut self, dt: f32, level_width: f32, rng: &mut R) {
        match self.motion {
            HazardMotion::DriftWrap { speed } => {
                self.pos.x -= speed * dt;
                if self.pos.x + self.size.x < 0.0 {
                    let offset = rng.random_range(HAZARD_RESPAWN_MIN..HAZARD_RESPAWN_MAX);
                    self.pos.x = level_width + offset;
                }
            }
        }
    }

    pub fn collides_with(&self, left: f32, top: f32, w: f32, h: f32) -> bool {
        overlaps(left, top, w, h, self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

/// Pick-up worth points, collected at most once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub pos: Vec2,
    pub size: f32,
    pub value: u32,
}

impl Collectible {
    pub fn new(x: f32, y: f32, value: u32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: ITEM_SIZE,
            value,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// End-of-level structure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Goal {
    /// Goal resting on the ground, pulled back so it fits inside the level
    pub fn on_ground(target_x: f32, level_width: f32, ground_y: f32) -> Self {
        let x = target_x.clamp(0.0, (level_width - GOAL_WIDTH).max(0.0));
        Self {
            x,
            y: ground_y - GOAL_HEIGHT,
            w: GOAL_WIDTH,
            h: GOAL_HEIGHT,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// A complete level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub width: f32,
    pub ground_y: f32,
    /// Platforms, pits and walls in generation order (left to right)
    pub obstacles: Vec<Obstacle>,
    pub hazards: Vec<MovingHazard>,
    /// Items still waiting to be collected
    pub items: Vec<Collectible>,
    pub goal: Goal,
}

impl Level {
    /// Flat level with a single platform and the goal at the far end
    pub fn flat(width: f32) -> Self {
        Self {
            width,
            ground_y: GROUND_Y,
            obstacles: vec![Obstacle::Platform { x: 0.0, w: width }],
            hazards: Vec::new(),
            items: Vec::new(),
            goal: Goal::on_ground(width, width, GROUND_Y),
        }
    }

    pub fn platforms(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| matches!(o, Obstacle::Platform { .. }))
    }

    pub fn pits(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| matches!(o, Obstacle::Hole { .. }))
    }

    pub fn walls(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| matches!(o, Obstacle::Wall { .. }))
    }

    /// Walkable ground for drawing: the whole level width minus the pits.
    /// Covers the generated platforms and the solid stretches between them.
    pub fn ground_spans(&self) -> Vec<Rect> {
        let mut pits: Vec<(f32, f32)> = self.pits().map(|p| (p.x(), p.right())).collect();
        pits.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut spans = Vec::with_capacity(pits.len() + 1);
        let mut cursor = 0.0f32;
        for (start, end) in pits {
            if start > cursor {
                spans.push(Rect::new(cursor, self.ground_y, start - cursor, GROUND_DEPTH));
            }
            cursor = cursor.max(end);
        }
        if cursor < self.width {
            spans.push(Rect::new(cursor, self.ground_y, self.width - cursor, GROUND_DEPTH));
        }
        spans
    }

    /// True if `x` lies over a pit (pit edges included)
    pub fn is_pit_at(&self, x: f32) -> bool {
        self.pits().any(|p| x >= p.x() && x <= p.right())
    }

    /// First wall whose collision bounds overlap `hitbox`, in level order
    pub fn wall_hit(&self, hitbox: &Rect) -> Option<Rect> {
        self.walls()
            .map(|w| w.bounds(self.ground_y))
            .find(|b| b.overlaps(hitbox))
    }

    /// Start of the obstacle-free stretch before the level end
    pub fn safe_zone_start(&self) -> f32 {
        (self.width - SAFE_ZONE).max(0.0)
    }
}
