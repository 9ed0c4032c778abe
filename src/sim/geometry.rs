//! Axis-aligned bounding boxes
//!
//! Every collision check in the simulation goes through [`overlaps`].
//! Edges that only touch do not count as overlapping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Strict AABB overlap test on raw coordinates
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn overlaps(ax: f32, ay: f32, aw: f32, ah: f32, bx: f32, by: f32, bw: f32, bh: f32) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

/// Rectangle with its top-left corner at (x, y), y growing downward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self.x, self.y, self.w, self.h, other.x, other.y, other.w, other.h)
    }

    /// Same center, each dimension scaled by `scale`
    pub fn scaled_centered(&self, scale: f32) -> Rect {
        let w = self.w * scale;
        let h = self.h * scale;
        Rect::new(self.x + (self.w - w) / 2.0, self.y + (self.h - h) / 2.0, w, h)
    }
}

/// True if `w` and `h` describe a usable entity size
pub(crate) fn is_valid_size(w: f32, h: f32) -> bool {
    w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
}
