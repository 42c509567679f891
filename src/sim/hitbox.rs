//! Axis-aligned rectangles and hitbox derivation
//!
//! Sprites are drawn at their full size but collide through a smaller,
//! concentric box so near misses feel fair.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{HITBOX_DEN, HITBOX_NUM};

/// Integer rectangle in play-area pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            size: IVec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    /// Center point (rounded down)
    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    /// Collision box: 80% of each dimension, centered in this rect
    pub fn hitbox(&self) -> Rect {
        let size = self.size * HITBOX_NUM / HITBOX_DEN;
        let offset = (self.size - size) / 2;
        Rect {
            pos: self.pos + offset,
            size,
        }
    }

    /// Overlap test; rectangles sharing an edge count as touching
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// True if `other` lies entirely within this rect
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }
}
