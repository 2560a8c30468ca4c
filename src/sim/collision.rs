//! Collision and validity checks
//!
//! Two shapes of test cover every game:
//! - axis-aligned box overlap with an inward forgiveness margin (flappy, runner)
//! - continuous point -> grid cell lookup (mines, memory, maze)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            min: Vec2::new(left, top),
            max: Vec2::new(right, bottom),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Shrink every edge inward by `margin`
    pub fn shrink(&self, margin: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(margin),
            max: self.max - Vec2::splat(margin),
        }
    }

    /// Strict overlap on both axes; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Overlap test after shrinking both boxes by the forgiveness margin
///
/// Edge grazes stay non-fatal: two boxes only collide once they overlap by
/// more than twice the margin on each axis.
pub fn overlaps_forgiving(a: &Aabb, b: &Aabb, margin: f32) -> bool {
    a.shrink(margin).overlaps(&b.shrink(margin))
}

/// Map a continuous coordinate to `(row, col)`, or `None` if off the grid
pub fn cell_at(pos: Vec2, cell_size: f32, rows: usize, cols: usize) -> Option<(usize, usize)> {
    if cell_size <= 0.0 || !pos.is_finite() || pos.x < 0.0 || pos.y < 0.0 {
        return None;
    }
    let col = (pos.x / cell_size).floor() as usize;
    let row = (pos.y / cell_size).floor() as usize;
    if row >= rows || col >= cols {
        return None;
    }
    Some((row, col))
}

/// Center of a cell in screen space
pub fn cell_center(row: usize, col: usize, cell_size: f32) -> Vec2 {
    Vec2::new(
        (col as f32 + 0.5) * cell_size,
        (row as f32 + 0.5) * cell_size,
    )
}
