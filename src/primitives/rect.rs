use serde::{Deserialize, Serialize};

use super::Pos;

/// Accumulated bounding box of modified pixels.
///
/// Starts inverted (min = +MAX, max = -MAX) so the first union fully defines it.
/// `max` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirtyRect {
    pub min: Pos,
    pub max: Pos,
}

impl DirtyRect {
    pub const fn empty() -> Self {
        Self {
            min: Pos::new(f32::MAX, f32::MAX),
            max: Pos::new(-f32::MAX, -f32::MAX),
        }
    }

    pub fn covering(width: usize, height: usize) -> Self {
        Self {
            min: Pos::new(0.0, 0.0),
            max: Pos::new(width as f32, height as f32),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Grow to include the box `[min, max)`.
    pub fn union(&mut self, min: Pos, max: Pos) {
        self.min = self.min.min(min);
        self.max = self.max.max(max);
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        let (x, y) = (x as f32, y as f32);
        x >= self.min.x && x < self.max.x && y >= self.min.y && y < self.max.y
    }
}

impl Default for DirtyRect {
    fn default() -> Self {
        Self::empty()
    }
}
