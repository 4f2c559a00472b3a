//! Brush stamping

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Canvas;
use crate::brush::{BrushTables, DIST_TABLE_CENTER, DIST_TABLE_WIDTH};
use crate::primitives::{fixed_scale, Color, Pos};

/// What a stamp does with its footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StampMode {
    /// Raise stroke alpha and recomposite over the backup
    #[default]
    Paint,
    /// Set the brush color to the weighted average under the footprint
    PickColor,
}

impl Canvas {
    /// Stamp the brush centred at `pos` (pixels) with `diameter` and 8-bit `opacity`.
    pub(crate) fn stamp(&mut self, pos: Pos, diameter: i32, opacity: i32) {
        let diameter = diameter.max(2);
        let opacity = opacity.clamp(0, 255);

        let half = (diameter / 2) as f32;
        let p0 = Pos::new(pos.x - half, pos.y - half);
        let p1 = Pos::new(pos.x + half + 1.0, pos.y + half + 1.0);

        let x0 = p0.x.min(p1.x).max(0.0) as i32;
        let x1 = p0.x.max(p1.x).min(self.width as f32) as i32;
        let y0 = p0.y.min(p1.y).max(0.0) as i32;
        let y1 = p0.y.max(p1.y).min(self.height as f32) as i32;

        let box_min = Pos::new(x0 as f32, y0 as f32);
        let box_max = Pos::new(x1 as f32, y1 as f32);
        self.stroke.grow(box_min, box_max);
        self.dirty.union(box_min, box_max);

        // Walk the distance table at the same rate as the footprint
        let db = (DIST_TABLE_WIDTH - 1) as f32 / diameter as f32;
        let xb = (DIST_TABLE_CENTER as f32 - (pos.x - x0 as f32) * db).max(0.0);
        let mut yb = (DIST_TABLE_CENTER as f32 - (pos.y - y0 as f32) * db).max(0.0);

        let row = BrushTables::row_for_diameter(diameter);
        let kind = self.brush.kind;
        let tables = Arc::clone(&self.tables);

        match self.stamp_mode {
            StampMode::Paint => {
                let color = self.brush.color;
                for y in y0..y1 {
                    let mut x2b = xb;
                    for x in x0..x1 {
                        let lookup = tables.distance(x2b as usize, yb as usize);
                        let intensity =
                            fixed_scale(tables.intensity(kind, row, lookup) as i32, opacity);

                        // Screen-style accumulate, capped at the stroke opacity and never lowered
                        let idx = y as usize * self.width + x as usize;
                        let base = self.alpha[idx] as i32;
                        let a = (intensity + base - ((intensity * base) >> 8))
                            .min(opacity)
                            .max(base);
                        self.alpha[idx] = a as u8;

                        let under = Color::from_argb(self.backup[idx]);
                        self.image[idx] = color.lerp(under, a as u8).to_argb();

                        x2b += db;
                    }
                    yb += db;
                }
            }
            StampMode::PickColor => {
                let (mut r, mut g, mut b, mut weight) = (0u64, 0u64, 0u64, 0u64);
                for y in y0..y1 {
                    let mut x2b = xb;
                    for x in x0..x1 {
                        let lookup = tables.distance(x2b as usize, yb as usize);
                        let intensity =
                            fixed_scale(tables.intensity(kind, row, lookup) as i32, opacity) as u64;
                        let c = Color::from_argb(self.image[y as usize * self.width + x as usize]);
                        r += c.r as u64 * intensity;
                        g += c.g as u64 * intensity;
                        b += c.b as u64 * intensity;
                        weight += intensity;
                        x2b += db;
                    }
                    yb += db;
                }
                if weight > 0 {
                    self.brush.color.r = (r / weight) as u8;
                    self.brush.color.g = (g / weight) as u8;
                    self.brush.color.b = (b / weight) as u8;
                }
            }
        }
    }

    /// Color under `pos`, clamped to the canvas
    pub fn pickup_color(&self, pos: Pos) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::TRANSPARENT;
        }
        let x = (pos.x.clamp(0.0, self.width as f32) as usize).min(self.width - 1);
        let y = (pos.y.clamp(0.0, self.height as f32) as usize).min(self.height - 1);
        Color::from_argb(self.image[y * self.width + x])
    }
}
