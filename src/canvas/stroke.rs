//! Stroke interpolation
//!
//! Input samples arrive at whatever rate the device delivers them. Between two
//! samples stamps are laid at a fixed fraction of the brush diameter, with size
//! and opacity interpolated along the segment. Samples closer than one spacing
//! step only bump an idle counter, so a resting pen darkens slowly instead of
//! stamping on every event.

use super::Canvas;
use crate::brush::{BrushControl, BrushKind};
use crate::primitives::Pos;

/// Floor for the distance between stamps under custom spacing settings
const MIN_SPACING_DISTANCE: f32 = 0.1;

/// Interpolation state of the stroke in progress
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrokeState {
    pub active: bool,
    /// Position of the last stamp
    pub last_pos: Pos,
    /// Last raw input sample
    pub last_input: Pos,
    /// Pressure at the last stamp, 0-255
    pub last_pressure: f32,
    /// Sub-spacing samples since the last stamp
    pub idle: u32,
    /// Bounding box of everything stamped by this stroke
    pub min: Pos,
    pub max: Pos,
}

impl StrokeState {
    fn begin(&mut self, pos: Pos, pressure: f32) {
        *self = StrokeState {
            active: true,
            last_pos: pos,
            last_input: pos,
            last_pressure: pressure,
            idle: 0,
            min: pos,
            max: pos,
        };
    }

    pub(crate) fn grow(&mut self, min: Pos, max: Pos) {
        self.min = self.min.min(min);
        self.max = self.max.max(max);
    }

    pub(crate) fn mirror(&mut self, size: Pos, flip_x: bool, flip_y: bool) {
        let reflect = |p: Pos| {
            Pos::new(
                if flip_x { size.x - p.x } else { p.x },
                if flip_y { size.y - p.y } else { p.y },
            )
        };
        let (a, b) = (reflect(self.min), reflect(self.max));
        self.min = a.min(b);
        self.max = a.max(b);
        self.last_pos = reflect(self.last_pos);
        self.last_input = reflect(self.last_input);
    }
}

impl Canvas {
    /// Diameter at `pressure` (0-255) for the current brush
    fn variable_size(&self, pressure: f32) -> f32 {
        if self.brush.control.varies_size() {
            (pressure * self.brush.size as f32 / 255.0).max(2.0)
        } else {
            self.brush.size as f32
        }
    }

    /// 8-bit stamp opacity at `pressure` for the current brush
    fn stroke_opacity(&self, pressure: f32) -> i32 {
        if self.brush.control.varies_opacity() {
            (pressure * self.brush.opacity).round() as i32
        } else {
            (255.0 * self.brush.opacity).round() as i32
        }
    }

    /// Feed one input sample (pixel space, pressure 0-255).
    ///
    /// `forced` stamps sub-spacing samples immediately instead of waiting for
    /// the idle counter.
    pub(crate) fn stroke_to(&mut self, pos: Pos, pressure: i32, forced: bool) {
        self.stroke.last_input = pos;

        let control = self.brush.control;
        let pressure = if control == BrushControl::Fixed {
            255.0
        } else {
            pressure as f32
        };

        if !self.stroke.active {
            let size = if control.varies_size() {
                self.variable_size(pressure) as i32
            } else {
                self.brush.size
            };
            let opacity = self.stroke_opacity(pressure);
            self.stroke.begin(pos, pressure);
            self.stamp(pos, size, opacity);
            return;
        }

        let cfg = self.config.stroke.clone();

        let delta = pos - self.stroke.last_pos;
        let delta_pressure = pressure - self.stroke.last_pressure;
        let mut distance = delta.length();
        if distance == 0.0 {
            distance = cfg.min_distance;
        }

        let dx = delta.x / distance;
        let dy = delta.y / distance;
        let da = delta_pressure / distance;

        // Hard brushes with pressure-driven opacity band visibly when opacity
        // changes quickly, so they tighten spacing in proportion
        let mut spacing = cfg.spacing;
        if da != 0.0 && control == BrushControl::VariableOpacity && self.brush.kind == BrushKind::Hard
        {
            let adaptive = (cfg.adaptive_spacing_factor
                / self.brush.size as f32
                / (da * self.brush.opacity))
                .abs();
            spacing = cfg.spacing.min(adaptive.max(cfg.min_adaptive_spacing));
        }

        let mut spacing_distance =
            (self.variable_size(self.stroke.last_pressure) * spacing).max(MIN_SPACING_DISTANCE);

        if distance < spacing_distance {
            self.stroke.idle += 1;
            if self.stroke.idle > cfg.idle_threshold || forced {
                self.stroke.idle = cfg.idle_reset;
                self.stroke.last_pos = pos;
                self.stroke.last_pressure = pressure;
                let size = self.variable_size(pressure) as i32;
                let opacity = self.stroke_opacity(pressure);
                self.stamp(pos, size, opacity);
            }
            return;
        }

        if control.varies_size() {
            // Diameter follows pressure, so spacing is recomputed after every stamp
            let opacity = self.stroke_opacity(pressure);
            while distance >= spacing_distance {
                self.stroke.last_pressure += da * spacing_distance;
                self.stroke.last_pos.x += dx * spacing_distance;
                self.stroke.last_pos.y += dy * spacing_distance;
                distance -= spacing_distance;

                let size = self.variable_size(self.stroke.last_pressure.trunc());
                self.stamp(self.stroke.last_pos, size as i32, opacity);

                spacing_distance = (size * spacing).max(MIN_SPACING_DISTANCE);
            }
        } else {
            let step_x = dx * spacing_distance;
            let step_y = dy * spacing_distance;
            let step_a = da * spacing_distance;
            while distance >= spacing_distance {
                self.stroke.last_pressure += step_a;
                self.stroke.last_pos.x += step_x;
                self.stroke.last_pos.y += step_y;
                distance -= spacing_distance;

                let opacity = (self.stroke.last_pressure * self.brush.opacity).round() as i32;
                self.stamp(self.stroke.last_pos, self.brush.size, opacity);
            }
        }
    }

    /// Commit the stroke: copy its box from image to backup and clear its alpha.
    pub fn end_stroke(&mut self) {
        if !self.stroke.active {
            return;
        }

        let clamp_x = |v: f32| (v as i32).clamp(0, self.width as i32) as usize;
        let clamp_y = |v: f32| (v as i32).clamp(0, self.height as i32) as usize;
        let (x0, x1) = (clamp_x(self.stroke.min.x), clamp_x(self.stroke.max.x));
        let (y0, y1) = (clamp_y(self.stroke.min.y), clamp_y(self.stroke.max.y));

        if x0 < x1 {
            for y in y0..y1 {
                let row = y * self.width;
                self.backup[row + x0..row + x1].copy_from_slice(&self.image[row + x0..row + x1]);
                self.alpha[row + x0..row + x1].fill(0);
            }
        }

        self.stroke.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::{Brush, BrushTables};
    use crate::primitives::Color;
    use std::sync::Arc;

    fn canvas_with(kind: BrushKind, control: BrushControl, size: i32) -> Canvas {
        let mut c = Canvas::new(100, 100, Arc::new(BrushTables::new()));
        c.set_brush(Brush {
            color: Color::new(0, 0, 255, 255),
            kind,
            size,
            control,
            opacity: 1.0,
        });
        c.reset_dirty_rect();
        c
    }

    #[test]
    fn test_first_sample_stamps_once() {
        let mut c = canvas_with(BrushKind::Hard, BrushControl::Fixed, 10);
        c.stroke_to(Pos::new(20.0, 20.0), 0, false);
        assert!(c.stroke.active);
        assert_eq!(c.stroke.last_pressure, 255.0);
        assert_eq!(c.alpha()[20 * 100 + 20], 255);
        assert_eq!(c.stroke.min, Pos::new(15.0, 15.0));
        assert_eq!(c.stroke.max, Pos::new(26.0, 26.0));
    }

    #[test]
    fn test_segment_is_filled() {
        let mut c = canvas_with(BrushKind::Hard, BrushControl::Fixed, 8);
        c.stroke_to(Pos::new(10.0, 50.0), 255, false);
        c.stroke_to(Pos::new(90.0, 50.0), 255, false);
        for x in 10..=88 {
            assert!(c.alpha()[50 * 100 + x] > 0, "gap at x={x}");
        }
        // the stroke stops one spacing step short of the sample
        assert!(c.stroke.last_pos.x <= 90.0);
        assert!(c.stroke.last_pos.x > 90.0 - 8.0 * 0.225);
    }

    #[test]
    fn test_idle_counter() {
        let mut c = canvas_with(BrushKind::Soft, BrushControl::Fixed, 32);
        c.stroke_to(Pos::new(50.0, 50.0), 255, false);
        let first = c.alpha()[50 * 100 + 50];
        assert!(first > 0);

        for _ in 0..15 {
            c.stroke_to(Pos::new(50.0, 50.0), 255, false);
        }
        assert_eq!(c.stroke.idle, 15);
        assert_eq!(c.alpha()[50 * 100 + 50], first);

        c.stroke_to(Pos::new(50.0, 50.0), 255, false);
        assert_eq!(c.stroke.idle, 10);
        assert!(c.alpha()[50 * 100 + 50] > first);
    }

    #[test]
    fn test_forced_sample_stamps_immediately() {
        let mut c = canvas_with(BrushKind::Soft, BrushControl::Fixed, 32);
        c.stroke_to(Pos::new(50.0, 50.0), 255, false);
        let first = c.alpha()[50 * 100 + 50];
        c.stroke_to(Pos::new(50.0, 50.0), 255, true);
        assert!(c.alpha()[50 * 100 + 50] > first);
        assert_eq!(c.stroke.idle, 10);
    }

    #[test]
    fn test_variable_size_follows_pressure() {
        let mut c = canvas_with(BrushKind::Hard, BrushControl::VariableSize, 40);
        c.stroke_to(Pos::new(20.0, 50.0), 64, false);
        // 64/255 of 40px is 10px
        assert_eq!(c.stroke.max.y - c.stroke.min.y, 11.0);

        c.reset_dirty_rect();
        c.stroke_to(Pos::new(80.0, 50.0), 255, false);
        let dirty = c.dirty_rect();
        // ends near full size
        assert!(dirty.max.y - dirty.min.y > 30.0);
    }

    #[test]
    fn test_variable_opacity_caps_alpha() {
        let mut c = canvas_with(BrushKind::Hard, BrushControl::VariableOpacity, 12);
        c.stroke_to(Pos::new(20.0, 50.0), 100, false);
        c.stroke_to(Pos::new(25.0, 50.0), 100, false);
        assert!(c.alpha().iter().all(|&a| a <= 100));
        assert_eq!(c.alpha()[50 * 100 + 20], 100);
    }

    #[test]
    fn test_end_stroke_commits_box() {
        let mut c = canvas_with(BrushKind::Hard, BrushControl::Fixed, 10);
        c.stroke_to(Pos::new(30.0, 30.0), 255, false);
        c.stroke_to(Pos::new(60.0, 40.0), 255, false);
        c.end_stroke();

        assert!(!c.stroke.active);
        assert!(c.alpha().iter().all(|&a| a == 0));
        assert_eq!(c.image(), c.backup());
        assert_eq!(c.pixel(30, 30), Some(Color::new(0, 0, 255, 255)));

        // a second end is a no-op
        c.end_stroke();
        assert_eq!(c.image(), c.backup());
    }

    #[test]
    fn test_new_stroke_blends_over_committed_one() {
        let mut c = canvas_with(BrushKind::Hard, BrushControl::Fixed, 10);
        c.stroke_to(Pos::new(30.0, 30.0), 255, false);
        c.end_stroke();

        let mut brush = *c.brush();
        brush.color = Color::new(255, 0, 0, 255);
        brush.opacity = 0.5;
        c.set_brush(brush);
        c.stroke_to(Pos::new(30.0, 30.0), 255, false);

        let px = c.pixel(30, 30).unwrap_or_default();
        // half red over blue
        assert!(px.r > 100 && px.r < 160);
        assert!(px.b > 100 && px.b < 160);
    }
}
