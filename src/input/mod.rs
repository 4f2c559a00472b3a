//! Input module - pen samples from the host windowing layer

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::primitives::Pos;

/// Raw input point from the tablet/pen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawInputPoint {
    /// X coordinate in canvas pixels
    pub x: f32,
    /// Y coordinate in canvas pixels
    pub y: f32,
    /// Pressure value (0.0 - 1.0)
    pub pressure: f32,
}

impl RawInputPoint {
    /// Create a new input point
    pub fn new(x: f32, y: f32, pressure: f32) -> Self {
        Self {
            x,
            y,
            pressure: pressure.clamp(0.0, 1.0),
        }
    }

    /// Mouse samples carry no pressure and paint at full strength.
    pub fn mouse(x: f32, y: f32) -> Self {
        Self::new(x, y, 1.0)
    }

    pub fn pos(&self) -> Pos {
        Pos::new(self.x, self.y)
    }

    /// Pressure on the 0-255 scale the stroke engine uses
    pub fn pressure_u8(&self) -> u8 {
        (self.pressure.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

impl Canvas {
    /// Record a live pen sample.
    pub fn draw_input(&mut self, point: &RawInputPoint) {
        self.draw(point.pos(), point.pressure_u8());
    }

    /// Pen lifted after `point`.
    pub fn end_input(&mut self, point: &RawInputPoint) {
        self.end_draw(point.pressure_u8());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::brush::BrushTables;
    use crate::command::DrawCommand;
    use std::sync::Arc;

    #[test]
    fn test_raw_input_point_creation() {
        let point = RawInputPoint::new(100.0, 200.0, 0.5);
        assert_eq!(point.x, 100.0);
        assert_eq!(point.y, 200.0);
        assert_eq!(point.pressure, 0.5);
        assert_eq!(point.pressure_u8(), 128);
    }

    #[test]
    fn test_point_deserializes_from_position_and_pressure() {
        let point: RawInputPoint =
            serde_json::from_str(r#"{"x": 12.0, "y": 4.5, "pressure": 0.25}"#).unwrap();
        assert_eq!(point.pos(), Pos::new(12.0, 4.5));
        assert_eq!(point.pressure_u8(), 64);
    }

    #[test]
    fn test_pressure_clamping() {
        let point = RawInputPoint::new(0.0, 0.0, 1.5);
        assert_eq!(point.pressure, 1.0);
        assert_eq!(point.pressure_u8(), 255);

        let point = RawInputPoint::new(0.0, 0.0, -0.5);
        assert_eq!(point.pressure_u8(), 0);
    }

    #[test]
    fn test_draw_input_records_normalized_sample() {
        let mut c = Canvas::new(200, 100, Arc::new(BrushTables::new()));
        c.draw_input(&RawInputPoint::mouse(50.0, 25.0));
        c.end_input(&RawInputPoint::mouse(50.0, 25.0));

        // the brush from construction leads the log
        assert_eq!(c.playback_len(), 4);
        assert_eq!(c.commands()[0], DrawCommand::color_change(c.brush().color));
        assert_eq!(
            &c.commands()[2..],
            &[
                DrawCommand::draw(Pos::new(0.25, 0.25), 255),
                DrawCommand::draw_end(255),
            ]
        );
    }
}
