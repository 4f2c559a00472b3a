//! Draw commands - the unit of the replayable command log

use serde::{Deserialize, Serialize};

use crate::brush::{BrushControl, BrushKind};
use crate::primitives::{Color, Pos};

/// One logical painting action.
///
/// Positions and sizes are normalized so a log replays onto any canvas size:
/// `pos` is in [0, 1] of the canvas dimensions and `size` is a fraction of
/// the canvas width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DrawCommand {
    /// Stroke sample; starts a stroke when none is active
    Draw { pos: Pos, pressure: u8 },
    /// Pen lifted
    DrawEnd { pressure: u8 },
    /// Brush color change, or a canvas flip when either flag is set
    ColorChange {
        color: Color,
        flip_x: bool,
        flip_y: bool,
    },
    SizeChange {
        control: BrushControl,
        kind: BrushKind,
        size: f32,
        opacity: f32,
    },
}

impl DrawCommand {
    pub fn draw(pos: Pos, pressure: u8) -> Self {
        DrawCommand::Draw { pos, pressure }
    }

    pub fn draw_end(pressure: u8) -> Self {
        DrawCommand::DrawEnd { pressure }
    }

    pub fn color_change(color: Color) -> Self {
        DrawCommand::ColorChange {
            color,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Flip the canvas; `flip_x` mirrors horizontally, otherwise vertically.
    pub fn flip(flip_x: bool) -> Self {
        DrawCommand::ColorChange {
            color: Color::TRANSPARENT,
            flip_x,
            flip_y: !flip_x,
        }
    }

    pub fn size_change(control: BrushControl, kind: BrushKind, size: f32, opacity: f32) -> Self {
        DrawCommand::SizeChange {
            control,
            kind,
            size,
            opacity,
        }
    }

    pub fn is_stroke_end(&self) -> bool {
        matches!(self, DrawCommand::DrawEnd { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_sets_exactly_one_axis() {
        match DrawCommand::flip(true) {
            DrawCommand::ColorChange { flip_x, flip_y, .. } => assert!(flip_x && !flip_y),
            other => panic!("unexpected {other:?}"),
        }
        match DrawCommand::flip(false) {
            DrawCommand::ColorChange { flip_x, flip_y, .. } => assert!(!flip_x && flip_y),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_json_shape() {
        let cmd = DrawCommand::draw(Pos::new(0.25, 0.5), 200);
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"draw\""));
        let back: DrawCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
