//! Brush module - brush state and the shared intensity lookup tables

mod tables;

pub use tables::{BrushTables, DIST_TABLE_CENTER, DIST_TABLE_WIDTH, INTENSITY_ROWS};

use serde::{Deserialize, Serialize};

use crate::primitives::Color;

/// Brush shape, selecting one of the intensity tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrushKind {
    /// Flat core with a short smooth falloff
    #[default]
    Hard,
    /// Half-intensity falloff across the whole radius
    Soft,
    /// All-zero table, paints nothing
    Cursor,
}

impl BrushKind {
    pub const ALL: [BrushKind; 3] = [BrushKind::Hard, BrushKind::Soft, BrushKind::Cursor];

    /// Wire value
    pub const fn bits(self) -> u32 {
        match self {
            BrushKind::Hard => 0,
            BrushKind::Soft => 1,
            BrushKind::Cursor => 2,
        }
    }

    /// Decode a wire value, `None` for ids that name no brush
    pub const fn from_bits(bits: u32) -> Option<BrushKind> {
        match bits {
            0 => Some(BrushKind::Hard),
            1 => Some(BrushKind::Soft),
            2 => Some(BrushKind::Cursor),
            _ => None,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self.bits() as usize
    }
}

/// How stylus pressure drives the brush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrushControl {
    /// Pressure is ignored
    #[default]
    Fixed,
    VariableOpacity,
    VariableSize,
    /// Pressure drives both opacity and size
    Both,
}

impl BrushControl {
    pub const VARIABLE_OPACITY: u32 = 1;
    pub const VARIABLE_SIZE: u32 = 2;

    pub const fn bits(self) -> u32 {
        match self {
            BrushControl::Fixed => 0,
            BrushControl::VariableOpacity => Self::VARIABLE_OPACITY,
            BrushControl::VariableSize => Self::VARIABLE_SIZE,
            BrushControl::Both => Self::VARIABLE_OPACITY | Self::VARIABLE_SIZE,
        }
    }

    /// Decode the two control bits; higher bits are ignored.
    pub const fn from_bits(bits: u32) -> BrushControl {
        match bits & 3 {
            0 => BrushControl::Fixed,
            1 => BrushControl::VariableOpacity,
            2 => BrushControl::VariableSize,
            _ => BrushControl::Both,
        }
    }

    pub const fn varies_size(self) -> bool {
        self.bits() & Self::VARIABLE_SIZE != 0
    }

    pub const fn varies_opacity(self) -> bool {
        self.bits() & Self::VARIABLE_OPACITY != 0
    }
}

/// Current brush of a canvas.
///
/// Mutated by `ColorChange`/`SizeChange` commands or directly by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: Color,
    pub kind: BrushKind,
    /// Diameter in pixels
    pub size: i32,
    pub control: BrushControl,
    /// Opacity in [0, 1]
    pub opacity: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            kind: BrushKind::Hard,
            size: 32,
            control: BrushControl::Fixed,
            opacity: 1.0,
        }
    }
}

impl Brush {
    /// Opacity as an 8-bit value
    pub fn opacity_u8(&self) -> i32 {
        (self.opacity.clamp(0.0, 1.0) * 255.0).round() as i32
    }
}
