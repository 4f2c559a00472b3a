//! In-place migration of older DRW word streams to the current version

use serde::{Deserialize, Serialize};

use super::header::{DrwHeader, DRW_ID, DRW_VERSION};
use super::word::{DrwWord, TAG_DRAW, TAG_SIZE_CHANGE};
use crate::brush::{BrushControl, BrushKind};

/// Before 1001 positions were stored on a 0..2047 grid
const VERSION_CENTERED_POSITIONS: u32 = 1001;
/// Before 1002 size changes used a combined type/control nibble and a +64 size bias
const VERSION_SPLIT_BRUSH_FIELDS: u32 = 1002;

const LEGACY_SIZE_BIAS: u32 = 1 << 6;

/// How pre-1001 draw positions are migrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegacyPositionRemap {
    /// Bit-compatible with every released reader: the remapped y value is
    /// written into x and y is left unchanged.
    #[default]
    Faithful,
    /// Remap each axis from its own value.
    BothAxes,
}

/// Bring `words` up to [`DRW_VERSION`], updating `header.version`.
pub fn upgrade(header: &mut DrwHeader, words: &mut [u32], remap: LegacyPositionRemap) {
    // Some writers stored the magic in the version slot
    if header.version == DRW_ID {
        header.version = VERSION_SPLIT_BRUSH_FIELDS;
    }

    if header.version >= DRW_VERSION {
        return;
    }

    tracing::debug!(
        "[DRW] upgrading {} commands from version {}",
        words.len(),
        header.version
    );

    for raw in words.iter_mut() {
        let mut word = DrwWord(*raw);

        if header.version < VERSION_CENTERED_POSITIONS && word.tag() == TAG_DRAW {
            remap_position(&mut word, remap);
        }

        if header.version < VERSION_SPLIT_BRUSH_FIELDS && word.tag() == TAG_SIZE_CHANGE {
            split_brush_fields(&mut word);
        }

        *raw = word.0;
    }

    header.version = DRW_VERSION;
}

fn recenter(v: u32) -> u32 {
    (v as f32 * 1024.0 / 2047.0 + 512.0).round() as u32
}

fn remap_position(word: &mut DrwWord, remap: LegacyPositionRemap) {
    match remap {
        LegacyPositionRemap::Faithful => {
            let x = recenter(word.x());
            word.set_x(x);
            let x = recenter(word.y());
            word.set_x(x);
        }
        LegacyPositionRemap::BothAxes => {
            let (x, y) = (recenter(word.x()), recenter(word.y()));
            word.set_x(x);
            word.set_y(y);
        }
    }
}

fn split_brush_fields(word: &mut DrwWord) {
    let combined = (word.kind_bits() << 2) | word.control_bits();
    let mapped = match combined {
        0 => Some((BrushKind::Hard, BrushControl::VariableOpacity)),
        2 => Some((BrushKind::Soft, BrushControl::VariableOpacity)),
        4 => Some((BrushKind::Hard, BrushControl::Fixed)),
        6 => Some((BrushKind::Soft, BrushControl::Fixed)),
        _ => None,
    };
    if let Some((kind, control)) = mapped {
        word.set_kind_bits(kind.bits());
        word.set_control_bits(control.bits());
    }
    word.set_size(word.size().wrapping_sub(LEGACY_SIZE_BIAS));
}
