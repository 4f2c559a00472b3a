//! Bit-packed 32-bit command words
//!
//! | tag (bits 0-1) | layout                                                       |
//! |----------------|--------------------------------------------------------------|
//! | 0 Draw         | alpha 2-9, x 10-20, y 21-31                                  |
//! | 1 DrawEnd      | alpha 2-9                                                    |
//! | 2 ColorChange  | rgb 2-25, flip x 26, flip y 27                               |
//! | 3 SizeChange   | size 2-17, control 18-19, type 20-21, opacity 22-29          |
//!
//! Positions are stored as `v * 1024 + 512`, sizes as `v * 2^15`.

use crate::brush::{BrushControl, BrushKind};
use crate::command::DrawCommand;
use crate::primitives::{Color, Pos};

pub const TAG_DRAW: u32 = 0;
pub const TAG_DRAW_END: u32 = 1;
pub const TAG_COLOR_CHANGE: u32 = 2;
pub const TAG_SIZE_CHANGE: u32 = 3;

const POS_SCALE: f32 = 1024.0;
const POS_BIAS: f32 = 512.0;
const SIZE_SCALE: f32 = (1u32 << 15) as f32;

#[derive(Debug, Clone, Copy)]
struct Field {
    shift: u32,
    bits: u32,
}

impl Field {
    const fn new(shift: u32, bits: u32) -> Self {
        Self { shift, bits }
    }

    const fn mask(self) -> u32 {
        ((1u64 << self.bits) - 1) as u32
    }

    const fn max(self) -> u32 {
        self.mask()
    }
}

const TAG: Field = Field::new(0, 2);
const ALPHA: Field = Field::new(2, 8);
const X: Field = Field::new(10, 11);
const Y: Field = Field::new(21, 11);
const COLOR: Field = Field::new(2, 24);
const FLIP_X: Field = Field::new(26, 1);
const FLIP_Y: Field = Field::new(27, 1);
const SIZE: Field = Field::new(2, 16);
const CONTROL: Field = Field::new(18, 2);
const KIND: Field = Field::new(20, 2);
const OPACITY: Field = Field::new(22, 8);

/// One command in wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrwWord(pub u32);

impl DrwWord {
    #[inline]
    fn get(self, field: Field) -> u32 {
        (self.0 >> field.shift) & field.mask()
    }

    /// Store `value` into `field`, wrapping to the field width.
    #[inline]
    fn set(&mut self, field: Field, value: u32) {
        let mask = field.mask() << field.shift;
        self.0 = (self.0 & !mask) | ((value << field.shift) & mask);
    }

    fn with(mut self, field: Field, value: u32) -> Self {
        self.set(field, value);
        self
    }

    pub fn tag(self) -> u32 {
        self.get(TAG)
    }

    pub fn alpha(self) -> u8 {
        self.get(ALPHA) as u8
    }

    pub fn x(self) -> u32 {
        self.get(X)
    }

    pub fn y(self) -> u32 {
        self.get(Y)
    }

    pub fn set_x(&mut self, x: u32) {
        self.set(X, x);
    }

    pub fn set_y(&mut self, y: u32) {
        self.set(Y, y);
    }

    pub fn rgb(self) -> u32 {
        self.get(COLOR)
    }

    pub fn flip_x(self) -> bool {
        self.get(FLIP_X) != 0
    }

    pub fn flip_y(self) -> bool {
        self.get(FLIP_Y) != 0
    }

    pub fn size(self) -> u32 {
        self.get(SIZE)
    }

    pub fn set_size(&mut self, size: u32) {
        self.set(SIZE, size);
    }

    pub fn control_bits(self) -> u32 {
        self.get(CONTROL)
    }

    pub fn set_control_bits(&mut self, bits: u32) {
        self.set(CONTROL, bits);
    }

    pub fn kind_bits(self) -> u32 {
        self.get(KIND)
    }

    pub fn set_kind_bits(&mut self, bits: u32) {
        self.set(KIND, bits);
    }

    pub fn opacity(self) -> u8 {
        self.get(OPACITY) as u8
    }

    /// Pack a command. Out-of-range values saturate at the field limits.
    pub fn encode(cmd: &DrawCommand) -> DrwWord {
        match *cmd {
            DrawCommand::Draw { pos, pressure } => DrwWord::default()
                .with(TAG, TAG_DRAW)
                .with(ALPHA, pressure as u32)
                .with(X, quantize(pos.x * POS_SCALE + POS_BIAS, X))
                .with(Y, quantize(pos.y * POS_SCALE + POS_BIAS, Y)),
            DrawCommand::DrawEnd { pressure } => DrwWord::default()
                .with(TAG, TAG_DRAW_END)
                .with(ALPHA, pressure as u32),
            DrawCommand::ColorChange {
                color,
                flip_x,
                flip_y,
            } => DrwWord::default()
                .with(TAG, TAG_COLOR_CHANGE)
                .with(COLOR, color.to_argb() & COLOR.mask())
                .with(FLIP_X, flip_x as u32)
                .with(FLIP_Y, flip_y as u32),
            DrawCommand::SizeChange {
                control,
                kind,
                size,
                opacity,
            } => DrwWord::default()
                .with(TAG, TAG_SIZE_CHANGE)
                .with(SIZE, quantize(size * SIZE_SCALE, SIZE))
                .with(CONTROL, control.bits())
                .with(KIND, kind.bits())
                .with(OPACITY, quantize((opacity * 255.0).round(), OPACITY)),
        }
    }

    /// Unpack into a command. Every bit pattern decodes to something.
    pub fn decode(self) -> DrawCommand {
        match self.tag() {
            TAG_DRAW => DrawCommand::Draw {
                pos: Pos::new(
                    (self.x() as f32 - POS_BIAS) / POS_SCALE,
                    (self.y() as f32 - POS_BIAS) / POS_SCALE,
                ),
                pressure: self.alpha(),
            },
            TAG_DRAW_END => DrawCommand::DrawEnd {
                pressure: self.alpha(),
            },
            TAG_COLOR_CHANGE => DrawCommand::ColorChange {
                color: Color::from_argb(0xFF00_0000 | self.rgb()),
                flip_x: self.flip_x(),
                flip_y: self.flip_y(),
            },
            _ => {
                let kind = BrushKind::from_bits(self.kind_bits()).unwrap_or_else(|| {
                    tracing::warn!(
                        "[DRW] brush type {} is not a known brush, using hard",
                        self.kind_bits()
                    );
                    BrushKind::Hard
                });
                DrawCommand::SizeChange {
                    control: BrushControl::from_bits(self.control_bits()),
                    kind,
                    size: self.size() as f32 / SIZE_SCALE,
                    opacity: self.opacity() as f32 / 255.0,
                }
            }
        }
    }
}

/// Truncate toward zero and clamp into the field range.
fn quantize(value: f32, field: Field) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        (value as u32).min(field.max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_layout() {
        let word = DrwWord::encode(&DrawCommand::draw(Pos::new(0.5, 0.0), 0xAB));
        assert_eq!(word.tag(), TAG_DRAW);
        assert_eq!(word.alpha(), 0xAB);
        assert_eq!(word.x(), 1024);
        assert_eq!(word.y(), 512);
        assert_eq!(word.0, (512 << 21) | (1024 << 10) | (0xAB << 2));
    }

    #[test]
    fn test_color_change_layout() {
        let cmd = DrawCommand::ColorChange {
            color: Color::new(0x12, 0x34, 0x56, 0x00),
            flip_x: false,
            flip_y: true,
        };
        let word = DrwWord::encode(&cmd);
        assert_eq!(word.0, (1 << 27) | (0x12_3456 << 2) | TAG_COLOR_CHANGE);
        // alpha is not carried on the wire
        match word.decode() {
            DrawCommand::ColorChange { color, flip_x, flip_y } => {
                assert_eq!(color, Color::new(0x12, 0x34, 0x56, 0xFF));
                assert!(!flip_x && flip_y);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_size_change_layout() {
        let cmd = DrawCommand::size_change(BrushControl::Both, BrushKind::Soft, 0.25, 1.0);
        let word = DrwWord::encode(&cmd);
        assert_eq!(word.tag(), TAG_SIZE_CHANGE);
        assert_eq!(word.size(), 8192);
        assert_eq!(word.control_bits(), 3);
        assert_eq!(word.kind_bits(), 1);
        assert_eq!(word.opacity(), 255);
        assert_eq!(word.decode(), cmd);
    }

    #[test]
    fn test_every_tag_roundtrips() {
        let commands = [
            DrawCommand::draw(Pos::new(0.25, 0.75), 17),
            DrawCommand::draw(Pos::new(-0.5, 1.49), 255),
            DrawCommand::draw_end(200),
            DrawCommand::color_change(Color::new(1, 2, 3, 255)),
            DrawCommand::flip(true),
            DrawCommand::size_change(BrushControl::VariableOpacity, BrushKind::Cursor, 0.0625, 0.5),
        ];
        for cmd in commands {
            let decoded = DrwWord::encode(&cmd).decode();
            // a second pass is exact once values sit on the wire grid
            assert_eq!(DrwWord::encode(&decoded).decode(), decoded);
            assert_eq!(DrwWord::encode(&decoded), DrwWord::encode(&cmd));
        }
    }

    #[test]
    fn test_out_of_range_values_saturate() {
        let word = DrwWord::encode(&DrawCommand::draw(Pos::new(5.0, -3.0), 1));
        assert_eq!(word.x(), 2047);
        assert_eq!(word.y(), 0);

        let word = DrwWord::encode(&DrawCommand::size_change(
            BrushControl::Fixed,
            BrushKind::Hard,
            4.0,
            2.0,
        ));
        assert_eq!(word.size(), 65535);
        assert_eq!(word.opacity(), 255);
    }

    #[test]
    fn test_invalid_brush_type_decodes_as_hard() {
        let word = DrwWord(TAG_SIZE_CHANGE | (3 << 20) | (100 << 2));
        match word.decode() {
            DrawCommand::SizeChange { kind, size, .. } => {
                assert_eq!(kind, BrushKind::Hard);
                assert_eq!(size, 100.0 / 32768.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_setters_wrap_to_field_width() {
        let mut word = DrwWord(TAG_SIZE_CHANGE);
        word.set_size(0x1_0005);
        assert_eq!(word.size(), 5);
        assert_eq!(word.tag(), TAG_SIZE_CHANGE);
        word.set_x(3000);
        assert_eq!(word.x(), 3000 & 0x7FF);
    }
}
