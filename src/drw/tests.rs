//! Whole-file DRW scenarios

#![allow(clippy::unwrap_used)]

use super::*;
use crate::brush::{BrushControl, BrushKind};
use crate::primitives::{Color, Pos};

fn sample_log() -> Vec<DrawCommand> {
    vec![
        DrawCommand::color_change(Color::new(200, 40, 10, 255)),
        DrawCommand::size_change(BrushControl::VariableSize, BrushKind::Soft, 0.125, 0.75),
        DrawCommand::draw(Pos::new(0.25, 0.25), 128),
        DrawCommand::draw(Pos::new(0.5, 0.375), 255),
        DrawCommand::draw_end(0),
        DrawCommand::flip(false),
    ]
}

fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

#[test]
fn test_file_roundtrip() {
    let log = sample_log();
    let bytes = encode(&DrwHeader::new(0), &log).unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE + log.len() * 4);

    let file = decode(&bytes, LegacyPositionRemap::Faithful);
    assert_eq!(file.header.ncommands, log.len() as i32);
    assert_eq!(file.header.version, DRW_VERSION);
    assert_eq!(file.commands.len(), log.len());
    assert_eq!(encode_words(&file.commands), encode_words(&log));
    assert_eq!(file.commands[0], log[0]);
    assert_eq!(file.commands[2], log[2]);
    match file.commands[1] {
        DrawCommand::SizeChange { control, kind, size, opacity } => {
            assert_eq!((control, kind, size), (BrushControl::VariableSize, BrushKind::Soft, 0.125));
            assert!((opacity - 0.75).abs() < 1.0 / 255.0);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_encode_forces_current_version_and_count() {
    let mut header = DrwHeader::new(999);
    header.version = 1001;
    let bytes = encode(&header, &sample_log()).unwrap();
    let (parsed, words) = split_words(&bytes);
    assert_eq!(parsed.version, DRW_VERSION);
    assert_eq!(parsed.ncommands, 6);
    assert_eq!(words.len(), 6);
}

#[test]
fn test_legacy_file_of_seven_words() {
    let draw = |x: u32, y: u32| {
        let mut w = DrwWord(TAG_DRAW);
        w.set_x(x);
        w.set_y(y);
        w.0
    };
    let mut size = DrwWord(TAG_SIZE_CHANGE);
    size.set_kind_bits(1);
    size.set_control_bits(0);
    size.set_size(64 + 4096);

    let words = [
        size.0,
        draw(0, 0),
        draw(1023, 2047),
        draw(2047, 1023),
        DrwWord(TAG_DRAW_END).0,
        DrwWord(TAG_COLOR_CHANGE | (0x00FF_00 << 2)).0,
        draw(100, 200),
    ];
    let bytes = words_to_bytes(&words);
    assert_eq!(bytes.len(), 28);

    let file = decode(&bytes, LegacyPositionRemap::Faithful);
    assert_eq!(file.commands.len(), 7);
    assert_eq!(file.header.colors_version_initial, 0);
    assert_eq!(file.header.version, DRW_VERSION);

    assert_eq!(
        file.commands[0],
        DrawCommand::size_change(BrushControl::Fixed, BrushKind::Hard, 4096.0 / 32768.0, 0.0)
    );

    // x receives the remapped y, y keeps its old grid value
    let expect = |x: u32, y: u32| Pos::new((x as f32 - 512.0) / 1024.0, (y as f32 - 512.0) / 1024.0);
    let positions: Vec<Pos> = file
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Draw { pos, .. } => Some(*pos),
            _ => None,
        })
        .collect();
    assert_eq!(
        positions,
        vec![
            expect(512, 0),
            expect(1536, 2047),
            expect(1024, 1023),
            expect(612, 200),
        ]
    );
    assert!(file.commands[4].is_stroke_end());
}

#[test]
fn test_legacy_file_both_axes() {
    let mut w = DrwWord(TAG_DRAW);
    w.set_x(2047);
    w.set_y(0);
    let file = decode(&words_to_bytes(&[w.0]), LegacyPositionRemap::BothAxes);
    assert_eq!(
        file.commands,
        vec![DrawCommand::draw(Pos::new(1.0, 0.0), 0)]
    );
}

#[test]
fn test_truncated_file_keeps_complete_words() {
    let log = sample_log();
    let mut bytes = encode(&DrwHeader::new(0), &log).unwrap();
    // cut the last word in half
    bytes.truncate(bytes.len() - 2);

    let file = decode(&bytes, LegacyPositionRemap::Faithful);
    assert_eq!(file.commands.len(), log.len() - 1);
    assert_eq!(file.header.ncommands, (log.len() - 1) as i32);
}

#[test]
fn test_negative_count_reads_nothing() {
    let mut header = DrwHeader::new(0);
    header.ncommands = -5;
    let mut bytes = Vec::new();
    header.write(&mut bytes).unwrap();
    bytes.extend_from_slice(&[0u8; 8]);

    let file = decode(&bytes, LegacyPositionRemap::Faithful);
    assert!(file.commands.is_empty());
}

#[test]
fn test_short_file_with_magic_is_headerless() {
    let mut bytes = DRW_ID.to_le_bytes().to_vec();
    bytes.extend_from_slice(&DrwWord(TAG_DRAW_END).0.to_le_bytes());

    let file = decode(&bytes, LegacyPositionRemap::Faithful);
    assert_eq!(file.commands.len(), 2);
    assert!(file.commands[1].is_stroke_end());
}

#[test]
fn test_empty_input() {
    let file = decode(&[], LegacyPositionRemap::Faithful);
    assert!(file.commands.is_empty());
    assert_eq!(file.header.ncommands, 0);
}

#[test]
fn test_read_from_stream() {
    let bytes = encode(&DrwHeader::new(0), &sample_log()).unwrap();
    let file = read_from(&mut std::io::Cursor::new(bytes), LegacyPositionRemap::Faithful).unwrap();
    assert_eq!(file.commands.len(), 6);
}
