//! DRW command-log codec
//!
//! A DRW file is a 60-byte little-endian header followed by `ncommands`
//! bit-packed 32-bit words. Files that do not start with the `Col!` magic
//! predate the header and are read as a bare word stream.
//!
//! Decoding never fails: older streams are upgraded, truncated streams are
//! cut to the complete words present and unknown fields are mapped to safe
//! values, each with a warning.

mod error;
mod header;
mod upgrade;
mod word;

#[cfg(test)]
mod tests;

pub use error::DrwError;
pub use header::{DrwHeader, DRW_ID, DRW_VERSION, HEADER_SIZE, LEGACY_VERSION};
pub use upgrade::{upgrade, LegacyPositionRemap};
pub use word::{DrwWord, TAG_COLOR_CHANGE, TAG_DRAW, TAG_DRAW_END, TAG_SIZE_CHANGE};

use std::io::{Cursor, Read, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::command::DrawCommand;

/// Decoded file contents
#[derive(Debug, Clone, PartialEq)]
pub struct DrwFile {
    /// Header after upgrade; `version` is always current
    pub header: DrwHeader,
    pub commands: Vec<DrawCommand>,
}

/// Split raw file bytes into a header and command words, without upgrading.
pub fn split_words(data: &[u8]) -> (DrwHeader, Vec<u32>) {
    let has_magic = data.len() >= 4 && LittleEndian::read_u32(&data[..4]) == DRW_ID;

    if has_magic && data.len() >= HEADER_SIZE {
        if let Ok(mut header) = DrwHeader::read(&mut Cursor::new(data)) {
            let body = &data[HEADER_SIZE..];
            let available = body.len() / 4;
            let declared = header.ncommands.max(0) as usize;
            if declared > available {
                tracing::warn!(
                    "[DRW] header declares {} commands but only {} are present",
                    declared,
                    available
                );
            }
            let count = declared.min(available);
            header.ncommands = count as i32;
            return (header, read_words(body, count));
        }
    }

    if has_magic {
        tracing::warn!(
            "[DRW] {} bytes is too short for a header, reading as headerless",
            data.len()
        );
    }

    let count = data.len() / 4;
    tracing::debug!("[DRW] headerless file, {} commands", count);
    (DrwHeader::legacy(count), read_words(data, count))
}

fn read_words(body: &[u8], count: usize) -> Vec<u32> {
    body.chunks_exact(4)
        .take(count)
        .map(LittleEndian::read_u32)
        .collect()
}

/// Decode file bytes, upgrading older versions.
pub fn decode(data: &[u8], remap: LegacyPositionRemap) -> DrwFile {
    let (mut header, mut words) = split_words(data);
    upgrade(&mut header, &mut words, remap);

    tracing::debug!(
        "[DRW] decoded {} commands (initial version {}, saved {} times)",
        words.len(),
        header.colors_version_initial,
        header.times_saved
    );

    DrwFile {
        header,
        commands: decode_words(&words),
    }
}

/// Read and decode a whole stream.
pub fn read_from<R: Read>(reader: &mut R, remap: LegacyPositionRemap) -> Result<DrwFile, DrwError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(decode(&data, remap))
}

pub fn decode_words(words: &[u32]) -> Vec<DrawCommand> {
    words.iter().map(|&w| DrwWord(w).decode()).collect()
}

pub fn encode_words(commands: &[DrawCommand]) -> Vec<u32> {
    commands.iter().map(|cmd| DrwWord::encode(cmd).0).collect()
}

/// Write `header` and `commands`.
///
/// The written header always carries the current version and the real
/// command count.
pub fn write_to<W: Write>(
    writer: &mut W,
    header: &DrwHeader,
    commands: &[DrawCommand],
) -> Result<(), DrwError> {
    let header = DrwHeader {
        id: DRW_ID,
        version: DRW_VERSION,
        ncommands: commands.len().min(i32::MAX as usize) as i32,
        ..*header
    };
    header.write(writer)?;
    for cmd in commands {
        writer.write_u32::<LittleEndian>(DrwWord::encode(cmd).0)?;
    }
    Ok(())
}

pub fn encode(header: &DrwHeader, commands: &[DrawCommand]) -> Result<Vec<u8>, DrwError> {
    let mut out = Vec::with_capacity(HEADER_SIZE + commands.len() * 4);
    write_to(&mut out, header, commands)?;
    Ok(out)
}
