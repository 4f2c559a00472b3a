//! DRW file header

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

/// 'Col!' read as a little-endian u32
pub const DRW_ID: u32 = 0x436f_6c21;
/// Version written by this engine
pub const DRW_VERSION: u32 = 1070;
/// Version assumed for headerless files
pub const LEGACY_VERSION: u32 = 1000;
/// Serialized header size in bytes
pub const HEADER_SIZE: usize = 60;

const RESERVED_WORDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrwHeader {
    pub id: u32,
    pub version: u32,
    /// Version of the application that first created the drawing
    pub colors_version_initial: i32,
    /// Version of the application that last saved it
    pub colors_version_saved: i32,
    pub strokes: i32,
    pub time: i32,
    pub times_saved: i32,
    pub reserved: [i32; RESERVED_WORDS],
    pub ncommands: i32,
}

impl DrwHeader {
    /// Header for a drawing first saved by this engine
    pub fn new(ncommands: usize) -> Self {
        Self {
            id: DRW_ID,
            version: DRW_VERSION,
            colors_version_initial: DRW_VERSION as i32,
            colors_version_saved: DRW_VERSION as i32,
            strokes: 0,
            time: 0,
            times_saved: 0,
            reserved: [0; RESERVED_WORDS],
            ncommands: ncommands as i32,
        }
    }

    /// Synthetic header for a file that predates headers
    pub fn legacy(ncommands: usize) -> Self {
        Self {
            version: LEGACY_VERSION,
            colors_version_initial: 0,
            colors_version_saved: 0,
            ..Self::new(ncommands)
        }
    }

    /// Header to write when saving again.
    ///
    /// Keeps the creation version and elapsed time, bumps the save counter.
    pub fn next_save(&self, ncommands: usize, strokes: usize) -> Self {
        Self {
            id: DRW_ID,
            version: DRW_VERSION,
            colors_version_saved: DRW_VERSION as i32,
            times_saved: self.times_saved.saturating_add(1),
            strokes: strokes.min(i32::MAX as usize) as i32,
            ncommands: ncommands.min(i32::MAX as usize) as i32,
            ..*self
        }
    }

    pub fn is_current(&self) -> bool {
        self.id == DRW_ID && self.version == DRW_VERSION
    }

    pub fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let id = reader.read_u32::<LittleEndian>()?;
        let version = reader.read_u32::<LittleEndian>()?;
        let colors_version_initial = reader.read_i32::<LittleEndian>()?;
        let colors_version_saved = reader.read_i32::<LittleEndian>()?;
        let strokes = reader.read_i32::<LittleEndian>()?;
        let time = reader.read_i32::<LittleEndian>()?;
        let times_saved = reader.read_i32::<LittleEndian>()?;
        let mut reserved = [0i32; RESERVED_WORDS];
        reader.read_i32_into::<LittleEndian>(&mut reserved)?;
        let ncommands = reader.read_i32::<LittleEndian>()?;

        Ok(Self {
            id,
            version,
            colors_version_initial,
            colors_version_saved,
            strokes,
            time,
            times_saved,
            reserved,
            ncommands,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u32::<LittleEndian>(self.id)?;
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_i32::<LittleEndian>(self.colors_version_initial)?;
        writer.write_i32::<LittleEndian>(self.colors_version_saved)?;
        writer.write_i32::<LittleEndian>(self.strokes)?;
        writer.write_i32::<LittleEndian>(self.time)?;
        writer.write_i32::<LittleEndian>(self.times_saved)?;
        for value in self.reserved {
            writer.write_i32::<LittleEndian>(value)?;
        }
        writer.write_i32::<LittleEndian>(self.ncommands)?;
        Ok(())
    }
}

impl Default for DrwHeader {
    fn default() -> Self {
        Self::new(0)
    }
}
