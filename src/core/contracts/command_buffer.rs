use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::drw::DrwError;

/// Slice of the command log in wire format.
///
/// Serialized as a little-endian u32 byte count followed by the words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBuffer {
    words: Vec<u32>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words(words: Vec<u32>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn into_words(self) -> Vec<u32> {
        self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn push(&mut self, word: u32) {
        self.words.push(word);
    }

    pub fn append(&mut self, other: &CommandBuffer) {
        self.words.extend_from_slice(&other.words);
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Raw words without the length prefix
    pub fn payload_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.words.len() * 4);
        for &word in &self.words {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let payload = self.payload_bytes();
        let mut out = Vec::with_capacity(4 + payload.len());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&payload);
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, DrwError> {
        let mut cursor = Cursor::new(data);
        let byte_len = cursor.read_u32::<LittleEndian>()? as usize;
        let remaining = data.len() - 4;
        if byte_len % 4 != 0 || byte_len != remaining {
            return Err(DrwError::InvalidBuffer(format!(
                "length prefix {} does not match {} payload bytes",
                byte_len, remaining
            )));
        }

        let mut payload = Vec::with_capacity(byte_len);
        cursor.read_to_end(&mut payload)?;
        Self::from_payload_bytes(&payload)
    }

    /// Parse raw words without a length prefix
    pub fn from_payload_bytes(data: &[u8]) -> Result<Self, DrwError> {
        if data.len() % 4 != 0 {
            return Err(DrwError::InvalidBuffer(format!(
                "{} bytes is not a whole number of commands",
                data.len()
            )));
        }
        let mut cursor = Cursor::new(data);
        let mut words = Vec::with_capacity(data.len() / 4);
        for _ in 0..data.len() / 4 {
            words.push(cursor.read_u32::<LittleEndian>()?);
        }
        Ok(Self { words })
    }
}
