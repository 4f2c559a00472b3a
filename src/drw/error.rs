//! DRW codec error types

use std::io;
use thiserror::Error;

/// Errors raised while moving DRW data through readers, writers and buffers.
///
/// Decoding file contents never fails; damaged data is recovered with a warning.
#[derive(Error, Debug)]
pub enum DrwError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid command buffer: {0}")]
    InvalidBuffer(String),
}

impl From<DrwError> for String {
    fn from(err: DrwError) -> Self {
        err.to_string()
    }
}
