//! Engine-wide plumbing shared by the canvas and the codec.
//!
//! Nothing in here touches pixels; it holds error types, tunables and the
//! transfer structures handed across the host boundary.

pub mod config;
pub mod contracts;
pub mod errors;
