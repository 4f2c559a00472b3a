//! Transfer structures handed across the host boundary.
//!
//! The display layer only ever sees a [`PixelSurface`]; collaborators only
//! ever see a [`CommandBuffer`] of wire-format words.

mod command_buffer;
mod surface;

pub use command_buffer::CommandBuffer;
pub use surface::PixelSurface;
