//! Easel - painting engine for stylus input
//!
//! Rasterizes brush strokes into a persistent image, records every action as a
//! replayable command log and serializes that log to the DRW binary format.

pub mod brush;
pub mod canvas;
pub mod command;
pub mod core;
pub mod drw;
pub mod file;
pub mod input;
pub mod primitives;

pub use brush::{Brush, BrushControl, BrushKind, BrushTables};
pub use canvas::{Canvas, PlaybackState, StampMode};
pub use command::DrawCommand;
pub use crate::core::config::EngineConfig;
pub use crate::core::errors::CoreError;
pub use primitives::{Color, DirtyRect, Pos};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default tracing subscriber.
///
/// Honors `RUST_LOG`; falls back to debug output for this crate. Calling it
/// twice is harmless, the second registration is ignored.
pub fn init_logging() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easel_lib=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("Easel engine initializing...");
    }
}
