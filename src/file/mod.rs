//! Load and save
//!
//! A painting is stored as its DRW command log. Loading restores the log and
//! leaves the image blank; the host replays it with the playback API.

mod snapshot;
mod types;

pub use snapshot::THUMBNAIL_SIZE;
pub use types::FileFormat;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::canvas::Canvas;
use crate::command::DrawCommand;
use crate::core::errors::CoreError;
use crate::drw;

impl Canvas {
    /// Replace the log with the contents of a DRW file.
    ///
    /// Read errors leave the canvas untouched.
    pub fn load(&mut self, path: &Path) -> Result<(), CoreError> {
        let data = std::fs::read(path)?;
        let file = drw::decode(&data, self.config().codec.legacy_position_remap);

        self.clear();
        let count = file.commands.len();
        self.replace_log(file.header, file.commands);

        tracing::debug!("[File] loaded {} commands from {}", count, path.display());
        Ok(())
    }

    /// Write the log as a DRW file.
    pub fn save(&mut self, path: &Path) -> Result<(), CoreError> {
        let commands = self.commands();
        let strokes = commands.iter().filter(|c| c.is_stroke_end()).count();
        let header = self.header().next_save(commands.len(), strokes);

        let mut writer = BufWriter::new(File::create(path)?);
        drw::write_to(&mut writer, &header, commands)?;
        writer.flush()?;

        tracing::debug!(
            "[File] saved {} commands to {} (save #{})",
            commands.len(),
            path.display(),
            header.times_saved
        );
        self.set_saved(header);
        Ok(())
    }

    /// Save in the format named by the file extension.
    pub fn save_as(&mut self, path: &Path) -> Result<(), CoreError> {
        match FileFormat::from_path(&path.to_string_lossy()) {
            Some(FileFormat::Drw) => self.save(path),
            Some(FileFormat::Png) => self.save_png(path),
            None => Err(CoreError::InvalidInput(format!(
                "unknown file format: {}",
                path.display()
            ))),
        }
    }
}

/// Commands of a DRW file without touching any canvas
pub fn read_commands(path: &Path, remap: drw::LegacyPositionRemap) -> Result<Vec<DrawCommand>, CoreError> {
    let mut file = File::open(path)?;
    Ok(drw::read_from(&mut file, remap)?.commands)
}
