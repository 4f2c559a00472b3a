//! File format selection

use serde::{Deserialize, Serialize};

/// Formats a canvas can be written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Replayable command log
    Drw,
    /// Flattened image
    Png,
}

impl FileFormat {
    /// Detect format from file extension
    pub fn from_path(path: &str) -> Option<Self> {
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".drw") {
            Some(FileFormat::Drw)
        } else if path_lower.ends_with(".png") {
            Some(FileFormat::Png)
        } else {
            None
        }
    }

    /// Get default file extension
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Drw => "drw",
            FileFormat::Png => "png",
        }
    }
}
