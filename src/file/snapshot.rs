//! PNG snapshots of the working image

use std::io::Cursor;
use std::path::Path;

use image::{imageops, ImageFormat, RgbaImage};

use crate::canvas::Canvas;
use crate::core::errors::CoreError;

/// Longest edge of a generated thumbnail
pub const THUMBNAIL_SIZE: u32 = 256;

impl Canvas {
    /// Working image as RGBA
    pub fn to_rgba_image(&self) -> RgbaImage {
        self.to_surface().to_rgba_image()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, CoreError> {
        encode_png(&self.to_rgba_image())
    }

    pub fn save_png(&self, path: &Path) -> Result<(), CoreError> {
        std::fs::write(path, self.encode_png()?)?;
        tracing::debug!("[Snapshot] wrote {}", path.display());
        Ok(())
    }

    /// Downscaled copy fitting in a `THUMBNAIL_SIZE` square, aspect preserved.
    pub fn thumbnail(&self) -> RgbaImage {
        let img = self.to_rgba_image();
        let (w, h) = img.dimensions();
        if w <= THUMBNAIL_SIZE && h <= THUMBNAIL_SIZE {
            return img;
        }
        let scale = THUMBNAIL_SIZE as f32 / w.max(h) as f32;
        let tw = ((w as f32 * scale).round() as u32).max(1);
        let th = ((h as f32 * scale).round() as u32).max(1);
        imageops::resize(&img, tw, th, imageops::FilterType::Triangle)
    }

    pub fn save_thumbnail(&self, path: &Path) -> Result<(), CoreError> {
        std::fs::write(path, encode_png(&self.thumbnail())?)?;
        Ok(())
    }
}

fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, CoreError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}
