use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::core::errors::CoreError;
use crate::primitives::Color;

/// ARGB pixel block handed to (or received from) the display layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelSurface {
    pub width: usize,
    pub height: usize,
    /// Row pitch in bytes
    pub stride: usize,
    pub pixels: Vec<u32>,
}

impl PixelSurface {
    /// Tightly packed surface filled with `fill`
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Self {
            width,
            height,
            stride: width * 4,
            pixels: vec![fill; width * height],
        }
    }

    /// Pixels per row, including padding
    pub fn pitch(&self) -> usize {
        self.stride / 4
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.stride % 4 != 0 || self.stride < self.width * 4 {
            return Err(CoreError::InvalidInput(format!(
                "stride {} does not fit width {}",
                self.stride, self.width
            )));
        }
        let needed = if self.height == 0 {
            0
        } else {
            self.pitch() * (self.height - 1) + self.width
        };
        if self.pixels.len() < needed {
            return Err(CoreError::InvalidInput(format!(
                "surface holds {} pixels, {} needed",
                self.pixels.len(),
                needed
            )));
        }
        Ok(())
    }

    /// Pixel at (x, y); out-of-range reads return 0.
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels.get(y * self.pitch() + x).copied().unwrap_or(0)
    }

    /// Visible pixels of row `y`, or `None` when the buffer does not hold it.
    pub fn row(&self, y: usize) -> Option<&[u32]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.pitch();
        self.pixels.get(start..start + self.width)
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let c = Color::from_argb(self.pixel(x as usize, y as usize));
            image::Rgba([c.r, c.g, c.b, c.a])
        })
    }

    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| Color::new(p[0], p[1], p[2], p[3]).to_argb())
            .collect();
        Self {
            width: width as usize,
            height: height as usize,
            stride: width as usize * 4,
            pixels,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_stride() {
        let surface = PixelSurface {
            width: 2,
            height: 2,
            stride: 16,
            pixels: vec![1, 2, 0, 0, 3, 4],
        };
        surface.validate().unwrap();
        assert_eq!(surface.pitch(), 4);
        assert_eq!(surface.pixel(1, 1), 4);
        assert_eq!(surface.row(1), Some(&[3u32, 4][..]));
        assert_eq!(surface.row(2), None);
        assert_eq!(surface.pixel(2, 0), 0);
    }

    #[test]
    fn test_validate_rejects_short_buffers() {
        let surface = PixelSurface {
            width: 4,
            height: 4,
            stride: 16,
            pixels: vec![0; 10],
        };
        assert!(surface.validate().is_err());

        let narrow = PixelSurface {
            width: 4,
            height: 1,
            stride: 8,
            pixels: vec![0; 4],
        };
        assert!(narrow.validate().is_err());
    }

    #[test]
    fn test_row_on_unvalidated_surface() {
        let short = PixelSurface {
            width: 4,
            height: 3,
            stride: 16,
            pixels: vec![7; 6],
        };
        assert_eq!(short.row(0), Some(&[7u32; 4][..]));
        assert_eq!(short.row(1), None);
        assert_eq!(short.row(2), None);
    }

    #[test]
    fn test_rgba_image_conversion() {
        let mut surface = PixelSurface::new(3, 2, 0xFFFF_FFFF);
        surface.pixels[4] = 0x80FF_0000;
        let img = surface.to_rgba_image();
        assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 128]);
        assert_eq!(PixelSurface::from_rgba_image(&img), surface);
    }
}
