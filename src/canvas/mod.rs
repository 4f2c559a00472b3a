//! Canvas - raster buffers, brush state and the command log of one painting
//!
//! Strokes are never composited onto the working image directly. Each stamp
//! raises a per-pixel alpha, and the visible pixel is recomputed as the brush
//! color blended over the pre-stroke `backup` with that alpha. A stroke can
//! overlap itself any number of times without exceeding its opacity. When the
//! stroke ends its bounding box is committed into `backup` and alpha is reset.

mod capture;
mod playback;
mod raster;
mod stroke;


pub use capture::{REFERENCE_HEIGHT, REFERENCE_WIDTH, VIDEO_HEIGHT, VIDEO_WIDTH};
pub use playback::{CommandLog, PlaybackState};
pub use raster::StampMode;
pub use stroke::StrokeState;

use std::sync::Arc;

use crate::brush::{Brush, BrushControl, BrushKind, BrushTables};
use crate::core::config::EngineConfig;
use crate::core::contracts::PixelSurface;
use crate::core::errors::CoreError;
use crate::drw::DrwHeader;
use crate::primitives::{Color, DirtyRect, Pos};

/// Blank canvas pixel
pub const BLANK_PIXEL: u32 = 0xFFFF_FFFF;

/// One painting: raster state plus the log that produced it
pub struct Canvas {
    width: usize,
    height: usize,

    image: Vec<u32>,
    backup: Vec<u32>,
    alpha: Vec<u8>,
    shared: Vec<u32>,

    reference: Vec<u16>,
    video: [Vec<u32>; 2],
    video_front: usize,

    tables: Arc<BrushTables>,
    config: EngineConfig,

    brush: Brush,
    stroke: StrokeState,
    stamp_mode: StampMode,
    dirty: DirtyRect,

    log: CommandLog,
    header: DrwHeader,
    modified: bool,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("brush", &self.brush)
            .field("commands", &self.log.len())
            .field("state", &self.log.state())
            .finish_non_exhaustive()
    }
}

impl Canvas {
    pub fn new(width: usize, height: usize, tables: Arc<BrushTables>) -> Self {
        Self::with_config(width, height, tables, EngineConfig::default())
    }

    pub fn with_config(
        width: usize,
        height: usize,
        tables: Arc<BrushTables>,
        config: EngineConfig,
    ) -> Self {
        let pixels = width * height;
        let mut canvas = Self {
            width,
            height,
            image: vec![BLANK_PIXEL; pixels],
            backup: vec![BLANK_PIXEL; pixels],
            alpha: vec![0; pixels],
            shared: vec![BLANK_PIXEL; pixels],
            reference: vec![0; REFERENCE_WIDTH * REFERENCE_HEIGHT],
            video: [
                vec![0; VIDEO_WIDTH * VIDEO_HEIGHT],
                vec![0; VIDEO_WIDTH * VIDEO_HEIGHT],
            ],
            video_front: 0,
            log: CommandLog::new(config.playback.speed),
            tables,
            config,
            brush: Brush::default(),
            stroke: StrokeState::default(),
            stamp_mode: StampMode::Paint,
            dirty: DirtyRect::empty(),
            header: DrwHeader::default(),
            modified: false,
        };
        canvas.clear_image();
        canvas.reset_brush(0);
        tracing::debug!("[Canvas] created {}x{}", width, height);
        canvas
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> Pos {
        Pos::new(self.width as f32, self.height as f32)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tables(&self) -> &Arc<BrushTables> {
        &self.tables
    }

    /// Working image, ARGB, row-major
    pub fn image(&self) -> &[u32] {
        &self.image
    }

    /// Image as it was before the current stroke
    pub fn backup(&self) -> &[u32] {
        &self.backup
    }

    /// Coverage of the current stroke
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    /// Last externally agreed image
    pub fn shared(&self) -> &[u32] {
        &self.shared
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Color::from_argb(self.image[y * self.width + x]))
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Replace the brush without recording anything.
    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = Brush {
            size: brush.size.max(2),
            opacity: brush.opacity.clamp(0.0, 1.0),
            ..brush
        };
    }

    /// Deterministic replacement for a random brush: a saturated two-channel
    /// color, hard shape, pressure-driven size of 1/16 of the canvas width.
    pub fn reset_brush(&mut self, seed: u64) {
        let mut state = seed;
        let mut next = move || {
            // splitmix64
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^ (z >> 31)
        };

        let c0 = (next() % 3) as u32;
        let mut c1 = c0 + 1 + (next() % 2) as u32;
        if c1 > 2 {
            c1 -= 3;
        }
        let secondary = (next() % 255) as u32;

        self.brush = Brush {
            color: Color::from_argb(0xFF00_0000 | (255 << (c0 * 8)) | (secondary << (c1 * 8))),
            kind: BrushKind::Hard,
            size: (self.width / 16).max(2) as i32,
            control: BrushControl::VariableSize,
            opacity: 1.0,
        };
    }

    pub fn stamp_mode(&self) -> StampMode {
        self.stamp_mode
    }

    pub fn set_stamp_mode(&mut self, mode: StampMode) {
        self.stamp_mode = mode;
    }

    pub fn is_stroke_active(&self) -> bool {
        self.stroke.active
    }

    pub fn stroke(&self) -> &StrokeState {
        &self.stroke
    }

    pub fn dirty_rect(&self) -> DirtyRect {
        self.dirty
    }

    pub fn reset_dirty_rect(&mut self) {
        self.dirty = DirtyRect::empty();
    }

    /// Return the accumulated dirty rectangle and reset it.
    pub fn take_dirty_rect(&mut self) -> DirtyRect {
        std::mem::take(&mut self.dirty)
    }

    pub fn header(&self) -> &DrwHeader {
        &self.header
    }

    /// True when commands were recorded since the last load, save or clear
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn set_saved(&mut self, header: DrwHeader) {
        self.header = header;
        self.modified = false;
    }

    /// Drop the command log and blank the image.
    pub fn clear(&mut self) {
        self.log.reset();
        self.header = DrwHeader::default();
        self.modified = false;
        self.stroke = StrokeState::default();
        self.clear_image();
        tracing::debug!("[Canvas] cleared");
    }

    /// Blank every raster buffer and mark the whole canvas dirty.
    pub fn clear_image(&mut self) {
        self.image.fill(BLANK_PIXEL);
        self.backup.fill(BLANK_PIXEL);
        self.alpha.fill(0);
        self.shared.fill(BLANK_PIXEL);
        self.dirty = DirtyRect::covering(self.width, self.height);
    }

    /// Rescale the raster buffers with nearest-neighbour sampling.
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        if new_width == 0 || new_height == 0 {
            tracing::warn!("[Canvas] ignoring resize to {}x{}", new_width, new_height);
            return;
        }
        let pixels = new_width * new_height;

        if self.width == 0 || self.height == 0 {
            self.image = vec![BLANK_PIXEL; pixels];
            self.backup = vec![BLANK_PIXEL; pixels];
            self.alpha = vec![0; pixels];
            self.shared = vec![BLANK_PIXEL; pixels];
        } else {
            // 16.16 fixed-point source step
            let dx = ((self.width as u64) << 16) / new_width as u64;
            let dy = ((self.height as u64) << 16) / new_height as u64;

            let mut image = Vec::with_capacity(pixels);
            let mut backup = Vec::with_capacity(pixels);
            let mut alpha = Vec::with_capacity(pixels);
            let mut shared = Vec::with_capacity(pixels);

            let mut ry = 0u64;
            for _ in 0..new_height {
                let row = (ry >> 16) as usize * self.width;
                let mut rx = 0u64;
                for _ in 0..new_width {
                    let src = row + (rx >> 16) as usize;
                    image.push(self.image[src]);
                    backup.push(self.backup[src]);
                    alpha.push(self.alpha[src]);
                    shared.push(self.shared[src]);
                    rx += dx;
                }
                ry += dy;
            }

            self.image = image;
            self.backup = backup;
            self.alpha = alpha;
            self.shared = shared;
        }

        tracing::debug!(
            "[Canvas] resized {}x{} -> {}x{}",
            self.width,
            self.height,
            new_width,
            new_height
        );
        self.width = new_width;
        self.height = new_height;
        self.dirty = DirtyRect::covering(new_width, new_height);
    }

    /// Checkpoint the working image as the agreed state.
    pub fn save_shared_image(&mut self) {
        self.shared.copy_from_slice(&self.image);
    }

    /// Roll the working image back to the agreed state, discarding local raster changes.
    pub fn restore_shared_image(&mut self) {
        self.image.copy_from_slice(&self.shared);
        self.backup.copy_from_slice(&self.shared);
        self.dirty = DirtyRect::covering(self.width, self.height);
    }

    /// Darken the image so an overlay can be drawn on top. Reversible with
    /// [`Canvas::clear_overlay`] since `backup` is left untouched.
    pub fn render_overlay(&mut self) {
        for (dst, &src) in self.image.iter_mut().zip(&self.backup) {
            *dst = (src & !0x0303_0303) >> 2;
        }
        self.dirty = DirtyRect::covering(self.width, self.height);
    }

    pub fn clear_overlay(&mut self) {
        self.image.copy_from_slice(&self.backup);
        self.dirty = DirtyRect::covering(self.width, self.height);
    }

    /// Mirror the painting horizontally (`flip_x`) and/or vertically (`flip_y`).
    ///
    /// The shared image is not touched, it still describes the agreed state.
    pub fn flip(&mut self, flip_x: bool, flip_y: bool) {
        if !flip_x && !flip_y {
            return;
        }
        let (w, h) = (self.width, self.height);
        flip_buffer(&mut self.image, w, h, flip_x, flip_y);
        flip_buffer(&mut self.backup, w, h, flip_x, flip_y);
        flip_buffer(&mut self.alpha, w, h, flip_x, flip_y);
        self.stroke.mirror(self.size(), flip_x, flip_y);
        self.dirty = DirtyRect::covering(w, h);
    }

    /// Copy of the working image
    pub fn to_surface(&self) -> PixelSurface {
        PixelSurface {
            width: self.width,
            height: self.height,
            stride: self.width * 4,
            pixels: self.image.clone(),
        }
    }

    /// Fill `surface` with the image region whose top-left corner is
    /// (`src_x`, `src_y`). Pixels outside the canvas become 0.
    pub fn copy_region_to(&self, surface: &mut PixelSurface, src_x: i64, src_y: i64) {
        let pitch = surface.pitch();
        for y in 0..surface.height {
            let sy = src_y + y as i64;
            for x in 0..surface.width {
                let sx = src_x + x as i64;
                let value = if sx >= 0 && sy >= 0 && (sx as usize) < self.width && (sy as usize) < self.height {
                    self.image[sy as usize * self.width + sx as usize]
                } else {
                    0
                };
                if let Some(dst) = surface.pixels.get_mut(y * pitch + x) {
                    *dst = value;
                }
            }
        }
    }

    /// Replace the image with `surface`, which must match the canvas size.
    pub fn load_surface(&mut self, surface: &PixelSurface) -> Result<(), CoreError> {
        surface.validate()?;
        if surface.width != self.width || surface.height != self.height {
            return Err(CoreError::InvalidInput(format!(
                "surface is {}x{}, canvas is {}x{}",
                surface.width, surface.height, self.width, self.height
            )));
        }
        for y in 0..self.height {
            let row = surface.row(y).ok_or_else(|| {
                CoreError::InvalidInput(format!("surface is missing row {}", y))
            })?;
            let start = y * self.width;
            self.image[start..start + self.width].copy_from_slice(row);
            self.backup[start..start + self.width].copy_from_slice(row);
        }
        self.alpha.fill(0);
        self.stroke.active = false;
        self.dirty = DirtyRect::covering(self.width, self.height);
        Ok(())
    }
}

fn flip_buffer<T: Copy>(buf: &mut [T], width: usize, height: usize, flip_x: bool, flip_y: bool) {
    if width == 0 {
        return;
    }
    if flip_x {
        for row in buf.chunks_exact_mut(width) {
            row.reverse();
        }
    }
    if flip_y {
        for y in 0..height / 2 {
            let (top, bottom) = buf.split_at_mut((height - 1 - y) * width);
            top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
        }
    }
}
