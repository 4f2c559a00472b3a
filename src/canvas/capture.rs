//! Camera intake: the reference snapshot and the downsampled video frame pair.

use super::Canvas;

/// Reference snapshot dimensions, R5G6B5 pixels
pub const REFERENCE_WIDTH: usize = 640;
pub const REFERENCE_HEIGHT: usize = 480;

/// Downsampled video dimensions
pub const VIDEO_WIDTH: usize = 80;
pub const VIDEO_HEIGHT: usize = 60;

/// Sampling step from the camera frame to the video buffer
const VIDEO_STEP: usize = 4;

impl Canvas {
    /// Store a camera snapshot. Rejected with a warning unless it is exactly
    /// 640x480.
    pub fn set_reference_buffer(&mut self, pixels: &[u16], width: usize, height: usize) -> bool {
        if width != REFERENCE_WIDTH
            || height != REFERENCE_HEIGHT
            || pixels.len() != REFERENCE_WIDTH * REFERENCE_HEIGHT
        {
            tracing::warn!(
                "[Capture] invalid reference buffer: {} pixels at {}x{}",
                pixels.len(),
                width,
                height
            );
            return false;
        }
        self.reference.copy_from_slice(pixels);
        true
    }

    /// Downsample a packed camera frame into the back video buffer and swap.
    ///
    /// The frame is 640x480 with two pixels per 32-bit word, so it holds
    /// `width * height / 2` words.
    pub fn set_video_frame(&mut self, words: &[u32], width: usize, height: usize) -> bool {
        if width != VIDEO_WIDTH * 8 || height != VIDEO_HEIGHT * 8 || words.len() != width * height / 2 {
            tracing::warn!(
                "[Capture] invalid video frame: {} words at {}x{}",
                words.len(),
                width,
                height
            );
            return false;
        }

        let back = 1 - self.video_front;
        let dest = &mut self.video[back];
        for y in 0..VIDEO_HEIGHT {
            let src_row = y * VIDEO_STEP * width;
            for x in 0..VIDEO_WIDTH {
                dest[y * VIDEO_WIDTH + x] = words[src_row + x * VIDEO_STEP];
            }
        }
        self.video_front = back;
        true
    }

    pub fn reference(&self) -> &[u16] {
        &self.reference
    }

    /// Latest downsampled frame
    pub fn video_frame(&self) -> &[u32] {
        &self.video[self.video_front]
    }

    pub fn previous_video_frame(&self) -> &[u32] {
        &self.video[1 - self.video_front]
    }
}
