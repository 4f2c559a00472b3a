//! Brush lookup tables
//!
//! Stamping never evaluates a falloff curve per pixel. Instead two tables are
//! built once at startup:
//! - a 256x256 radial distance table centred at (128, 128)
//! - per brush shape, 65 rows of 256 intensities, one row per diameter bucket
//!
//! Small diameters select higher rows, which are pre-blurred to approximate
//! what downsampling a large brush would produce.

use super::BrushKind;
use crate::primitives::PI;

/// Width and height of the distance table
pub const DIST_TABLE_WIDTH: usize = 256;
pub const DIST_TABLE_CENTER: usize = DIST_TABLE_WIDTH / 2;

/// Columns per intensity row
pub const INTENSITY_WIDTH: usize = 256;
/// 65 rows allow diameters down to 1px
pub const INTENSITY_ROWS: usize = 65;

/// Shrinks every row slightly so the outermost samples stay in range.
const EXTRA_BRUSH_SCALE: f32 = 1.023;

type IntensityRow = [u8; INTENSITY_WIDTH];

/// Immutable lookup tables shared by every canvas
#[derive(Clone)]
pub struct BrushTables {
    distance: Vec<u8>,
    intensity: [Vec<IntensityRow>; 3],
}

impl std::fmt::Debug for BrushTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrushTables")
            .field("distance", &self.distance.len())
            .field("rows", &INTENSITY_ROWS)
            .finish()
    }
}

impl Default for BrushTables {
    fn default() -> Self {
        Self::new()
    }
}

impl BrushTables {
    /// Build the distance table and the hard, soft and cursor presets.
    pub fn new() -> Self {
        let tables = Self {
            distance: build_distance_table(),
            intensity: [
                build_intensity_rows(0.8, 255.0),
                build_intensity_rows(0.0, 128.0),
                vec![[0u8; INTENSITY_WIDTH]; INTENSITY_ROWS],
            ],
        };
        tracing::debug!("[BrushTables] built {} intensity rows per shape", INTENSITY_ROWS);
        tables
    }

    /// Scaled distance from the table centre; indices are clamped to the table.
    #[inline]
    pub fn distance(&self, x: usize, y: usize) -> u8 {
        let x = x.min(DIST_TABLE_WIDTH - 1);
        let y = y.min(DIST_TABLE_WIDTH - 1);
        self.distance[x * DIST_TABLE_WIDTH + y]
    }

    /// Intensity of `kind` at distance column `column` in row `row`
    #[inline]
    pub fn intensity(&self, kind: BrushKind, row: usize, column: u8) -> u8 {
        let row = row.min(INTENSITY_ROWS - 1);
        self.intensity[kind.index()][row][column as usize]
    }

    /// Full intensity row of `kind`
    pub fn row(&self, kind: BrushKind, row: usize) -> &[u8; INTENSITY_WIDTH] {
        &self.intensity[kind.index()][row.min(INTENSITY_ROWS - 1)]
    }

    /// Row that best matches a stamp of `diameter` pixels
    #[inline]
    pub fn row_for_diameter(diameter: i32) -> usize {
        let diameter = diameter.max(1) as f32;
        ((INTENSITY_ROWS as f32 / diameter) as usize).min(INTENSITY_ROWS - 1)
    }
}

fn build_distance_table() -> Vec<u8> {
    let mut table = vec![0u8; DIST_TABLE_WIDTH * DIST_TABLE_WIDTH];
    for x in 0..DIST_TABLE_WIDTH {
        for y in 0..DIST_TABLE_WIDTH {
            let dx = x as i32 - DIST_TABLE_CENTER as i32;
            let dy = y as i32 - DIST_TABLE_CENTER as i32;
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            table[x * DIST_TABLE_WIDTH + y] = (dist * 255.0 / DIST_TABLE_CENTER as f32).min(255.0) as u8;
        }
    }
    table
}

/// Gradient from 0 to 1 with zero slope at both ends.
#[inline]
fn smooth_step(a: f32) -> f32 {
    ((a * a - 0.5) * PI).sin() * 0.5 + 0.5
}

/// Falloff for a brush flat out to `border` (fraction of the radius) with peak `amp`.
fn build_intensity_rows(border: f32, amp: f32) -> Vec<IntensityRow> {
    let falloff = |f: f32| smooth_step(1.0 - (f - border) / (1.0 - border)) * amp;

    // Outermost column whose intensity still rounds to 2 or more
    let max_r = (0..INTENSITY_WIDTH)
        .rev()
        .find(|&i| falloff(i as f32 / INTENSITY_WIDTH as f32).round() >= 2.0)
        .unwrap_or(0) as f32;

    // Stretch the curve so it fills the columns
    let r = (max_r + 2.0) / INTENSITY_WIDTH as f32 / INTENSITY_WIDTH as f32;

    (0..INTENSITY_ROWS)
        .map(|y| {
            let brushscale = EXTRA_BRUSH_SCALE + y as f32 * 2.0 / 64.0;

            let mut unblurred = [0u32; INTENSITY_WIDTH];
            for (i, value) in unblurred.iter_mut().enumerate() {
                let f = (i as f32 * r * brushscale).min(1.0);
                *value = if f < border {
                    amp as u32
                } else {
                    falloff(f).round() as u32
                };
            }

            // Box blur simulating the resample of a large brush down to this size
            let radius = (y as f32 * INTENSITY_WIDTH as f32 / (brushscale * 64.0)).round() as i32;
            let taps = (radius * 2 + 1) as f32;
            let mut row = [0u8; INTENSITY_WIDTH];
            for (x, out) in row.iter_mut().enumerate() {
                let x = x as i32;
                let sum: u32 = (x - radius..=x + radius)
                    .map(|i| unblurred[i.clamp(0, INTENSITY_WIDTH as i32 - 1) as usize])
                    .sum();
                *out = (sum as f32 / taps) as u8;
            }
            row
        })
        .collect()
}
