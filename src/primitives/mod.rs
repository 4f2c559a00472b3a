//! Value types shared by the raster core, the command log and the codec

mod color;
mod pos;
mod rect;

pub use color::Color;
pub use pos::Pos;
pub use rect::DirtyRect;

/// Approximation of pi used by the brush falloff curves.
///
/// Kept at this precision so generated tables stay identical across versions.
pub const PI: f32 = 3.14159;

/// Scale `value` by an 8-bit factor (0-255).
///
/// The high bit of the factor is folded back in, so scaling by 255 is an
/// exact identity and scaling by 0 yields 0.
#[inline]
pub fn fixed_scale(value: i32, scale: i32) -> i32 {
    let scale = scale + (scale >> 7);
    (value * scale) >> 8
}

/// Map `a` from the range `[f0, t0]` onto `[f1, t1]`, clamping to the target range.
#[inline]
pub fn map_range(a: f32, f0: f32, t0: f32, f1: f32, t1: f32) -> f32 {
    let r = ((a - f0) / (t0 - f0)).clamp(0.0, 1.0);
    f1 + r * (t1 - f1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_scale_identity_at_255() {
        for v in [0, 1, 17, 128, 254, 255] {
            assert_eq!(fixed_scale(v, 255), v);
        }
    }

    #[test]
    fn test_fixed_scale_zero() {
        assert_eq!(fixed_scale(255, 0), 0);
        assert_eq!(fixed_scale(0, 200), 0);
    }

    #[test]
    fn test_fixed_scale_half() {
        // 128 folds to 129
        assert_eq!(fixed_scale(255, 128), (255 * 129) >> 8);
    }

    #[test]
    fn test_map_range_clamps() {
        assert_eq!(map_range(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        assert_eq!(map_range(-5.0, 0.0, 10.0, 0.0, 100.0), 0.0);
        assert_eq!(map_range(50.0, 0.0, 10.0, 0.0, 100.0), 100.0);
    }
}
