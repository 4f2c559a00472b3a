//! 8-bit-per-channel color and its packed forms

use serde::{Deserialize, Serialize};

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn from_argb(v: u32) -> Self {
        Self {
            a: (v >> 24) as u8,
            r: (v >> 16) as u8,
            g: (v >> 8) as u8,
            b: v as u8,
        }
    }

    pub const fn to_abgr(self) -> u32 {
        ((self.a as u32) << 24) | ((self.b as u32) << 16) | ((self.g as u32) << 8) | self.r as u32
    }

    pub const fn from_abgr(v: u32) -> Self {
        Self {
            a: (v >> 24) as u8,
            b: (v >> 16) as u8,
            g: (v >> 8) as u8,
            r: v as u8,
        }
    }

    pub const fn to_r5g6b5(self) -> u16 {
        (((self.r as u16) >> 3) << 11) | (((self.g as u16) >> 2) << 5) | ((self.b as u16) >> 3)
    }

    /// Expand a 5:6:5 pixel. Green keeps only its top five bits, matching
    /// what the reference overlay has always shown.
    pub const fn from_r5g6b5(v: u16) -> Self {
        Self {
            r: (((v >> 11) & 0x1f) << 3) as u8,
            g: (((v >> 5) & 0x1f) << 3) as u8,
            b: ((v & 0x1f) << 3) as u8,
            a: 255,
        }
    }

    pub const fn to_b5g6r5(self) -> u16 {
        (((self.b as u16) >> 3) << 11) | (((self.g as u16) >> 2) << 5) | ((self.r as u16) >> 3)
    }

    /// Build from normalized float channels, truncating.
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
        Self::new(q(r), q(g), q(b), q(a))
    }

    /// Blend `self` over `other` with weight `l` (0 = `other`, 255 = `self`).
    ///
    /// Both weights get their top bit folded back so the endpoints are exact.
    /// Alpha is interpolated like the color channels.
    #[inline]
    pub fn lerp(self, other: Color, l: u8) -> Color {
        let l = l as u32;
        let il = 255 - l;
        let l = l + (l >> 7);
        let il = il + (il >> 7);
        let mix = |a: u8, b: u8| ((a as u32 * l + b as u32 * il) >> 8) as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Blend `self` over `other` using `self.a` as the weight.
    pub fn blend(self, other: Color) -> Color {
        self.lerp(other, self.a)
    }

    /// Convert BT.601 video-range YUV to RGB. Alpha is left at 0.
    pub fn from_yuv(y: u8, u: u8, v: u8) -> Self {
        let y = 1.164 * (y as f32 - 16.0);
        let u = u as f32 - 128.0;
        let v = v as f32 - 128.0;
        let q = |c: f32| c.clamp(0.0, 255.0) as u8;
        Self {
            r: q(y + 1.596 * v),
            g: q(y - 0.813 * v - 0.391 * u),
            b: q(y + 2.018 * u),
            a: 0,
        }
    }

    /// Convert the first pixel of a packed YUYV word into 8-bit hue,
    /// saturation and value stored in the r, g and b channels.
    pub fn yuv_to_hsv(yuv: u32) -> Self {
        let d = Self::from_yuv((yuv >> 24) as u8, (yuv >> 16) as u8, yuv as u8);
        let val = d.r.max(d.g).max(d.b);
        let delta = val - d.r.min(d.g).min(d.b);

        let (mut hue, sat) = if delta == 0 {
            (0.0, 0.0)
        } else {
            let (r, g, b, dl) = (d.r as f32, d.g as f32, d.b as f32, delta as f32);
            let sat = 255.0 * dl / val as f32;
            if val == d.r {
                (42.5 * (g - b) / dl, sat)
            } else if val == d.g {
                (42.5 * (b - r) / dl + 85.0, sat)
            } else {
                (42.5 * (r - g) / dl + 170.0, sat)
            }
        };
        if hue < 0.0 {
            hue += 255.0;
        }
        if hue > 255.0 {
            hue -= 255.0;
        }

        Self {
            r: hue.clamp(0.0, 255.0) as u8,
            g: sat.clamp(0.0, 255.0) as u8,
            b: val,
            a: 0,
        }
    }

    /// Hue, saturation and value, each in [0, 1].
    pub fn to_hsv(self) -> (f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        if delta <= f32::EPSILON {
            return (0.0, 0.0, max);
        }

        let sat = delta / max;
        let mut hue = if max == r {
            (g - b) / delta
        } else if max == g {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        } / 6.0;
        if hue < 0.0 {
            hue += 1.0;
        }
        (hue, sat, max)
    }

    /// Inverse of [`Color::to_hsv`]; alpha is set to 255.
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        if s <= 0.0 {
            let grey = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            return Self::new(grey, grey, grey, 255);
        }
        let h = h.rem_euclid(1.0) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match sector as i32 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::new(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            255,
        )
    }
}
