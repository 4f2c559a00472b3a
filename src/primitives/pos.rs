//! 2D position

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

use super::PI;

/// A 2D position, used both in normalized command space and in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pos {
    pub x: f32,
    pub y: f32,
}

impl Pos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise minimum
    pub fn min(self, other: Pos) -> Pos {
        Pos::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum
    pub fn max(self, other: Pos) -> Pos {
        Pos::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Point at `radius` from the origin in the direction of `degrees`
    pub fn from_angle(degrees: f32, radius: f32) -> Pos {
        let rad = degrees * PI / 180.0;
        Pos::new(rad.cos() * radius, rad.sin() * radius)
    }

    /// Rotate around `center` by `radians`
    pub fn rotate_about(self, center: Pos, radians: f32) -> Pos {
        let (s, c) = radians.sin_cos();
        let d = self - center;
        Pos::new(d.x * c - d.y * s + center.x, d.y * c + d.x * s + center.y)
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Pos) -> f32 {
        (other - self).length()
    }
}

impl Add for Pos {
    type Output = Pos;
    fn add(self, rhs: Pos) -> Pos {
        Pos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Pos {
    type Output = Pos;
    fn sub(self, rhs: Pos) -> Pos {
        Pos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul for Pos {
    type Output = Pos;
    fn mul(self, rhs: Pos) -> Pos {
        Pos::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div for Pos {
    type Output = Pos;
    fn div(self, rhs: Pos) -> Pos {
        Pos::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl Mul<f32> for Pos {
    type Output = Pos;
    fn mul(self, rhs: f32) -> Pos {
        Pos::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Pos {
    type Output = Pos;
    fn div(self, rhs: f32) -> Pos {
        Pos::new(self.x / rhs, self.y / rhs)
    }
}
