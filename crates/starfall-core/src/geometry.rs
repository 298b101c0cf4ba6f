//! Pixel-space geometry.

use std::ops::{Add, AddAssign, Mul, Sub};

/// A point or direction in surface pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector of the given length pointing at `degrees`, measured
    /// counter-clockwise from the +x axis.
    pub fn from_angle(degrees: f32, length: f32) -> Self {
        let radians = degrees.to_radians();
        Self::new(radians.cos() * length, radians.sin() * length)
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or zero for the zero vector.
    pub fn normalize(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Pixel dimensions of a drawing surface.
///
/// Always replaced as a whole, so readers never observe a width from one
/// resize paired with a height from another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `point` lies within `[0, width] x [0, height]`.
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width as f32).contains(&point.x)
            && (0.0..=self.height as f32).contains(&point.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_angle() {
        let v = Vec2::from_angle(210.0, 5.0);
        assert!((v.x - (-4.330127)).abs() < 1e-4);
        assert!((v.y - (-2.5)).abs() < 1e-4);
    }

    #[test]
    fn test_normalize() {
        let v = Vec2::new(3.0, -4.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_size_contains() {
        let size = Size::new(800, 600);
        assert!(size.contains(Vec2::new(0.0, 0.0)));
        assert!(size.contains(Vec2::new(800.0, 600.0)));
        assert!(!size.contains(Vec2::new(800.5, 10.0)));
        assert!(!size.contains(Vec2::new(10.0, -0.1)));
        assert!(Size::new(0, 10).is_empty());
    }
}
