//! Straight-alpha RGBA color.

/// An sRGB color with a straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    /// Pale lavender used in the middle of comet trails.
    pub const LAVENDER: Rgba = Rgba::rgb(216, 180, 254);
    /// Purple used for comet glow.
    pub const VIOLET: Rgba = Rgba::rgb(168, 85, 247);

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with alpha replaced, clamped to `0.0..=1.0`.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Channel values as floats in `0.0..=1.0`.
    pub fn channels(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Linear interpolation between two colors, `t` clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(Rgba::WHITE.with_alpha(1.5).a, 1.0);
        assert_eq!(Rgba::WHITE.with_alpha(-0.2).a, 0.0);
    }

    #[test]
    fn test_lerp() {
        let a = Rgba::WHITE.with_alpha(0.0);
        let b = Rgba::LAVENDER.with_alpha(0.5);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid.g, 218);
        assert!((mid.a - 0.25).abs() < 1e-6);
    }
}
