//! Static background stars.

use std::ops::RangeInclusive;

use rand::Rng;
use starfall_core::{Rgba, Size, Surface, Vec2};

/// Radius range of a star in pixels.
pub const STAR_RADIUS: RangeInclusive<f32> = 0.3..=1.5;

/// Opacity range of a star.
pub const STAR_ALPHA: RangeInclusive<f32> = 0.1..=0.6;

/// A fixed point of light. Never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

impl Star {
    /// Create a star at a uniformly random spot inside `bounds`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: Size) -> Self {
        Self {
            position: Vec2::new(
                rng.gen_range(0.0..=bounds.width as f32),
                rng.gen_range(0.0..=bounds.height as f32),
            ),
            radius: rng.gen_range(STAR_RADIUS),
            alpha: rng.gen_range(STAR_ALPHA),
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(
            self.position,
            self.radius,
            Rgba::WHITE.with_alpha(self.alpha),
        );
    }
}

/// Generate `count` stars scattered across `bounds`.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, bounds: Size, count: usize) -> Vec<Star> {
    (0..count).map(|_| Star::random(rng, bounds)).collect()
}
