//! Shooting stars: short-lived particles with a glowing trail.

use std::ops::RangeInclusive;

use rand::Rng;
use starfall_core::{Glow, LinearGradient, Rgba, Size, Stroke, Surface, Vec2};

/// Horizontal spawn band as fractions of the surface width.
pub const SPAWN_X: RangeInclusive<f32> = 0.1..=1.0;
/// Vertical spawn band as fractions of the surface height.
pub const SPAWN_Y: RangeInclusive<f32> = 0.0..=0.4;
/// Direction of travel in degrees, counter-clockwise from +x.
pub const SPAWN_ANGLE_DEG: RangeInclusive<f32> = 195.0..=225.0;
/// Speed in pixels per frame.
pub const SPAWN_SPEED: RangeInclusive<f32> = 3.5..=6.5;
/// Trail length in pixels.
pub const TRAIL_LENGTH: RangeInclusive<f32> = 90.0..=170.0;
/// Lifespan in frames.
pub const MAX_LIFE: RangeInclusive<u32> = 90..=150;

/// Position of the lavender stop along the trail.
const TRAIL_MID_STOP: f32 = 0.6;
const TRAIL_WIDTH: f32 = 1.5;
const GLOW_BLUR: f32 = 8.0;
const GLOW_ALPHA: f32 = 0.8;
const HEAD_RADIUS: f32 = 1.8;

/// Opacity of a comet `life` frames into a `max_life` lifespan.
///
/// Ramps up linearly over the first `fade` frames, holds at 1.0, and ramps
/// down linearly over the last `fade` frames.
pub fn fade_alpha(life: u32, max_life: u32, fade: u32) -> f32 {
    let fade = fade.max(1);
    let alpha = if life < fade {
        life as f32 / fade as f32
    } else if life > max_life.saturating_sub(fade) {
        max_life.saturating_sub(life) as f32 / fade as f32
    } else {
        1.0
    };
    alpha.clamp(0.0, 1.0)
}

/// A moving comet.
#[derive(Debug, Clone, PartialEq)]
pub struct Comet {
    /// Head position.
    pub position: Vec2,
    /// Displacement per frame. Fixed for the comet's lifetime.
    pub velocity: Vec2,
    /// Trail length in pixels.
    pub len: f32,
    pub alpha: f32,
    /// Frames lived so far.
    pub life: u32,
    /// Frames until expiry.
    pub max_life: u32,
}

impl Comet {
    /// A fresh comet travelling at `speed` pixels per frame towards
    /// `angle_deg`.
    pub fn new(position: Vec2, angle_deg: f32, speed: f32, len: f32, max_life: u32) -> Self {
        Self {
            position,
            velocity: Vec2::from_angle(angle_deg, speed),
            len,
            alpha: 0.0,
            life: 0,
            max_life,
        }
    }

    /// A comet with every parameter drawn from its spawn range.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: Size) -> Self {
        let width = bounds.width as f32;
        let height = bounds.height as f32;
        let x = rng.gen_range(SPAWN_X.start() * width..=SPAWN_X.end() * width);
        let y = rng.gen_range(SPAWN_Y.start() * height..=SPAWN_Y.end() * height);

        Self::new(
            Vec2::new(x, y),
            rng.gen_range(SPAWN_ANGLE_DEG),
            rng.gen_range(SPAWN_SPEED),
            rng.gen_range(TRAIL_LENGTH),
            rng.gen_range(MAX_LIFE),
        )
    }

    pub fn is_expired(&self) -> bool {
        self.life >= self.max_life
    }

    /// Age by one frame and move along the velocity.
    pub fn advance(&mut self, fade: u32) {
        self.life = (self.life + 1).min(self.max_life);
        self.alpha = fade_alpha(self.life, self.max_life, fade);
        self.position += self.velocity;
    }

    /// End of the trail, `len` pixels behind the head.
    pub fn tail(&self) -> Vec2 {
        self.position - self.velocity.normalize() * self.len
    }

    /// Gradient stroke for the trail, transparent at the tail and brightest
    /// at the head.
    pub fn trail_stroke(&self) -> Stroke {
        let paint = LinearGradient::new(self.tail(), self.position)
            .with_stop(0.0, Rgba::WHITE.with_alpha(0.0))
            .with_stop(TRAIL_MID_STOP, Rgba::LAVENDER.with_alpha(self.alpha * 0.5))
            .with_stop(1.0, Rgba::WHITE.with_alpha(self.alpha));

        Stroke {
            paint,
            width: TRAIL_WIDTH,
            glow: Some(Glow {
                blur: GLOW_BLUR,
                color: Rgba::VIOLET.with_alpha(GLOW_ALPHA),
            }),
        }
    }

    /// Draw the trail, then the head on top of it.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.stroke_line(self.tail(), self.position, &self.trail_stroke());
        surface.fill_circle(
            self.position,
            HEAD_RADIUS,
            Rgba::WHITE.with_alpha(self.alpha),
        );
    }
}
