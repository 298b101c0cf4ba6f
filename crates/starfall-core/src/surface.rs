//! The 2D drawing surface contract.

use crate::{Rgba, Vec2};

/// A color at a relative position along a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position in `0.0..=1.0`.
    pub offset: f32,
    pub color: Rgba,
}

/// Multi-stop gradient along the axis from `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Add a color stop. Stops are kept sorted by offset.
    pub fn with_stop(mut self, offset: f32, color: Rgba) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        let index = self.stops.partition_point(|stop| stop.offset <= offset);
        self.stops.insert(index, ColorStop { offset, color });
        self
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at relative position `t` along the axis.
    ///
    /// Before the first stop and after the last the end colors extend;
    /// a gradient without stops is fully transparent.
    pub fn sample(&self, t: f32) -> Rgba {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba::WHITE.with_alpha(0.0);
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.offset {
                let span = hi.offset - lo.offset;
                if span <= f32::EPSILON {
                    return hi.color;
                }
                return lo.color.lerp(hi.color, (t - lo.offset) / span);
            }
        }
        last.color
    }

    /// Color at `point`, projected onto the gradient axis.
    pub fn color_at(&self, point: Vec2) -> Rgba {
        let axis = self.end - self.start;
        let len_sq = axis.dot(axis);
        if len_sq <= f32::EPSILON {
            return self.sample(1.0);
        }
        self.sample((point - self.start).dot(axis) / len_sq)
    }
}

/// Soft halo drawn around a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Blur radius in pixels.
    pub blur: f32,
    pub color: Rgba,
}

/// How a line is stroked.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub paint: LinearGradient,
    /// Line width in pixels. Cell surfaces mark every cell within half the
    /// width of the line.
    pub width: f32,
    pub glow: Option<Glow>,
}

/// A 2D surface the animator draws on every frame.
pub trait Surface {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Fill a circle. No glow is ever applied to fills.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Stroke a straight line from `from` to `to`.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke);
}
