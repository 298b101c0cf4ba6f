//! Core types shared by the starfall crates.
//!
//! Geometry and color primitives, the drawing [`Surface`] the animator
//! paints on, the [`Host`] scheduling contract it is driven by, and the
//! tunable [`AnimationSettings`].

mod color;
mod geometry;
mod host;
mod settings;
mod surface;

pub use color::Rgba;
pub use geometry::{Size, Vec2};
pub use host::{FrameHandle, Host, HostStats, ResizeSubscription, Scheduler, TimerHandle};
pub use settings::AnimationSettings;
pub use surface::{ColorStop, Glow, LinearGradient, Stroke, Surface};
