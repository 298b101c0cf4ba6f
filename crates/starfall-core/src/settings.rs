//! Tunable animation parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Counts and cadences of the starfield animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Number of static background stars.
    pub star_count: usize,
    /// Spawning is skipped while this many comets are active.
    pub max_comets: usize,
    /// A spawn is attempted once every this many frames.
    pub spawn_interval_frames: u64,
    /// Delay between mount and the first comet.
    pub initial_spawn_delay_ms: u64,
    /// Length of the fade-in and fade-out ramps, in frames.
    pub fade_frames: u32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            star_count: 160,
            max_comets: 4,
            spawn_interval_frames: 140,
            initial_spawn_delay_ms: 600,
            fade_frames: 20,
        }
    }
}

impl AnimationSettings {
    pub fn initial_spawn_delay(&self) -> Duration {
        Duration::from_millis(self.initial_spawn_delay_ms)
    }

    /// Copy with zero cadences raised to one frame.
    pub fn sanitized(self) -> Self {
        Self {
            spawn_interval_frames: self.spawn_interval_frames.max(1),
            fade_frames: self.fade_frames.max(1),
            ..self
        }
    }
}
