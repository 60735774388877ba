//! Wanted-level tracking.
//!
//! The level only rises through `raise` (crimes) and only falls through
//! `tick` (time). Each raise pushes the decay countdown out; once the
//! countdown empties the level steps down by 0.5 and the countdown
//! re-arms until the level is fully drained.

use bevy::prelude::*;

pub const WANTED_MAX: f32 = 5.0;
pub const WANTED_DECAY_STEP: f32 = 0.5;
/// Countdown between decay steps after the initial delay has elapsed.
pub const WANTED_DECAY_REARM: f32 = 5.0;

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct WantedLevel {
    level: f32,
    decay_timer: f32,
}

impl WantedLevel {
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Star count shown on the HUD.
    pub fn stars(&self) -> u32 {
        self.level.ceil() as u32
    }

    /// Record a crime: bump the level (capped) and push the decay
    /// countdown out to `decay_delay` seconds.
    pub fn raise(&mut self, amount: f32, decay_delay: f32) {
        self.level = (self.level + amount).min(WANTED_MAX);
        self.decay_timer = decay_delay;
    }

    /// Advance the countdown; steps the level down when it empties.
    pub fn tick(&mut self, dt: f32) {
        if self.decay_timer <= 0.0 {
            return;
        }
        self.decay_timer -= dt;
        if self.decay_timer <= 0.0 {
            self.level = (self.level - WANTED_DECAY_STEP).max(0.0);
            self.decay_timer = if self.level > 0.0 {
                WANTED_DECAY_REARM
            } else {
                0.0
            };
        }
    }

    pub fn clear(&mut self) {
        self.level = 0.0;
        self.decay_timer = 0.0;
    }

    pub fn decay_timer(&self) -> f32 {
        self.decay_timer
    }
}
