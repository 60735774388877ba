//! Weapons: the player's sidearm fire control, projectile flight and hit
//! tests, and damage/score/wanted bookkeeping.

pub mod damage;
pub mod projectile;

use bevy::prelude::*;

pub const MAGAZINE_SIZE: u32 = 30;
/// Minimum seconds between player shots.
pub const FIRE_COOLDOWN: f32 = 0.2;

/// The player's pistol: magazine plus a fire-rate limiter.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Sidearm {
    pub ammo: u32,
    last_fire_time: f32,
}

impl Default for Sidearm {
    fn default() -> Self {
        Self {
            ammo: MAGAZINE_SIZE,
            // Far enough in the past that the first shot is never gated.
            last_fire_time: -FIRE_COOLDOWN,
        }
    }
}

impl Sidearm {
    pub fn can_fire(&self, now: f32) -> bool {
        self.ammo > 0 && now - self.last_fire_time >= FIRE_COOLDOWN
    }

    pub fn is_empty(&self) -> bool {
        self.ammo == 0
    }

    /// Spend one round if the rate limit and magazine allow it.
    pub fn try_fire(&mut self, now: f32) -> bool {
        if !self.can_fire(now) {
            return false;
        }
        self.ammo -= 1;
        self.last_fire_time = now;
        true
    }

    pub fn reload(&mut self) {
        self.ammo = MAGAZINE_SIZE;
    }
}

/// Aim direction for a camera-framed shot.
pub fn fire_direction(yaw: f32, pitch: f32) -> Vec3 {
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0) * Vec3::NEG_Z
}
