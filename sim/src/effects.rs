//! Impact particle bursts.
//!
//! Purely cosmetic debris spawned at projectile hits; the renderer draws
//! them, the simulation only integrates their motion and lifetime.

use bevy::prelude::*;

use crate::npc::XorShift64;

pub const BURST_COUNT: usize = 6;
pub const PARTICLE_MAX_LIFETIME: f32 = 1.5;
/// Downward velocity pull per tick.
pub const PARTICLE_GRAVITY: f32 = -0.01;

#[derive(Component, Clone, Copy, Debug)]
pub struct ImpactParticle {
    /// Displacement per tick.
    pub velocity: Vec3,
    pub lifetime: f32,
}

impl ImpactParticle {
    /// Move one tick; returns true once the particle should despawn.
    pub fn advance(&mut self, position: &mut Vec3, dt: f32) -> bool {
        self.velocity.y += PARTICLE_GRAVITY;
        *position += self.velocity;
        self.lifetime += dt;
        self.lifetime > PARTICLE_MAX_LIFETIME
    }
}

/// Debris burst around an impact point: spawn positions plus particles.
pub fn impact_burst(impact: Vec3, rng: &mut XorShift64) -> Vec<(Vec3, ImpactParticle)> {
    (0..BURST_COUNT)
        .map(|_| {
            let position = impact
                + Vec3::new(
                    (rng.next_f32() - 0.5) * 0.5,
                    0.5 + rng.next_f32() * 0.5,
                    (rng.next_f32() - 0.5) * 0.5,
                );
            let particle = ImpactParticle {
                velocity: Vec3::new(
                    (rng.next_f32() - 0.5) * 0.15,
                    0.1 + rng.next_f32() * 0.1,
                    (rng.next_f32() - 0.5) * 0.15,
                ),
                lifetime: 0.0,
            };
            (position, particle)
        })
        .collect()
}
