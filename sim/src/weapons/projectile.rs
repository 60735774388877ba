//! Projectile flight and hit tests.
//!
//! Projectiles fly straight at a fixed per-tick speed and expire after a
//! short lifetime. Hit tests are sphere checks against a target point one
//! unit above the victim's feet.

use bevy::prelude::*;

use crate::npc::XorShift64;

/// Units per tick.
pub const PLAYER_PROJECTILE_SPEED: f32 = 2.5;
pub const NPC_PROJECTILE_SPEED: f32 = 1.5;
/// Seconds before an un-hit projectile despawns.
pub const PROJECTILE_MAX_LIFETIME: f32 = 2.5;

/// Hit radius of a player projectile against an NPC.
pub const NPC_HIT_RADIUS: f32 = 0.9;
/// Hit radius of an NPC projectile against the player.
pub const PLAYER_HIT_RADIUS: f32 = 1.2;
/// Hit tests aim this far above the target's feet.
pub const TARGET_HEIGHT_OFFSET: f32 = 1.0;

pub const PLAYER_MUZZLE_HEIGHT: f32 = 1.5;
pub const NPC_MUZZLE_HEIGHT: f32 = 1.4;
/// Horizontal aim error per axis for NPC shots.
pub const NPC_SPREAD: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Npc,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct Projectile {
    /// Displacement applied each tick (direction times per-tick speed).
    pub velocity: Vec3,
    pub owner: ProjectileOwner,
    /// Seconds in flight so far.
    pub lifetime: f32,
}

impl Projectile {
    pub fn fire(direction: Vec3, owner: ProjectileOwner) -> Self {
        let speed = match owner {
            ProjectileOwner::Player => PLAYER_PROJECTILE_SPEED,
            ProjectileOwner::Npc => NPC_PROJECTILE_SPEED,
        };
        Self {
            velocity: direction.normalize_or_zero() * speed,
            owner,
            lifetime: 0.0,
        }
    }

    /// Move one tick; returns true once the lifetime is spent.
    pub fn advance(&mut self, position: &mut Vec3, dt: f32) -> bool {
        *position += self.velocity;
        self.lifetime += dt;
        self.lifetime > PROJECTILE_MAX_LIFETIME
    }
}

/// Sphere hit test against `target_base + 1 up`.
pub fn hits_target(projectile_pos: Vec3, target_base: Vec3, radius: f32) -> bool {
    let target = target_base + Vec3::Y * TARGET_HEIGHT_OFFSET;
    (projectile_pos - target).length() < radius
}

/// Velocity for an NPC shot from `origin` toward the player's aim point,
/// with per-axis horizontal inaccuracy.
pub fn npc_shot_velocity(origin: Vec3, target_base: Vec3, rng: &mut XorShift64) -> Vec3 {
    let mut direction = target_base + Vec3::Y * TARGET_HEIGHT_OFFSET - origin;
    direction.x += (rng.next_f32() - 0.5) * NPC_SPREAD;
    direction.z += (rng.next_f32() - 0.5) * NPC_SPREAD;
    direction.normalize_or_zero() * NPC_PROJECTILE_SPEED
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn player_projectiles_fly_faster_than_npc_ones() {
        let player = Projectile::fire(Vec3::NEG_Z, ProjectileOwner::Player);
        let npc = Projectile::fire(Vec3::NEG_Z, ProjectileOwner::Npc);
        assert!((player.velocity.length() - PLAYER_PROJECTILE_SPEED).abs() < 1e-5);
        assert!((npc.velocity.length() - NPC_PROJECTILE_SPEED).abs() < 1e-5);
    }

    #[test]
    fn projectiles_expire_after_their_lifetime() {
        let mut projectile = Projectile::fire(Vec3::NEG_Z, ProjectileOwner::Player);
        let mut pos = Vec3::ZERO;
        let mut ticks = 0;
        while !projectile.advance(&mut pos, DT) {
            ticks += 1;
            assert!(ticks < 200, "projectile never expired");
        }
        // 2.5s at 60Hz.
        assert!((145..=155).contains(&ticks));
    }

    #[test]
    fn hit_test_is_against_the_raised_target_point() {
        let npc_feet = Vec3::new(10.0, 0.0, 0.0);
        // At feet height the projectile passes 1.0 under the aim point.
        assert!(!hits_target(npc_feet, npc_feet, NPC_HIT_RADIUS));
        assert!(hits_target(
            npc_feet + Vec3::Y * TARGET_HEIGHT_OFFSET,
            npc_feet,
            NPC_HIT_RADIUS
        ));
        assert!(!hits_target(
            npc_feet + Vec3::new(NPC_HIT_RADIUS + 0.01, TARGET_HEIGHT_OFFSET, 0.0),
            npc_feet,
            NPC_HIT_RADIUS
        ));
    }

    #[test]
    fn npc_shots_spread_but_still_roughly_aim_at_the_player() {
        let mut rng = XorShift64::new(11);
        let origin = Vec3::new(0.0, NPC_MUZZLE_HEIGHT, 0.0);
        let target = Vec3::new(0.0, 0.0, -20.0);
        for _ in 0..100 {
            let velocity = npc_shot_velocity(origin, target, &mut rng);
            assert!((velocity.length() - NPC_PROJECTILE_SPEED).abs() < 1e-4);
            assert!(velocity.z < 0.0, "shot heads toward the target");
            // Spread is bounded: lateral error stays small relative to range.
            assert!(velocity.x.abs() < velocity.z.abs());
        }
    }
}
