//! Shared spatial components and small math helpers.

use bevy::prelude::*;

/// World position of a simulated entity. The simulation is planar: systems
/// pin `y` back to 0 after every move.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Position(pub Vec3);

/// Yaw around +Y, radians.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Heading(pub f32);

/// Marker for the player's on-foot body.
#[derive(Component)]
pub struct PedestrianAvatar;

/// Cosmetic limb-swing phase, advanced while the owner is moving.
/// Consumed by the renderer only; never feeds back into positions.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct WalkCycle {
    pub phase: f32,
}

/// Whether the player currently controls the vehicle or the avatar.
/// The entity matching the active mode is authoritative for the player's
/// world position.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Driving,
    OnFoot,
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Apply damage, flooring at 0. Returns true only for the hit that
    /// crossed zero, so kill credit is awarded exactly once.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.current > 0.0;
        self.current = (self.current - amount).max(0.0);
        was_alive && self.current <= 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn reset(&mut self) {
        self.current = self.max;
    }
}

/// Unit forward vector for a yaw heading (Bevy convention: -Z at yaw 0).
#[inline]
pub fn forward_from_heading(heading: f32) -> Vec3 {
    Vec3::new(-heading.sin(), 0.0, -heading.cos())
}

/// Unit right vector for a yaw heading.
#[inline]
pub fn right_from_heading(heading: f32) -> Vec3 {
    Vec3::new(heading.cos(), 0.0, -heading.sin())
}

/// Yaw heading that faces along `dir` (XZ plane).
#[inline]
pub fn heading_from_direction(dir: Vec3) -> f32 {
    (-dir.x).atan2(-dir.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_floors_at_zero_and_reports_the_kill_once() {
        let mut health = Health::new(40.0);
        assert!(!health.take_damage(25.0));
        assert!(health.take_damage(25.0));
        assert_eq!(health.current, 0.0);
        // Further hits on a corpse never re-report the kill.
        assert!(!health.take_damage(25.0));
        assert_eq!(health.current, 0.0);
        assert!(health.is_dead());
    }

    #[test]
    fn heading_round_trips_through_direction() {
        for heading in [0.0_f32, 0.7, -1.3, 3.0] {
            let dir = forward_from_heading(heading);
            let back = heading_from_direction(dir);
            assert!((back.sin() - heading.sin()).abs() < 1e-5);
            assert!((back.cos() - heading.cos()).abs() < 1e-5);
        }
    }

    #[test]
    fn right_is_perpendicular_to_forward() {
        for heading in [0.0_f32, 1.1, -2.4] {
            let f = forward_from_heading(heading);
            let r = right_from_heading(heading);
            assert!(f.dot(r).abs() < 1e-6);
        }
    }
}
