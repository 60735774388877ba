//! Player-global state and the respawn contract.

use bevy::prelude::*;

use crate::vehicle::VehicleState;
use crate::wanted::WantedLevel;
use crate::weapons::Sidearm;

pub const PLAYER_MAX_HEALTH: f32 = 100.0;
/// Where the avatar stands after a death reset.
pub const PLAYER_RESPAWN_POSITION: Vec3 = Vec3::new(2.5, 0.0, 0.0);
/// Where both player bodies start a fresh session.
pub const PLAYER_SPAWN_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.0);

pub const DAMAGE_FLASH_DURATION: f32 = 0.5;
pub const MUZZLE_FLASH_DURATION: f32 = 0.08;

/// Score, health, and the short-lived HUD effect timers.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct PlayerState {
    pub health: f32,
    pub score: u32,
    /// Remaining red-vignette time after taking a hit.
    pub damage_flash: f32,
    /// Remaining muzzle-flash time after firing.
    pub muzzle_flash: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            health: PLAYER_MAX_HEALTH,
            score: 0,
            damage_flash: 0.0,
            muzzle_flash: 0.0,
        }
    }
}

impl PlayerState {
    /// Apply incoming damage, floored at 0, and start the damage flash.
    pub fn apply_hit(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
        self.damage_flash = DAMAGE_FLASH_DURATION;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn tick_effects(&mut self, dt: f32) {
        self.damage_flash = (self.damage_flash - dt).max(0.0);
        self.muzzle_flash = (self.muzzle_flash - dt).max(0.0);
    }
}

/// Full death reset: health back to max, wanted level cleared, magazine
/// refilled, car parked at the origin with zero heading/speed/steering,
/// avatar at [`PLAYER_RESPAWN_POSITION`]. The active mode and score are
/// preserved.
pub fn respawn_player(
    player: &mut PlayerState,
    sidearm: &mut Sidearm,
    wanted: &mut WantedLevel,
    vehicle: &mut VehicleState,
    avatar_pos: &mut Vec3,
    avatar_heading: &mut f32,
) {
    player.health = PLAYER_MAX_HEALTH;
    sidearm.reload();
    wanted.clear();
    vehicle.reset();
    *avatar_pos = PLAYER_RESPAWN_POSITION;
    *avatar_heading = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_floor_at_zero_and_flash_the_hud() {
        let mut player = PlayerState::default();
        for _ in 0..20 {
            player.apply_hit(8.0);
        }
        assert_eq!(player.health, 0.0);
        assert!(player.is_dead());
        assert_eq!(player.damage_flash, DAMAGE_FLASH_DURATION);
    }

    #[test]
    fn respawn_resets_everything_but_score() {
        let mut player = PlayerState {
            health: 0.0,
            score: 170,
            damage_flash: 0.3,
            muzzle_flash: 0.0,
        };
        let mut sidearm = Sidearm::default();
        sidearm.try_fire(1.0);
        let mut wanted = WantedLevel::default();
        wanted.raise(3.0, 15.0);
        let mut vehicle = VehicleState::at(Vec3::new(400.0, 0.0, -90.0));
        vehicle.speed = 1.2;
        vehicle.heading = 2.0;
        let mut avatar_pos = Vec3::new(398.0, 0.0, -88.0);
        let mut avatar_heading = 1.0;

        respawn_player(
            &mut player,
            &mut sidearm,
            &mut wanted,
            &mut vehicle,
            &mut avatar_pos,
            &mut avatar_heading,
        );

        assert_eq!(player.health, PLAYER_MAX_HEALTH);
        assert_eq!(player.score, 170);
        assert_eq!(sidearm.ammo, crate::weapons::MAGAZINE_SIZE);
        assert_eq!(wanted.level(), 0.0);
        assert_eq!(vehicle.position, Vec3::ZERO);
        assert_eq!(vehicle.speed, 0.0);
        assert_eq!(vehicle.heading, 0.0);
        assert_eq!(avatar_pos, PLAYER_RESPAWN_POSITION);
        assert_eq!(avatar_heading, 0.0);
    }

    #[test]
    fn effect_timers_drain_to_zero() {
        let mut player = PlayerState::default();
        player.apply_hit(1.0);
        player.muzzle_flash = MUZZLE_FLASH_DURATION;
        for _ in 0..60 {
            player.tick_effects(1.0 / 60.0);
        }
        assert_eq!(player.damage_flash, 0.0);
        assert_eq!(player.muzzle_flash, 0.0);
    }
}
