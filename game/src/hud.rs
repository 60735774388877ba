//! Display boundary: the per-tick HUD snapshot and camera target.
//!
//! A rendering collaborator reads these resources after each tick; the
//! simulation never blocks on it.

use bevy::prelude::*;

use sim::movement::camera_target;
use sim::weapons::MAGAZINE_SIZE;
use sim::{
    CameraTarget, EventFeed, Mode, PedestrianAvatar, PlayerState, Position, Sidearm, Vehicle,
    VehicleState, WantedLevel, MAX_TICK_DT,
};

use crate::input::CameraRig;

/// Everything the HUD draws, rebuilt once per tick.
#[derive(Resource, Clone, Debug, Default)]
pub struct HudReadout {
    pub health: f32,
    pub ammo: u32,
    pub magazine: u32,
    pub score: u32,
    pub mode: Mode,
    /// Signed vehicle speed, units per tick.
    pub speed: f32,
    pub wanted: f32,
    pub wanted_stars: u32,
    pub damage_flash: f32,
    pub muzzle_flash: f32,
    /// Newest-first messages with their ages in seconds.
    pub feed: Vec<(String, f32)>,
}

pub fn publish_hud(
    time: Res<Time>,
    mode: Res<Mode>,
    player: Res<PlayerState>,
    sidearm: Res<Sidearm>,
    wanted: Res<WantedLevel>,
    mut feed: ResMut<EventFeed>,
    mut readout: ResMut<HudReadout>,
    vehicles: Query<&VehicleState, With<Vehicle>>,
) {
    feed.tick(time.delta_secs().min(MAX_TICK_DT));

    readout.health = player.health;
    readout.ammo = sidearm.ammo;
    readout.magazine = MAGAZINE_SIZE;
    readout.score = player.score;
    readout.mode = *mode;
    readout.speed = vehicles.single().map(|v| v.speed).unwrap_or(0.0);
    readout.wanted = wanted.level();
    readout.wanted_stars = wanted.stars();
    readout.damage_flash = player.damage_flash;
    readout.muzzle_flash = player.muzzle_flash;
    readout.feed = feed
        .iter()
        .map(|message| (message.text.clone(), message.age))
        .collect();
}

pub fn update_camera_target(
    mode: Res<Mode>,
    rig: Res<CameraRig>,
    mut target: ResMut<CameraTarget>,
    vehicles: Query<&VehicleState, With<Vehicle>>,
    avatars: Query<&Position, With<PedestrianAvatar>>,
) {
    let Ok(vehicle) = vehicles.single() else { return };
    let Ok(avatar) = avatars.single() else { return };
    *target = camera_target(*mode, vehicle, avatar.0, rig.yaw, rig.pitch);
}
