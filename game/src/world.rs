//! Startup spawning: the player's two bodies and the base NPC population.

use bevy::prelude::*;
use sim::npc::{
    initial_civilian_position, initial_police_position, CIVILIAN_COUNT, POLICE_BASE_COUNT,
};
use sim::player::PLAYER_SPAWN_POSITION;
use sim::{
    Health, Heading, Npc, NpcBehavior, NpcRole, PedestrianAvatar, Position, Vehicle,
    VehicleState, WalkCycle, XorShift64,
};

/// Shared runtime RNG for behavior rolls, damage, and spawn placement.
/// Seeded fresh per session; tests use their own fixed-seed generators.
#[derive(Resource)]
pub struct SimRng(pub XorShift64);

impl Default for SimRng {
    fn default() -> Self {
        Self(XorShift64::default())
    }
}

pub fn setup_world(mut commands: Commands, mut rng: ResMut<SimRng>) {
    commands.spawn((Vehicle, VehicleState::at(PLAYER_SPAWN_POSITION)));
    commands.spawn((
        PedestrianAvatar,
        Position(PLAYER_SPAWN_POSITION),
        Heading(0.0),
        WalkCycle::default(),
    ));

    for _ in 0..CIVILIAN_COUNT {
        let position = initial_civilian_position(&mut rng.0);
        spawn_npc(&mut commands, NpcRole::Civilian, position, &mut rng.0);
    }
    for _ in 0..POLICE_BASE_COUNT {
        let position = initial_police_position(&mut rng.0);
        spawn_npc(&mut commands, NpcRole::Police, position, &mut rng.0);
    }

    info!(
        "world ready: {} civilians, {} police",
        CIVILIAN_COUNT, POLICE_BASE_COUNT
    );
}

pub fn spawn_npc(commands: &mut Commands, role: NpcRole, position: Vec3, rng: &mut XorShift64) {
    commands.spawn((
        Npc { role },
        NpcBehavior::new(role, rng),
        Position(position),
        Heading(rng.next_f32() * std::f32::consts::TAU),
        Health::new(role.max_health()),
    ));
}
