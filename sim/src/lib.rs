//! Core simulation for the open-world city sandbox.
//!
//! Everything here is deterministic component/resource logic with no
//! rendering or OS input concerns: the renderer and input collaborators
//! talk to the simulation exclusively through the resources re-exported
//! below (see `game` for the tick wiring).

pub mod components;
pub mod effects;
pub mod events;
pub mod movement;
pub mod npc;
pub mod player;
pub mod vehicle;
pub mod wanted;
pub mod weapons;
pub mod world;

pub use components::*;
pub use effects::{impact_burst, ImpactParticle};
pub use events::{EventFeed, RespawnQueue};
pub use movement::{camera_target, CameraTarget};
pub use npc::{Npc, NpcBehavior, NpcContext, NpcRole, NpcState, XorShift64};
pub use player::{respawn_player, PlayerState};
pub use vehicle::{step_vehicle, Vehicle, VehicleInput, VehicleState};
pub use wanted::WantedLevel;
pub use weapons::projectile::{Projectile, ProjectileOwner};
pub use weapons::Sidearm;
pub use world::{ChunkCoord, ChunkMap};

use std::time::Duration;

/// Simulation tick rate. The runner loop and the fixed timestep both use it.
pub const FIXED_TIMESTEP_HZ: f64 = 60.0;

/// Upper bound on per-tick delta time fed into timers, so a stalled host
/// process cannot make behavior timers jump.
pub const MAX_TICK_DT: f32 = 0.05;

pub fn tick_duration() -> Duration {
    Duration::from_secs_f64(1.0 / FIXED_TIMESTEP_HZ)
}
