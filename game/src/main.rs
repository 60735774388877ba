//! Headless simulation runner.
//!
//! Runs the whole sandbox at a fixed 60Hz tick. Input arrives through the
//! `PlayerIntent` resource and output leaves through `HudReadout`,
//! `CameraTarget`, and the chunk build/evict deltas; see `input` and `hud`.

mod hud;
mod input;
mod systems;
mod world;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;

use sim::{tick_duration, CameraTarget, ChunkMap, EventFeed, Mode, PlayerState, RespawnQueue,
    Sidearm, WantedLevel, FIXED_TIMESTEP_HZ};

use hud::HudReadout;
use input::{CameraRig, PlayerIntent};
use world::SimRng;

fn main() {
    let mut app = App::new();

    // Headless: run the main loop at the same rate as the fixed tick so
    // intent flags written between ticks are consumed exactly once.
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick_duration())));
    app.add_plugins(bevy::log::LogPlugin::default());

    app.insert_resource(Time::<Fixed>::from_hz(FIXED_TIMESTEP_HZ));

    app.init_resource::<SimRng>();
    app.init_resource::<ChunkMap>();
    app.init_resource::<Mode>();
    app.init_resource::<PlayerState>();
    app.init_resource::<Sidearm>();
    app.init_resource::<WantedLevel>();
    app.init_resource::<EventFeed>();
    app.init_resource::<RespawnQueue>();
    app.init_resource::<PlayerIntent>();
    app.init_resource::<CameraRig>();
    app.init_resource::<CameraTarget>();
    app.init_resource::<HudReadout>();

    app.add_systems(Startup, world::setup_world);

    // Fixed tick, in simulation order: streaming, player, NPCs, combat,
    // timers, respawns, then the display snapshot.
    app.add_systems(
        FixedUpdate,
        (
            systems::stream_chunks,
            input::apply_look_input,
            systems::handle_mode_toggle,
            systems::drive_vehicle,
            systems::walk_avatar,
            systems::tick_npc_ai,
            systems::police_reinforcements,
            systems::handle_player_fire,
            systems::handle_reload,
            systems::simulate_projectiles,
            systems::update_particles,
            systems::tick_wanted,
            systems::tick_player_effects,
            systems::drain_respawns,
            systems::handle_exit,
            hud::update_camera_target,
            hud::publish_hud,
        )
            .chain(),
    );

    info!("starting simulation at {} Hz", FIXED_TIMESTEP_HZ);
    app.run();
}
