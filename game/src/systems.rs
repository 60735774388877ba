//! Fixed-tick gameplay systems, chained in `main` in simulation order:
//! chunk streaming, player controller, NPC behavior, combat, wanted decay,
//! respawn drain.

use bevy::app::AppExit;
use bevy::prelude::*;

use sim::effects::impact_burst;
use sim::movement::{apply_on_foot_movement, exit_vehicle, try_enter_vehicle};
use sim::npc::{
    reinforcement_position, respawn_if_dead, respawn_npc, step_npc, NpcContext,
    FAR_RECYCLE_DISTANCE, MAX_NPC_POPULATION, REINFORCEMENT_CHANCE, REINFORCEMENT_WANTED,
    RESPAWN_DELAY,
};
use sim::weapons::damage::{
    kill_score, kill_wanted_delta, roll_hit_damage, KILL_DECAY_DELAY, PLAYER_HIT_DAMAGE,
    SHOT_DECAY_DELAY, WANTED_PER_SHOT,
};
use sim::weapons::projectile::{
    hits_target, npc_shot_velocity, NPC_HIT_RADIUS, NPC_MUZZLE_HEIGHT, PLAYER_HIT_RADIUS,
    PLAYER_MUZZLE_HEIGHT,
};
use sim::weapons::{fire_direction, Sidearm};
use sim::player::{respawn_player, MUZZLE_FLASH_DURATION};
use sim::{
    step_vehicle, ChunkMap, EventFeed, Health, Heading, ImpactParticle, Mode, Npc, NpcBehavior,
    NpcRole, NpcState, PedestrianAvatar, PlayerState, Position, Projectile, ProjectileOwner,
    RespawnQueue, Vehicle, VehicleInput, VehicleState, WalkCycle, WantedLevel, MAX_TICK_DT,
};

use crate::input::{CameraRig, PlayerIntent};
use crate::world::{spawn_npc, SimRng};

// =============================================================================
// WORLD STREAMING
// =============================================================================

/// Keep the chunk ball centered on the mode-authoritative body.
pub fn stream_chunks(
    mode: Res<Mode>,
    mut chunks: ResMut<ChunkMap>,
    vehicles: Query<&VehicleState, With<Vehicle>>,
    avatars: Query<&Position, With<PedestrianAvatar>>,
) {
    let focus = match *mode {
        Mode::Driving => vehicles.single().map(|v| v.position),
        Mode::OnFoot => avatars.single().map(|p| p.0),
    };
    let Ok(focus) = focus else { return };
    chunks.update_residency(focus.x, focus.z);
}

// =============================================================================
// PLAYER CONTROLLER
// =============================================================================

pub fn handle_mode_toggle(
    mut intent: ResMut<PlayerIntent>,
    mut mode: ResMut<Mode>,
    mut rig: ResMut<CameraRig>,
    mut vehicles: Query<&mut VehicleState, With<Vehicle>>,
    mut avatars: Query<(&mut Position, &mut Heading), With<PedestrianAvatar>>,
) {
    if !intent.toggle_mode {
        return;
    }
    intent.toggle_mode = false;

    let Ok(mut vehicle) = vehicles.single_mut() else { return };
    let Ok((mut avatar_pos, mut avatar_heading)) = avatars.single_mut() else { return };

    match *mode {
        Mode::Driving => {
            exit_vehicle(&vehicle, &mut avatar_pos.0, &mut avatar_heading.0, &mut rig.yaw);
            *mode = Mode::OnFoot;
            info!("on foot");
        }
        Mode::OnFoot => {
            if try_enter_vehicle(avatar_pos.0, &mut vehicle) {
                *mode = Mode::Driving;
                info!("driving");
            }
        }
    }
}

pub fn drive_vehicle(
    intent: Res<PlayerIntent>,
    mode: Res<Mode>,
    mut vehicles: Query<&mut VehicleState, With<Vehicle>>,
) {
    if *mode != Mode::Driving {
        return;
    }
    let Ok(mut vehicle) = vehicles.single_mut() else { return };
    let input = VehicleInput {
        throttle: intent.throttle_axis(),
        steer: intent.steer_axis(),
        brake: intent.brake,
    };
    step_vehicle(&mut vehicle, &input);
}

pub fn walk_avatar(
    intent: Res<PlayerIntent>,
    mode: Res<Mode>,
    rig: Res<CameraRig>,
    time: Res<Time>,
    mut avatars: Query<(&mut Position, &mut Heading, &mut WalkCycle), With<PedestrianAvatar>>,
) {
    if *mode != Mode::OnFoot {
        return;
    }
    let Ok((mut position, mut heading, mut walk)) = avatars.single_mut() else { return };
    let dt = time.delta_secs().min(MAX_TICK_DT);
    apply_on_foot_movement(
        intent.move_axes(),
        rig.yaw,
        &mut position.0,
        &mut heading.0,
        &mut walk,
        dt,
    );
}

// =============================================================================
// NPC BEHAVIOR
// =============================================================================

pub fn tick_npc_ai(
    mut commands: Commands,
    time: Res<Time>,
    mode: Res<Mode>,
    wanted: Res<WantedLevel>,
    mut rng: ResMut<SimRng>,
    mut queue: ResMut<RespawnQueue>,
    vehicles: Query<&VehicleState, With<Vehicle>>,
    avatars: Query<&Position, (With<PedestrianAvatar>, Without<Npc>)>,
    mut npcs: Query<(
        Entity,
        &Npc,
        &mut NpcBehavior,
        &mut Position,
        &mut Heading,
        &mut Health,
    )>,
) {
    let player_pos = match *mode {
        Mode::Driving => vehicles.single().map(|v| v.position),
        Mode::OnFoot => avatars.single().map(|p| p.0),
    };
    let Ok(player_pos) = player_pos else { return };

    let ctx = NpcContext {
        player_pos,
        wanted: wanted.level(),
        dt: time.delta_secs().min(MAX_TICK_DT),
    };

    for (entity, npc, mut behavior, mut position, mut heading, mut health) in npcs.iter_mut() {
        // Drifted out of the simulated bubble: recycle in place. This can
        // revive a dead NPC early, so its pending timed respawn is void.
        if (position.0 - player_pos).length() > FAR_RECYCLE_DISTANCE {
            queue.cancel(entity);
            respawn_npc(
                &mut behavior,
                &mut position.0,
                &mut heading.0,
                &mut health,
                player_pos,
                &mut rng.0,
            );
            continue;
        }

        let wants_fire = step_npc(
            npc,
            &mut behavior,
            &mut position.0,
            &mut heading.0,
            &ctx,
            &mut rng.0,
        );

        if wants_fire {
            let origin = position.0 + Vec3::Y * NPC_MUZZLE_HEIGHT;
            let velocity = npc_shot_velocity(origin, player_pos, &mut rng.0);
            commands.spawn((
                Projectile {
                    velocity,
                    owner: ProjectileOwner::Npc,
                    lifetime: 0.0,
                },
                Position(origin),
            ));
        }
    }
}

/// While the heat is on, trickle in extra police near the player. The
/// population cap is enforced by recycling the farthest NPC first.
pub fn police_reinforcements(
    mut commands: Commands,
    mode: Res<Mode>,
    wanted: Res<WantedLevel>,
    mut rng: ResMut<SimRng>,
    mut queue: ResMut<RespawnQueue>,
    vehicles: Query<&VehicleState, With<Vehicle>>,
    avatars: Query<&Position, (With<PedestrianAvatar>, Without<Npc>)>,
    npcs: Query<(Entity, &Position), With<Npc>>,
) {
    if wanted.level() < REINFORCEMENT_WANTED {
        return;
    }
    if rand::random::<f32>() >= REINFORCEMENT_CHANCE {
        return;
    }

    let player_pos = match *mode {
        Mode::Driving => vehicles.single().map(|v| v.position),
        Mode::OnFoot => avatars.single().map(|p| p.0),
    };
    let Ok(player_pos) = player_pos else { return };

    if npcs.iter().count() >= MAX_NPC_POPULATION {
        let farthest = npcs
            .iter()
            .max_by(|(_, a), (_, b)| {
                let da = (a.0 - player_pos).length_squared();
                let db = (b.0 - player_pos).length_squared();
                da.total_cmp(&db)
            })
            .map(|(entity, _)| entity);
        if let Some(entity) = farthest {
            queue.cancel(entity);
            commands.entity(entity).despawn();
        }
    }

    let position = reinforcement_position(player_pos, &mut rng.0);
    spawn_npc(&mut commands, NpcRole::Police, position, &mut rng.0);
    info!("police reinforcement dispatched");
}

// =============================================================================
// COMBAT
// =============================================================================

pub fn handle_player_fire(
    mut commands: Commands,
    time: Res<Time>,
    mode: Res<Mode>,
    rig: Res<CameraRig>,
    mut intent: ResMut<PlayerIntent>,
    mut sidearm: ResMut<Sidearm>,
    mut player: ResMut<PlayerState>,
    mut wanted: ResMut<WantedLevel>,
    mut feed: ResMut<EventFeed>,
    avatars: Query<&Position, With<PedestrianAvatar>>,
) {
    if !intent.fire {
        return;
    }
    intent.fire = false;

    // The sidearm is holstered while driving.
    if *mode != Mode::OnFoot {
        return;
    }
    let Ok(avatar) = avatars.single() else { return };

    let now = time.elapsed_secs();
    if !sidearm.try_fire(now) {
        if sidearm.is_empty() {
            feed.push("Out of ammo - reload");
        }
        return;
    }

    let origin = avatar.0 + Vec3::Y * PLAYER_MUZZLE_HEIGHT;
    let direction = fire_direction(rig.yaw, rig.pitch);
    commands.spawn((
        Projectile::fire(direction, ProjectileOwner::Player),
        Position(origin),
    ));

    player.muzzle_flash = MUZZLE_FLASH_DURATION;
    // Firing in the street is a crime even when nothing is hit.
    wanted.raise(WANTED_PER_SHOT, SHOT_DECAY_DELAY);
}

pub fn handle_reload(
    mut intent: ResMut<PlayerIntent>,
    mut sidearm: ResMut<Sidearm>,
    mut feed: ResMut<EventFeed>,
) {
    if !intent.reload {
        return;
    }
    intent.reload = false;
    sidearm.reload();
    feed.push("Reloaded");
}

/// Advance every projectile one tick and resolve impacts. One victim per
/// projectile; kills schedule a respawn, survivors turn on the player.
pub fn simulate_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    mode: Res<Mode>,
    mut rng: ResMut<SimRng>,
    mut player: ResMut<PlayerState>,
    mut sidearm: ResMut<Sidearm>,
    mut wanted: ResMut<WantedLevel>,
    mut feed: ResMut<EventFeed>,
    mut queue: ResMut<RespawnQueue>,
    mut projectiles: Query<
        (Entity, &mut Projectile, &mut Position),
        (Without<Npc>, Without<PedestrianAvatar>),
    >,
    mut npcs: Query<
        (Entity, &Npc, &mut NpcBehavior, &Position, &mut Health),
        Without<Projectile>,
    >,
    mut vehicles: Query<&mut VehicleState, With<Vehicle>>,
    mut avatars: Query<
        (&mut Position, &mut Heading),
        (With<PedestrianAvatar>, Without<Npc>, Without<Projectile>),
    >,
) {
    let dt = time.delta_secs().min(MAX_TICK_DT);
    let now = time.elapsed_secs();

    let player_target = match *mode {
        Mode::Driving => vehicles.single().map(|v| v.position),
        Mode::OnFoot => avatars.single().map(|(p, _)| p.0),
    };
    let Ok(player_target) = player_target else { return };

    for (projectile_entity, mut projectile, mut position) in projectiles.iter_mut() {
        if projectile.advance(&mut position.0, dt) {
            commands.entity(projectile_entity).despawn();
            continue;
        }

        match projectile.owner {
            ProjectileOwner::Player => {
                for (npc_entity, npc, mut behavior, npc_pos, mut health) in npcs.iter_mut() {
                    if behavior.state == NpcState::Dead {
                        continue;
                    }
                    if !hits_target(position.0, npc_pos.0, NPC_HIT_RADIUS) {
                        continue;
                    }

                    for (burst_pos, particle) in impact_burst(position.0, &mut rng.0) {
                        commands.spawn((particle, Position(burst_pos)));
                    }

                    let damage = roll_hit_damage(&mut rng.0);
                    if health.take_damage(damage) {
                        behavior.state = NpcState::Dead;
                        player.score += kill_score(npc.role);
                        wanted.raise(kill_wanted_delta(npc.role), KILL_DECAY_DELAY);
                        queue.schedule(npc_entity, now + RESPAWN_DELAY);
                        match npc.role {
                            NpcRole::Police => feed.push("Officer down (+50)"),
                            NpcRole::Civilian => feed.push("Civilian down (+10)"),
                        }
                    } else {
                        // Getting shot makes anyone turn on the shooter.
                        behavior.state = NpcState::Chase;
                    }

                    commands.entity(projectile_entity).despawn();
                    break;
                }
            }
            ProjectileOwner::Npc => {
                if !hits_target(position.0, player_target, PLAYER_HIT_RADIUS) {
                    continue;
                }
                commands.entity(projectile_entity).despawn();
                player.apply_hit(PLAYER_HIT_DAMAGE);

                if player.is_dead() {
                    let Ok(mut vehicle) = vehicles.single_mut() else { continue };
                    let Ok((mut avatar_pos, mut avatar_heading)) = avatars.single_mut() else {
                        continue;
                    };
                    respawn_player(
                        &mut player,
                        &mut sidearm,
                        &mut wanted,
                        &mut vehicle,
                        &mut avatar_pos.0,
                        &mut avatar_heading.0,
                    );
                    feed.push("Wasted");
                    warn!("player down, respawning");
                }
            }
        }
    }
}

pub fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut particles: Query<(Entity, &mut ImpactParticle, &mut Position)>,
) {
    let dt = time.delta_secs().min(MAX_TICK_DT);
    for (entity, mut particle, mut position) in particles.iter_mut() {
        if particle.advance(&mut position.0, dt) {
            commands.entity(entity).despawn();
        }
    }
}

// =============================================================================
// TIMERS & RESPAWNS
// =============================================================================

pub fn tick_wanted(time: Res<Time>, mut wanted: ResMut<WantedLevel>) {
    wanted.tick(time.delta_secs().min(MAX_TICK_DT));
}

pub fn tick_player_effects(time: Res<Time>, mut player: ResMut<PlayerState>) {
    player.tick_effects(time.delta_secs().min(MAX_TICK_DT));
}

/// Bring dead NPCs back once their delay has elapsed.
pub fn drain_respawns(
    time: Res<Time>,
    mode: Res<Mode>,
    mut queue: ResMut<RespawnQueue>,
    mut rng: ResMut<SimRng>,
    vehicles: Query<&VehicleState, With<Vehicle>>,
    avatars: Query<&Position, (With<PedestrianAvatar>, Without<Npc>)>,
    mut npcs: Query<(&mut NpcBehavior, &mut Position, &mut Heading, &mut Health), With<Npc>>,
) {
    let due = queue.drain_due(time.elapsed_secs());
    if due.is_empty() {
        return;
    }

    let player_pos = match *mode {
        Mode::Driving => vehicles.single().map(|v| v.position),
        Mode::OnFoot => avatars.single().map(|p| p.0),
    }
    .unwrap_or(Vec3::ZERO);

    for entity in due {
        let Ok((mut behavior, mut position, mut heading, mut health)) = npcs.get_mut(entity)
        else {
            continue;
        };
        // No-op for NPCs already revived by far-distance recycling.
        respawn_if_dead(
            &mut behavior,
            &mut position.0,
            &mut heading.0,
            &mut health,
            player_pos,
            &mut rng.0,
        );
    }
}

// =============================================================================
// SHUTDOWN
// =============================================================================

/// Tear the session down on an exit request: drop all transient entities,
/// flush the chunk cache and respawn queue, then ask the app to quit.
/// Safe to run again if a second exit request slips in.
pub fn handle_exit(
    mut commands: Commands,
    mut intent: ResMut<PlayerIntent>,
    mut chunks: ResMut<ChunkMap>,
    mut queue: ResMut<RespawnQueue>,
    transient: Query<Entity, Or<(With<Npc>, With<Projectile>, With<ImpactParticle>)>>,
    mut app_exit: MessageWriter<AppExit>,
) {
    if !intent.exit {
        return;
    }
    intent.exit = false;

    for entity in transient.iter() {
        commands.entity(entity).despawn();
    }
    chunks.clear();
    queue.clear();
    info!("session torn down");
    app_exit.write(AppExit::Success);
}
