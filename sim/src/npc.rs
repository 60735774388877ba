//! Pedestrian and police behavior.
//!
//! Each NPC runs a small state machine (Wander / Flee / Chase / Dead)
//! driven by the player's wanted level and distance. `step_npc` is a pure
//! function over the NPC's components plus an [`NpcContext`], so the whole
//! transition table is unit-testable with a fixed-seed RNG.

use bevy::prelude::*;

use crate::components::{forward_from_heading, heading_from_direction, Health};

// =============================================================================
// TUNING
// =============================================================================

pub const CIVILIAN_COUNT: usize = 25;
pub const POLICE_BASE_COUNT: usize = 3;
/// Hard population cap. Reinforcements past the cap recycle the farthest
/// NPC instead of growing the world.
pub const MAX_NPC_POPULATION: usize = 40;

pub const CIVILIAN_HEALTH: f32 = 40.0;
pub const POLICE_HEALTH: f32 = 80.0;

pub const POLICE_SPEED: f32 = 0.07;
pub const CIVILIAN_SPEED_MIN: f32 = 0.03;
pub const CIVILIAN_SPEED_SPAN: f32 = 0.02;

pub const WANDER_SPEED_FACTOR: f32 = 0.5;
pub const FLEE_SPEED_FACTOR: f32 = 0.8;

pub const FLEE_WANTED_THRESHOLD: f32 = 2.0;
pub const FLEE_RADIUS: f32 = 40.0;
pub const CHASE_WANTED_THRESHOLD: f32 = 1.0;
pub const CHASE_STOP_RANGE: f32 = 8.0;
pub const POLICE_FIRE_RANGE: f32 = 30.0;
pub const POLICE_FIRE_COOLDOWN_MIN: f32 = 1.5;
pub const POLICE_FIRE_COOLDOWN_SPAN: f32 = 1.0;

pub const RESPAWN_DELAY: f32 = 8.0;
/// Anyone this far from the player is recycled to a fresh spot immediately.
pub const FAR_RECYCLE_DISTANCE: f32 = 300.0;
pub const RESPAWN_DISTANCE_MIN: f32 = 80.0;
pub const RESPAWN_DISTANCE_SPAN: f32 = 80.0;

pub const REINFORCEMENT_WANTED: f32 = 3.0;
pub const REINFORCEMENT_CHANCE: f32 = 0.002;
pub const REINFORCEMENT_DISTANCE: f32 = 60.0;

pub const NPC_WALK_ANIM_RATE: f32 = 8.0;

// =============================================================================
// COMPONENTS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NpcRole {
    Civilian,
    Police,
}

impl NpcRole {
    pub fn max_health(&self) -> f32 {
        match self {
            NpcRole::Civilian => CIVILIAN_HEALTH,
            NpcRole::Police => POLICE_HEALTH,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NpcState {
    Wander,
    Flee,
    Chase,
    Dead,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct Npc {
    pub role: NpcRole,
}

#[derive(Component, Clone, Debug)]
pub struct NpcBehavior {
    pub state: NpcState,
    /// Seconds until the next wander re-roll.
    pub state_timer: f32,
    /// Base movement speed, units per tick.
    pub speed: f32,
    /// Seconds until a police NPC may fire again.
    pub shoot_cooldown: f32,
    pub walk_phase: f32,
}

impl NpcBehavior {
    pub fn new(role: NpcRole, rng: &mut XorShift64) -> Self {
        let speed = match role {
            NpcRole::Police => POLICE_SPEED,
            NpcRole::Civilian => CIVILIAN_SPEED_MIN + rng.next_f32() * CIVILIAN_SPEED_SPAN,
        };
        Self {
            state: NpcState::Wander,
            state_timer: 0.0,
            speed,
            shoot_cooldown: 0.0,
            walk_phase: rng.next_f32() * std::f32::consts::TAU,
        }
    }
}

/// Per-tick world view handed to `step_npc`.
pub struct NpcContext {
    /// Authoritative player position (vehicle or avatar per mode).
    pub player_pos: Vec3,
    pub wanted: f32,
    pub dt: f32,
}

// =============================================================================
// STATE MACHINE
// =============================================================================

/// Advance one NPC by one tick. Returns true when a police NPC wants to
/// fire at the player this tick (the caller spawns the projectile).
pub fn step_npc(
    npc: &Npc,
    behavior: &mut NpcBehavior,
    position: &mut Vec3,
    heading: &mut f32,
    ctx: &NpcContext,
    rng: &mut XorShift64,
) -> bool {
    if behavior.state == NpcState::Dead {
        return false;
    }

    let distance = (*position - ctx.player_pos).length();
    behavior.state_timer -= ctx.dt;

    // Wanted-driven overrides win over the wander timer every tick.
    match npc.role {
        NpcRole::Police => {
            if ctx.wanted >= CHASE_WANTED_THRESHOLD {
                behavior.state = NpcState::Chase;
            } else if behavior.state_timer <= 0.0 {
                behavior.state = NpcState::Wander;
                behavior.state_timer = 2.0 + rng.next_f32() * 3.0;
                *heading = rng.next_f32() * std::f32::consts::TAU;
            }
        }
        NpcRole::Civilian => {
            if ctx.wanted >= FLEE_WANTED_THRESHOLD && distance < FLEE_RADIUS {
                behavior.state = NpcState::Flee;
            } else if behavior.state_timer <= 0.0 {
                behavior.state = NpcState::Wander;
                behavior.state_timer = 2.0 + rng.next_f32() * 4.0;
                *heading = rng.next_f32() * std::f32::consts::TAU;
            }
        }
    }

    let mut wants_fire = false;
    match behavior.state {
        NpcState::Wander => {
            *position += forward_from_heading(*heading) * behavior.speed * WANDER_SPEED_FACTOR;
        }
        NpcState::Flee => {
            let away = (*position - ctx.player_pos).normalize_or_zero();
            *position += away * behavior.speed * FLEE_SPEED_FACTOR;
            *heading = heading_from_direction(away);
        }
        NpcState::Chase => {
            let toward = (ctx.player_pos - *position).normalize_or_zero();
            if distance > CHASE_STOP_RANGE {
                *position += toward * behavior.speed;
            }
            *heading = heading_from_direction(toward);

            if npc.role == NpcRole::Police && distance < POLICE_FIRE_RANGE {
                behavior.shoot_cooldown -= ctx.dt;
                if behavior.shoot_cooldown <= 0.0 {
                    behavior.shoot_cooldown =
                        POLICE_FIRE_COOLDOWN_MIN + rng.next_f32() * POLICE_FIRE_COOLDOWN_SPAN;
                    wants_fire = true;
                }
            }
        }
        NpcState::Dead => {}
    }

    position.y = 0.0;
    behavior.walk_phase += ctx.dt * NPC_WALK_ANIM_RATE;
    wants_fire
}

// =============================================================================
// SPAWN PLACEMENT
// =============================================================================

/// Initial civilian placement: a ring 20-170 units from the origin.
pub fn initial_civilian_position(rng: &mut XorShift64) -> Vec3 {
    let angle = rng.next_f32() * std::f32::consts::TAU;
    let distance = 20.0 + rng.next_f32() * 150.0;
    Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Initial police placement: anywhere in a 200x200 square around the origin.
pub fn initial_police_position(rng: &mut XorShift64) -> Vec3 {
    Vec3::new(
        (rng.next_f32() - 0.5) * 200.0,
        0.0,
        (rng.next_f32() - 0.5) * 200.0,
    )
}

/// Fresh spot 80-160 units from the player at a random bearing, used both
/// for timed respawns and for far-distance recycling.
pub fn respawn_position(player_pos: Vec3, rng: &mut XorShift64) -> Vec3 {
    let angle = rng.next_f32() * std::f32::consts::TAU;
    let distance = RESPAWN_DISTANCE_MIN + rng.next_f32() * RESPAWN_DISTANCE_SPAN;
    let mut pos = player_pos + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
    pos.y = 0.0;
    pos
}

/// Reinforcement placement: a fixed 60 units out at a random bearing.
pub fn reinforcement_position(player_pos: Vec3, rng: &mut XorShift64) -> Vec3 {
    let angle = rng.next_f32() * std::f32::consts::TAU;
    let mut pos = player_pos
        + Vec3::new(
            angle.cos() * REINFORCEMENT_DISTANCE,
            0.0,
            angle.sin() * REINFORCEMENT_DISTANCE,
        );
    pos.y = 0.0;
    pos
}

/// Timed-respawn path. Far-distance recycling can revive an NPC before
/// its scheduled respawn comes due; a live NPC keeps its spot and health,
/// so the stale timer must not teleport or re-heal it.
pub fn respawn_if_dead(
    behavior: &mut NpcBehavior,
    position: &mut Vec3,
    heading: &mut f32,
    health: &mut Health,
    player_pos: Vec3,
    rng: &mut XorShift64,
) -> bool {
    if behavior.state != NpcState::Dead {
        return false;
    }
    respawn_npc(behavior, position, heading, health, player_pos, rng);
    true
}

/// Recycle an NPC in place: full health, wandering, far from the player.
pub fn respawn_npc(
    behavior: &mut NpcBehavior,
    position: &mut Vec3,
    heading: &mut f32,
    health: &mut Health,
    player_pos: Vec3,
    rng: &mut XorShift64,
) {
    *position = respawn_position(player_pos, rng);
    *heading = rng.next_f32() * std::f32::consts::TAU;
    health.reset();
    behavior.state = NpcState::Wander;
    behavior.state_timer = 0.0;
    behavior.shoot_cooldown = 0.0;
}

// =============================================================================
// DETERMINISTIC RNG
// =============================================================================

/// Small xorshift64* generator for seedable, reproducible behavior rolls.
#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform in [0, 1) with full f32 mantissa precision.
    pub fn next_f32(&mut self) -> f32 {
        let v = (self.next_u64() >> 40) as u32;
        (v as f32) / ((1u32 << 24) as f32)
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::new(rand::random::<u64>())
    }
}
