//! Input-intent boundary.
//!
//! An input collaborator (window layer, replay driver, tests) writes a
//! `PlayerIntent` between ticks; the simulation consumes it in
//! `FixedUpdate`. Discrete flags are cleared by the system that handles
//! them, so each press acts exactly once.

use bevy::prelude::*;

pub const MOUSE_SENSITIVITY: f32 = 0.002;
pub const PITCH_MIN: f32 = -1.2;
pub const PITCH_MAX: f32 = 0.5;

#[derive(Resource, Default, Clone, Debug)]
pub struct PlayerIntent {
    // Held movement keys.
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub brake: bool,
    /// Accumulated mouse motion since the last tick.
    pub look_delta: Vec2,
    // Discrete, consumed-on-use.
    pub fire: bool,
    pub reload: bool,
    pub toggle_mode: bool,
    pub exit: bool,
}

impl PlayerIntent {
    /// Throttle axis for driving: +1 forward, -1 reverse.
    pub fn throttle_axis(&self) -> f32 {
        (self.forward as i32 - self.backward as i32) as f32
    }

    /// Steering axis: +1 left, -1 right.
    pub fn steer_axis(&self) -> f32 {
        (self.left as i32 - self.right as i32) as f32
    }

    /// On-foot stick vector: x = strafe right, y = forward.
    pub fn move_axes(&self) -> Vec2 {
        Vec2::new(
            (self.right as i32 - self.left as i32) as f32,
            (self.forward as i32 - self.backward as i32) as f32,
        )
    }
}

/// Camera yaw/pitch driven by the look delta.
#[derive(Resource, Clone, Copy, Debug)]
pub struct CameraRig {
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: -0.25,
        }
    }
}

/// Fold the accumulated look delta into the rig, then clear it.
pub fn apply_look_input(mut intent: ResMut<PlayerIntent>, mut rig: ResMut<CameraRig>) {
    if intent.look_delta == Vec2::ZERO {
        return;
    }
    rig.yaw -= intent.look_delta.x * MOUSE_SENSITIVITY;
    rig.pitch = (rig.pitch - intent.look_delta.y * MOUSE_SENSITIVITY).clamp(PITCH_MIN, PITCH_MAX);
    intent.look_delta = Vec2::ZERO;
}
