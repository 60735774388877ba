//! Arcade vehicle physics.
//!
//! One step per fixed tick: throttle and brake shape a scalar speed,
//! steering accumulates into a [-1, 1] bias that decays without input,
//! and heading authority scales with speed so a parked car cannot spin.

use bevy::prelude::*;

use crate::components::forward_from_heading;

pub const MAX_SPEED: f32 = 1.6;
/// Reverse is capped at this fraction of MAX_SPEED.
pub const MAX_REVERSE_FACTOR: f32 = 0.8;
pub const ACCELERATION: f32 = 0.025;
pub const COAST_DECEL: f32 = 0.012;
pub const BRAKE_DECEL: f32 = 0.06;
pub const TURN_RATE: f32 = 0.045;
pub const STEER_STEP: f32 = 0.05;
pub const STEER_DECAY: f32 = 0.85;
/// Speeds below this count as stopped.
pub const SPEED_EPSILON: f32 = 0.01;

/// Marker for the player's car.
#[derive(Component)]
pub struct Vehicle;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct VehicleState {
    pub position: Vec3,
    pub heading: f32,
    /// Signed scalar speed along the heading, units per tick.
    pub speed: f32,
    /// Accumulated steering bias in [-1, 1].
    pub steering: f32,
}

impl VehicleState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            heading: 0.0,
            speed: 0.0,
            steering: 0.0,
        }
    }

    /// Park at the origin with everything zeroed (player respawn).
    pub fn reset(&mut self) {
        *self = Self::at(Vec3::ZERO);
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_heading(self.heading)
    }
}

/// Per-tick driving input. `throttle` is -1/0/1, `steer` is -1/0/1
/// (positive = left).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VehicleInput {
    pub throttle: f32,
    pub steer: f32,
    pub brake: bool,
}

/// Advance the vehicle by one tick.
pub fn step_vehicle(state: &mut VehicleState, input: &VehicleInput) {
    // Longitudinal: throttle, else coast toward zero.
    if input.throttle > 0.0 {
        state.speed = (state.speed + ACCELERATION).min(MAX_SPEED);
    } else if input.throttle < 0.0 {
        state.speed = (state.speed - ACCELERATION).max(-MAX_SPEED * MAX_REVERSE_FACTOR);
    } else if state.speed > 0.0 {
        state.speed = (state.speed - COAST_DECEL).max(0.0);
    } else if state.speed < 0.0 {
        state.speed = (state.speed + COAST_DECEL).min(0.0);
    }

    if input.brake {
        state.speed += if state.speed > 0.0 {
            -BRAKE_DECEL
        } else {
            BRAKE_DECEL
        };
        if state.speed.abs() < SPEED_EPSILON {
            state.speed = 0.0;
        }
    }

    // Steering bias: build while held, bleed off when released.
    if input.steer > 0.0 {
        state.steering = (state.steering + STEER_STEP).min(1.0);
    } else if input.steer < 0.0 {
        state.steering = (state.steering - STEER_STEP).max(-1.0);
    } else {
        state.steering *= STEER_DECAY;
    }

    // Heading authority scales with |speed| and flips sense in reverse.
    if state.speed.abs() > SPEED_EPSILON {
        let gear = if state.speed >= 0.0 { 1.0 } else { -1.0 };
        state.heading += state.steering * TURN_RATE * (state.speed / MAX_SPEED) * gear;
    }

    state.position += state.forward() * state.speed;
    state.position.y = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_speed_saturates_at_max() {
        let mut state = VehicleState::at(Vec3::ZERO);
        let input = VehicleInput {
            throttle: 1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            step_vehicle(&mut state, &input);
            assert!(state.speed <= MAX_SPEED);
        }
        assert_eq!(state.speed, MAX_SPEED);
    }

    #[test]
    fn reverse_speed_saturates_at_its_own_cap() {
        let mut state = VehicleState::at(Vec3::ZERO);
        let input = VehicleInput {
            throttle: -1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            step_vehicle(&mut state, &input);
        }
        assert!((state.speed + MAX_SPEED * MAX_REVERSE_FACTOR).abs() < 1e-5);
    }

    #[test]
    fn coasting_bleeds_speed_to_exactly_zero() {
        let mut state = VehicleState::at(Vec3::ZERO);
        state.speed = MAX_SPEED;
        let input = VehicleInput::default();
        for _ in 0..300 {
            step_vehicle(&mut state, &input);
        }
        assert_eq!(state.speed, 0.0);
    }

    #[test]
    fn braking_stops_without_oscillating_through_zero() {
        let mut state = VehicleState::at(Vec3::ZERO);
        state.speed = 0.5;
        let input = VehicleInput {
            brake: true,
            ..Default::default()
        };
        for _ in 0..60 {
            step_vehicle(&mut state, &input);
        }
        assert_eq!(state.speed, 0.0);
    }

    #[test]
    fn steering_decays_toward_zero_when_released() {
        let mut state = VehicleState::at(Vec3::ZERO);
        state.steering = 1.0;
        let input = VehicleInput::default();
        let mut previous = state.steering;
        for _ in 0..60 {
            step_vehicle(&mut state, &input);
            assert!(state.steering.abs() <= previous.abs());
            previous = state.steering;
        }
        assert!(state.steering.abs() < 0.001);
    }

    #[test]
    fn no_heading_authority_while_stopped() {
        let mut state = VehicleState::at(Vec3::ZERO);
        state.steering = 1.0;
        let heading_before = state.heading;
        step_vehicle(
            &mut state,
            &VehicleInput {
                steer: 1.0,
                ..Default::default()
            },
        );
        // One steer tick from rest moves speed by nothing, so the heading
        // must not change.
        assert_eq!(state.heading, heading_before);
    }

    #[test]
    fn heading_follows_steering_sign_in_both_gears() {
        let forward_turn = {
            let mut state = VehicleState::at(Vec3::ZERO);
            let input = VehicleInput {
                throttle: 1.0,
                steer: 1.0,
                brake: false,
            };
            for _ in 0..60 {
                step_vehicle(&mut state, &input);
            }
            state.heading
        };
        let reverse_turn = {
            let mut state = VehicleState::at(Vec3::ZERO);
            let input = VehicleInput {
                throttle: -1.0,
                steer: 1.0,
                brake: false,
            };
            for _ in 0..60 {
                step_vehicle(&mut state, &input);
            }
            state.heading
        };
        // The sign(speed) factor cancels the negative speed, so the nose
        // swings the same way; travel direction is what flips.
        assert!(forward_turn > 0.0);
        assert!(reverse_turn > 0.0);
    }

    #[test]
    fn position_advances_along_the_heading() {
        let mut state = VehicleState::at(Vec3::ZERO);
        state.speed = 1.0;
        step_vehicle(&mut state, &VehicleInput::default());
        let expected = forward_from_heading(state.heading) * state.speed;
        assert!((state.position - expected).length() < 0.05);
        assert_eq!(state.position.y, 0.0);
    }
}
