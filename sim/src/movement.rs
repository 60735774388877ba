//! On-foot movement, vehicle entry/exit, and the camera target.

use bevy::prelude::*;

use crate::components::{forward_from_heading, right_from_heading, Mode, WalkCycle};
use crate::vehicle::VehicleState;

pub const FOOT_SPEED: f32 = 0.12;
pub const WALK_CYCLE_RATE: f32 = 10.0;

/// Lateral offset used when stepping out of (or into) the car.
pub const VEHICLE_EXIT_OFFSET: f32 = 2.5;
/// Maximum avatar-to-car distance for entering.
pub const VEHICLE_ENTER_RANGE: f32 = 6.0;

pub const FOOT_CAMERA_DISTANCE: f32 = 6.0;
pub const FOOT_CAMERA_PIVOT_HEIGHT: f32 = 1.5;
pub const CHASE_CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 5.0, 12.0);

/// Move the avatar one tick. `intent` is the raw stick vector
/// (x = strafe right, y = forward); it is normalized and rotated into the
/// camera's yaw frame. The avatar faces the camera yaw while moving.
pub fn apply_on_foot_movement(
    intent: Vec2,
    camera_yaw: f32,
    position: &mut Vec3,
    heading: &mut f32,
    walk: &mut WalkCycle,
    dt: f32,
) {
    if intent.length_squared() < 1e-6 {
        return;
    }
    let direction = (forward_from_heading(camera_yaw) * intent.y
        + right_from_heading(camera_yaw) * intent.x)
        .normalize_or_zero();
    *position += direction * FOOT_SPEED;
    position.y = 0.0;
    *heading = camera_yaw;
    walk.phase += dt * WALK_CYCLE_RATE;
}

/// Step out of the car: the avatar appears beside the driver seat with the
/// car's heading, and the camera yaw is synced so the view does not snap.
pub fn exit_vehicle(
    vehicle: &VehicleState,
    avatar_pos: &mut Vec3,
    avatar_heading: &mut f32,
    camera_yaw: &mut f32,
) {
    *avatar_pos = vehicle.position + right_from_heading(vehicle.heading) * VEHICLE_EXIT_OFFSET;
    avatar_pos.y = 0.0;
    *avatar_heading = vehicle.heading;
    *camera_yaw = vehicle.heading;
}

/// Enter the car if the avatar is close enough. On success the car is
/// re-placed so the avatar's spot becomes the driver seat. Returns false
/// (and changes nothing) when out of range.
pub fn try_enter_vehicle(avatar_pos: Vec3, vehicle: &mut VehicleState) -> bool {
    if (avatar_pos - vehicle.position).length() >= VEHICLE_ENTER_RANGE {
        return false;
    }
    vehicle.position =
        avatar_pos - right_from_heading(vehicle.heading) * VEHICLE_EXIT_OFFSET;
    vehicle.position.y = 0.0;
    true
}

/// Where the renderer's camera should be this tick. Smoothing toward the
/// target is the renderer's concern.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraTarget {
    pub position: Vec3,
    pub look_at: Vec3,
}

pub fn camera_target(
    mode: Mode,
    vehicle: &VehicleState,
    avatar_pos: Vec3,
    yaw: f32,
    pitch: f32,
) -> CameraTarget {
    match mode {
        Mode::Driving => {
            let offset = Quat::from_rotation_y(vehicle.heading) * CHASE_CAMERA_OFFSET;
            CameraTarget {
                position: vehicle.position + offset,
                look_at: vehicle.position + Vec3::Y,
            }
        }
        Mode::OnFoot => {
            let orbit_pitch = (0.25 - pitch * 0.6).clamp(-0.2, 1.3);
            let behind = Vec3::new(yaw.sin(), 0.0, yaw.cos());
            let pivot = avatar_pos + Vec3::Y * FOOT_CAMERA_PIVOT_HEIGHT;
            CameraTarget {
                position: pivot
                    + behind * (FOOT_CAMERA_DISTANCE * orbit_pitch.cos())
                    + Vec3::Y * (FOOT_CAMERA_DISTANCE * orbit_pitch.sin()),
                look_at: pivot,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::forward_from_heading;

    #[test]
    fn diagonal_input_is_normalized() {
        let mut pos = Vec3::ZERO;
        let mut heading = 0.0;
        let mut walk = WalkCycle::default();
        apply_on_foot_movement(
            Vec2::new(1.0, 1.0),
            0.0,
            &mut pos,
            &mut heading,
            &mut walk,
            1.0 / 60.0,
        );
        assert!((pos.length() - FOOT_SPEED).abs() < 1e-5);
    }

    #[test]
    fn movement_is_camera_relative_and_snaps_heading() {
        let yaw = 1.2;
        let mut pos = Vec3::ZERO;
        let mut heading = 0.0;
        let mut walk = WalkCycle::default();
        apply_on_foot_movement(
            Vec2::new(0.0, 1.0),
            yaw,
            &mut pos,
            &mut heading,
            &mut walk,
            1.0 / 60.0,
        );
        let expected = forward_from_heading(yaw) * FOOT_SPEED;
        assert!((pos - expected).length() < 1e-5);
        assert_eq!(heading, yaw);
        assert!(walk.phase > 0.0);
    }

    #[test]
    fn idle_input_moves_nothing() {
        let mut pos = Vec3::new(3.0, 0.0, 4.0);
        let mut heading = 0.5;
        let mut walk = WalkCycle::default();
        apply_on_foot_movement(Vec2::ZERO, 2.0, &mut pos, &mut heading, &mut walk, 1.0 / 60.0);
        assert_eq!(pos, Vec3::new(3.0, 0.0, 4.0));
        assert_eq!(heading, 0.5);
        assert_eq!(walk.phase, 0.0);
    }

    #[test]
    fn exit_places_avatar_beside_the_car() {
        let mut vehicle = VehicleState::at(Vec3::new(10.0, 0.0, -4.0));
        vehicle.heading = 0.9;
        let mut pos = Vec3::ZERO;
        let mut heading = 0.0;
        let mut cam_yaw = 0.0;
        exit_vehicle(&vehicle, &mut pos, &mut heading, &mut cam_yaw);

        let d = (pos - vehicle.position).length();
        assert!((d - VEHICLE_EXIT_OFFSET).abs() < 1e-5);
        assert_eq!(heading, vehicle.heading);
        assert_eq!(cam_yaw, vehicle.heading);
    }

    #[test]
    fn entering_is_gated_on_range() {
        let mut vehicle = VehicleState::at(Vec3::ZERO);
        let before = vehicle;

        assert!(!try_enter_vehicle(Vec3::new(6.5, 0.0, 0.0), &mut vehicle));
        assert_eq!(vehicle, before, "failed entry must not move the car");

        assert!(try_enter_vehicle(Vec3::new(4.0, 0.0, 0.0), &mut vehicle));
    }

    #[test]
    fn exit_then_enter_round_trips_the_car_position() {
        let mut vehicle = VehicleState::at(Vec3::new(7.0, 0.0, 3.0));
        vehicle.heading = -0.4;
        let parked = vehicle.position;

        let mut pos = Vec3::ZERO;
        let mut heading = 0.0;
        let mut cam_yaw = 0.0;
        exit_vehicle(&vehicle, &mut pos, &mut heading, &mut cam_yaw);
        assert!(try_enter_vehicle(pos, &mut vehicle));
        assert!((vehicle.position - parked).length() < 1e-4);
    }

    #[test]
    fn chase_camera_sits_behind_the_car() {
        let mut vehicle = VehicleState::at(Vec3::new(0.0, 0.0, 0.0));
        vehicle.heading = 0.0;
        let target = camera_target(Mode::Driving, &vehicle, Vec3::ZERO, 0.0, 0.0);
        // Heading 0 faces -Z, so the camera hangs back at +Z.
        assert!(target.position.z > 0.0);
        assert!(target.position.y > 0.0);
        assert_eq!(target.look_at, Vec3::Y);
    }
}
