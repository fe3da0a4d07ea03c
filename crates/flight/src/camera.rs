//! Chase camera that trails the aircraft.

use engine_core::Transform;
use glam::Vec3;

/// Camera offset in the aircraft's local frame: above and behind.
pub const CHASE_OFFSET: Vec3 = Vec3::new(0.0, 2.0, -8.0);

/// Place the camera behind the aircraft, following its rotation, looking at it.
pub fn chase_camera(aircraft: &Transform) -> Transform {
    let mut camera = Transform::from_position(aircraft.local_to_world(CHASE_OFFSET));
    camera.look_at(aircraft.position, Vec3::Y);
    camera
}
