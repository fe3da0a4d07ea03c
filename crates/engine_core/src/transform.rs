//! Transform component and utilities for spatial positioning.

use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Get the forward direction. Models are authored nose-along positive Z.
    pub fn forward(&self) -> Vec3 {
        (self.rotation * Vec3::Z).normalize()
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotate around an axis expressed in this transform's local frame.
    pub fn rotate_on_axis(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (self.rotation * Quat::from_axis_angle(axis, angle)).normalize();
    }

    /// Rotate around an axis expressed in world space.
    pub fn rotate_on_world_axis(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (Quat::from_axis_angle(axis, angle) * self.rotation).normalize();
    }

    /// Map a point given in this transform's local frame (ignoring scale) to world space.
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Look at a target position.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() > 0.0001 {
            self.rotation = Quat::from_mat4(&Mat4::look_at_rh(self.position, target, up)).inverse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn local_roll_keeps_forward_axis() {
        let mut t = Transform::default();
        t.rotate_on_world_axis(Vec3::Y, 0.7);
        let before = t.forward();
        t.rotate_on_axis(Vec3::Z, 0.4);
        assert!((t.forward() - before).length() < 1e-5);
    }

    #[test]
    fn world_yaw_turns_nose_toward_positive_x() {
        let mut t = Transform::default();
        t.rotate_on_world_axis(Vec3::Y, FRAC_PI_2);
        assert!((t.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn local_offset_follows_rotation() {
        let mut t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        t.rotate_on_world_axis(Vec3::Y, FRAC_PI_2);
        let p = t.local_to_world(Vec3::new(0.0, 0.0, -1.0));
        assert!((p - Vec3::new(0.0, 2.0, 3.0)).length() < 1e-5);
    }
}
