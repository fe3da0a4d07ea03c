//! World offset accumulator: how far the aircraft has conceptually travelled.
//!
//! The aircraft stays near the origin; terrain is resampled at `local + offset`
//! and particles are moved opposite to the per-tick offset delta.

use glam::Vec3;
use std::ops::Sub;

/// Negative of the aircraft's conceptual world position, on the terrain's sampling axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldOffset {
    pub x: f32,
    pub z: f32,
    pub y: f32,
}

impl WorldOffset {
    pub const ZERO: Self = Self {
        x: 0.0,
        z: 0.0,
        y: 0.0,
    };

    pub fn new(x: f32, z: f32, y: f32) -> Self {
        Self { x, z, y }
    }

    /// Advance by the aircraft's forward direction.
    ///
    /// The z axis is inverted because the terrain grid's second axis runs along
    /// world -Z; the y axis is inverted so that climbing lowers the terrain.
    pub fn advance(&mut self, forward: Vec3, speed: f32) {
        self.x += forward.x * speed;
        self.z -= forward.z * speed;
        self.y -= forward.y * speed;
    }
}

/// Change in offset over one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OffsetDelta {
    pub x: f32,
    pub z: f32,
    pub y: f32,
}

impl OffsetDelta {
    /// World-space displacement to apply to a free-floating entity, scaled by `move_speed`.
    pub fn entity_shift(&self, move_speed: f32) -> Vec3 {
        Vec3::new(-self.x, self.y, self.z) * move_speed
    }
}

impl Sub for WorldOffset {
    type Output = OffsetDelta;

    fn sub(self, rhs: Self) -> OffsetDelta {
        OffsetDelta {
            x: self.x - rhs.x,
            z: self.z - rhs.z,
            y: self.y - rhs.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_and_level_flight_moves_z_negative() {
        let mut offset = WorldOffset::ZERO;
        offset.advance(Vec3::Z, 0.5);
        assert_eq!(offset, WorldOffset::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn climbing_lowers_vertical_offset() {
        let mut offset = WorldOffset::ZERO;
        let climb = Vec3::new(0.0, 0.6, 0.8);
        offset.advance(climb, 1.0);
        assert!((offset.y + 0.6).abs() < 1e-6);
        assert!((offset.z + 0.8).abs() < 1e-6);
    }

    #[test]
    fn entities_drift_opposite_to_travel() {
        let before = WorldOffset::ZERO;
        let mut after = before;
        after.advance(Vec3::new(1.0, 0.0, 1.0).normalize(), 2.0);
        let shift = (after - before).entity_shift(1.0);
        // Flying toward +x/+z pushes the world toward -x/-z.
        assert!(shift.x < 0.0 && shift.z < 0.0);
        assert_eq!(shift.y, 0.0);
    }
}
