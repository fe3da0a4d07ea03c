//! Roll/pitch/yaw control without Euler drift.
//!
//! The stored roll and pitch are the authority. Each tick they are eased toward
//! a key-dependent target and only the *change* is applied to the aircraft's
//! quaternion about its local axes. Yaw is a fixed-rate turn about world up
//! while banking.

use engine_core::Transform;
use glam::Vec3;
use input::KeySnapshot;
use std::f32::consts::TAU;

use crate::config::ControlsConfig;

/// Local axis the aircraft rolls about (nose direction).
const ROLL_AXIS: Vec3 = Vec3::Z;
/// Local axis the aircraft pitches about (wing direction).
const PITCH_AXIS: Vec3 = Vec3::X;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Angles owned by the simulation and threaded through each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationState {
    pub roll: f32,
    pub pitch: f32,
    /// Accumulated heading in [0, 2π). Zero faces +Z.
    pub yaw: f32,
}

/// Result of one roll step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollUpdate {
    pub roll: f32,
    /// World-up rotation to apply this tick.
    pub yaw_delta: f32,
}

#[derive(Debug, Clone)]
pub struct OrientationController {
    config: ControlsConfig,
}

impl OrientationController {
    pub fn new(config: ControlsConfig) -> Self {
        Self { config }
    }

    pub fn active_rate(&self) -> f32 {
        self.config.move_speed * 2.0
    }

    pub fn return_rate(&self) -> f32 {
        self.config.move_speed * 3.0
    }

    /// Ease `current` toward `target`, snapping once within the settle epsilon.
    fn ease(&self, current: f32, target: f32, rate: f32) -> f32 {
        let next = lerp(current, target, rate);
        if (next - target).abs() < self.config.settle_epsilon {
            target
        } else {
            next
        }
    }

    /// Exactly one of the two keys selects a target; neither or both levels out.
    fn step(&self, negative: bool, positive: bool, current: f32, max: f32) -> f32 {
        match (negative, positive) {
            (true, false) => self.ease(current, -max, self.active_rate()),
            (false, true) => self.ease(current, max, self.active_rate()),
            _ => self.ease(current, 0.0, self.return_rate()),
        }
    }

    /// Roll left banks negative and yaws left (+); roll right the opposite.
    pub fn update_roll(&self, held_left: bool, held_right: bool, current_roll: f32) -> RollUpdate {
        let roll = self.step(held_left, held_right, current_roll, self.config.max_roll);
        let yaw_delta = match (held_left, held_right) {
            (true, false) => self.config.move_speed,
            (false, true) => -self.config.move_speed,
            _ => 0.0,
        };
        RollUpdate { roll, yaw_delta }
    }

    /// Pitch forward targets `-max_pitch` (nose up), pitch back `+max_pitch`.
    pub fn update_pitch(&self, held_forward: bool, held_back: bool, current_pitch: f32) -> f32 {
        self.step(held_forward, held_back, current_pitch, self.config.max_pitch)
    }

    /// Advance `state` one tick and rotate the aircraft by the resulting deltas.
    pub fn apply(&self, keys: &KeySnapshot, state: &mut OrientationState, transform: &mut Transform) {
        let roll = self.update_roll(keys.roll_left, keys.roll_right, state.roll);
        transform.rotate_on_axis(ROLL_AXIS, roll.roll - state.roll);
        state.roll = roll.roll;

        if roll.yaw_delta != 0.0 {
            transform.rotate_on_world_axis(Vec3::Y, roll.yaw_delta);
            state.yaw = (state.yaw + roll.yaw_delta).rem_euclid(TAU);
        }

        let pitch = self.update_pitch(keys.pitch_forward, keys.pitch_back, state.pitch);
        transform.rotate_on_axis(PITCH_AXIS, pitch - state.pitch);
        state.pitch = pitch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    fn controller() -> OrientationController {
        OrientationController::new(ControlsConfig::default())
    }

    #[test]
    fn one_tick_of_roll_left_from_level() {
        let update = controller().update_roll(true, false, 0.0);
        let expected = lerp(0.0, -FRAC_PI_4, 0.03);
        assert!((update.roll - expected).abs() < 1e-7);
        assert!((update.roll + 0.0236).abs() < 1e-4);
        assert_eq!(update.yaw_delta, 0.015);
    }

    #[test]
    fn released_pitch_returns_at_faster_rate() {
        let pitch = controller().update_pitch(false, false, 0.2);
        assert!((pitch - lerp(0.2, 0.0, 0.045)).abs() < 1e-7);
        assert!((pitch - 0.191).abs() < 1e-3);
    }

    #[test]
    fn return_rate_is_one_and_a_half_times_active() {
        let c = controller();
        assert!((c.return_rate() / c.active_rate() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn angles_never_leave_limits() {
        let c = controller();
        let patterns = [
            (true, false),
            (false, true),
            (true, true),
            (false, false),
        ];
        let mut roll = 0.0;
        let mut pitch = 0.0;
        for i in 0..5000 {
            let (a, b) = patterns[(i / 37 + i % 3) % patterns.len()];
            roll = c.update_roll(a, b, roll).roll;
            pitch = c.update_pitch(b, a, pitch);
            assert!(roll.abs() <= FRAC_PI_4, "roll {roll} at tick {i}");
            assert!(pitch.abs() <= FRAC_PI_4, "pitch {pitch} at tick {i}");
        }
    }

    #[test]
    fn holding_converges_to_limit() {
        let c = controller();
        let mut roll = 0.0;
        for _ in 0..2000 {
            roll = c.update_roll(false, true, roll).roll;
        }
        assert_eq!(roll, FRAC_PI_4);
    }

    #[test]
    fn release_returns_monotonically_to_level() {
        let c = controller();
        let mut roll = 0.0;
        for _ in 0..200 {
            roll = c.update_roll(true, false, roll).roll;
        }
        assert!(roll < -0.5);

        let mut ticks = 0;
        while roll != 0.0 {
            let next = c.update_roll(false, false, roll).roll;
            assert!(next >= roll, "moved away from level");
            assert!(next <= 0.0, "overshot level");
            roll = next;
            ticks += 1;
            assert!(ticks < 1000, "did not settle");
        }
    }

    #[test]
    fn both_keys_level_out_without_yaw() {
        let update = controller().update_roll(true, true, 0.3);
        assert!((update.roll - lerp(0.3, 0.0, 0.045)).abs() < 1e-7);
        assert_eq!(update.yaw_delta, 0.0);
    }

    #[test]
    fn apply_rotates_by_deltas_only() {
        let c = controller();
        let mut state = OrientationState::default();
        let mut transform = Transform::default();
        let keys = KeySnapshot {
            roll_left: true,
            ..Default::default()
        };
        for _ in 0..60 {
            c.apply(&keys, &mut state, &mut transform);
        }
        let level = KeySnapshot::default();
        for _ in 0..1000 {
            c.apply(&level, &mut state, &mut transform);
        }
        assert_eq!(state.roll, 0.0);
        assert_eq!(state.pitch, 0.0);

        // Back to wings level: the remaining rotation is the pure heading change.
        let heading = glam::Quat::from_rotation_y(state.yaw);
        assert!(transform.rotation.angle_between(heading) < 1e-3);
        assert!((state.yaw - 60.0 * 0.015).abs() < 1e-5);
    }

    #[test]
    fn pitch_forward_raises_the_nose() {
        let c = controller();
        let mut state = OrientationState::default();
        let mut transform = Transform::default();
        let keys = KeySnapshot {
            pitch_forward: true,
            ..Default::default()
        };
        for _ in 0..30 {
            c.apply(&keys, &mut state, &mut transform);
        }
        assert!(state.pitch < 0.0);
        assert!(transform.forward().y > 0.0);
    }
}
