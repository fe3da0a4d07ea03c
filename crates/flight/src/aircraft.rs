//! The aircraft as seen by the simulation: a named scene entity that may not exist yet.
//!
//! Model loading happens elsewhere and resolves at most once. Until then the
//! simulation holds `None` and every aircraft-dependent step is skipped.

use engine_core::{rgb_hex, Entity, Renderable, Scene, Transform};
use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

pub const AIRCRAFT_NAME: &str = "airplane";
pub const SPOTLIGHT_NAME: &str = "spotlight";
pub const LIGHT_CONE_NAME: &str = "lightCone";

const FLASHLIGHT_COLOR: u32 = 0xefc576;

/// What the asset loader hands back once the model is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftModel {
    /// Mount the nose spotlight and its visible cone.
    pub spotlight: bool,
    pub spotlight_range: f32,
    pub cone_radius: f32,
    pub cone_height: f32,
    pub cone_opacity: f32,
}

impl Default for AircraftModel {
    fn default() -> Self {
        Self {
            spotlight: true,
            spotlight_range: 50.0,
            cone_radius: 8.0,
            cone_height: 20.0,
            cone_opacity: 0.08,
        }
    }
}

/// Start a background "load" that delivers the model after `delay`.
///
/// The receiver yields exactly one model, or disconnects if the loader dies.
pub fn spawn_loader(model: AircraftModel, delay: Duration) -> Receiver<AircraftModel> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        thread::sleep(delay);
        if sender.send(model).is_err() {
            log::debug!("aircraft loader finished after the session ended");
        }
    });
    receiver
}

/// Pose the particle fields need from the aircraft each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AircraftPose {
    pub transform: Transform,
    /// Stored heading; used instead of decomposing the rotation.
    pub yaw: f32,
}

/// Reference to the loaded aircraft in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AircraftHandle {
    entity: Entity,
}

impl AircraftHandle {
    /// Add the aircraft at the origin, plus spotlight and light cone children if requested.
    pub fn attach(scene: &mut Scene, model: &AircraftModel) -> Self {
        let entity = scene.add_named(AIRCRAFT_NAME, Transform::default(), Renderable::Aircraft);

        if model.spotlight {
            let color = rgb_hex(FLASHLIGHT_COLOR);
            scene.add_child(
                entity,
                SPOTLIGHT_NAME,
                Transform::from_position(Vec3::new(0.0, 0.25, 1.25)),
                Renderable::Spotlight {
                    color,
                    range: model.spotlight_range,
                },
            );
            // Cone apex is +Y; lay it along the nose with the apex back at the spotlight.
            let cone = scene.add_child(
                entity,
                LIGHT_CONE_NAME,
                Transform::from_position_rotation(
                    Vec3::new(0.0, 0.25, 11.0),
                    Quat::from_rotation_x(-FRAC_PI_2),
                ),
                Renderable::LightCone {
                    radius: model.cone_radius,
                    height: model.cone_height,
                    color,
                },
            );
            scene.set_opacity(cone, model.cone_opacity);
        }

        log::info!("Aircraft attached (spotlight: {})", model.spotlight);
        Self { entity }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn transform(&self, scene: &Scene) -> Option<Transform> {
        scene.transform(self.entity)
    }

    pub fn set_transform(&self, scene: &mut Scene, transform: Transform) {
        scene.set_transform(self.entity, transform);
    }

    /// Flip the spotlight and cone visibility. Returns the new state of whichever
    /// was found, or `None` if the model has no flashlight.
    pub fn toggle_flashlight(&self, scene: &mut Scene) -> Option<bool> {
        let mut state = None;
        for name in [SPOTLIGHT_NAME, LIGHT_CONE_NAME] {
            if let Some(part) = scene.find_descendant(self.entity, name) {
                let visible = !scene.is_visible(part);
                scene.set_visible(part, visible);
                state = Some(visible);
            }
        }
        if let Some(on) = state {
            log::debug!("Flashlight {}", if on { "on" } else { "off" });
        }
        state
    }

    /// Whether the flashlight cone is currently shown.
    pub fn flashlight_on(&self, scene: &Scene) -> bool {
        scene
            .find_descendant(self.entity, LIGHT_CONE_NAME)
            .is_some_and(|cone| scene.is_visible(cone))
    }
}
