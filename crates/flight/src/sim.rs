//! One simulation: world state plus the per-tick update order.
//!
//! Tick order: speed keys, then (with an aircraft) orientation, flashlight and
//! offset advance, then terrain resample, particle fields and the chase camera.

use engine_core::{ConfigError, OffsetDelta, Scene, Transform, WorldOffset};
use input::KeySnapshot;
use procgen::{NoiseField, TerrainMesh};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::aircraft::{AircraftHandle, AircraftModel, AircraftPose};
use crate::camera::chase_camera;
use crate::clouds::CloudField;
use crate::config::FlightConfig;
use crate::orientation::{OrientationController, OrientationState};
use crate::trail::TrailField;

/// What happened during one tick, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub offset: WorldOffset,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub speed_multiplier: f32,
    pub clouds: usize,
    pub trail: usize,
    pub aircraft_present: bool,
    pub flashlight_on: bool,
}

pub struct Simulation {
    config: FlightConfig,
    noise: NoiseField,
    scene: Scene,
    terrain: TerrainMesh,
    offset: WorldOffset,
    orientation: OrientationState,
    controller: OrientationController,
    speed_multiplier: f32,
    aircraft: Option<AircraftHandle>,
    clouds: CloudField,
    trail: TrailField,
    camera: Option<Transform>,
    rng: StdRng,
    ticks: u64,
}

impl Simulation {
    /// Validate `config`, build the terrain at the origin and seed the cloud field.
    pub fn new(config: FlightConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let noise = NoiseField::new(config.seed);
        let offset = WorldOffset::ZERO;
        let terrain = TerrainMesh::create(config.terrain.clone(), &noise, &offset);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut scene = Scene::new();
        let mut clouds = CloudField::new(config.clouds.clone());
        clouds.initialize(&mut scene, &mut rng);

        log::info!(
            "Simulation ready: seed {:#x}, {} terrain vertices, {} clouds",
            config.seed,
            terrain.vertex_count(),
            clouds.len()
        );

        Ok(Self {
            controller: OrientationController::new(config.controls.clone()),
            speed_multiplier: config.speed.multiplier,
            trail: TrailField::new(config.trail.clone()),
            noise,
            scene,
            terrain,
            offset,
            orientation: OrientationState::default(),
            aircraft: None,
            clouds,
            camera: None,
            rng,
            ticks: 0,
            config,
        })
    }

    /// Put the loaded model into the scene. A second call is ignored.
    pub fn attach_aircraft(&mut self, model: &AircraftModel) -> AircraftHandle {
        if let Some(handle) = self.aircraft {
            log::warn!("Aircraft already attached, ignoring second load");
            return handle;
        }
        let handle = AircraftHandle::attach(&mut self.scene, model);
        self.aircraft = Some(handle);
        handle
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn terrain(&self) -> &TerrainMesh {
        &self.terrain
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn offset(&self) -> WorldOffset {
        self.offset
    }

    pub fn orientation(&self) -> OrientationState {
        self.orientation
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn aircraft(&self) -> Option<AircraftHandle> {
        self.aircraft
    }

    pub fn clouds(&self) -> &CloudField {
        &self.clouds
    }

    pub fn trail(&self) -> &TrailField {
        &self.trail
    }

    pub fn camera(&self) -> Option<Transform> {
        self.camera
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current aircraft pose, if it has loaded.
    pub fn aircraft_pose(&self) -> Option<AircraftPose> {
        let transform = self.aircraft?.transform(&self.scene)?;
        Some(AircraftPose {
            transform,
            yaw: self.orientation.yaw,
        })
    }

    /// Advance one tick with the given key snapshot at `now_ms` since session start.
    pub fn tick(&mut self, keys: KeySnapshot, now_ms: u64) -> TickReport {
        let speed = &self.config.speed;
        let multiplier = speed.adjust(self.speed_multiplier, keys.speed_up, keys.speed_down);
        if multiplier != self.speed_multiplier {
            log::info!("Speed multiplier {:.1} -> {:.1}", self.speed_multiplier, multiplier);
            self.speed_multiplier = multiplier;
        }

        let previous = self.offset;
        if let Some(handle) = self.aircraft {
            self.fly(handle, &keys);
        }
        let delta: OffsetDelta = self.offset - previous;

        self.terrain.resample(&self.noise, &self.offset);

        let pose = self.aircraft_pose();
        self.clouds
            .tick(&mut self.scene, pose.as_ref(), &delta, &mut self.rng);
        self.trail.tick(
            &mut self.scene,
            pose.as_ref(),
            &delta,
            now_ms,
            &self.noise,
            &mut self.rng,
        );
        self.camera = pose.map(|p| chase_camera(&p.transform));

        self.ticks += 1;
        self.report()
    }

    fn fly(&mut self, handle: AircraftHandle, keys: &KeySnapshot) {
        let Some(mut transform) = handle.transform(&self.scene) else {
            return;
        };
        self.controller
            .apply(keys, &mut self.orientation, &mut transform);
        handle.set_transform(&mut self.scene, transform);

        if keys.flashlight_toggled {
            if let Some(on) = handle.toggle_flashlight(&mut self.scene) {
                log::info!("Flashlight {}", if on { "on" } else { "off" });
                if self.config.trail.clear_on_flashlight_toggle {
                    self.trail.clear(&mut self.scene);
                }
            }
        }

        let speed = self.config.speed.base_speed * self.speed_multiplier;
        self.offset.advance(transform.forward(), speed);
    }

    /// State summary without advancing.
    pub fn report(&self) -> TickReport {
        TickReport {
            tick: self.ticks,
            offset: self.offset,
            roll: self.orientation.roll,
            pitch: self.orientation.pitch,
            yaw: self.orientation.yaw,
            speed_multiplier: self.speed_multiplier,
            clouds: self.clouds.len(),
            trail: self.trail.len(),
            aircraft_present: self.aircraft.is_some(),
            flashlight_on: self
                .aircraft
                .is_some_and(|a| a.flashlight_on(&self.scene)),
        }
    }
}
