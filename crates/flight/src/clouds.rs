//! Ambient clouds: a capped population recycled by distance from the origin.
//!
//! Clouds drift opposite to the aircraft's travel, fade out through a band
//! that ends at the spawn distance, are removed past the despawn distance, and
//! are replaced ahead of the aircraft's heading.

use engine_core::{Entity, OffsetDelta, Puff, Renderable, Scene, Transform};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use crate::aircraft::AircraftPose;
use crate::config::CloudConfig;

/// A single cloud cluster.
#[derive(Debug, Clone)]
pub struct Cloud {
    pub entity: Entity,
    pub position: Vec3,
    /// 0 = fully visible, 1 = fully faded.
    pub fade_progress: f32,
    pub opacity: f32,
}

impl Cloud {
    /// Distance from the origin in the horizontal plane.
    pub fn horizontal_distance(&self) -> f32 {
        Vec3::new(self.position.x, 0.0, self.position.z).length()
    }
}

/// Random 3-5 main puffs in a ring plus 2-4 smaller detail puffs.
fn puff_cluster<R: Rng>(base_radius: f32, rng: &mut R) -> Vec<Puff> {
    let main = rng.gen_range(3..=5);
    let details = rng.gen_range(2..=4);
    let mut puffs = Vec::with_capacity(main + details);

    for i in 0..main {
        let angle = i as f32 / main as f32 * TAU;
        let ring = base_radius * 0.5;
        puffs.push(Puff {
            offset: Vec3::new(
                angle.cos() * ring + (rng.gen::<f32>() - 0.5) * 1.5,
                (rng.gen::<f32>() - 0.5) * 1.0,
                angle.sin() * ring + (rng.gen::<f32>() - 0.5) * 1.5,
            ),
            radius: base_radius,
        });
    }
    for _ in 0..details {
        puffs.push(Puff {
            offset: Vec3::new(
                (rng.gen::<f32>() - 0.5) * 3.0,
                (rng.gen::<f32>() - 0.5) * 1.5,
                (rng.gen::<f32>() - 0.5) * 3.0,
            ),
            radius: base_radius * 0.6,
        });
    }
    puffs
}

pub struct CloudField {
    clouds: Vec<Cloud>,
    config: CloudConfig,
}

impl CloudField {
    pub fn new(config: CloudConfig) -> Self {
        Self {
            clouds: Vec::with_capacity(config.max_clouds),
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// Fade progress for a horizontal distance: 0 inside the band, 1 at its outer edge.
    pub fn fade_at(&self, distance: f32) -> f32 {
        let fade_start = self.config.spawn_distance - self.config.fade_distance;
        ((distance - fade_start) / self.config.fade_distance).clamp(0.0, 1.0)
    }

    fn refresh_fade(&self, cloud: &mut Cloud, scene: &mut Scene) {
        cloud.fade_progress = self.fade_at(cloud.horizontal_distance());
        cloud.opacity = self.config.base_opacity * (1.0 - cloud.fade_progress);
        scene.set_opacity(cloud.entity, cloud.opacity);
    }

    /// Add one cloud at `position`. Returns `None` when the population is full.
    pub fn spawn<R: Rng>(&mut self, scene: &mut Scene, position: Vec3, rng: &mut R) -> Option<Entity> {
        if self.clouds.len() >= self.config.max_clouds {
            return None;
        }
        let puffs = puff_cluster(self.config.puff_radius, rng);
        let entity = scene.add(Transform::from_position(position), Renderable::Cloud { puffs });
        let mut cloud = Cloud {
            entity,
            position,
            fade_progress: 0.0,
            opacity: 0.0,
        };
        self.refresh_fade(&mut cloud, scene);
        self.clouds.push(cloud);
        Some(entity)
    }

    fn random_height<R: Rng>(&self, rng: &mut R) -> f32 {
        self.config.min_height + rng.gen::<f32>() * (self.config.max_height - self.config.min_height)
    }

    /// Fill the population uniformly over the initial disc.
    pub fn initialize<R: Rng>(&mut self, scene: &mut Scene, rng: &mut R) {
        while self.clouds.len() < self.config.max_clouds {
            let angle = rng.gen::<f32>() * TAU;
            let radius = rng.gen::<f32>() * self.config.initial_radius;
            let position = Vec3::new(angle.cos() * radius, self.random_height(rng), angle.sin() * radius);
            self.spawn(scene, position, rng);
        }
        log::debug!("Seeded {} clouds", self.clouds.len());
    }

    /// Spawn a replacement at the spawn distance, within the angular spread around `yaw`.
    pub fn spawn_ahead<R: Rng>(&mut self, scene: &mut Scene, yaw: f32, rng: &mut R) -> Option<Entity> {
        let angle = yaw + (rng.gen::<f32>() - 0.5) * self.config.spawn_spread;
        let r = self.config.spawn_distance;
        let jitter = self.config.spawn_jitter;
        let position = Vec3::new(
            angle.sin() * r + (rng.gen::<f32>() - 0.5) * jitter,
            self.random_height(rng),
            angle.cos() * r + (rng.gen::<f32>() - 0.5) * jitter,
        );
        self.spawn(scene, position, rng)
    }

    /// Move, fade, cull, then top up. No-op without an aircraft.
    pub fn tick<R: Rng>(
        &mut self,
        scene: &mut Scene,
        aircraft: Option<&AircraftPose>,
        delta: &OffsetDelta,
        rng: &mut R,
    ) {
        let Some(aircraft) = aircraft else {
            return;
        };

        let shift = delta.entity_shift(self.config.move_speed);
        let mut clouds = std::mem::take(&mut self.clouds);
        for cloud in &mut clouds {
            cloud.position += shift;
            scene.set_position(cloud.entity, cloud.position);
            self.refresh_fade(cloud, scene);
        }

        let despawn = self.config.despawn_distance;
        clouds.retain(|cloud| {
            if cloud.horizontal_distance() > despawn {
                scene.remove(cloud.entity);
                false
            } else {
                true
            }
        });
        self.clouds = clouds;

        let before = self.clouds.len();
        while self.clouds.len() < self.config.max_clouds {
            if self.spawn_ahead(scene, aircraft.yaw, rng).is_none() {
                break;
            }
        }
        if self.clouds.len() != before {
            log::trace!("Spawned {} clouds ahead", self.clouds.len() - before);
        }
    }

    /// Remove every cloud from the scene.
    pub fn clear(&mut self, scene: &mut Scene) {
        for cloud in self.clouds.drain(..) {
            scene.remove(cloud.entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pose(yaw: f32) -> AircraftPose {
        AircraftPose {
            transform: Transform::default(),
            yaw,
        }
    }

    fn forward_delta(distance: f32) -> OffsetDelta {
        OffsetDelta {
            x: 0.0,
            z: -distance,
            y: 0.0,
        }
    }

    #[test]
    fn initialize_fills_to_cap_inside_disc() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = CloudField::new(CloudConfig::default());
        field.initialize(&mut scene, &mut rng);
        assert_eq!(field.len(), 40);
        assert_eq!(scene.len(), 40);
        for cloud in field.clouds() {
            assert!(cloud.horizontal_distance() <= 150.0 + 1e-3);
            assert!((15.0..=25.0).contains(&cloud.position.y));
            // Inside the inner edge of the fade band.
            assert_eq!(cloud.opacity, 0.6);
        }
    }

    #[test]
    fn population_never_exceeds_cap() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = CloudField::new(CloudConfig::default());
        field.initialize(&mut scene, &mut rng);
        assert!(field.spawn(&mut scene, Vec3::ZERO, &mut rng).is_none());

        for i in 0..600 {
            let yaw = i as f32 * 0.01;
            field.tick(&mut scene, Some(&pose(yaw)), &forward_delta(2.0), &mut rng);
            assert_eq!(field.len(), 40, "tick {i}");
            assert_eq!(scene.len(), 40);
        }
    }

    #[test]
    fn depleted_population_is_topped_up() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = CloudField::new(CloudConfig::default());
        field.spawn(&mut scene, Vec3::new(0.0, 20.0, 10.0), &mut rng);
        field.tick(&mut scene, Some(&pose(0.0)), &OffsetDelta::default(), &mut rng);
        assert_eq!(field.len(), 40);
    }

    #[test]
    fn no_aircraft_means_no_change() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(4);
        let mut field = CloudField::new(CloudConfig::default());
        let e = field.spawn(&mut scene, Vec3::new(5.0, 20.0, 5.0), &mut rng).unwrap();
        field.tick(&mut scene, None, &forward_delta(100.0), &mut rng);
        assert_eq!(field.len(), 1);
        assert_eq!(scene.transform(e).unwrap().position, Vec3::new(5.0, 20.0, 5.0));
    }

    #[test]
    fn clouds_drift_back_fade_and_despawn() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(5);
        let config = CloudConfig {
            max_clouds: 1,
            ..Default::default()
        };
        let mut field = CloudField::new(config);
        let e = field.spawn(&mut scene, Vec3::new(0.0, 20.0, 0.0), &mut rng).unwrap();

        // Offset z drops by 20 per tick; move speed 0.5 pushes the cloud 10 toward -z.
        field.tick(&mut scene, Some(&pose(0.0)), &forward_delta(20.0), &mut rng);
        assert_eq!(field.clouds()[0].position.z, -10.0);
        assert_eq!(scene.transform(e).unwrap().position.z, -10.0);

        for _ in 0..16 {
            field.tick(&mut scene, Some(&pose(0.0)), &forward_delta(20.0), &mut rng);
        }
        // At 170 units: 20 into the 150..200 fade band.
        let cloud = &field.clouds()[0];
        assert_eq!(cloud.entity, e);
        assert!((cloud.fade_progress - 0.4).abs() < 1e-4);
        assert!((cloud.opacity - 0.36).abs() < 1e-4);
        assert!((scene.opacity(e).unwrap() - 0.36).abs() < 1e-4);

        for _ in 0..9 {
            field.tick(&mut scene, Some(&pose(0.0)), &forward_delta(20.0), &mut rng);
        }
        // Past 250: removed and replaced by a new cloud ahead.
        assert!(!scene.contains(e));
        assert_eq!(field.len(), 1);
        assert!(field.clouds()[0].position.z > 0.0);
    }

    #[test]
    fn replacements_spawn_ahead_of_heading() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(6);
        let mut field = CloudField::new(CloudConfig::default());
        let yaw = std::f32::consts::FRAC_PI_2;
        for _ in 0..40 {
            field.spawn_ahead(&mut scene, yaw, &mut rng);
        }
        let heading = Vec3::new(yaw.sin(), 0.0, yaw.cos());
        for cloud in field.clouds() {
            let dir = Vec3::new(cloud.position.x, 0.0, cloud.position.z).normalize();
            // Spread of ±45° plus jitter stays well within ±60°.
            assert!(dir.dot(heading) > 0.5, "cloud at {:?}", cloud.position);
            assert!(cloud.fade_progress > 0.5);
        }
    }

    #[test]
    fn clear_removes_everything() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = CloudField::new(CloudConfig::default());
        field.initialize(&mut scene, &mut rng);
        field.clear(&mut scene);
        assert!(field.is_empty());
        assert!(scene.is_empty());
    }
}
