//! Exhaust trail: time-gated particles that age out on a fixed lifetime.
//!
//! Unlike clouds, trail particles are culled by age alone; distance from the
//! origin never matters. Each particle's entity carries its own
//! [`TextureData`] dissolve map, so no two cubes break up the same way.

use engine_core::{Entity, OffsetDelta, Renderable, Scene, Transform};
use glam::Vec3;
use procgen::{dissolve_texture, NoiseField, TextureData};
use rand::Rng;

use crate::aircraft::AircraftPose;
use crate::config::TrailConfig;

/// One trail cube.
#[derive(Debug, Clone)]
pub struct TrailParticle {
    pub entity: Entity,
    pub position: Vec3,
    pub created_at_ms: u64,
    pub size: f32,
    pub opacity: f32,
}

impl TrailParticle {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at_ms)
    }
}

pub struct TrailField {
    particles: Vec<TrailParticle>,
    last_spawn_ms: Option<u64>,
    config: TrailConfig,
}

impl TrailField {
    pub fn new(config: TrailConfig) -> Self {
        Self {
            particles: Vec::with_capacity(config.max_particles),
            last_spawn_ms: None,
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[TrailParticle] {
        &self.particles
    }

    /// Opacity for a particle of the given age: full until `fade_start`, then linear to zero.
    pub fn opacity_at(&self, age_ms: u64) -> f32 {
        let ratio = age_ms as f32 / self.config.lifetime_ms as f32;
        if ratio > self.config.fade_start {
            let remaining = (1.0 - ratio) / (1.0 - self.config.fade_start);
            self.config.base_opacity * remaining.max(0.0)
        } else {
            self.config.base_opacity
        }
    }

    fn spawn_due(&self, now_ms: u64) -> bool {
        let interval_passed = match self.last_spawn_ms {
            Some(last) => now_ms.saturating_sub(last) > self.config.spawn_interval_ms,
            None => true,
        };
        interval_passed && self.particles.len() < self.config.max_particles
    }

    /// Emit one particle behind the aircraft. Returns `None` when the population is full.
    pub fn spawn<R: Rng>(
        &mut self,
        scene: &mut Scene,
        aircraft: &AircraftPose,
        now_ms: u64,
        noise: &NoiseField,
        rng: &mut R,
    ) -> Option<Entity> {
        if self.particles.len() >= self.config.max_particles {
            return None;
        }
        let c = &self.config;
        let [ox, oy, oz] = c.local_offset;
        let local = Vec3::new(
            ox + (rng.gen::<f32>() - 0.5) * c.jitter,
            oy + (rng.gen::<f32>() - 0.5) * c.jitter,
            oz,
        );
        let position = aircraft.transform.local_to_world(local);
        let size = c.min_size + rng.gen::<f32>() * (c.max_size - c.min_size);
        let texture = dissolve_texture(noise, c.texture_size, c.texture_frequency, rng);

        let entity = scene.add(
            Transform::from_position(position),
            Renderable::TrailCube {
                size,
                color: c.color,
            },
        );
        scene.set_opacity(entity, c.base_opacity);
        scene.attach(entity, texture);

        self.particles.push(TrailParticle {
            entity,
            position,
            created_at_ms: now_ms,
            size,
            opacity: c.base_opacity,
        });
        self.last_spawn_ms = Some(now_ms);
        Some(entity)
    }

    /// Move, fade, cull by age, then spawn if the interval has passed. No-op without an aircraft.
    pub fn tick<R: Rng>(
        &mut self,
        scene: &mut Scene,
        aircraft: Option<&AircraftPose>,
        delta: &OffsetDelta,
        now_ms: u64,
        noise: &NoiseField,
        rng: &mut R,
    ) {
        let Some(aircraft) = aircraft else {
            return;
        };

        let shift = delta.entity_shift(self.config.move_speed);
        let lifetime = self.config.lifetime_ms;
        let mut particles = std::mem::take(&mut self.particles);
        particles.retain_mut(|p| {
            let age = p.age_ms(now_ms);
            if age >= lifetime {
                scene.remove(p.entity);
                return false;
            }
            p.position += shift;
            p.opacity = self.opacity_at(age);
            scene.set_position(p.entity, p.position);
            scene.set_opacity(p.entity, p.opacity);
            true
        });
        self.particles = particles;

        if self.spawn_due(now_ms) {
            self.spawn(scene, aircraft, now_ms, noise, rng);
        }
    }

    /// Remove every particle from the scene.
    pub fn clear(&mut self, scene: &mut Scene) {
        for p in self.particles.drain(..) {
            scene.remove(p.entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pose() -> AircraftPose {
        AircraftPose {
            transform: Transform::default(),
            yaw: 0.0,
        }
    }

    fn small_textures() -> TrailConfig {
        TrailConfig {
            texture_size: 4,
            ..Default::default()
        }
    }

    #[test]
    fn first_tick_spawns_behind_and_below() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(1);
        let noise = NoiseField::new(1);
        let mut trail = TrailField::new(TrailConfig::default());
        trail.tick(&mut scene, Some(&pose()), &OffsetDelta::default(), 0, &noise, &mut rng);

        assert_eq!(trail.len(), 1);
        let p = &trail.particles()[0];
        assert_eq!(p.position.z, -1.0);
        assert!((p.position.y + 0.5).abs() <= 0.15 + 1e-6);
        assert!(p.position.x.abs() <= 0.15 + 1e-6);
        assert!((0.3..=0.5).contains(&p.size));
        assert_eq!(p.opacity, 0.8);
    }

    #[test]
    fn each_spawned_cube_owns_its_texture() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(8);
        let noise = NoiseField::new(8);
        let mut trail = TrailField::new(TrailConfig::default());
        let a = trail.spawn(&mut scene, &pose(), 0, &noise, &mut rng).unwrap();
        let b = trail.spawn(&mut scene, &pose(), 200, &noise, &mut rng).unwrap();

        let ta = scene.component::<TextureData>(a).unwrap();
        let tb = scene.component::<TextureData>(b).unwrap();
        assert_eq!((ta.width, ta.height), (64, 64));
        assert_ne!(ta, tb);
        assert!(ta.pixels.iter().all(|p| (p.r, p.g, p.b) == (255, 255, 255)));

        trail.clear(&mut scene);
        assert!(scene.component::<TextureData>(a).is_none());
    }

    #[test]
    fn spawn_offset_follows_aircraft_rotation() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(2);
        let noise = NoiseField::new(2);
        let config = TrailConfig {
            jitter: 0.0,
            ..small_textures()
        };
        let mut trail = TrailField::new(config);
        let aircraft = AircraftPose {
            transform: Transform::from_position_rotation(
                Vec3::new(0.0, 3.0, 0.0),
                Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ),
            yaw: std::f32::consts::FRAC_PI_2,
        };
        trail.spawn(&mut scene, &aircraft, 0, &noise, &mut rng);
        let p = trail.particles()[0].position;
        // Nose points +X, so "behind" is -X.
        assert!((p - Vec3::new(-1.0, 2.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn spawns_are_time_gated() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(3);
        let noise = NoiseField::new(3);
        let mut trail = TrailField::new(small_textures());
        let d = OffsetDelta::default();
        trail.tick(&mut scene, Some(&pose()), &d, 1000, &noise, &mut rng);
        trail.tick(&mut scene, Some(&pose()), &d, 1050, &noise, &mut rng);
        trail.tick(&mut scene, Some(&pose()), &d, 1100, &noise, &mut rng);
        assert_eq!(trail.len(), 1);
        trail.tick(&mut scene, Some(&pose()), &d, 1101, &noise, &mut rng);
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn fade_starts_at_seventy_percent() {
        let trail = TrailField::new(TrailConfig::default());
        assert_eq!(trail.opacity_at(0), 0.8);
        assert_eq!(trail.opacity_at(1400), 0.8);
        assert!((trail.opacity_at(1700) - 0.4).abs() < 1e-5);
        assert_eq!(trail.opacity_at(2000), 0.0);
        assert_eq!(trail.opacity_at(5000), 0.0);
    }

    #[test]
    fn particles_removed_by_lifetime() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(4);
        let noise = NoiseField::new(4);
        let mut trail = TrailField::new(small_textures());
        let d = OffsetDelta::default();
        trail.tick(&mut scene, Some(&pose()), &d, 0, &noise, &mut rng);
        let first = trail.particles()[0].entity;

        let mut now = 0;
        while now < 2000 {
            now += 16;
            trail.tick(&mut scene, Some(&pose()), &d, now, &noise, &mut rng);
            let alive = trail.particles().iter().any(|p| p.entity == first);
            assert_eq!(alive, now < 2000, "at {now} ms");
        }
        assert!(!scene.contains(first));
        for p in trail.particles() {
            assert!(p.age_ms(now) < 2000);
        }
    }

    #[test]
    fn count_never_exceeds_cap() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(5);
        let noise = NoiseField::new(5);
        let config = TrailConfig {
            max_particles: 5,
            spawn_interval_ms: 1,
            ..small_textures()
        };
        let mut trail = TrailField::new(config);
        for t in 0..400 {
            trail.tick(&mut scene, Some(&pose()), &OffsetDelta::default(), t * 10, &noise, &mut rng);
            assert!(trail.len() <= 5);
            assert_eq!(scene.len(), trail.len());
        }
    }

    #[test]
    fn particles_drift_independent_of_distance() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(6);
        let noise = NoiseField::new(6);
        let mut trail = TrailField::new(small_textures());
        trail.spawn(&mut scene, &pose(), 0, &noise, &mut rng);
        let start = trail.particles()[0].position;
        let far = OffsetDelta {
            x: 0.0,
            z: -2000.0,
            y: 0.0,
        };
        trail.tick(&mut scene, Some(&pose()), &far, 50, &noise, &mut rng);
        let p = &trail.particles()[0];
        assert!((p.position.z - (start.z - 1000.0)).abs() < 1e-3);
    }

    #[test]
    fn absent_aircraft_is_a_no_op_and_clear_empties() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(7);
        let noise = NoiseField::new(7);
        let mut trail = TrailField::new(small_textures());
        trail.tick(&mut scene, None, &OffsetDelta::default(), 0, &noise, &mut rng);
        assert!(trail.is_empty());

        trail.spawn(&mut scene, &pose(), 0, &noise, &mut rng);
        trail.clear(&mut scene);
        assert!(trail.is_empty());
        assert!(scene.is_empty());
    }
}
