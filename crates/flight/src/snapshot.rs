//! Top-down PNG of the current frame for the headless runner.
//!
//! Terrain cells are flat-filled with their Lambert-shaded vertex color;
//! clouds, trail cubes and the aircraft are splatted on top.

use anyhow::{Context, Result};
use engine_core::{Drawable, Renderable};
use procgen::TextureData;
use glam::Vec3;
use image::{Rgb, RgbImage};
use std::path::Path;

use crate::sim::Simulation;

const AMBIENT: f32 = 0.4;
const AIRCRAFT_COLOR: [f32; 3] = [0.9, 0.1, 0.1];

fn to_rgb(color: [f32; 3]) -> Rgb<u8> {
    Rgb(color.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8))
}

fn blend(dst: &mut Rgb<u8>, src: [f32; 3], alpha: f32) {
    let a = alpha.clamp(0.0, 1.0);
    for (d, s) in dst.0.iter_mut().zip(src) {
        let mixed = *d as f32 / 255.0 * (1.0 - a) + s.clamp(0.0, 1.0) * a;
        *d = (mixed * 255.0).round() as u8;
    }
}

/// Maps world XZ onto image pixels with +Z up.
struct Projection {
    half: f32,
    pixels_per_unit: f32,
    side: u32,
}

impl Projection {
    fn to_pixel(&self, position: Vec3) -> (i32, i32) {
        let px = (position.x + self.half) * self.pixels_per_unit;
        let py = (self.half - position.z) * self.pixels_per_unit;
        (px as i32, py as i32)
    }

    fn fill_disc(&self, image: &mut RgbImage, center: Vec3, radius: f32, color: [f32; 3], alpha: f32) {
        let (cx, cy) = self.to_pixel(center);
        let r = ((radius * self.pixels_per_unit) as i32).max(1);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= self.side as i32 || y >= self.side as i32 {
                    continue;
                }
                blend(image.get_pixel_mut(x as u32, y as u32), color, alpha);
            }
        }
    }

    /// Like `fill_disc`, with alpha scaled by the texture stretched over the disc's bounding square.
    fn fill_textured_disc(
        &self,
        image: &mut RgbImage,
        center: Vec3,
        radius: f32,
        color: [f32; 3],
        alpha: f32,
        texture: &TextureData,
    ) {
        let (cx, cy) = self.to_pixel(center);
        let r = ((radius * self.pixels_per_unit) as i32).max(1);
        let span = (2 * r) as f32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= self.side as i32 || y >= self.side as i32 {
                    continue;
                }
                let tx = ((dx + r) as f32 / span * (texture.width - 1) as f32) as u32;
                let ty = ((dy + r) as f32 / span * (texture.height - 1) as f32) as u32;
                let texel = texture.get_pixel(tx, ty);
                let tint = [
                    color[0] * texel.r as f32 / 255.0,
                    color[1] * texel.g as f32 / 255.0,
                    color[2] * texel.b as f32 / 255.0,
                ];
                let a = alpha * texel.a as f32 / 255.0;
                blend(image.get_pixel_mut(x as u32, y as u32), tint, a);
            }
        }
    }
}

/// Render the simulation from above at `scale` pixels per terrain cell.
pub fn render_top_down(sim: &Simulation, scale: u32) -> RgbImage {
    let terrain = sim.terrain();
    let config = terrain.config();
    let res = config.vertices_per_side() as u32;
    let scale = scale.max(1);
    let side = res * scale;
    let projection = Projection {
        half: config.size / 2.0,
        pixels_per_unit: side as f32 / config.size,
        side,
    };

    let light = Vec3::splat(5.0).normalize();
    let mut image = RgbImage::new(side, side);
    for (i, vertex) in terrain.vertices.iter().enumerate() {
        let ix = i as u32 % res;
        let iz = i as u32 / res;
        let normal = Vec3::from(vertex.normal);
        let shade = AMBIENT + (1.0 - AMBIENT) * normal.dot(light).max(0.0);
        let [r, g, b, _] = vertex.color;
        let pixel = to_rgb([r * shade, g * shade, b * shade]);
        // Grid row 0 sits at world -Z, the bottom edge of the image.
        let row = res - 1 - iz;
        for y in row * scale..(row + 1) * scale {
            for x in ix * scale..(ix + 1) * scale {
                image.put_pixel(x, y, pixel);
            }
        }
    }

    let mut aircraft = Vec::new();
    for drawable in sim.scene().drawables() {
        let Drawable {
            entity,
            transform,
            renderable,
            opacity,
        } = drawable;
        match renderable {
            Renderable::Cloud { puffs } => {
                for puff in puffs {
                    let center = transform.local_to_world(puff.offset);
                    projection.fill_disc(&mut image, center, puff.radius, [1.0; 3], opacity);
                }
            }
            Renderable::TrailCube { size, color } => {
                match sim.scene().component::<TextureData>(entity) {
                    Some(texture) => projection.fill_textured_disc(
                        &mut image,
                        transform.position,
                        size,
                        color,
                        opacity,
                        &texture,
                    ),
                    None => projection.fill_disc(&mut image, transform.position, size, color, opacity),
                }
            }
            Renderable::Aircraft => aircraft.push(transform.position),
            Renderable::Spotlight { .. } | Renderable::LightCone { .. } => {}
        }
    }
    // Aircraft on top of everything.
    for position in aircraft {
        projection.fill_disc(&mut image, position, 1.0, AIRCRAFT_COLOR, 1.0);
    }

    image
}

/// Render and write a PNG snapshot to `path`.
pub fn write_snapshot(sim: &Simulation, path: &Path, scale: u32) -> Result<()> {
    let image = render_top_down(sim, scale);
    image
        .save(path)
        .with_context(|| format!("writing snapshot to {}", path.display()))?;
    log::info!(
        "Wrote {}x{} snapshot to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::AircraftModel;
    use crate::config::FlightConfig;
    use procgen::TerrainConfig;

    fn sim() -> Simulation {
        let mut config = FlightConfig::default();
        config.terrain = TerrainConfig {
            segments: 20,
            ..Default::default()
        };
        config.trail.texture_size = 4;
        let mut sim = Simulation::new(config).unwrap();
        sim.attach_aircraft(&AircraftModel::default());
        sim.tick(Default::default(), 0);
        sim
    }

    #[test]
    fn image_covers_the_terrain_grid() {
        let image = render_top_down(&sim(), 3);
        assert_eq!(image.width(), 21 * 3);
        assert_eq!(image.height(), 21 * 3);
    }

    #[test]
    fn aircraft_marks_the_center() {
        let image = render_top_down(&sim(), 4);
        let c = image.width() / 2;
        let pixel = image.get_pixel(c, c);
        assert!(pixel.0[0] > 150 && pixel.0[1] < 100, "{pixel:?}");
    }

    #[test]
    fn trail_alpha_follows_its_texture() {
        let projection = Projection {
            half: 5.0,
            pixels_per_unit: 1.0,
            side: 10,
        };
        let mut texture = TextureData::new(2, 2);
        for (x, y, a) in [(0, 0, 0), (1, 0, 0), (0, 1, 255), (1, 1, 255)] {
            texture.set_pixel(x, y, procgen::Pixel::new(255, 255, 255, a));
        }
        let mut image = RgbImage::new(10, 10);
        projection.fill_textured_disc(&mut image, Vec3::ZERO, 2.0, [1.0; 3], 1.0, &texture);
        // Top half of the disc samples transparent texels, bottom half opaque ones.
        assert_eq!(image.get_pixel(5, 3), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(5, 7), &Rgb([255, 255, 255]));
    }

    #[test]
    fn blend_mixes_by_alpha() {
        let mut p = Rgb([0u8, 0, 0]);
        blend(&mut p, [1.0, 1.0, 1.0], 0.5);
        assert!((126..=128).contains(&p.0[0]));
        let mut q = Rgb([10u8, 20, 30]);
        blend(&mut q, [1.0, 1.0, 1.0], 0.0);
        assert_eq!(q, Rgb([10, 20, 30]));
    }
}
