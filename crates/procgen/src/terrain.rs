//! Scrolling terrain: a fixed-topology height/color mesh resampled every tick.
//!
//! The mesh never moves. Each vertex keeps its local grid coordinate `(lx, lz)`
//! and is re-evaluated at `(lx + offset.x, lz + offset.z)`, so flying over the
//! mesh is the offset changing, not the geometry. The grid's `lz` axis runs
//! along world -Z, matching how the offset accumulates.

use bytemuck::{Pod, Zeroable};
use engine_core::{ConfigError, WorldOffset};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::noise_field::NoiseField;

/// Vertex for terrain mesh (includes band color).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Band color; snow is deliberately brighter than 1.0 for the bloom pass.
    pub color: [f32; 4],
}

/// Configuration for terrain synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Side length of the square mesh in world units.
    pub size: f32,
    /// Grid cells per side (vertices per side = segments + 1).
    pub segments: u32,
    /// Amplitude of the broadest octave.
    pub height_scale: f32,
    /// Frequency of the broad "distance" octave that spaces out major features.
    pub distance_scale: f32,
    /// Base frequency of the three detail octaves (x1, x2, x4).
    pub base_frequency: f32,
    /// Heights are clamped up to this level.
    pub water_level: f32,
    /// Heights below this are grass (or water further down).
    pub grass_height: f32,
    /// Water is this far below `grass_height`.
    pub water_band: f32,
    /// Heights above this are snow.
    pub snow_start: f32,
    pub water_color: [f32; 3],
    pub grass_color: [f32; 3],
    pub rock_color: [f32; 3],
    pub snow_color: [f32; 3],
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 500.0,
            segments: 75,
            height_scale: 50.0,
            distance_scale: 0.005,
            base_frequency: 0.01,
            water_level: -35.0,
            grass_height: -25.0,
            water_band: 10.0,
            snow_start: 35.0,
            water_color: engine_core::rgb_hex(0x0077be),
            grass_color: engine_core::rgb_hex(0x228b22),
            rock_color: engine_core::rgb_hex(0x808080),
            snow_color: [5.0, 5.0, 5.0],
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("terrain.size", self.size as f64)?;
        ConfigError::require_positive("terrain.segments", self.segments as f64)?;
        ConfigError::require_positive("terrain.height_scale", self.height_scale as f64)?;
        ConfigError::require_positive("terrain.water_band", self.water_band as f64)?;
        ConfigError::require_ordered(
            "terrain.grass_height..snow_start",
            self.grass_height as f64,
            self.snow_start as f64,
        )
    }

    /// Vertices per side.
    pub fn vertices_per_side(&self) -> usize {
        self.segments as usize + 1
    }

    fn band_color(&self, band: TerrainBand) -> [f32; 4] {
        let [r, g, b] = match band {
            TerrainBand::Water => self.water_color,
            TerrainBand::Grass => self.grass_color,
            TerrainBand::Rock => self.rock_color,
            TerrainBand::Snow => self.snow_color,
        };
        [r, g, b, 1.0]
    }
}

/// Color class of a terrain vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainBand {
    Water,
    Grass,
    Rock,
    Snow,
}

impl TerrainBand {
    /// Step function over the pre-offset height.
    ///
    /// Ties: exactly `grass_height - water_band` is water (so the clamped water
    /// plane is water), exactly `grass_height` is rock, exactly `snow_start` is rock.
    pub fn classify(height: f32, config: &TerrainConfig) -> Self {
        if height <= config.grass_height - config.water_band {
            Self::Water
        } else if height < config.grass_height {
            Self::Grass
        } else if height > config.snow_start {
            Self::Snow
        } else {
            Self::Rock
        }
    }
}

/// Four-octave height at world sample coordinates, clamped to the water level.
pub fn terrain_height(noise: &NoiseField, config: &TerrainConfig, world_x: f32, world_z: f32) -> f32 {
    let h = config.height_scale;
    let f = config.base_frequency;
    let d = config.distance_scale;

    let broad = noise.sample(world_x * d, world_z * d) * h;
    let detail1 = noise.sample(world_x * f, world_z * f) * (h * 0.4);
    let detail2 = noise.sample(world_x * f * 2.0, world_z * f * 2.0) * (h * 0.2);
    let detail4 = noise.sample(world_x * f * 4.0, world_z * f * 4.0) * (h * 0.1);

    (broad + detail1 + detail2 + detail4).max(config.water_level)
}

/// The resampled terrain mesh. Topology is fixed at creation.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
    /// Fixed local grid coordinate `(lx, lz)` of each vertex.
    grid: Vec<[f32; 2]>,
    /// Clamped, pre-offset height of each vertex (drives color).
    base_heights: Vec<f32>,
    bands: Vec<TerrainBand>,
    config: TerrainConfig,
}

impl TerrainMesh {
    /// Build the grid once and sample it at `offset`.
    pub fn create(config: TerrainConfig, noise: &NoiseField, offset: &WorldOffset) -> Self {
        let res = config.vertices_per_side();
        let half = config.size / 2.0;
        let step = config.size / config.segments as f32;

        let mut grid = Vec::with_capacity(res * res);
        let mut vertices = Vec::with_capacity(res * res);
        for iz in 0..res {
            for ix in 0..res {
                let lx = -half + ix as f32 * step;
                let lz = half - iz as f32 * step;
                grid.push([lx, lz]);
                vertices.push(TerrainVertex {
                    position: [lx, 0.0, -lz],
                    normal: [0.0, 1.0, 0.0],
                    uv: [
                        ix as f32 / config.segments as f32,
                        iz as f32 / config.segments as f32,
                    ],
                    color: [1.0; 4],
                });
            }
        }

        let mut indices = Vec::with_capacity((res - 1) * (res - 1) * 6);
        for z in 0..(res - 1) {
            for x in 0..(res - 1) {
                let top_left = (z * res + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * res + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend([top_left, bottom_left, top_right]);
                indices.extend([top_right, bottom_left, bottom_right]);
            }
        }

        log::debug!(
            "terrain mesh: {}x{} vertices, {} triangles",
            res,
            res,
            indices.len() / 3
        );

        let count = vertices.len();
        let mut mesh = Self {
            vertices,
            indices,
            grid,
            base_heights: vec![0.0; count],
            bands: vec![TerrainBand::Rock; count],
            config,
        };
        mesh.resample(noise, offset);
        mesh
    }

    /// Recompute every vertex height, color and normal for `offset`.
    ///
    /// The rendered height is shifted by `offset.y`; color uses the unshifted
    /// height so climbing moves the ground without recoloring it.
    pub fn resample(&mut self, noise: &NoiseField, offset: &WorldOffset) {
        for (i, [lx, lz]) in self.grid.iter().copied().enumerate() {
            let base = terrain_height(noise, &self.config, lx + offset.x, lz + offset.z);
            let band = TerrainBand::classify(base, &self.config);

            self.base_heights[i] = base;
            self.bands[i] = band;
            let vertex = &mut self.vertices[i];
            vertex.position[1] = base + offset.y;
            vertex.color = self.config.band_color(band);
        }

        let res = self.config.vertices_per_side();
        Self::calculate_normals(&mut self.vertices, res);
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Local grid coordinate of vertex `i`.
    pub fn grid_coord(&self, i: usize) -> [f32; 2] {
        self.grid[i]
    }

    pub fn base_heights(&self) -> &[f32] {
        &self.base_heights
    }

    pub fn bands(&self) -> &[TerrainBand] {
        &self.bands
    }

    /// Fraction of vertices in each band, in Water/Grass/Rock/Snow order.
    pub fn band_coverage(&self) -> [f32; 4] {
        let mut counts = [0usize; 4];
        for band in &self.bands {
            let slot = match band {
                TerrainBand::Water => 0,
                TerrainBand::Grass => 1,
                TerrainBand::Rock => 2,
                TerrainBand::Snow => 3,
            };
            counts[slot] += 1;
        }
        let total = self.bands.len().max(1) as f32;
        counts.map(|c| c as f32 / total)
    }

    fn calculate_normals(vertices: &mut [TerrainVertex], resolution: usize) {
        // Both triangles of a cell wind so that their face normal points up (+Y).
        let mut normals: Vec<Vec3> = vec![Vec3::ZERO; vertices.len()];

        for z in 0..(resolution - 1) {
            for x in 0..(resolution - 1) {
                let i0 = z * resolution + x;
                let i1 = i0 + 1;
                let i2 = (z + 1) * resolution + x;
                let i3 = i2 + 1;

                let v0: Vec3 = vertices[i0].position.into();
                let v1: Vec3 = vertices[i1].position.into();
                let v2: Vec3 = vertices[i2].position.into();
                let v3: Vec3 = vertices[i3].position.into();

                let n1 = (v2 - v0).cross(v1 - v0).normalize_or_zero();
                normals[i0] += n1;
                normals[i2] += n1;
                normals[i1] += n1;

                let n2 = (v2 - v1).cross(v3 - v1).normalize_or_zero();
                normals[i1] += n2;
                normals[i2] += n2;
                normals[i3] += n2;
            }
        }

        for (vertex, n) in vertices.iter_mut().zip(normals) {
            let n = n.try_normalize().unwrap_or(Vec3::Y);
            vertex.normal = [n.x, n.y, n.z];
        }
    }
}
