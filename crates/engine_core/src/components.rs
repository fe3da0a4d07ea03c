//! Components attached to scene entities.

use glam::Vec3;

/// Lookup name for entities other systems need to find again
/// (the aircraft, its spotlight and light cone).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Child-of relationship. A child's `Transform` is relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub hecs::Entity);

/// Render visibility flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visible(pub bool);

impl Default for Visible {
    fn default() -> Self {
        Self(true)
    }
}

/// Per-entity opacity in [0, 1]. Each entity owns its own value so fades are independent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(pub f32);

impl Default for Opacity {
    fn default() -> Self {
        Self(1.0)
    }
}

/// One sphere of a cloud cluster, relative to the cloud's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Puff {
    pub offset: Vec3,
    pub radius: f32,
}

/// What the renderer should draw for an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    /// Externally loaded aircraft model.
    Aircraft,
    /// Warm spotlight mounted on the aircraft nose.
    Spotlight { color: [f32; 3], range: f32 },
    /// Translucent cone visualising the spotlight beam.
    LightCone {
        radius: f32,
        height: f32,
        color: [f32; 3],
    },
    /// Cluster of translucent spheres.
    Cloud { puffs: Vec<Puff> },
    /// Small noise-textured cube left behind the aircraft.
    TrailCube { size: f32, color: [f32; 3] },
}

/// Convert a `0xRRGGBB` color into linear-ish float RGB.
pub fn rgb_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
