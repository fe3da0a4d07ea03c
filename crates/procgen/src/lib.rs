//! Procedural generation: coherent noise, scrolling terrain, and particle textures.

pub mod noise_field;
pub mod terrain;
pub mod textures;

pub use noise_field::*;
pub use terrain::*;
pub use textures::*;
