//! Core engine types and utilities for Flyover.
//!
//! This crate provides the foundational types used across all simulation systems:
//! - Transform and spatial helpers
//! - Frame clock
//! - World offset accumulator
//! - Scene graph (named render entities backed by an ECS world)
//! - Configuration errors

pub mod components;
pub mod error;
pub mod offset;
pub mod scene;
pub mod time;
pub mod transform;

pub use components::*;
pub use error::*;
pub use offset::*;
pub use scene::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
