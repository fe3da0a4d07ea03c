//! Flyover - endless low-altitude flight over procedural terrain.
//!
//! The aircraft stays near the origin. Its motion accumulates into a world
//! offset that the terrain is resampled at, while clouds and the exhaust trail
//! drift opposite to it.

pub mod aircraft;
pub mod camera;
pub mod clouds;
pub mod config;
pub mod orientation;
pub mod script;
pub mod sim;
pub mod snapshot;
pub mod trail;

pub use aircraft::{spawn_loader, AircraftHandle, AircraftModel, AircraftPose};
pub use camera::chase_camera;
pub use clouds::{Cloud, CloudField};
pub use config::FlightConfig;
pub use orientation::{OrientationController, OrientationState, RollUpdate};
pub use script::FlightScript;
pub use sim::{Simulation, TickReport};
pub use snapshot::{render_top_down, write_snapshot};
pub use trail::{TrailField, TrailParticle};
