//! Flight configuration. Loaded from `flyover.ron` at startup.

use engine_core::ConfigError;
use procgen::TerrainConfig;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};
use std::path::{Path, PathBuf};

/// All tunables for a session. Every section falls back to defaults when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Seed for the noise field and spawn randomness.
    pub seed: u64,
    pub controls: ControlsConfig,
    pub speed: SpeedConfig,
    pub terrain: TerrainConfig,
    pub clouds: CloudConfig,
    pub trail: TrailConfig,
    pub session: SessionConfig,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            controls: ControlsConfig::default(),
            speed: SpeedConfig::default(),
            terrain: TerrainConfig::default(),
            clouds: CloudConfig::default(),
            trail: TrailConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

/// Roll/pitch smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Bank limit in radians.
    pub max_roll: f32,
    /// Pitch limit in radians.
    pub max_pitch: f32,
    /// Base smoothing rate. Active deflection lerps at 2x, return-to-level at 3x.
    /// Also the yaw applied per tick while banking.
    pub move_speed: f32,
    /// Angles closer than this to their target snap onto it.
    pub settle_epsilon: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            max_roll: FRAC_PI_4,
            max_pitch: FRAC_PI_4,
            move_speed: 0.015,
            settle_epsilon: 1e-4,
        }
    }
}

/// Travel speed: `base_speed * multiplier` offset units per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub base_speed: f32,
    /// Starting multiplier.
    pub multiplier: f32,
    pub min_multiplier: f32,
    pub max_multiplier: f32,
    /// Change per speed-up/speed-down press.
    pub step: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.25 / 4.0,
            multiplier: 2.0,
            min_multiplier: 0.5,
            max_multiplier: 4.0,
            step: 0.5,
        }
    }
}

impl SpeedConfig {
    /// Apply one press in the given direction, clamped to the allowed range.
    pub fn adjust(&self, current: f32, up: bool, down: bool) -> f32 {
        let mut next = current;
        if up {
            next += self.step;
        }
        if down {
            next -= self.step;
        }
        next.clamp(self.min_multiplier, self.max_multiplier)
    }
}

/// Ambient cloud population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub max_clouds: usize,
    /// Distance from the origin at which replacement clouds appear.
    pub spawn_distance: f32,
    /// Clouds farther than this (horizontally) are removed.
    pub despawn_distance: f32,
    /// Width of the fade band ending at `spawn_distance`.
    pub fade_distance: f32,
    /// Radius of the disc filled at startup.
    pub initial_radius: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Total angular spread around the heading for replacement clouds.
    pub spawn_spread: f32,
    /// Positional jitter applied to replacement clouds on x and z.
    pub spawn_jitter: f32,
    /// Fraction of the offset delta applied to clouds.
    pub move_speed: f32,
    /// Opacity of a fully faded-in cloud.
    pub base_opacity: f32,
    pub puff_radius: f32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            max_clouds: 40,
            spawn_distance: 200.0,
            despawn_distance: 250.0,
            fade_distance: 50.0,
            initial_radius: 150.0,
            min_height: 15.0,
            max_height: 25.0,
            spawn_spread: FRAC_PI_2,
            spawn_jitter: 30.0,
            move_speed: 0.5,
            base_opacity: 0.6,
            puff_radius: 2.5,
        }
    }
}

/// Exhaust trail behind the aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub max_particles: usize,
    /// Minimum wall-clock gap between spawns.
    pub spawn_interval_ms: u64,
    pub lifetime_ms: u64,
    /// Fraction of the lifetime after which opacity fades linearly to zero.
    pub fade_start: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub color: [f32; 3],
    pub base_opacity: f32,
    /// Spawn point behind the aircraft, in its local frame (before jitter).
    pub local_offset: [f32; 3],
    /// Full width of the lateral/vertical jitter around `local_offset`.
    pub jitter: f32,
    /// Fraction of the offset delta applied to particles.
    pub move_speed: f32,
    /// Side length of each particle's dissolve texture.
    pub texture_size: u32,
    pub texture_frequency: f32,
    /// Toggling the flashlight also wipes the trail.
    pub clear_on_flashlight_toggle: bool,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            max_particles: 50,
            spawn_interval_ms: 100,
            lifetime_ms: 2000,
            fade_start: 0.7,
            min_size: 0.3,
            max_size: 0.5,
            color: engine_core::rgb_hex(0xe0e0e0),
            base_opacity: 0.8,
            local_offset: [0.0, -0.5, -1.0],
            jitter: 0.3,
            move_speed: 0.5,
            texture_size: 64,
            texture_frequency: 0.05,
            clear_on_flashlight_toggle: true,
        }
    }
}

/// One step of the scripted flight used by the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub ticks: u32,
    /// Control names held for the whole segment (e.g. `"roll-left"`).
    #[serde(default)]
    pub hold: Vec<String>,
}

impl ScriptSegment {
    pub fn new(ticks: u32, hold: &[&str]) -> Self {
        Self {
            ticks,
            hold: hold.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Headless runner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Total ticks to run.
    pub ticks: u64,
    /// Target frame length; 0 runs unpaced.
    pub frame_millis: u64,
    /// Log a report every this many ticks.
    pub report_every: u64,
    /// Simulated asset load time before the aircraft appears.
    pub aircraft_load_millis: u64,
    /// Write a top-down PNG here when the session ends.
    pub snapshot: Option<PathBuf>,
    /// Pixels per terrain cell in the snapshot.
    pub snapshot_scale: u32,
    /// Scripted key holds, played once in order.
    pub script: Vec<ScriptSegment>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ticks: 900,
            frame_millis: 16,
            report_every: 120,
            aircraft_load_millis: 250,
            snapshot: Some(PathBuf::from("flyover.png")),
            snapshot_scale: 6,
            script: vec![
                ScriptSegment::new(120, &[]),
                ScriptSegment::new(90, &["roll-left"]),
                ScriptSegment::new(60, &[]),
                ScriptSegment::new(80, &["pitch-forward"]),
                ScriptSegment::new(2, &["flashlight", "speed-up"]),
                ScriptSegment::new(120, &["roll-right", "pitch-back"]),
                ScriptSegment::new(60, &[]),
                ScriptSegment::new(2, &["flashlight"]),
                ScriptSegment::new(150, &["roll-left", "roll-right"]),
            ],
        }
    }
}

impl FlightConfig {
    /// Load config from `flyover.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from a specific file, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => {
                    log::info!("Loaded config from {:?}", path);
                    return c;
                }
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Reject constants that would divide by zero or escape their bounds at tick time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.controls;
        ConfigError::require_positive("controls.max_roll", c.max_roll as f64)?;
        ConfigError::require_positive("controls.max_pitch", c.max_pitch as f64)?;
        // Return rate is the faster of the two; it must not overshoot.
        ConfigError::require_rate("controls.move_speed * 3", (c.move_speed * 3.0) as f64)?;
        ConfigError::require_positive("controls.settle_epsilon", c.settle_epsilon as f64)?;

        let s = &self.speed;
        ConfigError::require_positive("speed.base_speed", s.base_speed as f64)?;
        ConfigError::require_positive("speed.step", s.step as f64)?;
        ConfigError::require_ordered(
            "speed.min_multiplier..max_multiplier",
            s.min_multiplier as f64,
            s.max_multiplier as f64,
        )?;
        ConfigError::require_within(
            "speed.multiplier",
            s.multiplier as f64,
            s.min_multiplier as f64,
            s.max_multiplier as f64,
        )?;

        self.terrain.validate()?;

        let cl = &self.clouds;
        ConfigError::require_positive("clouds.max_clouds", cl.max_clouds as f64)?;
        ConfigError::require_positive("clouds.fade_distance", cl.fade_distance as f64)?;
        ConfigError::require_positive("clouds.spawn_distance", cl.spawn_distance as f64)?;
        ConfigError::require_ordered(
            "clouds.spawn_distance..despawn_distance",
            cl.spawn_distance as f64,
            cl.despawn_distance as f64,
        )?;
        // Jitter is applied per axis, so a fresh cloud can land up to jitter/2 * sqrt(2)
        // beyond the spawn ring; it must still be inside the despawn ring.
        ConfigError::require_ordered(
            "clouds.spawn_distance + jitter..despawn_distance",
            (cl.spawn_distance + cl.spawn_jitter * FRAC_1_SQRT_2) as f64,
            cl.despawn_distance as f64,
        )?;
        ConfigError::require_ordered(
            "clouds.min_height..max_height",
            cl.min_height as f64,
            cl.max_height as f64,
        )?;
        ConfigError::require_positive("clouds.puff_radius", cl.puff_radius as f64)?;

        let t = &self.trail;
        ConfigError::require_positive("trail.max_particles", t.max_particles as f64)?;
        ConfigError::require_positive("trail.lifetime_ms", t.lifetime_ms as f64)?;
        ConfigError::require_positive("trail.spawn_interval_ms", t.spawn_interval_ms as f64)?;
        ConfigError::require_fraction("trail.fade_start", t.fade_start as f64)?;
        ConfigError::require_ordered("trail.min_size..max_size", t.min_size as f64, t.max_size as f64)?;
        ConfigError::require_positive("trail.texture_size", t.texture_size as f64)?;

        ConfigError::require_positive("session.report_every", self.session.report_every as f64)?;
        ConfigError::require_positive("session.snapshot_scale", self.session.snapshot_scale as f64)?;
        for segment in &self.session.script {
            for name in &segment.hold {
                if input::Control::from_name(name).is_none() {
                    return Err(ConfigError::UnknownName {
                        field: "session.script.hold",
                        value: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("flyover.ron")
}
