use serde::{Deserialize, Serialize};

use crate::api::types::Rgb;

/// Orbit camera limits and starting pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting azimuth (radians).
    pub azimuth: f32,
    /// Starting elevation (radians).
    pub elevation: f32,
    /// Starting distance from the target.
    pub radius: f32,
    /// Elevation is clamped to [-max_elevation, +max_elevation]; must stay below π/2.
    pub max_elevation: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Vertical field of view (degrees).
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            azimuth: 0.8,
            elevation: 0.35,
            radius: 58.0,
            max_elevation: 1.2,
            min_radius: 20.0,
            max_radius: 120.0,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Pointer sensitivities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Radians of azimuth per horizontal pixel dragged.
    pub azimuth_sensitivity: f32,
    /// Radians of elevation per vertical pixel dragged.
    pub elevation_sensitivity: f32,
    /// Radius units per wheel delta unit.
    pub zoom_sensitivity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            azimuth_sensitivity: 0.005,
            elevation_sensitivity: 0.004,
            zoom_sensitivity: 0.02,
        }
    }
}

/// Decoration and central-body parameters for the scene builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub star_count: usize,
    /// Edge length of the cube the stars are scattered in (centered on origin).
    pub star_extent: f32,
    pub star_color: Rgb,
    pub star_size: f32,
    pub star_opacity: f32,
    /// Seed for the starfield RNG.
    pub star_seed: u64,

    /// Line segments per orbit loop.
    pub orbit_segments: usize,
    pub orbit_color: Rgb,
    pub orbit_opacity: f32,

    pub sun_radius: f32,
    pub sun_color: Rgb,
    /// Self-rotation of the central body, radians per frame.
    pub sun_spin: f32,
    pub halo_radius: f32,
    pub halo_color: Rgb,
    pub halo_opacity: f32,

    pub ambient_color: Rgb,
    pub ambient_intensity: f32,
    pub light_color: Rgb,
    pub light_intensity: f32,

    /// Ring radii as multiples of the body radius.
    pub ring_inner: f32,
    pub ring_outer: f32,
    /// Ring tilt about the X axis (radians).
    pub ring_tilt: f32,
    pub ring_segments: usize,
    pub ring_color: Rgb,
    pub ring_opacity: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: 4000,
            star_extent: 1000.0,
            star_color: Rgb::from_hex(0x9bbcff),
            star_size: 0.7,
            star_opacity: 0.8,
            star_seed: 42,

            orbit_segments: 64,
            orbit_color: Rgb::from_hex(0x6aa7ff),
            orbit_opacity: 0.3,

            sun_radius: 5.0,
            sun_color: Rgb::from_hex(0xffcc66),
            sun_spin: 0.0015,
            halo_radius: 6.8,
            halo_color: Rgb::from_hex(0xffe6a3),
            halo_opacity: 0.25,

            ambient_color: Rgb::from_hex(0x8899ff),
            ambient_intensity: 0.6,
            light_color: Rgb::WHITE,
            light_intensity: 2.2,

            ring_inner: 1.7,
            ring_outer: 2.6,
            ring_tilt: std::f32::consts::PI / 2.4,
            ring_segments: 64,
            ring_color: Rgb::from_hex(0xe8d8a0),
            ring_opacity: 0.6,
        }
    }
}

/// How per-frame self-rotation rates are applied.
///
/// Orbital position is always a function of elapsed time. Spin is not:
/// `PerFrame` adds the body's rate once per rendered frame, so spin speed
/// follows the display refresh rate. `Timed` scales the rate by the frame's
/// wall-clock delta expressed in frames of `reference_fps`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SpinMode {
    PerFrame,
    Timed { reference_fps: f32 },
}

impl Default for SpinMode {
    fn default() -> Self {
        SpinMode::PerFrame
    }
}

/// Engine configuration. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub camera: CameraConfig,
    pub input: InputConfig,
    pub scene: SceneConfig,
    pub spin: SpinMode,
}

impl EngineConfig {
    /// Parse a (possibly partial) config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
