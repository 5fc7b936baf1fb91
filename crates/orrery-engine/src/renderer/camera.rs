use glam::{Mat4, Vec3, Vec4};

use crate::api::config::CameraConfig;
use crate::api::types::ViewportSize;

/// Hard ceiling for elevation; keeps the view basis away from the pole.
const POLE_MARGIN: f32 = 1e-3;

/// Clamp ranges for the orbit camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLimits {
    pub max_elevation: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl CameraLimits {
    /// Sanitize: elevation strictly inside ±π/2, radius range ordered and positive.
    pub fn new(max_elevation: f32, min_radius: f32, max_radius: f32) -> Self {
        let max_elevation = max_elevation
            .abs()
            .min(std::f32::consts::FRAC_PI_2 - POLE_MARGIN);
        let min_radius = min_radius.max(f32::EPSILON);
        let max_radius = max_radius.max(min_radius);
        Self { max_elevation, min_radius, max_radius }
    }

    fn clamp_elevation(&self, elevation: f32) -> f32 {
        if elevation.is_nan() {
            return 0.0;
        }
        elevation.clamp(-self.max_elevation, self.max_elevation)
    }

    fn clamp_radius(&self, radius: f32) -> f32 {
        if radius.is_nan() {
            return self.min_radius;
        }
        radius.clamp(self.min_radius, self.max_radius)
    }
}

/// Spherical camera coordinates around a fixed target.
/// Elevation and radius are within their limits after every mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    azimuth: f32,
    elevation: f32,
    radius: f32,
    target: Vec3,
}

impl CameraState {
    pub fn new(azimuth: f32, elevation: f32, radius: f32, limits: &CameraLimits) -> Self {
        Self {
            azimuth,
            elevation: limits.clamp_elevation(elevation),
            radius: limits.clamp_radius(radius),
            target: Vec3::ZERO,
        }
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }
}

/// Derived camera pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Spherical to Cartesian, always looking at the target.
pub fn recompute_pose(state: &CameraState) -> CameraPose {
    let (sin_el, cos_el) = state.elevation.sin_cos();
    let (sin_az, cos_az) = state.azimuth.sin_cos();
    let r = state.radius;
    let t = state.target;
    CameraPose {
        position: Vec3::new(
            t.x + r * cos_el * cos_az,
            t.y + r * sin_el,
            t.z + r * cos_el * sin_az,
        ),
        look_at: t,
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view (radians).
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Orbit camera: owns the spherical state and the derived pose.
///
/// The pose is recomputed once per frame after input has been applied.
pub struct CameraRig {
    state: CameraState,
    limits: CameraLimits,
    projection: Projection,
    pose: CameraPose,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        let limits = CameraLimits::new(config.max_elevation, config.min_radius, config.max_radius);
        let state = CameraState::new(config.azimuth, config.elevation, config.radius, &limits);
        Self {
            pose: recompute_pose(&state),
            state,
            limits,
            projection: Projection {
                fov_y: config.fov_y_degrees.to_radians(),
                aspect: 1.0,
                near: config.near,
                far: config.far,
            },
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn limits(&self) -> &CameraLimits {
        &self.limits
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Pose as of the last [`CameraRig::update`].
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Add to azimuth and elevation (radians). Elevation is clamped.
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        if d_azimuth.is_finite() {
            self.state.azimuth = (self.state.azimuth + d_azimuth) % std::f32::consts::TAU;
        }
        self.state.elevation = self.limits.clamp_elevation(self.state.elevation + d_elevation);
    }

    /// Add to the radius. Clamped to the configured range.
    pub fn dolly(&mut self, d_radius: f32) {
        self.state.radius = self.limits.clamp_radius(self.state.radius + d_radius);
    }

    /// Track a new viewport size. Degenerate sizes leave the aspect untouched.
    /// Returns whether the aspect was updated.
    pub fn set_viewport(&mut self, size: ViewportSize) -> bool {
        match size.aspect() {
            Some(aspect) => {
                self.projection.aspect = aspect;
                true
            }
            None => false,
        }
    }

    /// Recompute the pose from the current state.
    pub fn update(&mut self) -> CameraPose {
        self.pose = recompute_pose(&self.state);
        self.pose
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.pose.position, self.pose.look_at, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.view_matrix()
    }

    /// World-space point on the near (`depth` = 0) or far (`depth` = 1) plane
    /// under normalized device coordinates `(ndc_x, ndc_y)`.
    pub fn unproject(&self, ndc_x: f32, ndc_y: f32, depth: f32) -> Vec3 {
        let inv = self.view_projection().inverse();
        let p = inv * Vec4::new(ndc_x, ndc_y, depth, 1.0);
        p.truncate() / p.w
    }
}
