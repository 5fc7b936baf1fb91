//! Scene lighting: one ambient fill plus omnidirectional point lights.
//!
//! Lights are created once by the scene builder and never move.

use glam::Vec3;

use crate::api::types::Rgb;

/// An omnidirectional light with no falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Rgb,
    pub intensity: f32,
}

impl PointLight {
    pub fn new(position: Vec3, color: Rgb, intensity: f32) -> Self {
        Self { position, color, intensity }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

/// Active lights for the scene.
pub struct LightState {
    lights: Vec<PointLight>,
    ambient: AmbientLight,
}

impl LightState {
    pub fn new(ambient: AmbientLight) -> Self {
        Self {
            lights: Vec::new(),
            ambient,
        }
    }

    pub fn add(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    pub fn ambient(&self) -> AmbientLight {
        self.ambient
    }

    /// Lambert color of a sphere point seen by the viewer.
    ///
    /// `normal` is the surface normal at the shaded point (unit length).
    /// Light colors are scaled by intensity and clamped to [0, 1] per channel.
    pub fn shade(&self, base: Rgb, point: Vec3, normal: Vec3) -> Rgb {
        let a = self.ambient;
        let mut r = a.color.r * a.intensity;
        let mut g = a.color.g * a.intensity;
        let mut b = a.color.b * a.intensity;
        for light in &self.lights {
            let to_light = (light.position - point).normalize_or_zero();
            let lambert = normal.dot(to_light).max(0.0) * light.intensity;
            r += light.color.r * lambert;
            g += light.color.g * lambert;
            b += light.color.b * lambert;
        }
        Rgb::new(
            (base.r * r).clamp(0.0, 1.0),
            (base.g * g).clamp(0.0, 1.0),
            (base.b * b).clamp(0.0, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark() -> LightState {
        LightState::new(AmbientLight { color: Rgb::WHITE, intensity: 0.0 })
    }

    #[test]
    fn facing_light_is_brighter_than_facing_away() {
        let mut state = dark();
        state.add(PointLight::new(Vec3::ZERO, Rgb::WHITE, 1.0));
        let base = Rgb::new(0.5, 0.5, 0.5);
        let p = Vec3::new(10.0, 0.0, 0.0);
        let lit = state.shade(base, p, Vec3::NEG_X);
        let unlit = state.shade(base, p, Vec3::X);
        assert!((lit.r - 0.5).abs() < 1e-6);
        assert_eq!(unlit.r, 0.0);
    }

    #[test]
    fn ambient_only() {
        let state = LightState::new(AmbientLight { color: Rgb::new(1.0, 0.5, 0.0), intensity: 0.5 });
        let c = state.shade(Rgb::WHITE, Vec3::ZERO, Vec3::Y);
        assert!((c.r - 0.5).abs() < 1e-6);
        assert!((c.g - 0.25).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(state.count(), 0);
    }

    #[test]
    fn shade_clamps_hdr_intensity() {
        let mut state = dark();
        state.add(PointLight::new(Vec3::ZERO, Rgb::WHITE, 2.2));
        let c = state.shade(Rgb::WHITE, Vec3::X * 5.0, Vec3::NEG_X);
        assert_eq!(c, Rgb::WHITE);
    }
}
