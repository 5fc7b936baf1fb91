use bytemuck::{Pod, Zeroable};

/// One shaded sphere projected to the screen.
/// 16 floats = 64 bytes stride; pixel coordinates, origin top-left.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DiscInstance {
    pub x: f32,
    pub y: f32,
    /// Screen radius in pixels.
    pub radius: f32,
    /// View-space distance of the center; larger is farther.
    pub depth: f32,
    /// Color of the most brightly lit point.
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
    /// Color of the unlit side (ambient only).
    pub shadow_r: f32,
    pub shadow_g: f32,
    pub shadow_b: f32,
    /// Screen-space offset toward the light, in units of `radius`.
    pub highlight_x: f32,
    pub highlight_y: f32,
    /// Self-rotation phase (radians).
    pub spin: f32,
    /// 1.0 when lit by the scene lights, 0.0 for flat color.
    pub shaded: f32,
    /// Material index in the scene's resource ledger.
    pub material: f32,
}

impl DiscInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn is_shaded(&self) -> bool {
        self.shaded > 0.5
    }
}

/// One segment of a flat ring, as a screen-space quad.
/// 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    /// Corners in winding order: inner, outer, next outer, next inner.
    pub points: [[f32; 2]; 4],
    pub depth: f32,
    pub material: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl QuadInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// One background star.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct StarPoint {
    pub x: f32,
    pub y: f32,
    /// Point diameter in pixels.
    pub size: f32,
    pub _pad: f32,
}
