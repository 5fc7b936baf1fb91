//! Drawing surface contract.
//!
//! The engine never talks to a graphics API directly. A host creates a
//! surface sized to its container; the viewport hands it the scene once to
//! upload resources, then one [`FrameData`] per frame.

use super::frame::FrameData;
use crate::api::types::ViewportSize;
use crate::core::scene::SceneGraph;

/// A drawing target owned by the viewport between start and stop.
///
/// # Example Implementation
///
/// ```ignore
/// struct CanvasSurface {
///     ctx: web_sys::CanvasRenderingContext2d,
///     // ...
/// }
///
/// impl Surface for CanvasSurface {
///     fn backend(&self) -> &'static str { "canvas2d" }
///
///     fn draw(&mut self, frame: &FrameData) {
///         // Fill discs, stroke polylines...
///     }
///     // ...
/// }
/// ```
pub trait Surface {
    /// Backend identifier (e.g., "canvas2d", "headless")
    fn backend(&self) -> &'static str;

    /// Upload or cache whatever the scene's resources need. Called once
    /// after the scene is built.
    fn prepare(&mut self, scene: &SceneGraph);

    /// Match a new container size. Never called with a degenerate size.
    fn resize(&mut self, size: ViewportSize);

    /// Draw one complete frame.
    fn draw(&mut self, frame: &FrameData);

    /// Drop cached resources and detach from the host. Called once on stop.
    fn release(&mut self);
}
