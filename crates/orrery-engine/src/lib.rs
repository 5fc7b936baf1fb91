pub mod api;
pub mod catalog;
pub mod components;
pub mod core;
pub mod error;
pub mod input;
pub mod renderer;
pub mod runtime;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{CameraConfig, EngineConfig, InputConfig, SceneConfig, SpinMode};
pub use api::types::{BodyId, Rgb, ViewportSize};
pub use catalog::{BodyDefinition, Catalog};
pub use components::mesh::{Geometry, Material, Mesh, Shading};
pub use components::node::SceneNode;
pub use core::resources::{GeometryId, MaterialId, ReleaseReport, ResourceLedger};
pub use core::scene::{CentralBody, OrbitPath, PickCandidate, SceneGraph};
pub use core::time::SimulationClock;
pub use error::{CatalogError, HostError, ViewportError};
pub use input::controller::{PointerController, PointerDragState};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::camera::{CameraLimits, CameraPose, CameraRig, CameraState, Projection};
pub use renderer::frame::{build_frame, FrameData};
pub use renderer::instance::DiscInstance;
pub use renderer::traits::Surface;
pub use runtime::{FrameHandle, Host, ListenerHandle, ListenerKind, ListenerTarget, Viewport};
pub use systems::lighting::{AmbientLight, LightState, PointLight};
pub use systems::picking::{pick, pixel_to_ndc, Ray};
pub use systems::scene_builder::build as build_scene;
