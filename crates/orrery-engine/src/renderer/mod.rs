pub mod camera;
pub mod frame;
pub mod instance;
pub mod traits;

// Re-export key types for convenient access
pub use frame::{build_frame, build_frame_into, DrawItem, FrameData, Polyline};
pub use instance::{DiscInstance, QuadInstance, StarPoint};
pub use traits::Surface;
