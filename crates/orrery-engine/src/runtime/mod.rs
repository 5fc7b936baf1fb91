//! Lifecycle and scheduling. Host services sit behind the [`Host`] trait,
//! implemented by the browser bridge and by the test mock.

pub mod host;
pub mod render_loop;
pub mod viewport;

#[cfg(test)]
pub(crate) mod mock;

pub use host::{FrameHandle, Host, ListenerHandle, ListenerKind, ListenerTarget};
pub use render_loop::{FrameTick, RenderLoop};
pub use viewport::{FrameContext, PickCallback, ReadyCallback, Viewport};
