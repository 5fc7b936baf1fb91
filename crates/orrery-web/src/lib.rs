pub mod canvas;
pub mod host;
pub mod runner;

pub use canvas::CanvasSurface;
pub use host::WebHost;
pub use runner::{OrreryView, ViewConfig};

/// Install the panic hook and console logger. Safe to call on every mount.
pub(crate) fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
