//! Embeds the top-level window of an externally launched process into a
//! region of a host application's window, producing the effect of an
//! in-process "docked" external application.
//!
//! The embedding sequence:
//! - launch the executable hidden, with a fresh console context
//! - poll the top-level window list until the process shows a qualifying
//!   window (there is no "window ready" event to wait on)
//! - strip the window's top-level styles and reparent it into a purpose-built
//!   container child of the host window
//! - register the instance so it can be resized, shown/hidden, and torn down
//!
//! [`WindowManager`] owns the registry and the container window class;
//! construct one per host and keep it alive for as long as instances exist.
//! Windows-only: on other targets the crate exposes just the
//! platform-independent option/error types.

pub mod constants;
pub mod ids;

pub mod error;
pub mod options;

#[cfg(windows)]
mod container;
#[cfg(windows)]
pub mod discovery;
#[cfg(windows)]
mod instance;
#[cfg(windows)]
mod launcher;
#[cfg(windows)]
mod manager;
#[cfg(windows)]
mod reclassify;

use std::sync::Once;

use env_logger::{Builder, Env};
use log::LevelFilter;

pub use error::{EmbedError, Result};
pub use options::{DiscoveryPolicy, EmbedOptions};

#[cfg(windows)]
pub use manager::WindowManager;

// Re-initializing the logger from a second manager (or from tests) is an
// error in env_logger, so initialization is process-wide and one-shot.
static LOGGER_INIT: Once = Once::new();

/// Initializes `env_logger` once for the whole process. Optional; hosts
/// with their own logger setup can skip it.
pub fn init_logging() {
    LOGGER_INIT.call_once(|| {
        Builder::from_env(Env::default().default_filter_or("info"))
            .filter(None, LevelFilter::Info)
            .init();
    });
}
