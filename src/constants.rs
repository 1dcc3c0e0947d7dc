use std::time::Duration;

#[cfg(windows)]
use windows::core::{PCWSTR, w};

/// The Win32 window class name registered for container windows.
#[cfg(windows)]
pub const CONTAINER_CLASS_NAME: PCWSTR = w!("EmbeddedWindowContainer");

/// Title given to container windows. Containers never show a caption, the
/// title only aids debugging tools.
#[cfg(windows)]
pub const CONTAINER_TITLE: PCWSTR = w!("Container");

/// Class name of the intermediate rendering child some hosts keep inside
/// the parent window; it needs `WS_CLIPSIBLINGS` or it paints over the
/// embedded window.
#[cfg(windows)]
pub const INTERMEDIATE_RENDER_CLASS: PCWSTR = w!("Intermediate D3D Window");

/// Default width (in pixels) for an embedded region.
pub const DEFAULT_EMBED_WIDTH: i32 = 800;

/// Default height (in pixels) for an embedded region.
pub const DEFAULT_EMBED_HEIGHT: i32 = 600;

/// Default number of window-discovery enumeration passes.
pub const DISCOVERY_ATTEMPTS: u32 = 50;

/// Default spacing between window-discovery passes.
pub const DISCOVERY_INTERVAL: Duration = Duration::from_millis(100);

/// How long teardown waits for a terminated process to actually exit.
pub const PROCESS_EXIT_GRACE: Duration = Duration::from_millis(2000);
