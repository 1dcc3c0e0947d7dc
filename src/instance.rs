//! Registry record for one embedded application.

use std::{path::PathBuf, time::Duration};

use windows::Win32::Foundation::HWND;

use crate::{container::ContainerWindow, launcher::LaunchedProcess};

/// The full state of one embedded instance.
///
/// The process handles and the container window are owned through their
/// scoped wrappers. `target` is borrowed: its lifetime belongs to the
/// launched process, and the registry only tracks it for positioning and
/// visibility. It is never destroyed directly, only removed by the OS
/// cascade when the container goes away.
///
/// Field order is teardown order: the process handles close before the
/// container window is destroyed.
#[derive(Debug)]
pub struct EmbeddedInstance {
    pub target: HWND,
    pub process: LaunchedProcess,
    pub container: ContainerWindow,
    /// Launch parameters, retained for diagnostics.
    pub path: PathBuf,
    pub arguments: Option<String>,
    /// True only after a successful full embed; cleared at the start of
    /// teardown to stop re-entrant operations.
    pub is_running: bool,
}

impl EmbeddedInstance {
    /// Terminates the process (waiting up to `grace` for it to exit), then
    /// lets the scoped owners release the handles and destroy the
    /// container.
    pub fn teardown(mut self, grace: Duration) {
        self.is_running = false;
        self.process.terminate(grace);
    }
}
