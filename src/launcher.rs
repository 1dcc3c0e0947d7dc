//! Hidden process launch with scoped handle ownership.
//!
//! A [`LaunchedProcess`] owns the process and primary-thread handles the OS
//! hands back; `Drop` closes both exactly once, on every exit path. The
//! child is started with its standard window hidden and a fresh console so
//! it never inherits the host's console.

use std::{ffi::OsStr, io, mem, os::windows::ffi::OsStrExt, path::Path, time::Duration};

use log::{debug, info, warn};
use windows::{
    Win32::{
        Foundation::{BOOL, CloseHandle, HANDLE, WAIT_OBJECT_0},
        System::Threading::{
            CREATE_NEW_CONSOLE, CreateProcessW, PROCESS_INFORMATION, STARTF_USESHOWWINDOW,
            STARTUPINFOW, TerminateProcess, WaitForSingleObject,
        },
        UI::WindowsAndMessaging::SW_HIDE,
    },
    core::{PCWSTR, PWSTR},
};

use crate::error::{EmbedError, Result};

/// Build a null-terminated UTF-16 string for Win32 APIs.
pub(crate) fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

/// An externally launched process and its OS handles.
///
/// The handles are owned by this value and closed when it is dropped.
/// Dropping does *not* terminate the process; every teardown path calls
/// [`LaunchedProcess::terminate`] explicitly first.
#[derive(Debug)]
pub struct LaunchedProcess {
    process: HANDLE,
    thread: HANDLE,
    pid: u32,
}

impl LaunchedProcess {
    /// Starts `path` hidden, with `command_line` as the full command line
    /// (quoted path plus arguments, see `EmbedOptions::command_line`).
    ///
    /// On failure nothing is left behind: no handles are produced.
    pub fn spawn_hidden(path: &Path, command_line: &str) -> Result<Self> {
        let wide_path = to_wide(path.as_os_str());
        // CreateProcessW may rewrite the command-line buffer in place.
        let mut wide_cmd = to_wide(OsStr::new(command_line));

        let startup = STARTUPINFOW {
            cb: mem::size_of::<STARTUPINFOW>() as u32,
            dwFlags: STARTF_USESHOWWINDOW,
            wShowWindow: SW_HIDE.0 as u16,
            ..Default::default()
        };
        let mut process_info = PROCESS_INFORMATION::default();

        unsafe {
            CreateProcessW(
                PCWSTR(wide_path.as_ptr()),
                PWSTR(wide_cmd.as_mut_ptr()),
                None,
                None,
                BOOL::from(false),
                CREATE_NEW_CONSOLE,
                None,
                PCWSTR::null(),
                &startup,
                &mut process_info,
            )
        }
        .map_err(|_| EmbedError::Launch {
            path: path.to_path_buf(),
            source: io::Error::last_os_error(),
        })?;

        info!(
            "[Launcher] started `{}` as pid {}",
            path.display(),
            process_info.dwProcessId
        );

        Ok(Self {
            process: process_info.hProcess,
            thread: process_info.hThread,
            pid: process_info.dwProcessId,
        })
    }

    /// Numeric process identifier, stable for the process's life.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Whether the process has already exited.
    pub fn has_exited(&self) -> bool {
        unsafe { WaitForSingleObject(self.process, 0) == WAIT_OBJECT_0 }
    }

    /// Forcibly terminates the process, then waits up to `grace` for it to
    /// actually exit. Safe to call on a process that has already exited.
    pub fn terminate(&self, grace: Duration) {
        unsafe {
            if let Err(err) = TerminateProcess(self.process, 0) {
                // Normal when the child exited on its own first.
                debug!("[Launcher] terminate pid {}: {err:?}", self.pid);
            }
            let wait = WaitForSingleObject(self.process, grace.as_millis() as u32);
            if wait == WAIT_OBJECT_0 {
                info!("[Launcher] pid {} exited", self.pid);
            } else {
                warn!(
                    "[Launcher] pid {} still running after {:?} grace",
                    self.pid, grace
                );
            }
        }
    }
}

impl Drop for LaunchedProcess {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.process);
            let _ = CloseHandle(self.thread);
        }
    }
}
