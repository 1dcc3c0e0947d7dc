//! Polling discovery of a launched process's top-level window.
//!
//! There is no "window ready" signal to wait on; the process creates its
//! window on its own schedule. Discovery therefore repolls the top-level
//! window list on a fixed budget and accepts the first window that belongs
//! to the process, is visible, is neither a console nor an IME window, and
//! has no owner (owned windows are tooltip/dialog satellites, not the
//! application window). Enumeration order is OS-defined, so "first
//! encountered" is the tie-break when a process shows several qualifying
//! windows.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use log::{debug, info};
use windows::Win32::{
    Foundation::{BOOL, FALSE, HWND, LPARAM, TRUE},
    UI::WindowsAndMessaging::{
        EnumWindows, GW_OWNER, GetClassNameW, GetWindow, GetWindowThreadProcessId,
        IsWindowVisible,
    },
};

use crate::options::DiscoveryPolicy;

/// Window classes that never qualify as an application's main window.
const EXCLUDED_CLASSES: [&str; 2] = ["ConsoleWindowClass", "IME"];

struct EnumContext {
    pid: u32,
    found: HWND,
}

unsafe extern "system" fn enum_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let ctx = unsafe { &mut *(lparam.0 as *mut EnumContext) };

    let mut pid = 0u32;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
    if pid != ctx.pid || !unsafe { IsWindowVisible(hwnd) }.as_bool() {
        return TRUE;
    }

    let mut class_buf = [0u16; 256];
    let len = unsafe { GetClassNameW(hwnd, &mut class_buf) }.max(0) as usize;
    let class = String::from_utf16_lossy(&class_buf[..len]);
    if EXCLUDED_CLASSES.contains(&class.as_str()) {
        return TRUE;
    }

    if unsafe { GetWindow(hwnd, GW_OWNER) }.0 != 0 {
        return TRUE;
    }

    ctx.found = hwnd;
    FALSE
}

/// Single enumeration pass for `pid`'s qualifying top-level window.
pub fn find_process_window(pid: u32) -> Option<HWND> {
    let mut ctx = EnumContext {
        pid,
        found: HWND(0),
    };
    // EnumWindows reports failure when the callback stops it early; that is
    // the success case here.
    let _ = unsafe { EnumWindows(Some(enum_proc), LPARAM(&mut ctx as *mut _ as isize)) };
    (ctx.found.0 != 0).then_some(ctx.found)
}

/// Repolls for `pid`'s window until found, the policy budget runs out, or
/// `cancel` is raised. Blocks the calling thread between passes.
///
/// `None` is an ordinary outcome (slow starters, console-only programs,
/// processes that never show a window), not a fault.
pub fn wait_for_process_window(
    pid: u32,
    policy: &DiscoveryPolicy,
    cancel: Option<&AtomicBool>,
) -> Option<HWND> {
    for attempt in 0..policy.attempts {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                info!("[Discovery] cancelled while waiting for pid {pid}");
                return None;
            }
        }
        if let Some(hwnd) = find_process_window(pid) {
            debug!(
                "[Discovery] pid {pid} window {:?} found on attempt {}",
                hwnd,
                attempt + 1
            );
            return Some(hwnd);
        }
        thread::sleep(policy.interval);
    }
    info!(
        "[Discovery] no qualifying window for pid {pid} after {} attempts",
        policy.attempts
    );
    None
}
