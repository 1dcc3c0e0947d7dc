//! Turns a foreign top-level window into a child of a container.
//!
//! Order matters: styles are stripped *before* reparenting, because
//! reparenting a window that still carries top-level styles can leave
//! undecorated floating artifacts on some window managers. The operation is
//! idempotent on a window that is already reclassified.

use std::io;

use log::debug;
use windows::Win32::{
    Foundation::{GetLastError, HWND, RECT, SetLastError, WIN32_ERROR},
    Graphics::Gdi::UpdateWindow,
    UI::WindowsAndMessaging::{
        BringWindowToTop, GWL_EXSTYLE, GWL_STYLE, GetClientRect, GetWindowLongPtrW, HWND_TOP,
        SW_SHOW, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOZORDER, SWP_SHOWWINDOW, SetParent,
        SetWindowLongPtrW, SetWindowPos, ShowWindow, WS_CAPTION, WS_CHILD, WS_EX_CLIENTEDGE,
        WS_EX_DLGMODALFRAME, WS_EX_STATICEDGE, WS_EX_WINDOWEDGE, WS_POPUP, WS_THICKFRAME,
    },
};

use crate::error::{EmbedError, Result};

/// Strips `target`'s top-level framing, reparents it under `container`, and
/// sizes it to fill the container's client area, forcing a frame-style
/// recomputation and bringing it to the front.
pub fn embed_into_container(target: HWND, container: HWND) -> Result<()> {
    // 1) Strip top-level framing, make it a child.
    let style = unsafe { GetWindowLongPtrW(target, GWL_STYLE) };
    let new_style = (style
        & !(WS_POPUP.0 as isize | WS_CAPTION.0 as isize | WS_THICKFRAME.0 as isize))
        | WS_CHILD.0 as isize;
    unsafe { SetWindowLongPtrW(target, GWL_STYLE, new_style) };
    debug!("[Reclassify] target style {style:#x} -> {new_style:#x}");

    // 2) Clear the extended decoration styles.
    let ex_style = unsafe { GetWindowLongPtrW(target, GWL_EXSTYLE) };
    let new_ex_style = ex_style
        & !(WS_EX_DLGMODALFRAME.0 as isize
            | WS_EX_WINDOWEDGE.0 as isize
            | WS_EX_CLIENTEDGE.0 as isize
            | WS_EX_STATICEDGE.0 as isize);
    unsafe { SetWindowLongPtrW(target, GWL_EXSTYLE, new_ex_style) };

    // 3) Reparent. SetParent legitimately returns null when the window had
    //    no previous parent, so failure must be read from the thread error.
    unsafe { SetLastError(WIN32_ERROR(0)) };
    let previous = unsafe { SetParent(target, container) };
    let reparent_err = unsafe { GetLastError() };
    if previous.0 == 0 && reparent_err.0 != 0 {
        return Err(EmbedError::Reclassify(io::Error::last_os_error()));
    }

    // 4) Fill the client area, recompute the frame, show, bring to front.
    let mut rect = RECT::default();
    if unsafe { GetClientRect(container, &mut rect) }.is_ok() {
        let _ = unsafe {
            SetWindowPos(
                target,
                HWND_TOP,
                0,
                0,
                rect.right - rect.left,
                rect.bottom - rect.top,
                SWP_SHOWWINDOW | SWP_FRAMECHANGED,
            )
        };
    }
    unsafe {
        ShowWindow(target, SW_SHOW);
        let _ = BringWindowToTop(target);
        let _ = UpdateWindow(target);
    }
    debug!("[Reclassify] target {target:?} embedded into container {container:?}");
    Ok(())
}

/// Resizes `target` to exactly fill `container`'s client area, preserving
/// z-order and without stealing activation.
pub fn fill_container(target: HWND, container: HWND) {
    let mut rect = RECT::default();
    if unsafe { GetClientRect(container, &mut rect) }.is_ok() {
        let _ = unsafe {
            SetWindowPos(
                target,
                HWND(0),
                0,
                0,
                rect.right - rect.left,
                rect.bottom - rect.top,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        };
    }
}
