//! The container window: a purpose-built lightweight window that exists
//! solely to host one embedded foreign window.
//!
//! Its window procedure does exactly two things: on `WM_SIZE` it resizes
//! its single child to the new client area (preserving z-order, not
//! stealing focus), and it suppresses `WM_NCCALCSIZE` so the container
//! never grows a border or caption of its own.
//!
//! The window class is process-wide state. Registration is refcounted so
//! the first manager registers it and the last manager dropping
//! unregisters it.

use std::io;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use windows::Win32::{
    Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
    Graphics::Gdi::{BLACK_BRUSH, GetStockObject, HBRUSH},
    System::LibraryLoader::GetModuleHandleW,
    UI::WindowsAndMessaging::{
        CS_HREDRAW, CS_VREDRAW, CreateWindowExW, DefWindowProcW, DestroyWindow, GW_CHILD,
        GetWindow, HMENU, IDC_ARROW, IsWindow, LoadCursorW, RegisterClassW, UnregisterClassW,
        WINDOW_EX_STYLE, WM_NCCALCSIZE, WM_SIZE, WNDCLASSW, WS_CHILD, WS_CLIPCHILDREN,
        WS_CLIPSIBLINGS, WS_VISIBLE,
    },
};

use crate::{
    constants,
    error::{EmbedError, Result},
    reclassify,
};

static CLASS_USERS: Lazy<Mutex<usize>> = Lazy::new(|| Mutex::new(0));

/// Registers the container window class on first use.
pub(crate) fn acquire_container_class() -> Result<()> {
    let mut users = CLASS_USERS.lock();
    if *users == 0 {
        register_class()?;
    }
    *users += 1;
    Ok(())
}

/// Releases one use of the class; the last release unregisters it.
pub(crate) fn release_container_class() {
    let mut users = CLASS_USERS.lock();
    match *users {
        0 => warn!("[Container] class released without a matching acquire"),
        1 => {
            unregister_class();
            *users = 0;
        }
        _ => *users -= 1,
    }
}

fn register_class() -> Result<()> {
    let instance: HINSTANCE = unsafe { GetModuleHandleW(None) }
        .map_err(|_| EmbedError::ClassRegistration(io::Error::last_os_error()))?
        .into();
    let class = WNDCLASSW {
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(container_wnd_proc),
        hInstance: instance,
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default(),
        hbrBackground: HBRUSH(unsafe { GetStockObject(BLACK_BRUSH) }.0),
        lpszClassName: constants::CONTAINER_CLASS_NAME,
        ..Default::default()
    };
    if unsafe { RegisterClassW(&class) } == 0 {
        return Err(EmbedError::ClassRegistration(io::Error::last_os_error()));
    }
    info!("[Container] window class registered");
    Ok(())
}

fn unregister_class() {
    let Ok(instance) = (unsafe { GetModuleHandleW(None) }) else {
        return;
    };
    match unsafe { UnregisterClassW(constants::CONTAINER_CLASS_NAME, instance) } {
        Ok(()) => info!("[Container] window class unregistered"),
        Err(err) => warn!("[Container] UnregisterClassW failed: {err:?}"),
    }
}

/// Scoped owner of one container window.
///
/// Dropping destroys the window; the OS destruction cascade takes any
/// reparented child down with it, which is exactly how an embedded target
/// window is meant to disappear.
#[derive(Debug)]
pub struct ContainerWindow {
    hwnd: HWND,
}

impl ContainerWindow {
    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

impl Drop for ContainerWindow {
    fn drop(&mut self) {
        unsafe {
            if IsWindow(self.hwnd).as_bool() {
                let _ = DestroyWindow(self.hwnd);
            }
        }
    }
}

/// Creates a container child window of `parent` at the given rectangle.
/// The class must have been acquired first.
pub fn create_container(
    parent: HWND,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
) -> Result<ContainerWindow> {
    let instance = unsafe { GetModuleHandleW(None) }
        .map_err(|_| EmbedError::ContainerCreation(io::Error::last_os_error()))?;
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            constants::CONTAINER_CLASS_NAME,
            constants::CONTAINER_TITLE,
            WS_CHILD | WS_VISIBLE | WS_CLIPCHILDREN | WS_CLIPSIBLINGS,
            x,
            y,
            width,
            height,
            parent,
            HMENU::default(),
            instance,
            None,
        )
    };
    if hwnd.0 == 0 {
        return Err(EmbedError::ContainerCreation(io::Error::last_os_error()));
    }
    debug!("[Container] created {hwnd:?} under parent {parent:?}");
    Ok(ContainerWindow { hwnd })
}

unsafe extern "system" fn container_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_SIZE => {
            let child = unsafe { GetWindow(hwnd, GW_CHILD) };
            if child.0 != 0 {
                reclassify::fill_container(child, hwnd);
            }
            LRESULT(0)
        }
        // No non-client area, ever.
        WM_NCCALCSIZE => LRESULT(0),
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
