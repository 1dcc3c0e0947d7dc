//! Registry and orchestrator behavior that does not need an interactive
//! desktop: unknown-id probes, validation failures, and the
//! discovery-timeout rollback. The full embed of a GUI executable is kept
//! behind `#[ignore]`.

#![cfg(windows)]

use std::{sync::Once, time::Duration};

use app_embedder::{DiscoveryPolicy, EmbedError, EmbedOptions, WindowManager};
use windows::{
    Win32::{
        Foundation::{BOOL, CloseHandle, HWND, LPARAM, LRESULT, WAIT_OBJECT_0, WPARAM},
        System::{
            LibraryLoader::GetModuleHandleW,
            Threading::{OpenProcess, PROCESS_SYNCHRONIZE, WaitForSingleObject},
        },
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, HMENU, RegisterClassW,
            WINDOW_EX_STYLE, WNDCLASSW, WS_CLIPCHILDREN, WS_OVERLAPPEDWINDOW,
        },
    },
    core::{PCWSTR, w},
};

const TEST_HOST_CLASS: PCWSTR = w!("AppEmbedderTestHost");
static HOST_CLASS_INIT: Once = Once::new();

unsafe extern "system" fn test_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

/// A plain, hidden top-level window to act as the embed parent.
fn host_window() -> HWND {
    let instance = unsafe { GetModuleHandleW(None) }.unwrap();
    HOST_CLASS_INIT.call_once(|| {
        let class = WNDCLASSW {
            lpfnWndProc: Some(test_wnd_proc),
            hInstance: instance.into(),
            lpszClassName: TEST_HOST_CLASS,
            ..Default::default()
        };
        assert_ne!(unsafe { RegisterClassW(&class) }, 0);
    });
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            TEST_HOST_CLASS,
            w!("test host"),
            WS_OVERLAPPEDWINDOW | WS_CLIPCHILDREN,
            0,
            0,
            640,
            480,
            HWND(0),
            HMENU::default(),
            instance,
            None,
        )
    };
    assert_ne!(hwnd.0, 0, "test host window creation failed");
    hwnd
}

fn destroy_host(hwnd: HWND) {
    unsafe {
        let _ = DestroyWindow(hwnd);
    }
}

fn process_is_dead(pid: u32) -> bool {
    match unsafe { OpenProcess(PROCESS_SYNCHRONIZE, BOOL::from(false), pid) } {
        Ok(handle) => {
            let exited = unsafe { WaitForSingleObject(handle, 0) } == WAIT_OBJECT_0;
            unsafe {
                let _ = CloseHandle(handle);
            }
            exited
        }
        // No such pid anymore.
        Err(_) => true,
    }
}

fn cmd_exe() -> String {
    std::env::var("ComSpec").unwrap_or_else(|_| r"C:\Windows\System32\cmd.exe".into())
}

#[test]
fn unknown_ids_are_routine_false() {
    let manager = WindowManager::new().unwrap();
    assert!(!manager.update_window("embedded_999999", 0, 0, 10, 10));
    assert!(!manager.show_window("embedded_999999", true));
    assert!(!manager.destroy_window("embedded_999999"));
    assert!(manager.window_ids().is_empty());
    // idempotent with zero instances
    manager.cleanup_all();
    manager.cleanup_all();
}

#[test]
fn create_fails_fast_on_invalid_parent() {
    let manager = WindowManager::new().unwrap();
    let err = manager
        .create_embedded_window(HWND(0), &EmbedOptions::new("whatever.exe"))
        .unwrap_err();
    assert!(matches!(err, EmbedError::InvalidParent));
    assert!(manager.window_ids().is_empty());
}

#[test]
fn create_fails_fast_on_empty_path() {
    let parent = host_window();
    let manager = WindowManager::new().unwrap();
    let err = manager
        .create_embedded_window(parent, &EmbedOptions::new(""))
        .unwrap_err();
    assert!(matches!(err, EmbedError::EmptyExecutablePath));
    assert!(manager.window_ids().is_empty());
    destroy_host(parent);
}

#[test]
fn create_fails_fast_on_missing_executable() {
    let parent = host_window();
    let manager = WindowManager::new().unwrap();
    let missing = std::env::temp_dir().join("app-embedder-missing.exe");
    let err = manager
        .create_embedded_window(parent, &EmbedOptions::new(&missing))
        .unwrap_err();
    assert!(matches!(err, EmbedError::ExecutableNotFound(p) if p == missing));
    assert!(manager.window_ids().is_empty());
    destroy_host(parent);
}

#[test]
fn discovery_timeout_terminates_the_launched_process() {
    let parent = host_window();
    let policy = DiscoveryPolicy {
        attempts: 3,
        interval: Duration::from_millis(25),
    };
    let manager = WindowManager::with_policy(policy).unwrap();

    // A console-only child never shows a qualifying window: its (hidden)
    // console is excluded by class, so the budget must run out.
    let options = EmbedOptions::new(cmd_exe()).args("/d /k");
    let err = manager.create_embedded_window(parent, &options).unwrap_err();
    let EmbedError::DiscoveryTimeout { pid, attempts, .. } = err else {
        panic!("expected DiscoveryTimeout, got {err}");
    };
    assert_eq!(attempts, 3);
    assert!(process_is_dead(pid), "rollback left pid {pid} running");
    assert!(manager.window_ids().is_empty());
    destroy_host(parent);
}

#[test]
#[ignore = "requires an interactive desktop session and a GUI executable"]
fn embeds_resizes_and_destroys_a_gui_executable() {
    let exe = std::env::var("EMBED_TEST_EXE")
        .unwrap_or_else(|_| r"C:\Windows\System32\notepad.exe".into());
    let parent = host_window();
    let manager = WindowManager::new().unwrap();

    let id = manager
        .create_embedded_window(parent, &EmbedOptions::new(exe).bounds(0, 0, 640, 480))
        .unwrap();
    assert!(id.starts_with("embedded_"));
    assert_eq!(id.len(), "embedded_".len() + 6);

    assert!(manager.update_window(&id, 0, 0, 800, 600));
    assert!(manager.show_window(&id, true));
    // showing an already-visible instance is safe
    assert!(manager.show_window(&id, true));

    assert!(manager.destroy_window(&id));
    assert!(manager.window_ids().is_empty());
    assert!(!manager.destroy_window(&id));
    destroy_host(parent);
}
