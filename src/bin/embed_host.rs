//! Minimal host application: embeds the executable named on the command
//! line into a plain Win32 window and pumps messages until the window is
//! closed.
//!
//! ```text
//! embed_host <exe-path> [child args...]
//! ```

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    win::run()
}

#[cfg(not(windows))]
fn main() {
    eprintln!("embed_host only runs on Windows");
    std::process::exit(1);
}

#[cfg(windows)]
mod win {
    use anyhow::{Context, bail};
    use app_embedder::{EmbedOptions, WindowManager, init_logging};
    use log::info;
    use windows::{
        Win32::{
            Foundation::{GetLastError, HWND, LPARAM, LRESULT, WPARAM},
            System::LibraryLoader::GetModuleHandleW,
            UI::WindowsAndMessaging::{
                CS_HREDRAW, CS_VREDRAW, CreateWindowExW, DefWindowProcW, DispatchMessageW,
                GetMessageW, HMENU, IDC_ARROW, LoadCursorW, MSG, PostQuitMessage, RegisterClassW,
                TranslateMessage, WINDOW_EX_STYLE, WM_DESTROY, WNDCLASSW, WS_CLIPCHILDREN,
                WS_OVERLAPPEDWINDOW, WS_VISIBLE,
            },
        },
        core::{PCWSTR, w},
    };

    const HOST_CLASS: PCWSTR = w!("AppEmbedderHost");

    unsafe extern "system" fn host_wnd_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_DESTROY => {
                unsafe { PostQuitMessage(0) };
                LRESULT(0)
            }
            _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
        }
    }

    fn create_host_window() -> anyhow::Result<HWND> {
        let instance = unsafe { GetModuleHandleW(None) }.context("GetModuleHandleW")?;
        let class = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(host_wnd_proc),
            hInstance: instance.into(),
            hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default(),
            lpszClassName: HOST_CLASS,
            ..Default::default()
        };
        if unsafe { RegisterClassW(&class) } == 0 {
            bail!("RegisterClassW failed: {:?}", unsafe { GetLastError() });
        }
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                HOST_CLASS,
                w!("app-embedder host"),
                WS_OVERLAPPEDWINDOW | WS_VISIBLE | WS_CLIPCHILDREN,
                100,
                100,
                1280,
                720,
                HWND(0),
                HMENU::default(),
                instance,
                None,
            )
        };
        if hwnd.0 == 0 {
            bail!("CreateWindowExW failed: {:?}", unsafe { GetLastError() });
        }
        Ok(hwnd)
    }

    pub fn run() -> anyhow::Result<()> {
        init_logging();

        let mut argv = std::env::args().skip(1);
        let Some(exe) = argv.next() else {
            bail!("usage: embed_host <exe-path> [child args...]");
        };
        let child_args = argv.collect::<Vec<_>>().join(" ");

        let parent = create_host_window()?;
        let manager = WindowManager::new()?;

        let mut options = EmbedOptions::new(&exe).bounds(0, 0, 1280, 720);
        if !child_args.is_empty() {
            options = options.args(child_args);
        }
        let id = manager
            .create_embedded_window(parent, &options)
            .with_context(|| format!("embedding `{exe}`"))?;
        info!("[Host] embedded `{exe}` as {id}");

        let mut msg = MSG::default();
        unsafe {
            while GetMessageW(&mut msg, HWND(0), 0, 0).as_bool() {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        manager.cleanup_all();
        Ok(())
    }
}
