//! The embedding orchestrator and instance registry.
//!
//! `WindowManager` sequences launch → discovery → reclassification →
//! container attachment into one atomic-looking operation and keeps the
//! table of live instances. Every failure branch rolls back whatever was
//! already created, so a failed embed never leaves a process or a window
//! behind.
//!
//! The registry map itself sits behind a mutex and is safe to probe from
//! any thread, but the window operations (create/update/show/destroy) must
//! run on the thread that owns the host's message loop, the usual Win32
//! ownership rule. Discovery blocks its caller for up to the policy budget;
//! callers needing responsiveness invoke this from a worker context and
//! marshal results back.

use std::collections::HashMap;

use log::info;
use parking_lot::Mutex;
use windows::{
    Win32::{
        Foundation::HWND,
        Graphics::Gdi::UpdateWindow,
        UI::WindowsAndMessaging::{
            FindWindowExW, GWL_STYLE, GetWindowLongPtrW, IsWindow, SW_HIDE, SW_SHOW,
            SWP_NOACTIVATE, SWP_NOZORDER, SetWindowLongPtrW, SetWindowPos, ShowWindow,
            WS_CLIPCHILDREN, WS_CLIPSIBLINGS,
        },
    },
    core::PCWSTR,
};

use crate::{
    constants, container,
    discovery,
    error::{EmbedError, Result},
    ids::IdAllocator,
    instance::EmbeddedInstance,
    launcher::LaunchedProcess,
    options::{DiscoveryPolicy, EmbedOptions},
    reclassify,
};

/// Owns the embedded-instance registry and the container window class.
///
/// Construct one per host; dropping it destroys every remaining instance
/// and releases the window class, so no launched child outlives the
/// manager.
pub struct WindowManager {
    instances: Mutex<HashMap<String, EmbeddedInstance>>,
    ids: IdAllocator,
    policy: DiscoveryPolicy,
}

impl WindowManager {
    /// A manager with the default discovery policy (50 × 100 ms).
    pub fn new() -> Result<Self> {
        Self::with_policy(DiscoveryPolicy::default())
    }

    /// A manager with an explicit discovery budget; tests inject short ones.
    pub fn with_policy(policy: DiscoveryPolicy) -> Result<Self> {
        container::acquire_container_class()?;
        Ok(Self {
            instances: Mutex::new(HashMap::new()),
            ids: IdAllocator::new(),
            policy,
        })
    }

    /// Launches `options.exe_path` and embeds its top-level window into a
    /// container child of `parent` at the requested rectangle. Returns the
    /// new instance's id.
    ///
    /// All-or-nothing: on any failure the already-created container is
    /// destroyed and an already-launched process is terminated before the
    /// error is returned.
    pub fn create_embedded_window(&self, parent: HWND, options: &EmbedOptions) -> Result<String> {
        // 1) Validation; nothing is created or launched past this block.
        if !unsafe { IsWindow(parent) }.as_bool() {
            return Err(EmbedError::InvalidParent);
        }
        options.validate()?;

        // 2) Clipping styles on the parent (and its intermediate render
        //    child, if any) so host siblings do not paint over the embed.
        prepare_parent_window(parent)?;

        // 3) Container first; its scoped owner rolls later failures back.
        let container = container::create_container(
            parent,
            options.x,
            options.y,
            options.width,
            options.height,
        )?;

        // 4) Launch hidden.
        let process = LaunchedProcess::spawn_hidden(&options.exe_path, &options.command_line())?;

        // 5) Wait for the process to show a qualifying window.
        let Some(target) = discovery::wait_for_process_window(process.pid(), &self.policy, None)
        else {
            process.terminate(constants::PROCESS_EXIT_GRACE);
            return Err(EmbedError::DiscoveryTimeout {
                pid: process.pid(),
                attempts: self.policy.attempts,
                waited: self.policy.budget(),
            });
        };

        // 6) Reclassify it into the container.
        if let Err(err) = reclassify::embed_into_container(target, container.hwnd()) {
            process.terminate(constants::PROCESS_EXIT_GRACE);
            return Err(err);
        }

        // 7) Register and force-show.
        unsafe {
            ShowWindow(container.hwnd(), SW_SHOW);
            ShowWindow(target, SW_SHOW);
            let _ = UpdateWindow(container.hwnd());
            let _ = UpdateWindow(target);
        }
        let id = self.ids.next_id();
        info!(
            "[Manager] embedded `{}` (pid {}) as {id}",
            options.exe_path.display(),
            process.pid()
        );
        self.instances.lock().insert(
            id.clone(),
            EmbeddedInstance {
                target,
                process,
                container,
                path: options.exe_path.clone(),
                arguments: options.args.clone(),
                is_running: true,
            },
        );
        Ok(id)
    }

    /// Repositions/resizes the container (without changing activation or
    /// z-order) and refills the target. False if the id is unknown or the
    /// instance is no longer live.
    pub fn update_window(&self, id: &str, x: i32, y: i32, width: i32, height: i32) -> bool {
        let instances = self.instances.lock();
        let Some(instance) = instances.get(id) else {
            return false;
        };
        if !instance.is_running || !unsafe { IsWindow(instance.container.hwnd()) }.as_bool() {
            return false;
        }
        let _ = unsafe {
            SetWindowPos(
                instance.container.hwnd(),
                HWND(0),
                x,
                y,
                width,
                height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )
        };
        if unsafe { IsWindow(instance.target) }.as_bool() {
            reclassify::fill_container(instance.target, instance.container.hwnd());
        }
        true
    }

    /// Shows or hides container and target together. Idempotent. False if
    /// the id is unknown or the container window is gone.
    pub fn show_window(&self, id: &str, visible: bool) -> bool {
        let instances = self.instances.lock();
        let Some(instance) = instances.get(id) else {
            return false;
        };
        if !unsafe { IsWindow(instance.container.hwnd()) }.as_bool() {
            return false;
        }
        let cmd = if visible { SW_SHOW } else { SW_HIDE };
        unsafe {
            ShowWindow(instance.container.hwnd(), cmd);
            if IsWindow(instance.target).as_bool() {
                ShowWindow(instance.target, cmd);
            }
        }
        true
    }

    /// Destroys the instance: terminates the process (bounded wait for it
    /// to exit), closes its handles exactly once, and destroys the
    /// container; the OS destruction cascade removes the reparented
    /// target with it. False if the id is unknown.
    ///
    /// The registry entry is removed atomically with respect to the other
    /// registry operations; the blocking part of teardown runs after, off
    /// the lock.
    pub fn destroy_window(&self, id: &str) -> bool {
        let Some(instance) = self.instances.lock().remove(id) else {
            return false;
        };
        info!("[Manager] destroying {id} (pid {})", instance.process.pid());
        instance.teardown(constants::PROCESS_EXIT_GRACE);
        true
    }

    /// Currently registered ids, in no particular order.
    pub fn window_ids(&self) -> Vec<String> {
        self.instances.lock().keys().cloned().collect()
    }

    /// Destroys every registered instance. Idempotent; safe with none.
    pub fn cleanup_all(&self) {
        let ids = self.window_ids();
        if !ids.is_empty() {
            info!("[Manager] cleaning up {} instance(s)", ids.len());
        }
        for id in ids {
            self.destroy_window(&id);
        }
    }
}

impl Drop for WindowManager {
    fn drop(&mut self) {
        self.cleanup_all();
        container::release_container_class();
    }
}

/// Ensures the clipping styles the embed relies on: `WS_CLIPCHILDREN` on
/// the parent, and `WS_CLIPSIBLINGS` on the host's intermediate render
/// child when one exists.
fn prepare_parent_window(parent: HWND) -> Result<()> {
    if !unsafe { IsWindow(parent) }.as_bool() {
        return Err(EmbedError::ParentPreparation);
    }

    let renderer = unsafe {
        FindWindowExW(
            parent,
            HWND(0),
            constants::INTERMEDIATE_RENDER_CLASS,
            PCWSTR::null(),
        )
    };
    if renderer.0 != 0 {
        ensure_style_bit(renderer, WS_CLIPSIBLINGS.0 as isize);
    }

    ensure_style_bit(parent, WS_CLIPCHILDREN.0 as isize);
    Ok(())
}

fn ensure_style_bit(hwnd: HWND, bit: isize) {
    let style = unsafe { GetWindowLongPtrW(hwnd, GWL_STYLE) };
    if style & bit == 0 {
        unsafe { SetWindowLongPtrW(hwnd, GWL_STYLE, style | bit) };
    }
}
