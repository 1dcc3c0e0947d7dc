//! Launch and discovery configuration.
//!
//! `EmbedOptions` mirrors the named-options object handed over by the
//! marshaling layer, so the field names follow its camelCase wire shape and
//! every field except `exePath` is defaulted.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    constants,
    error::{EmbedError, Result},
};

/// Parameters for one embedding request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbedOptions {
    /// Absolute path of the executable to launch.
    pub exe_path: PathBuf,
    /// Argument string appended verbatim to the command line.
    #[serde(default)]
    pub args: Option<String>,
    /// Placement of the container within the parent, client coordinates.
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
}

fn default_width() -> i32 {
    constants::DEFAULT_EMBED_WIDTH
}

fn default_height() -> i32 {
    constants::DEFAULT_EMBED_HEIGHT
}

impl EmbedOptions {
    /// Options for `exe_path` with default placement.
    pub fn new(exe_path: impl Into<PathBuf>) -> Self {
        Self {
            exe_path: exe_path.into(),
            args: None,
            x: 0,
            y: 0,
            width: default_width(),
            height: default_height(),
        }
    }

    /// Sets the argument string.
    pub fn args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    /// Sets the placement rectangle.
    pub fn bounds(mut self, x: i32, y: i32, width: i32, height: i32) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Fails fast on an empty or nonexistent executable path. No process is
    /// launched and no window is created when this fails.
    pub fn validate(&self) -> Result<()> {
        if self.exe_path.as_os_str().is_empty() {
            return Err(EmbedError::EmptyExecutablePath);
        }
        if !self.exe_path.is_file() {
            return Err(EmbedError::ExecutableNotFound(self.exe_path.clone()));
        }
        Ok(())
    }

    /// Assembles the command line: the quoted executable path, then the
    /// caller's argument string verbatim.
    pub fn command_line(&self) -> String {
        let mut cmd = format!("\"{}\"", self.exe_path.display());
        if let Some(args) = self.args.as_deref() {
            if !args.is_empty() {
                cmd.push(' ');
                cmd.push_str(args);
            }
        }
        cmd
    }
}

/// Retry budget for window discovery.
///
/// The defaults (50 attempts at 100 ms spacing, ~5 s total) match the
/// behavior most GUI applications need to show their first window; tests
/// inject much shorter budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryPolicy {
    /// Number of enumeration passes before giving up.
    pub attempts: u32,
    /// Sleep between passes.
    pub interval: Duration,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            attempts: constants::DISCOVERY_ATTEMPTS,
            interval: constants::DISCOVERY_INTERVAL,
        }
    }
}

impl DiscoveryPolicy {
    /// Total wall-clock time the policy may block the calling thread.
    pub fn budget(&self) -> Duration {
        self.interval * self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_shape_with_defaults() {
        let opts: EmbedOptions =
            serde_json::from_str(r#"{"exePath": "C:\\tools\\viewer.exe"}"#).unwrap();
        assert_eq!(opts.exe_path, PathBuf::from("C:\\tools\\viewer.exe"));
        assert_eq!(opts.args, None);
        assert_eq!((opts.x, opts.y), (0, 0));
        assert_eq!((opts.width, opts.height), (800, 600));
    }

    #[test]
    fn decodes_explicit_placement() {
        let opts: EmbedOptions = serde_json::from_str(
            r#"{"exePath": "viewer.exe", "args": "--fast", "x": 10, "y": 20, "width": 640, "height": 480}"#,
        )
        .unwrap();
        assert_eq!(opts.args.as_deref(), Some("--fast"));
        assert_eq!((opts.x, opts.y, opts.width, opts.height), (10, 20, 640, 480));
    }

    #[test]
    fn command_line_quotes_path_and_appends_args() {
        let opts = EmbedOptions::new("C:\\Program Files\\tool.exe").args("--a --b");
        assert_eq!(opts.command_line(), "\"C:\\Program Files\\tool.exe\" --a --b");
    }

    #[test]
    fn command_line_without_args_is_just_the_quoted_path() {
        let opts = EmbedOptions::new("tool.exe").args("");
        assert_eq!(opts.command_line(), "\"tool.exe\"");
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(
            EmbedOptions::new("").validate(),
            Err(EmbedError::EmptyExecutablePath)
        ));
    }

    #[test]
    fn missing_file_is_rejected() {
        let missing = std::env::temp_dir().join("app-embedder-does-not-exist.exe");
        assert!(matches!(
            EmbedOptions::new(&missing).validate(),
            Err(EmbedError::ExecutableNotFound(p)) if p == missing
        ));
    }

    #[test]
    fn existing_file_passes_validation() {
        let me = std::env::current_exe().unwrap();
        EmbedOptions::new(me).validate().unwrap();
    }

    #[test]
    fn default_policy_matches_documented_budget() {
        let policy = DiscoveryPolicy::default();
        assert_eq!(policy.attempts, 50);
        assert_eq!(policy.interval, Duration::from_millis(100));
        assert_eq!(policy.budget(), Duration::from_secs(5));
    }
}
