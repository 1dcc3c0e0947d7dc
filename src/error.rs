//! Error taxonomy for the embedding sequence.
//!
//! Only `create_embedded_window` speaks in these errors. The steady-state
//! per-id registry operations (update/show/destroy) return plain booleans
//! instead, because callers routinely probe liveness with unknown ids and
//! that is not an exceptional outcome.

use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

/// Failure modes of a single embedding attempt.
///
/// # Error Categories
///
/// ## Validation (no OS side effects attempted)
/// - [`EmbedError::InvalidParent`] - Parent handle is not a live window
/// - [`EmbedError::EmptyExecutablePath`] - No executable path given
/// - [`EmbedError::ExecutableNotFound`] - Path does not resolve to a file
///
/// ## Resource creation (rolled back before returning)
/// - [`EmbedError::ParentPreparation`] - Parent clipping styles could not be set
/// - [`EmbedError::ClassRegistration`] - Container window class registration rejected
/// - [`EmbedError::ContainerCreation`] - Container window creation rejected
/// - [`EmbedError::Launch`] - Process creation rejected by the OS
///
/// ## Discovery / embedding (launched process is terminated before returning)
/// - [`EmbedError::DiscoveryTimeout`] - No qualifying window appeared in budget
/// - [`EmbedError::Reclassify`] - Reparenting the discovered window failed
#[derive(Error, Debug)]
pub enum EmbedError {
    /// The supplied parent handle does not refer to a live window.
    #[error("invalid parent window handle")]
    InvalidParent,

    /// The executable path was empty.
    #[error("executable path cannot be empty")]
    EmptyExecutablePath,

    /// The executable path does not resolve to an existing file.
    #[error("executable file not found: {}", .0.display())]
    ExecutableNotFound(PathBuf),

    /// The parent window could not be prepared for hosting a child.
    #[error("failed to prepare parent window")]
    ParentPreparation,

    /// Registering the container window class was rejected by the OS.
    #[error("failed to register container window class")]
    ClassRegistration(#[source] io::Error),

    /// Creating the container window was rejected by the OS.
    #[error("failed to create container window")]
    ContainerCreation(#[source] io::Error),

    /// The OS refused to create the process.
    #[error("failed to launch process `{}`", .path.display())]
    Launch {
        /// Executable that was being launched.
        path: PathBuf,
        /// OS error reported by process creation.
        source: io::Error,
    },

    /// The launched process never showed a qualifying top-level window
    /// within the discovery budget. The process has already been terminated
    /// when this is returned.
    #[error("no embeddable window found for process {pid} after {attempts} attempts ({waited:?})")]
    DiscoveryTimeout {
        /// Process identifier that was being searched for.
        pid: u32,
        /// Number of enumeration attempts made.
        attempts: u32,
        /// Total wall-clock budget that was spent.
        waited: Duration,
    },

    /// Reparenting the discovered window into the container failed.
    #[error("failed to embed target window")]
    Reclassify(#[source] io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EmbedError>;

impl EmbedError {
    /// True for errors reported before any OS resource was touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EmbedError::InvalidParent
                | EmbedError::EmptyExecutablePath
                | EmbedError::ExecutableNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_timeout_names_the_budget() {
        let err = EmbedError::DiscoveryTimeout {
            pid: 4242,
            attempts: 50,
            waited: Duration::from_secs(5),
        };
        let text = err.to_string();
        assert!(text.contains("4242"));
        assert!(text.contains("50 attempts"));
    }

    #[test]
    fn validation_classification() {
        assert!(EmbedError::InvalidParent.is_validation());
        assert!(EmbedError::ExecutableNotFound(PathBuf::from("x.exe")).is_validation());
        assert!(
            !EmbedError::DiscoveryTimeout {
                pid: 1,
                attempts: 1,
                waited: Duration::ZERO
            }
            .is_validation()
        );
    }
}
