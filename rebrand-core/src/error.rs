use std::path::PathBuf;
use thiserror::Error;

/// Typed failures raised at module seams.
///
/// Most per-file problems never surface as a `RebrandError`: they are
/// recorded in [`crate::RebrandStats`] and the batch carries on. These
/// variants cover what a phase or a rename step reports upward.
#[derive(Debug, Error)]
pub enum RebrandError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {root}: {message}")]
    Walk { root: PathBuf, message: String },

    #[error("rename target already exists: {target}")]
    RenameConflict { source_path: PathBuf, target: PathBuf },

    #[error("version control move failed: {0}")]
    Vcs(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("interrupted by user")]
    Interrupted,
}

impl RebrandError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the one error that must stop the run instead of being
    /// recorded against a phase.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

/// Walk a chain of `anyhow` causes looking for an interrupt.
pub fn is_interrupt(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<RebrandError>()
            .is_some_and(RebrandError::is_interrupt)
    })
}
