//! Error types for the tex2pdf library.
//!
//! Every pipeline failure is a [`ConvertError`] tagged with the [`Stage`]
//! that produced it. The pipeline never retries and never recovers
//! partially: the first failing stage aborts the job, the caller decides
//! whether to resubmit. Stage tags let the HTTP layer translate a failure
//! into a meaningful status code and let log lines say *where* a job died
//! without parsing message text.
//!
//! Upload validation errors (wrong extension, oversize body) are not part
//! of this enum — they are rejected by the HTTP layer before a job exists.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// One discrete step of the conversion pipeline.
///
/// Used to tag [`ConvertError`] values and to label per-stage log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Workspace reset (delete + recreate the job directory).
    Reset,
    /// Archive extraction via the unpack tool.
    Extract,
    /// Locating the `.tex` source inside the job directory.
    Locate,
    /// Running the LaTeX compiler.
    Compile,
    /// Staging the produced PDF into durable storage.
    Collect,
}

impl Stage {
    /// Stable lowercase name, used in logs and HTTP error payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Extract => "extract",
            Self::Locate => "locate",
            Self::Compile => "compile",
            Self::Collect => "collect",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All errors returned by the conversion pipeline.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The declared archive name cannot be used as a path segment.
    ///
    /// Raised before any filesystem access, so a hostile name never
    /// reaches the workspace root.
    #[error("Invalid job name '{name}': must be a plain filename without path separators")]
    InvalidJobName { name: String },

    /// Deleting or recreating the job workspace failed.
    #[error("Failed to reset workspace '{path}': {source}")]
    WorkspaceReset {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The unpack tool failed or the archive is corrupt.
    ///
    /// The workspace is removed before this is returned, so a failed
    /// extraction never leaves a partially populated tree behind.
    #[error("Failed to extract '{archive}': {detail}")]
    Extraction { archive: PathBuf, detail: String },

    /// The unpack tool exceeded its deadline and was killed.
    #[error("Extraction of '{archive}' timed out after {secs}s")]
    ExtractionTimedOut { archive: PathBuf, secs: u64 },

    /// The job directory is missing or holds no `.tex` source.
    #[error("No LaTeX source found in '{dir}': {detail}")]
    SourceNotFound { dir: PathBuf, detail: String },

    /// The compiler exited with a nonzero status.
    ///
    /// `diagnostics` carries a bounded tail of the compiler's output —
    /// stderr when it wrote any, stdout otherwise (pdflatex reports most
    /// errors on stdout).
    #[error("Compilation of '{source_file}' failed with status {status}\n{diagnostics}")]
    CompilationFailed {
        source_file: PathBuf,
        status: i32,
        diagnostics: String,
    },

    /// The compiler exceeded its deadline and was killed.
    #[error("Compilation of '{source_file}' timed out after {secs}s")]
    CompilationTimedOut { source_file: PathBuf, secs: u64 },

    /// The compiler exited 0 but produced no `.pdf` in the job directory.
    #[error("Compiler produced no PDF artifact in '{dir}'")]
    ArtifactNotProduced { dir: PathBuf },

    /// Unexpected filesystem failure at any stage.
    #[error("I/O failure during {operation} on '{path}': {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConvertError {
    /// The stage this error is tagged with.
    ///
    /// `None` for [`ConvertError::InvalidJobName`], which fires before the
    /// pipeline proper starts, and for [`ConvertError::Io`], whose stage is
    /// not knowable from the variant alone.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::InvalidJobName { .. } | Self::Io { .. } | Self::InvalidConfig(_) => None,
            Self::WorkspaceReset { .. } => Some(Stage::Reset),
            Self::Extraction { .. } | Self::ExtractionTimedOut { .. } => Some(Stage::Extract),
            Self::SourceNotFound { .. } => Some(Stage::Locate),
            Self::CompilationFailed { .. } | Self::CompilationTimedOut { .. } => {
                Some(Stage::Compile)
            }
            Self::ArtifactNotProduced { .. } => Some(Stage::Collect),
        }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
