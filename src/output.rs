//! Result types returned by a successful conversion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A finished PDF staged in durable storage.
///
/// Attributes are read from filesystem metadata at staging time; the file
/// itself is never mutated afterwards — only deleted by an explicit
/// delete request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredArtifact {
    /// Bare filename inside the storage directory, e.g. `report.pdf`.
    pub filename: String,
    /// Full filesystem path of the stored file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Modification timestamp of the stored file.
    pub modified: DateTime<Utc>,
}

/// Captured output streams of a compiler run.
///
/// Kept even on success: pdflatex legitimately writes warnings to stderr,
/// and callers may want to surface them without treating them as failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Wall-clock timings for one pipeline run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Time spent extracting the archive, in milliseconds.
    pub extract_duration_ms: u64,
    /// Time spent inside the compiler, in milliseconds.
    pub compile_duration_ms: u64,
    /// End-to-end pipeline time, in milliseconds.
    pub total_duration_ms: u64,
}

/// Everything a successful conversion produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The staged PDF.
    pub artifact: StoredArtifact,
    /// Compiler streams, warnings included.
    pub compiler: CompileOutput,
    /// Per-stage and total timings.
    pub stats: ConversionStats,
}
