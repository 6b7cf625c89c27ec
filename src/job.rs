//! Conversion job identity and lifecycle status.
//!
//! A [`ConversionJob`] exists only for the duration of one
//! [`crate::convert`] call — nothing here is persisted. The job's `name`
//! (the archive filename minus its `.zip` suffix) does double duty: it is
//! the subdirectory the archive is expected to extract into, and the
//! human-readable prefix of the job's scratch directory.
//!
//! The declared filename comes straight from the client, so it is
//! validated before it is ever used as a path segment.

use crate::error::ConvertError;
use std::path::PathBuf;
use uuid::Uuid;

/// Where a job currently is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Resetting,
    Extracting,
    Locating,
    Compiling,
    Collecting,
    Succeeded,
    Failed,
}

impl JobStatus {
    /// Stable lowercase name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resetting => "resetting",
            Self::Extracting => "extracting",
            Self::Locating => "locating",
            Self::Compiling => "compiling",
            Self::Collecting => "collecting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One conversion job: an uploaded archive plus its declared name.
///
/// The archive file is owned by the job for its duration and deleted by
/// the caller after the pipeline returns — the pipeline itself never
/// removes it.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Unique id; embedded in the workspace directory name so concurrent
    /// jobs can never collide on scratch state.
    pub id: Uuid,
    /// Path to the uploaded archive on local disk.
    pub archive_path: PathBuf,
    /// Client-declared filename, e.g. `report.zip`.
    pub original_name: String,
    /// `original_name` minus its `.zip` suffix; names the expected
    /// extraction subdirectory.
    pub name: String,
    /// Current pipeline position.
    pub status: JobStatus,
}

impl ConversionJob {
    /// Create a job from an uploaded archive and its declared name.
    ///
    /// # Errors
    /// [`ConvertError::InvalidJobName`] when the declared name is empty,
    /// a dot segment, or carries a path separator or NUL byte.
    pub fn new(
        archive_path: impl Into<PathBuf>,
        original_name: impl Into<String>,
    ) -> Result<Self, ConvertError> {
        let original_name = original_name.into();
        let name = job_name(&original_name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            archive_path: archive_path.into(),
            original_name,
            name,
            status: JobStatus::Pending,
        })
    }

    /// Directory name for this job's scratch workspace.
    pub fn workspace_dir_name(&self) -> String {
        format!("{}-{}", self.name, self.id)
    }
}

/// Derive the job name from the declared archive filename.
///
/// Strips a trailing `.zip` (any case). Names that could escape the
/// workspace root as a path segment are rejected rather than repaired, so
/// what the client sent is exactly what the extracted subdirectory must be
/// called.
pub fn job_name(original_name: &str) -> Result<String, ConvertError> {
    let invalid = || ConvertError::InvalidJobName {
        name: original_name.to_string(),
    };

    if original_name.contains(['/', '\\', '\0']) {
        return Err(invalid());
    }

    // get() rather than direct slicing: len-4 may not be a char boundary
    // for names ending in multibyte characters.
    let stem = match original_name.len().checked_sub(4) {
        Some(cut) => match original_name.get(cut..) {
            Some(tail) if tail.eq_ignore_ascii_case(".zip") => &original_name[..cut],
            _ => original_name,
        },
        None => original_name,
    };

    if stem.is_empty() || stem == "." || stem == ".." {
        return Err(invalid());
    }

    Ok(stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_zip_suffix() {
        assert_eq!(job_name("report.zip").unwrap(), "report");
        assert_eq!(job_name("Thesis.ZIP").unwrap(), "Thesis");
    }

    #[test]
    fn keeps_name_without_suffix() {
        assert_eq!(job_name("report").unwrap(), "report");
        assert_eq!(job_name("notes.tar").unwrap(), "notes.tar");
    }

    #[test]
    fn rejects_path_escapes() {
        assert!(job_name("../../etc.zip").is_err());
        assert!(job_name("a/b.zip").is_err());
        assert!(job_name("a\\b.zip").is_err());
        assert!(job_name("..").is_err());
        assert!(job_name(".zip").is_err());
        assert!(job_name("").is_err());
    }

    #[test]
    fn inner_dots_are_fine() {
        assert_eq!(job_name("v1.2-draft.zip").unwrap(), "v1.2-draft");
    }

    #[test]
    fn workspace_dir_name_embeds_id() {
        let job = ConversionJob::new("/tmp/up.zip", "report.zip").unwrap();
        let dir = job.workspace_dir_name();
        assert!(dir.starts_with("report-"));
        assert!(dir.len() > "report-".len());
        assert_eq!(job.status, JobStatus::Pending);
    }

    #[test]
    fn multibyte_names_survive_suffix_strip() {
        assert_eq!(job_name("bericht-ü.zip").unwrap(), "bericht-ü");
    }
}
