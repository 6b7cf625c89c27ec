//! Per-job scratch workspace lifecycle.
//!
//! ## Why per-job directories?
//!
//! The workspace root is process-wide, but every job gets its own
//! subdirectory named `<job>-<uuid>`. Two concurrent uploads therefore
//! extract and compile in disjoint trees — there is no shared scratch
//! state to race on, and no global lock serialising uploads.
//!
//! The directory is removed best-effort when the [`JobWorkspace`] drops,
//! whether the job succeeded or died mid-stage. Reset-before-use is still
//! the correctness guarantee; Drop cleanup just keeps the scratch root
//! from accumulating dead trees.

use crate::error::ConvertError;
use crate::job::ConversionJob;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Scratch directory for one job's extraction and compilation.
pub struct JobWorkspace {
    dir: PathBuf,
}

impl JobWorkspace {
    /// Allocate the workspace path for `job` under `workspace_root`.
    ///
    /// Nothing is created on disk until [`JobWorkspace::reset`] runs.
    pub fn new(workspace_root: &Path, job: &ConversionJob) -> Self {
        Self {
            dir: workspace_root.join(job.workspace_dir_name()),
        }
    }

    /// The workspace directory (extraction destination).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Delete the workspace tree if present, then recreate it empty.
    ///
    /// Idempotent when the directory is absent. Guarantees extraction
    /// starts from a clean slate even if a previous process left a
    /// same-named tree behind.
    pub async fn reset(&self) -> Result<(), ConvertError> {
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => debug!("Removed stale workspace {}", self.dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConvertError::WorkspaceReset {
                    path: self.dir.clone(),
                    source: e,
                })
            }
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ConvertError::WorkspaceReset {
                path: self.dir.clone(),
                source: e,
            })
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to clean up workspace {}: {}", self.dir.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::ConversionJob;

    fn job() -> ConversionJob {
        ConversionJob::new("/tmp/up.zip", "report.zip").unwrap()
    }

    #[tokio::test]
    async fn reset_creates_missing_dir() {
        let root = tempfile::tempdir().unwrap();
        let ws = JobWorkspace::new(root.path(), &job());
        assert!(!ws.dir().exists());

        ws.reset().await.unwrap();
        assert!(ws.dir().is_dir());
    }

    #[tokio::test]
    async fn reset_wipes_leftovers() {
        let root = tempfile::tempdir().unwrap();
        let ws = JobWorkspace::new(root.path(), &job());
        ws.reset().await.unwrap();
        std::fs::write(ws.dir().join("stale.pdf"), b"old run").unwrap();

        ws.reset().await.unwrap();
        assert!(ws.dir().is_dir());
        assert_eq!(std::fs::read_dir(ws.dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn reset_twice_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let ws = JobWorkspace::new(root.path(), &job());
        ws.reset().await.unwrap();
        ws.reset().await.unwrap();
        assert!(ws.dir().is_dir());
    }

    #[tokio::test]
    async fn distinct_jobs_get_distinct_dirs() {
        let root = tempfile::tempdir().unwrap();
        let a = JobWorkspace::new(root.path(), &job());
        let b = JobWorkspace::new(root.path(), &job());
        assert_ne!(a.dir(), b.dir());
    }

    #[tokio::test]
    async fn drop_removes_the_tree() {
        let root = tempfile::tempdir().unwrap();
        let dir = {
            let ws = JobWorkspace::new(root.path(), &job());
            ws.reset().await.unwrap();
            ws.dir().to_path_buf()
        };
        assert!(!dir.exists());
    }
}
