//! Artifact staging: move the produced PDF into durable storage.
//!
//! ## Why copy via a temp sibling?
//!
//! The storage directory is listed and served concurrently with uploads
//! in flight. Writing the PDF straight to its final name would let a
//! listing (or a download) observe a half-written file. Instead the bytes
//! go into a uniquely-named temp file in the same directory, which is then
//! renamed into place — readers see either nothing or the complete
//! artifact.

use crate::error::ConvertError;
use crate::output::StoredArtifact;
use crate::pipeline::locate::pick_by_extension;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stage the PDF produced in `dir` into `storage_dir`.
///
/// Selection follows the same deterministic policy as the source locator:
/// a stem matching `expected_stem` wins, else the lexicographically first
/// `.pdf`.
pub async fn collect(
    dir: &Path,
    expected_stem: &str,
    storage_dir: &Path,
) -> Result<StoredArtifact, ConvertError> {
    let produced = pick_by_extension(dir, "pdf", expected_stem)
        .map_err(|e| ConvertError::io("list artifacts", dir, e))?
        .ok_or_else(|| ConvertError::ArtifactNotProduced {
            dir: dir.to_path_buf(),
        })?;

    tokio::fs::create_dir_all(storage_dir)
        .await
        .map_err(|e| ConvertError::io("create storage dir", storage_dir, e))?;

    let filename = produced
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ConvertError::ArtifactNotProduced {
            dir: dir.to_path_buf(),
        })?;
    let dest = storage_dir.join(&filename);

    debug!("Staging {} -> {}", produced.display(), dest.display());

    // The copy is blocking file I/O; keep it off the async workers.
    let (src, storage, target) = (produced.clone(), storage_dir.to_path_buf(), dest.clone());
    tokio::task::spawn_blocking(move || stage_atomic(&src, &storage, &target))
        .await
        .map_err(|e| ConvertError::io("stage artifact", &dest, io::Error::other(e)))?
        .map_err(|e| ConvertError::io("stage artifact", &dest, e))?;

    let meta = tokio::fs::metadata(&dest)
        .await
        .map_err(|e| ConvertError::io("stat artifact", &dest, e))?;
    let modified: DateTime<Utc> = meta.modified().map(Into::into).unwrap_or_else(|_| Utc::now());

    info!("Stored artifact {} ({} bytes)", dest.display(), meta.len());

    Ok(StoredArtifact {
        filename,
        path: dest,
        size_bytes: meta.len(),
        modified,
    })
}

/// Copy `src` into `storage_dir` as a temp file, then rename to `dest`.
fn stage_atomic(src: &PathBuf, storage_dir: &Path, dest: &PathBuf) -> io::Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".staging-")
        .tempfile_in(storage_dir)?;
    let mut reader = std::fs::File::open(src)?;
    io::copy(&mut reader, tmp.as_file_mut())?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &[u8]) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn stages_the_produced_pdf() {
        let job = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        write(job.path(), "report.pdf", b"%PDF-1.5 fake");
        write(job.path(), "report.log", b"noise");

        let artifact = collect(job.path(), "report", storage.path()).await.unwrap();

        assert_eq!(artifact.filename, "report.pdf");
        assert_eq!(artifact.size_bytes, 13);
        let staged = std::fs::read(storage.path().join("report.pdf")).unwrap();
        assert_eq!(staged, b"%PDF-1.5 fake");
    }

    #[tokio::test]
    async fn no_temp_leftovers_after_staging() {
        let job = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        write(job.path(), "report.pdf", b"bytes");

        collect(job.path(), "report", storage.path()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(storage.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["report.pdf".to_string()]);
    }

    #[tokio::test]
    async fn empty_dir_is_artifact_not_produced() {
        let job = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        write(job.path(), "report.log", b"log only");

        let err = collect(job.path(), "report", storage.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::ArtifactNotProduced { .. }));
        assert_eq!(std::fs::read_dir(storage.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn stem_match_beats_sort_order() {
        let job = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        write(job.path(), "appendix.pdf", b"a");
        write(job.path(), "report.pdf", b"r");

        let artifact = collect(job.path(), "report", storage.path()).await.unwrap();
        assert_eq!(artifact.filename, "report.pdf");
    }

    #[tokio::test]
    async fn restaging_overwrites_previous_artifact() {
        let job = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        write(job.path(), "report.pdf", b"first");
        collect(job.path(), "report", storage.path()).await.unwrap();

        write(job.path(), "report.pdf", b"second run");
        let artifact = collect(job.path(), "report", storage.path()).await.unwrap();

        assert_eq!(artifact.size_bytes, 10);
        let staged = std::fs::read(storage.path().join("report.pdf")).unwrap();
        assert_eq!(staged, b"second run");
    }

    #[tokio::test]
    async fn missing_storage_dir_is_created() {
        let job = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        let nested = storage.path().join("artifacts");
        write(job.path(), "report.pdf", b"x");

        collect(job.path(), "report", &nested).await.unwrap();
        assert!(nested.join("report.pdf").is_file());
    }
}
