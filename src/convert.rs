//! Conversion entry points.
//!
//! ## Why an explicit sequence?
//!
//! The five stages run strictly in order, each gating the next, composed
//! with `?` so the first failure aborts the rest. Compared to a chain of
//! callbacks this keeps failure propagation visible in one screen of code
//! and lets each stage be tested on its own. There is no partial
//! recovery: the remedial action for any failure is a fresh submission,
//! which starts from a workspace reset anyway.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::job::{ConversionJob, JobStatus};
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::{collect, compile, extract, locate, workspace::JobWorkspace};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert an uploaded archive into a stored PDF artifact.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `archive_path`  — the uploaded `.zip` on local disk. Owned by this
///   job for the duration of the call; the caller deletes it afterwards.
/// * `original_name` — the client-declared archive filename; its stem
///   names the extraction subdirectory the archive must contain.
///
/// # Errors
/// A stage-tagged [`ConvertError`]; see [`crate::error`] for the
/// taxonomy. Nothing is retried and no artifact is staged on failure.
pub async fn convert(
    archive_path: impl AsRef<Path>,
    original_name: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let total_start = Instant::now();
    let mut job = ConversionJob::new(archive_path.as_ref(), original_name)?;
    info!("Starting job {} for '{}'", job.id, job.original_name);

    let workspace = JobWorkspace::new(&config.workspace_root, &job);
    let result = run_stages(&mut job, &workspace, config, total_start).await;

    match &result {
        Ok(output) => {
            job.status = JobStatus::Succeeded;
            info!(
                "Job {} succeeded: {} ({} bytes, {}ms)",
                job.id,
                output.artifact.filename,
                output.artifact.size_bytes,
                output.stats.total_duration_ms
            );
        }
        Err(e) => {
            job.status = JobStatus::Failed;
            let stage = e.stage().map(|s| s.as_str()).unwrap_or("setup");
            warn!("Job {} failed at {}: {}", job.id, stage, e);
        }
    }
    // The workspace directory is removed when `workspace` drops here,
    // success or failure.
    result
}

/// The five stages proper. Split out so the caller can record the final
/// status in one place.
async fn run_stages(
    job: &mut ConversionJob,
    workspace: &JobWorkspace,
    config: &ConversionConfig,
    total_start: Instant,
) -> Result<ConversionOutput, ConvertError> {
    // ── Stage 1: Reset ───────────────────────────────────────────────────
    advance(job, JobStatus::Resetting);
    workspace.reset().await?;
    debug!("Workspace ready at {}", workspace.dir().display());

    // ── Stage 2: Extract ─────────────────────────────────────────────────
    advance(job, JobStatus::Extracting);
    let extract_start = Instant::now();
    extract::extract(&job.archive_path, workspace.dir(), config).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    // ── Stage 3: Locate ──────────────────────────────────────────────────
    advance(job, JobStatus::Locating);
    let job_dir = workspace.dir().join(&job.name);
    let source = locate::locate(&job_dir, &job.name)?;

    // ── Stage 4: Compile ─────────────────────────────────────────────────
    advance(job, JobStatus::Compiling);
    let compile_start = Instant::now();
    let compiler = compile::compile(&source, &job_dir, config).await?;
    let compile_duration_ms = compile_start.elapsed().as_millis() as u64;

    // ── Stage 5: Collect ─────────────────────────────────────────────────
    advance(job, JobStatus::Collecting);
    // pdflatex names its output after the source stem, so that stem is the
    // expected artifact name.
    let source_stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| job.name.clone());
    let artifact = collect::collect(&job_dir, &source_stem, &config.storage_dir).await?;

    Ok(ConversionOutput {
        artifact,
        compiler,
        stats: ConversionStats {
            extract_duration_ms,
            compile_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        },
    })
}

fn advance(job: &mut ConversionJob, status: JobStatus) {
    job.status = status;
    debug!("Job {} -> {}", job.id, status);
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally; for callers that are not
/// already async.
pub fn convert_sync(
    archive_path: impl AsRef<Path>,
    original_name: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::io("create runtime", archive_path.as_ref(), e))?
        .block_on(convert(archive_path, original_name, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hostile_name_fails_before_any_filesystem_access() {
        let scratch = tempfile::tempdir().unwrap();
        let config = ConversionConfig::builder()
            .workspace_root(scratch.path().join("ws"))
            .storage_dir(scratch.path().join("store"))
            .build()
            .unwrap();

        let err = convert("/tmp/whatever.zip", "../../escape.zip", &config)
            .await
            .unwrap_err();

        assert!(matches!(err, ConvertError::InvalidJobName { .. }));
        assert!(!scratch.path().join("ws").exists());
        assert!(!scratch.path().join("store").exists());
    }

    #[test]
    fn convert_sync_reports_missing_unpack_tool() {
        let scratch = tempfile::tempdir().unwrap();
        let archive = scratch.path().join("doc.zip");
        std::fs::write(&archive, b"not a real zip").unwrap();
        let config = ConversionConfig::builder()
            .workspace_root(scratch.path().join("ws"))
            .storage_dir(scratch.path().join("store"))
            .unzip_program(scratch.path().join("no-such-tool").display().to_string())
            .build()
            .unwrap();

        let err = convert_sync(&archive, "doc.zip", &config).unwrap_err();
        assert!(matches!(err, ConvertError::Extraction { .. }), "got {err}");
    }
}
