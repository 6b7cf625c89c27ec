//! Archive extraction via the unpack subprocess.
//!
//! The tool receives its arguments as a vector — the archive path and the
//! destination never pass through a shell, so filenames with
//! metacharacters cannot change the command. A failed or timed-out run
//! removes the destination tree before returning: a corrupt archive must
//! leave the workspace absent or empty, never partially populated where a
//! later stage could mistake leftovers for real input.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::pipeline::tail;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Unpack `archive` into `dest`, creating `dest` if absent.
pub async fn extract(
    archive: &Path,
    dest: &Path,
    config: &ConversionConfig,
) -> Result<(), ConvertError> {
    tokio::fs::create_dir_all(dest)
        .await
        .map_err(|e| ConvertError::io("create extraction dir", dest, e))?;

    debug!(
        "Running {} -o {} -d {}",
        config.unzip_program,
        archive.display(),
        dest.display()
    );

    let run = Command::new(&config.unzip_program)
        .arg("-o")
        .arg(archive)
        .arg("-d")
        .arg(dest)
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(Duration::from_secs(config.extract_timeout_secs), run)
        .await
    {
        Err(_elapsed) => {
            remove_partial(dest).await;
            return Err(ConvertError::ExtractionTimedOut {
                archive: archive.to_path_buf(),
                secs: config.extract_timeout_secs,
            });
        }
        Ok(Err(e)) => {
            remove_partial(dest).await;
            return Err(ConvertError::Extraction {
                archive: archive.to_path_buf(),
                detail: format!("failed to run '{}': {}", config.unzip_program, e),
            });
        }
        Ok(Ok(output)) => output,
    };

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        remove_partial(dest).await;
        let code = output.status.code().unwrap_or(-1);
        let detail = if stderr.trim().is_empty() {
            format!("unpack tool exited with status {code}")
        } else {
            format!(
                "unpack tool exited with status {code}: {}",
                tail(stderr.trim(), config.diagnostics_tail_bytes)
            )
        };
        return Err(ConvertError::Extraction {
            archive: archive.to_path_buf(),
            detail,
        });
    }

    // unzip lists extracted entries on stdout; useful at debug level only.
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!("unpack stdout: {}", stdout.trim());
    }
    if !stderr.trim().is_empty() {
        debug!("unpack stderr: {}", stderr.trim());
    }

    info!("Extracted {} into {}", archive.display(), dest.display());
    Ok(())
}

/// Remove whatever a failed extraction left behind, best-effort.
async fn remove_partial(dest: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(dest).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                "Failed to remove partial extraction at {}: {}",
                dest.display(),
                e
            );
        }
    }
}
