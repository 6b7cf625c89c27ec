//! The compiler stage: run pdflatex as a subprocess.
//!
//! ## Why stderr is not a failure signal
//!
//! pdflatex writes warnings (and under some distributions, font chatter)
//! to stderr on perfectly successful runs. The only trustworthy failure
//! signal is the exit status. Both streams are captured in full and
//! returned to the caller even on success, so warnings survive for
//! reporting without being promoted to errors.
//!
//! `-interaction=nonstopmode` keeps a syntax error from parking the
//! engine at its interactive `?` prompt; combined with the enforced
//! deadline, a broken document fails the job instead of hanging the
//! upload request.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::CompileOutput;
use crate::pipeline::tail;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Compile `source` with the output directory bound to `output_dir`.
///
/// The working directory is set to `output_dir` so `\input` and
/// `\includegraphics` of sibling files resolve the way they do when an
/// author runs the compiler by hand inside the project directory.
pub async fn compile(
    source: &Path,
    output_dir: &Path,
    config: &ConversionConfig,
) -> Result<CompileOutput, ConvertError> {
    debug!(
        "Running {} -interaction=nonstopmode -output-directory {} {}",
        config.latex_program,
        output_dir.display(),
        source.display()
    );

    let run = Command::new(&config.latex_program)
        .arg("-interaction=nonstopmode")
        .arg("-output-directory")
        .arg(output_dir)
        .arg(source)
        .current_dir(output_dir)
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(Duration::from_secs(config.compile_timeout_secs), run)
        .await
    {
        Err(_elapsed) => {
            return Err(ConvertError::CompilationTimedOut {
                source_file: source.to_path_buf(),
                secs: config.compile_timeout_secs,
            })
        }
        Ok(Err(e)) => {
            return Err(ConvertError::CompilationFailed {
                source_file: source.to_path_buf(),
                status: -1,
                diagnostics: format!("failed to run '{}': {}", config.latex_program, e),
            })
        }
        Ok(Ok(output)) => output,
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        let status = output.status.code().unwrap_or(-1);
        // pdflatex prints the fatal line on stdout; stderr is often empty.
        let noisy = if stderr.trim().is_empty() {
            &stdout
        } else {
            &stderr
        };
        return Err(ConvertError::CompilationFailed {
            source_file: source.to_path_buf(),
            status,
            diagnostics: tail(noisy.trim(), config.diagnostics_tail_bytes).to_string(),
        });
    }

    if !stderr.trim().is_empty() {
        // Non-fatal by contract; retained in the output for the caller.
        debug!("compiler stderr ({} bytes)", stderr.len());
    }

    info!("Compiled {}", source.display());
    Ok(CompileOutput { stdout, stderr })
}
