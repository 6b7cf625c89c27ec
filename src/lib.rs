//! # tex2pdf
//!
//! Compile uploaded LaTeX source archives to PDF.
//!
//! ## Why this crate?
//!
//! Authors collaborate in `.zip` bundles — a project directory with a
//! `.tex` file and its figures — but readers want a PDF. This crate is
//! the conversion pipeline behind a small upload service: it unpacks the
//! archive into a scratch workspace, finds the source, drives `pdflatex`
//! as a subprocess, and stages the result into a storage directory that
//! is served back over HTTP.
//!
//! ## Pipeline Overview
//!
//! ```text
//! archive.zip
//!  │
//!  ├─ 1. Reset    recreate the per-job workspace directory
//!  ├─ 2. Extract  unzip into the workspace (subprocess, deadline)
//!  ├─ 3. Locate   pick the .tex source deterministically
//!  ├─ 4. Compile  pdflatex -output-directory (subprocess, deadline)
//!  └─ 5. Collect  stage the .pdf into durable storage atomically
//! ```
//!
//! Stages run strictly in order; the first failure aborts the job with a
//! stage-tagged [`ConvertError`]. There are no retries — resubmission is
//! the remedial action, and every run starts from a workspace reset.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tex2pdf::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("report.zip", "report.zip", &config).await?;
//!     println!("stored {}", output.artifact.path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | Enables the HTTP surface and the `tex2pdf` binary (axum + tower-http + clap) |
//!
//! Disable `server` when using only the pipeline:
//! ```toml
//! tex2pdf = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod job;
pub mod output;
pub mod pipeline;

#[cfg(feature = "server")]
pub mod http;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_sync};
pub use error::{ConvertError, Stage};
pub use job::{ConversionJob, JobStatus};
pub use output::{CompileOutput, ConversionOutput, ConversionStats, StoredArtifact};
