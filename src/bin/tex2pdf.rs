//! Server binary for tex2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` and serves the HTTP surface.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tex2pdf::http::{create_router, AppState};
use tex2pdf::ConversionConfig;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default port with defaults for everything else
  tex2pdf

  # Production-ish: explicit dirs and a longer compile deadline
  tex2pdf --bind 0.0.0.0:8080 --storage-dir /srv/tex2pdf/uploads \
          --workspace-dir /var/tmp/tex2pdf --compile-timeout 300

  # Use a different engine
  tex2pdf --pdflatex lualatex

REQUIREMENTS:
  unzip and pdflatex (or the tools named via --unzip/--pdflatex) must be
  on PATH. TeX Live's texlive-latex-base package is enough for plain
  documents.
"#;

/// Accept LaTeX source archives over HTTP and serve the compiled PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "tex2pdf",
    version,
    about = "Upload server that compiles LaTeX .zip archives to PDF",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "TEX2PDF_BIND", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Durable storage directory for finished PDFs.
    #[arg(long, env = "TEX2PDF_STORAGE_DIR", default_value = "uploads")]
    storage_dir: PathBuf,

    /// Scratch root for per-job workspaces.
    #[arg(long, env = "TEX2PDF_WORKSPACE_DIR")]
    workspace_dir: Option<PathBuf>,

    /// Directory holding the browser UI.
    #[arg(long, env = "TEX2PDF_ASSETS_DIR", default_value = "assets")]
    assets_dir: PathBuf,

    /// Archive unpack tool.
    #[arg(long, env = "TEX2PDF_UNZIP", default_value = "unzip")]
    unzip: String,

    /// LaTeX compiler.
    #[arg(long, env = "TEX2PDF_PDFLATEX", default_value = "pdflatex")]
    pdflatex: String,

    /// Extraction deadline in seconds.
    #[arg(long, env = "TEX2PDF_EXTRACT_TIMEOUT", default_value_t = 60)]
    extract_timeout: u64,

    /// Compilation deadline in seconds.
    #[arg(long, env = "TEX2PDF_COMPILE_TIMEOUT", default_value_t = 180)]
    compile_timeout: u64,

    /// Maximum upload size in MiB.
    #[arg(long, env = "TEX2PDF_MAX_UPLOAD_MB", default_value_t = 10)]
    max_upload_mb: usize,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TEX2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "TEX2PDF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug,tower_http=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ConversionConfig::builder()
        .storage_dir(&cli.storage_dir)
        .unzip_program(cli.unzip.clone())
        .latex_program(cli.pdflatex.clone())
        .extract_timeout_secs(cli.extract_timeout)
        .compile_timeout_secs(cli.compile_timeout)
        .max_upload_bytes(cli.max_upload_mb * 1024 * 1024);
    if let Some(ref dir) = cli.workspace_dir {
        builder = builder.workspace_root(dir);
    }
    let config = builder.build().context("Invalid configuration")?;

    tokio::fs::create_dir_all(&config.storage_dir)
        .await
        .with_context(|| format!("Failed to create storage dir {:?}", config.storage_dir))?;
    tokio::fs::create_dir_all(&config.workspace_root)
        .await
        .with_context(|| format!("Failed to create workspace root {:?}", config.workspace_root))?;

    // ── Serve ────────────────────────────────────────────────────────────
    let state = AppState {
        config: Arc::new(config),
        assets_dir: cli.assets_dir.clone(),
    };
    let app = create_router(state);

    tracing::info!("Listening on http://{}", cli.bind);
    tracing::info!(
        "Storage: {}  UI: {}",
        cli.storage_dir.display(),
        cli.assets_dir.display()
    );

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
