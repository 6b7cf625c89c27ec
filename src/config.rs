//! Configuration types for the conversion pipeline.
//!
//! All pipeline behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct
//! makes it trivial to share a config across the server's handlers and to
//! point the integration suite at stub tools instead of a real TeX
//! installation.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults
//! for the rest; adding a knob later does not break existing call sites.

use crate::error::ConvertError;
use std::path::PathBuf;

/// Configuration for one conversion pipeline instance.
///
/// Built via [`ConversionConfig::builder()`] or
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use tex2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .storage_dir("uploads")
///     .compile_timeout_secs(300)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Durable storage directory for finished PDFs. Default: `uploads`.
    ///
    /// Served read-only over HTTP under `/uploads`. Artifacts land here via
    /// an atomic rename, so a listing never observes a half-written file.
    pub storage_dir: PathBuf,

    /// Root under which per-job scratch directories are created.
    /// Default: `<system tmp>/tex2pdf`.
    ///
    /// Each job extracts and compiles inside its own uniquely-named
    /// subdirectory, so two concurrent jobs never share scratch state.
    pub workspace_root: PathBuf,

    /// Archive unpack tool. Default: `unzip`.
    ///
    /// Invoked as `<unzip_program> -o <archive> -d <dir>` with an argument
    /// vector — never through a shell. Integration tests point this at a
    /// stub script.
    pub unzip_program: String,

    /// LaTeX compiler. Default: `pdflatex`.
    ///
    /// Invoked as `<latex_program> -interaction=nonstopmode
    /// -output-directory <dir> <source>`. Nonstop mode keeps a syntax error
    /// from parking the engine at an interactive prompt; the exit status
    /// still reports failure.
    pub latex_program: String,

    /// Deadline for one extraction run, in seconds. Default: 60.
    ///
    /// A zip bomb or a wedged unpack tool fails the job instead of hanging
    /// the upload request. The child is killed on expiry.
    pub extract_timeout_secs: u64,

    /// Deadline for one compiler run, in seconds. Default: 180.
    ///
    /// pdflatex on a pathological document can loop for minutes. Three
    /// minutes covers real-world reports and theses with headroom; raise it
    /// for book-sized documents.
    pub compile_timeout_secs: u64,

    /// Upper bound on diagnostic text embedded in a compile error, in
    /// bytes. Default: 8192.
    ///
    /// Full compiler output can reach megabytes; error payloads keep only
    /// the tail, which is where pdflatex prints the fatal line.
    pub diagnostics_tail_bytes: usize,

    /// Maximum accepted upload body size, in bytes. Default: 10 MiB.
    ///
    /// Enforced by the HTTP layer before the pipeline is invoked.
    pub max_upload_bytes: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("uploads"),
            workspace_root: std::env::temp_dir().join("tex2pdf"),
            unzip_program: "unzip".to_string(),
            latex_program: "pdflatex".to_string(),
            extract_timeout_secs: 60,
            compile_timeout_secs: 180,
            diagnostics_tail_bytes: 8192,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ConversionConfig {
    /// Start building a config from the defaults.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug, Default)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    /// Set the durable storage directory.
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.storage_dir = dir.into();
        self
    }

    /// Set the scratch workspace root.
    pub fn workspace_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.workspace_root = dir.into();
        self
    }

    /// Set the archive unpack tool.
    pub fn unzip_program(mut self, program: impl Into<String>) -> Self {
        self.config.unzip_program = program.into();
        self
    }

    /// Set the LaTeX compiler.
    pub fn latex_program(mut self, program: impl Into<String>) -> Self {
        self.config.latex_program = program.into();
        self
    }

    /// Set the extraction deadline in seconds.
    pub fn extract_timeout_secs(mut self, secs: u64) -> Self {
        self.config.extract_timeout_secs = secs;
        self
    }

    /// Set the compilation deadline in seconds.
    pub fn compile_timeout_secs(mut self, secs: u64) -> Self {
        self.config.compile_timeout_secs = secs;
        self
    }

    /// Set the diagnostics tail bound in bytes.
    pub fn diagnostics_tail_bytes(mut self, bytes: usize) -> Self {
        self.config.diagnostics_tail_bytes = bytes;
        self
    }

    /// Set the maximum upload body size in bytes.
    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    /// Validate and produce the final config.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidConfig`] when a tool name is empty or
    /// a deadline/limit is zero.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = self.config;
        if c.unzip_program.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "unzip_program must not be empty".into(),
            ));
        }
        if c.latex_program.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "latex_program must not be empty".into(),
            ));
        }
        if c.extract_timeout_secs == 0 || c.compile_timeout_secs == 0 {
            return Err(ConvertError::InvalidConfig(
                "subprocess deadlines must be at least 1s".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(ConvertError::InvalidConfig(
                "max_upload_bytes must be nonzero".into(),
            ));
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ConversionConfig::builder().build().unwrap();
        assert_eq!(config.unzip_program, "unzip");
        assert_eq!(config.latex_program, "pdflatex");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn builder_sets_fields() {
        let config = ConversionConfig::builder()
            .storage_dir("/srv/artifacts")
            .workspace_root("/var/tmp/scratch")
            .latex_program("lualatex")
            .compile_timeout_secs(300)
            .build()
            .unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/srv/artifacts"));
        assert_eq!(config.workspace_root, PathBuf::from("/var/tmp/scratch"));
        assert_eq!(config.latex_program, "lualatex");
        assert_eq!(config.compile_timeout_secs, 300);
    }

    #[test]
    fn zero_deadline_rejected() {
        let err = ConversionConfig::builder()
            .compile_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));
    }

    #[test]
    fn empty_tool_rejected() {
        let err = ConversionConfig::builder()
            .unzip_program("  ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("unzip_program"));
    }
}
