//! Deterministic source selection inside the job directory.
//!
//! Directory enumeration order is filesystem-dependent, so candidates are
//! sorted by filename before one is picked. A candidate whose stem equals
//! the job name wins outright (`report.zip` → `report/report.tex`);
//! otherwise the lexicographically first candidate is used and the
//! surplus is logged, not silently ignored.

use crate::error::ConvertError;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Pick the `.tex` source to compile from `dir`.
///
/// # Errors
/// [`ConvertError::SourceNotFound`] when `dir` does not exist or holds no
/// `.tex` entry.
pub fn locate(dir: &Path, expected_stem: &str) -> Result<PathBuf, ConvertError> {
    if !dir.is_dir() {
        return Err(ConvertError::SourceNotFound {
            dir: dir.to_path_buf(),
            detail: "job directory does not exist inside the archive".into(),
        });
    }

    let chosen = pick_by_extension(dir, "tex", expected_stem)
        .map_err(|e| ConvertError::io("list job dir", dir, e))?;

    match chosen {
        Some(path) => {
            debug!("Located source {}", path.display());
            Ok(path)
        }
        None => Err(ConvertError::SourceNotFound {
            dir: dir.to_path_buf(),
            detail: "no .tex entries".into(),
        }),
    }
}

/// Shared selection policy for sources and artifacts.
///
/// Lists immediate entries of `dir` with the given extension, sorted by
/// filename. Returns the entry whose stem matches `expected_stem` when
/// present, else the first sorted entry, else `None`. Logs a warning when
/// more than one candidate existed.
pub(crate) fn pick_by_extension(
    dir: &Path,
    extension: &str,
    expected_stem: &str,
) -> io::Result<Option<PathBuf>> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == extension))
        .collect();
    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if candidates.is_empty() {
        return Ok(None);
    }

    let chosen = candidates
        .iter()
        .find(|p| p.file_stem().is_some_and(|s| s == expected_stem))
        .unwrap_or(&candidates[0])
        .clone();

    if candidates.len() > 1 {
        warn!(
            "{} .{} candidates in {}, chose {}",
            candidates.len(),
            extension,
            dir.display(),
            chosen.display()
        );
    }

    Ok(Some(chosen))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn single_source_is_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "report.tex");
        let found = locate(dir.path(), "report").unwrap();
        assert_eq!(found.file_name().unwrap(), "report.tex");
    }

    #[test]
    fn missing_dir_is_source_not_found() {
        let err = locate(Path::new("/nonexistent/job"), "job").unwrap_err();
        assert!(matches!(err, ConvertError::SourceNotFound { .. }));
    }

    #[test]
    fn no_tex_entries_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "figure.png");
        let err = locate(dir.path(), "notes").unwrap_err();
        assert!(matches!(err, ConvertError::SourceNotFound { .. }));
    }

    #[test]
    fn expected_stem_wins_over_sort_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "appendix.tex");
        touch(dir.path(), "report.tex");
        let found = locate(dir.path(), "report").unwrap();
        assert_eq!(found.file_name().unwrap(), "report.tex");
    }

    #[test]
    fn falls_back_to_lexicographic_first() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.tex");
        touch(dir.path(), "a.tex");
        let found = locate(dir.path(), "report").unwrap();
        assert_eq!(found.file_name().unwrap(), "a.tex");
    }

    #[test]
    fn extension_match_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "report.texx");
        touch(dir.path(), "report.TEX");
        let err = locate(dir.path(), "report").unwrap_err();
        assert!(matches!(err, ConvertError::SourceNotFound { .. }));
    }

    #[test]
    fn subdirectories_are_not_candidates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("chapter.tex")).unwrap();
        touch(dir.path(), "main.tex");
        let found = locate(dir.path(), "absent").unwrap();
        assert_eq!(found.file_name().unwrap(), "main.tex");
    }
}
