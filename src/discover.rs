//! Resolve source patterns into an ordered list of report files.
//!
//! Each pattern is either a path to an existing file or a glob pattern.
//! Matches of one glob are sorted; patterns are resolved in the order given.
//! A file reached through several patterns is kept only at its first
//! position, so `"reports/m1.xml" "reports/m?.xml"` yields `m1, m2, m3`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::MergeError;

/// Resolve `patterns` into unique, existing files.
///
/// Patterns that match nothing contribute nothing; an empty result is not an
/// error.
///
/// # Errors
/// Returns [`MergeError::Pattern`] for an invalid glob and
/// [`MergeError::Glob`] when a matched directory entry cannot be read.
pub fn resolve_sources<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>, MergeError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for pattern in patterns {
        for path in expand(pattern.as_ref())? {
            let key = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
            if seen.insert(key) {
                files.push(path);
            } else {
                tracing::trace!(path = %path.display(), "skipping duplicate source");
            }
        }
    }
    Ok(files)
}

fn expand(pattern: &str) -> Result<Vec<PathBuf>, MergeError> {
    let literal = Path::new(pattern);
    if literal.is_file() {
        return Ok(vec![literal.to_path_buf()]);
    }

    let entries = glob::glob(pattern).map_err(|error| MergeError::Pattern {
        pattern: pattern.to_owned(),
        error,
    })?;
    let mut matches = Vec::new();
    for entry in entries {
        let path = entry.map_err(|error| MergeError::Glob {
            pattern: pattern.to_owned(),
            error,
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }
    matches.sort();
    tracing::debug!(pattern, matched = matches.len(), "expanded source pattern");
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, rel: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "<testsuites/>").unwrap();
        path
    }

    fn pattern(dir: &Path, rel: &str) -> String {
        dir.join(rel).to_string_lossy().into_owned()
    }

    #[test]
    fn literal_paths_keep_given_order() {
        let dir = tempfile::tempdir().unwrap();
        let b = touch(dir.path(), "b.xml");
        let a = touch(dir.path(), "a.xml");
        let files = resolve_sources(&[pattern(dir.path(), "b.xml"), pattern(dir.path(), "a.xml")]).unwrap();
        assert_eq!(files, [b, a]);
    }

    #[test]
    fn glob_matches_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let m3 = touch(dir.path(), "units/m3.xml");
        let m1 = touch(dir.path(), "units/m1.xml");
        let m2 = touch(dir.path(), "e2e/m2.xml");
        touch(dir.path(), "units/notes.txt");
        let files = resolve_sources(&[pattern(dir.path(), "**/m*.xml")]).unwrap();
        assert_eq!(files, [m2, m1, m3]);
    }

    #[test]
    fn duplicates_keep_first_position() {
        let dir = tempfile::tempdir().unwrap();
        let m1 = touch(dir.path(), "m1.xml");
        let m2 = touch(dir.path(), "m2.xml");
        let m3 = touch(dir.path(), "m3.xml");
        let files = resolve_sources(&[
            pattern(dir.path(), "m3.xml"),
            pattern(dir.path(), "m?.xml"),
        ])
        .unwrap();
        assert_eq!(files, [m3, m1, m2]);
    }

    #[test]
    fn directories_and_missing_paths_match_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("reports.xml")).unwrap();
        let files = resolve_sources(&[
            pattern(dir.path(), "reports.xml"),
            pattern(dir.path(), "does-not-exist/*.xml"),
        ])
        .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn invalid_glob_is_an_error() {
        let err = resolve_sources(&["reports/[.xml"]).unwrap_err();
        assert!(matches!(err, MergeError::Pattern { .. }), "{err}");
    }

    #[test]
    fn literal_path_with_glob_characters() {
        let dir = tempfile::tempdir().unwrap();
        let odd = touch(dir.path(), "report[1].xml");
        let files = resolve_sources(&[pattern(dir.path(), "report[1].xml")]).unwrap();
        assert_eq!(files, [odd]);
    }
}
