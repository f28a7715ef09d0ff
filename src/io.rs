//! Merge front-ends: strings, streams and files.
//!
//! All three read, parse and fold one source at a time, in input order, and
//! only write output once every source has been folded. A source that fails
//! to read or parse aborts the merge before anything is written.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::instrument;

use crate::discover;
use crate::error::MergeError;
use crate::merge::Merger;
use crate::model::Document;
use crate::policy;
use crate::xml::{self, WriteOptions};

// ---------------------------------------------------------------------------
// MergeSummary
// ---------------------------------------------------------------------------

/// What a file merge consumed and produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    /// Source files, in merge order.
    pub files: Vec<PathBuf>,
    /// Number of top-level `<testsuite>` elements in the output.
    pub suites: usize,
    /// Rollup counters of the output root (`tests`, `failures`, ...).
    pub totals: BTreeMap<String, String>,
}

impl MergeSummary {
    fn new(files: Vec<PathBuf>, merged: &Document) -> Self {
        let Some(root) = merged.root() else {
            return Self {
                files,
                ..Self::default()
            };
        };
        let totals = policy::rollup_attribute_names()
            .filter_map(|name| root.attribute(name).map(|v| (name.to_owned(), v.to_owned())))
            .collect();
        Self {
            files,
            suites: root.sections().count(),
            totals,
        }
    }

    /// Number of source files merged.
    #[must_use]
    pub fn files_processed(&self) -> usize {
        self.files.len()
    }
}

// ---------------------------------------------------------------------------
// Front-ends
// ---------------------------------------------------------------------------

/// Merge report texts and return the combined report.
///
/// # Errors
/// Returns [`MergeError::Parse`] naming the first source (`"source #N"`) that
/// is not well-formed.
pub fn merge_to_string<I>(sources: I, options: &WriteOptions) -> Result<String, MergeError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut merger = Merger::new();
    for (index, text) in sources.into_iter().enumerate() {
        fold_text(&mut merger, text.as_ref(), || positional(index))?;
    }
    Ok(xml::write(&merger.finish(), options))
}

/// Read every source stream to the end, merge, and write the result to
/// `dest`.
///
/// # Errors
/// Returns [`MergeError::Read`] or [`MergeError::Parse`] for a bad source and
/// [`MergeError::Write`] if `dest` rejects the output.
pub fn merge_streams<W, R>(
    mut dest: W,
    sources: impl IntoIterator<Item = R>,
    options: &WriteOptions,
) -> Result<(), MergeError>
where
    W: Write,
    R: Read,
{
    let mut merger = Merger::new();
    for (index, mut source) in sources.into_iter().enumerate() {
        let mut text = String::new();
        source
            .read_to_string(&mut text)
            .map_err(|error| MergeError::Read {
                source_name: positional(index),
                error,
            })?;
        fold_text(&mut merger, &text, || positional(index))?;
    }
    let output = xml::write(&merger.finish(), options);
    dest.write_all(output.as_bytes())
        .and_then(|()| dest.flush())
        .map_err(|error| MergeError::Write {
            target: "output stream".to_owned(),
            error,
        })
}

/// Merge every file matched by `patterns` into `dest`.
///
/// Patterns are resolved by [`discover::resolve_sources`], then merged by
/// [`merge_paths`]. When no file matches, an empty `<testsuites>` report is
/// written.
///
/// # Errors
/// Returns the first discovery, read, parse or write error; `dest` is left
/// untouched in that case.
pub fn merge_files<S, F>(
    dest: &Path,
    patterns: &[S],
    options: &WriteOptions,
    on_file_matched: F,
) -> Result<MergeSummary, MergeError>
where
    S: AsRef<str>,
    F: FnMut(&Path),
{
    let files = discover::resolve_sources(patterns)?;
    merge_paths(dest, files, options, on_file_matched)
}

/// Merge already-resolved `files`, in order, into `dest`.
///
/// `on_file_matched` is called once per file after it has been folded.
/// Missing parent directories of `dest` are created, and `dest` is replaced
/// atomically.
///
/// # Errors
/// Returns the first read, parse or write error; `dest` is left untouched in
/// that case.
#[instrument(skip_all, fields(dest = %dest.display(), files = files.len()))]
pub fn merge_paths<F>(
    dest: &Path,
    files: Vec<PathBuf>,
    options: &WriteOptions,
    mut on_file_matched: F,
) -> Result<MergeSummary, MergeError>
where
    F: FnMut(&Path),
{
    let mut merger = Merger::new();
    for path in &files {
        let text = fs::read_to_string(path).map_err(|error| MergeError::Read {
            source_name: path.display().to_string(),
            error,
        })?;
        fold_text(&mut merger, &text, || path.display().to_string())?;
        tracing::debug!(path = %path.display(), "merged source file");
        on_file_matched(path);
    }

    let merged = merger.finish();
    write_atomic(dest, &xml::write(&merged, options))?;
    tracing::info!(files = files.len(), "wrote merged report");
    Ok(MergeSummary::new(files, &merged))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fold_text(
    merger: &mut Merger,
    text: &str,
    source_name: impl FnOnce() -> String,
) -> Result<(), MergeError> {
    let document = xml::parse(text).map_err(|error| MergeError::Parse {
        source_name: source_name(),
        error,
    })?;
    merger.fold_document(document);
    Ok(())
}

fn positional(index: usize) -> String {
    format!("source #{}", index + 1)
}

/// Write `contents` to `path` via a temporary sibling file and a rename, so
/// readers never observe a partial report.
fn write_atomic(path: &Path, contents: &str) -> Result<(), MergeError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| MergeError::write(&dir, e))?;

    let file_name = path
        .file_name()
        .map_or_else(|| "report".into(), |n| n.to_string_lossy());
    let tmp_path = dir.join(format!(".{file_name}.tmp"));
    let mut file = fs::File::create(&tmp_path).map_err(|e| MergeError::write(&tmp_path, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| MergeError::write(&tmp_path, e))?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        MergeError::write(path, e)
    })
}
