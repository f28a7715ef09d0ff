//! Error types for report parsing and merging.
//!
//! [`ParseError`] is raised by the XML parser; [`MergeError`] is the single
//! error type returned by the merge front-ends in [`crate::io`]. Nothing inside
//! the merge engine itself can fail: malformed counters fall back to keeping
//! the existing value.

use std::path::PathBuf;

use thiserror::Error;

/// A source document is not well-formed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    /// 1-based line of the offending markup.
    pub line: usize,
    /// 1-based column (in characters) of the offending markup.
    pub column: usize,
    /// What the parser rejected.
    pub message: String,
}

impl ParseError {
    /// Build an error for byte offset `offset` of `text`.
    pub(crate) fn at(text: &str, offset: usize, message: impl Into<String>) -> Self {
        let mut end = offset.min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let prefix = &text[..end];
        let line = prefix.matches('\n').count() + 1;
        let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
        let column = prefix[line_start..].chars().count() + 1;
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Errors returned by the merge front-ends.
///
/// Any error aborts the whole merge: no partial output is written.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A source document is not well-formed.
    #[error("failed to parse {source_name}: {error}")]
    Parse {
        /// File path or positional label (`"source #2"`) of the input.
        source_name: String,
        /// The underlying parser error.
        #[source]
        error: ParseError,
    },

    /// A source could not be read.
    #[error("failed to read {source_name}: {error}")]
    Read {
        /// File path or positional label of the input.
        source_name: String,
        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// The merged report could not be written.
    #[error("failed to write {target}: {error}")]
    Write {
        /// Destination path, or `"output stream"`.
        target: String,
        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// A source pattern is not a valid glob.
    #[error("invalid glob pattern `{pattern}`: {error}")]
    Pattern {
        /// The pattern as given by the caller.
        pattern: String,
        /// Why the pattern was rejected.
        #[source]
        error: glob::PatternError,
    },

    /// A directory could not be read while expanding a glob.
    #[error("failed to expand `{pattern}`: {error}")]
    Glob {
        /// The pattern being expanded.
        pattern: String,
        /// The path that could not be read.
        #[source]
        error: glob::GlobError,
    },
}

impl MergeError {
    /// Destination-write failure for `path`.
    pub(crate) fn write(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Write {
            target: path.into().display().to_string(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_position_first_line() {
        let err = ParseError::at("<a><b></a>", 6, "mismatched end tag");
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 7);
        assert_eq!(err.to_string(), "line 1, column 7: mismatched end tag");
    }

    #[test]
    fn parse_error_position_counts_lines_and_chars() {
        let text = "<a>\n  <é/>\n  <b>";
        let err = ParseError::at(text, text.len(), "unclosed");
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 6);
    }

    #[test]
    fn parse_error_offset_past_end_is_clamped() {
        let err = ParseError::at("ab", 99, "eof");
        assert_eq!((err.line, err.column), (1, 3));
    }

    #[test]
    fn merge_error_display_names_source() {
        let err = MergeError::Parse {
            source_name: "reports/a.xml".to_owned(),
            error: ParseError::at("x", 0, "boom"),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse reports/a.xml: line 1, column 1: boom"
        );
    }

    #[test]
    fn write_error_display_uses_path() {
        let err = MergeError::write(
            "out/combined.xml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().starts_with("failed to write out/combined.xml"));
    }
}
