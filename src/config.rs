//! Merge configuration (`jmerge.toml`).
//!
//! Defines the typed configuration for output formatting and input
//! discovery. Every field has a default, so an absent file is equivalent to
//! an empty one.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::xml::WriteOptions;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "jmerge.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level merge configuration.
///
/// Missing fields use defaults; missing file → all defaults (no error).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    /// How the merged report is written.
    #[serde(default)]
    pub output: OutputConfig,

    /// How source patterns are resolved.
    #[serde(default)]
    pub input: InputConfig,
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// Output formatting.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Spaces per nesting level; `0` writes the report on one line
    /// (default: `2`).
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Write the `<?xml ...?>` declaration line (default: `true`).
    #[serde(default = "default_declaration")]
    pub declaration: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            declaration: default_declaration(),
        }
    }
}

const fn default_indent() -> usize {
    2
}

const fn default_declaration() -> bool {
    true
}

impl From<&OutputConfig> for WriteOptions {
    fn from(output: &OutputConfig) -> Self {
        Self {
            indent: output.indent,
            declaration: output.declaration,
        }
    }
}

// ---------------------------------------------------------------------------
// InputConfig
// ---------------------------------------------------------------------------

/// Source discovery.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Fail when the source patterns match no file, instead of writing an
    /// empty report (default: `false`).
    #[serde(default)]
    pub require_matches: bool,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Error loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {}: {error}", .path.display())]
    Read {
        /// The configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// The contents are not valid TOML or do not match the schema.
    #[error("{}{message}", location(.path, .line))]
    Invalid {
        /// The configuration file, when loaded from disk.
        path: Option<PathBuf>,
        /// 1-based line of the offending key or value.
        line: Option<usize>,
        /// What the TOML deserializer rejected.
        message: String,
    },
}

impl ConfigError {
    fn in_file(self, file: &Path) -> Self {
        match self {
            Self::Invalid { line, message, .. } => Self::Invalid {
                path: Some(file.to_owned()),
                line,
                message,
            },
            read @ Self::Read { .. } => read,
        }
    }
}

fn location(path: &Option<PathBuf>, line: &Option<usize>) -> String {
    match (path, line) {
        (Some(path), Some(line)) => format!("{}:{line}: ", path.display()),
        (Some(path), None) => format!("{}: ", path.display()),
        (None, Some(line)) => format!("line {line}: "),
        (None, None) => String::new(),
    }
}

impl MergeConfig {
    /// Load `path`; an absent file yields [`MergeConfig::default`].
    ///
    /// # Errors
    /// [`ConfigError::Read`] if the file exists but cannot be read,
    /// [`ConfigError::Invalid`] if its contents are rejected.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).map_err(|e| e.in_file(path)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(error) => Err(ConfigError::Read {
                path: path.to_owned(),
                error,
            }),
        }
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] on malformed TOML, wrong value types or
    /// unknown keys.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Invalid {
            path: None,
            line: e
                .span()
                .map(|span| text[..span.start].matches('\n').count() + 1),
            message: e.message().to_owned(),
        })
    }

    /// Serializer settings for the merged report.
    #[must_use]
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions::from(&self.output)
    }
}
