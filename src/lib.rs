//! jmerge library crate: merge JUnit XML reports into one.
//!
//! Sources are parsed into a lossless [`model::Document`], folded in order by
//! the [`merge`] engine, and written back out by [`xml::write`]. The
//! front-ends in [`io`] wrap that pipeline for strings, streams and files;
//! the `jmerge` binary is a thin CLI over [`discover`] and [`merge_paths`].

pub mod config;
pub mod discover;
pub mod error;
pub mod io;
pub mod merge;
pub mod model;
pub mod policy;
pub mod xml;

pub use config::MergeConfig;
pub use error::{MergeError, ParseError};
pub use io::{MergeSummary, merge_files, merge_paths, merge_streams, merge_to_string};
pub use merge::{Merger, merge};
pub use xml::{WriteOptions, parse, write};
