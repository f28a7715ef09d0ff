//! Shared test helpers for jmerge integration tests.
//!
//! All tests use temp directories; nothing is written outside them.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use jmerge::WriteOptions;

/// The declaration line every merged report starts with.
pub const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Single-line output, so expectations fit on one line.
pub const fn compact() -> WriteOptions {
    WriteOptions::compact()
}

/// `body` preceded by the declaration line.
pub fn report(body: &str) -> String {
    format!("{DECLARATION}{body}")
}

/// Write `contents` to `dir/rel`, creating parent directories.
pub fn write_report(dir: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().expect("report path has a parent"))
        .expect("failed to create report directory");
    std::fs::write(&path, contents).expect("failed to write report");
    path
}

/// Pattern string for `dir/rel`.
pub fn pattern(dir: &Path, rel: &str) -> String {
    dir.join(rel).to_string_lossy().into_owned()
}

/// A one-suite report with the given counters.
pub fn suite_report(name: &str, tests: u32, failures: u32, time: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="{name}" tests="{tests}" failures="{failures}" time="{time}">
    <testcase name="{name}-case" classname="{name}" time="{time}"/>
  </testsuite>
</testsuites>
"#
    )
}
