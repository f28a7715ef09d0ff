//! End-to-end merge scenarios through [`jmerge::merge_to_string`].
//!
//! Coverage:
//! - same identity: counters summed, root rolled up
//! - distinct identities: appended in order
//! - `time` aggregates with max
//! - empty and whitespace-only sources
//! - bare `<testsuite>` root equals the wrapped form
//! - unknown attributes keep the first value
//! - nested sections, test cases, entities and non-numeric counters

mod common;

use common::{compact, report};
use jmerge::{MergeError, WriteOptions, merge_to_string};

fn merged(sources: &[&str]) -> String {
    merge_to_string(sources, &compact()).expect("merge should succeed")
}

// ---------------------------------------------------------------------------
// Identity matching and aggregation
// ---------------------------------------------------------------------------

#[test]
fn same_identity_sums_counters() {
    let out = merged(&[
        r#"<testsuites><testsuite name="X" tests="2" failures="1"/></testsuites>"#,
        r#"<testsuites><testsuite name="X" tests="3" failures="0"/></testsuites>"#,
    ]);
    assert_eq!(
        out,
        report(r#"<testsuites tests="5" failures="1"><testsuite name="X" tests="5" failures="1"/></testsuites>"#)
    );
}

#[test]
fn distinct_identities_become_siblings_in_order() {
    let out = merged(&[
        r#"<testsuites><testsuite name="X" tests="2"/></testsuites>"#,
        r#"<testsuites><testsuite name="Y" tests="3"/></testsuites>"#,
    ]);
    assert_eq!(
        out,
        report(r#"<testsuites tests="5"><testsuite name="X" tests="2"/><testsuite name="Y" tests="3"/></testsuites>"#)
    );
}

#[test]
fn time_takes_the_maximum() {
    let out = merged(&[
        r#"<testsuites><testsuite name="T" time="1.5"/></testsuites>"#,
        r#"<testsuites><testsuite name="T" time="2.0"/></testsuites>"#,
    ]);
    assert_eq!(
        out,
        report(r#"<testsuites time="2.0"><testsuite name="T" time="2.0"/></testsuites>"#)
    );
}

#[test]
fn unknown_attribute_keeps_first_value() {
    let out = merged(&[
        r#"<testsuites><testsuite name="H" hostname="ci-1" tests="1"/></testsuites>"#,
        r#"<testsuites><testsuite name="H" hostname="ci-2" tests="1" id="7"/></testsuites>"#,
    ]);
    assert_eq!(
        out,
        report(r#"<testsuites tests="2"><testsuite name="H" hostname="ci-1" tests="2" id="7"/></testsuites>"#)
    );
}

#[test]
fn non_numeric_counter_keeps_existing_value() {
    let out = merged(&[
        r#"<testsuites><testsuite name="N" tests="n/a"/></testsuites>"#,
        r#"<testsuites><testsuite name="N" tests="3"/></testsuites>"#,
    ]);
    assert_eq!(
        out,
        report(r#"<testsuites><testsuite name="N" tests="n/a"/></testsuites>"#)
    );
}

// ---------------------------------------------------------------------------
// Source shapes
// ---------------------------------------------------------------------------

#[test]
fn empty_and_whitespace_sources_give_bare_collection() {
    let out = merged(&["", "  \n\t "]);
    assert_eq!(out, report("<testsuites></testsuites>"));
}

#[test]
fn no_sources_give_bare_collection() {
    let out = merge_to_string(Vec::<String>::new(), &compact()).unwrap();
    assert_eq!(out, report("<testsuites></testsuites>"));
}

#[test]
fn bare_section_root_is_wrapped() {
    let bare = merged(&[r#"<testsuite name="Z" tests="1"/>"#]);
    let wrapped = merged(&[r#"<testsuites><testsuite name="Z" tests="1"/></testsuites>"#]);
    assert_eq!(bare, wrapped);
    assert_eq!(
        bare,
        report(r#"<testsuites tests="1"><testsuite name="Z" tests="1"/></testsuites>"#)
    );
}

#[test]
fn bare_and_wrapped_sources_merge_together() {
    let out = merged(&[
        r#"<testsuite name="Z" tests="1"/>"#,
        r#"<testsuites><testsuite name="Z" tests="4"/></testsuites>"#,
    ]);
    assert_eq!(
        out,
        report(r#"<testsuites tests="5"><testsuite name="Z" tests="5"/></testsuites>"#)
    );
}

// ---------------------------------------------------------------------------
// Nested content
// ---------------------------------------------------------------------------

#[test]
fn test_cases_of_a_shared_suite_are_concatenated() {
    let out = merged(&[
        r#"<testsuites><testsuite name="S" tests="1"><testcase name="a"/></testsuite></testsuites>"#,
        r#"<testsuites><testsuite name="S" tests="1"><testcase name="b"/></testsuite></testsuites>"#,
    ]);
    assert_eq!(
        out,
        report(
            r#"<testsuites tests="2"><testsuite name="S" tests="2"><testcase name="a"/><testcase name="b"/></testsuite></testsuites>"#
        )
    );
}

#[test]
fn nested_sections_merge_recursively() {
    let out = merged(&[
        r#"<testsuites><testsuite name="outer" tests="1"><testsuite name="inner" tests="1"/></testsuite></testsuites>"#,
        r#"<testsuites><testsuite name="outer" tests="2"><testsuite name="inner" tests="2"/><testsuite name="other" tests="0"/></testsuite></testsuites>"#,
    ]);
    assert_eq!(
        out,
        report(
            r#"<testsuites tests="3"><testsuite name="outer" tests="3"><testsuite name="inner" tests="3"/><testsuite name="other" tests="0"/></testsuite></testsuites>"#
        )
    );
}

#[test]
fn entities_and_character_data_are_preserved() {
    let source = r#"<testsuites><testsuite name="a&amp;b"><system-out>]]&gt; &amp;; done</system-out><system-err><![CDATA[<trace>]]></system-err></testsuite></testsuites>"#;
    let out = merged(&[source]);
    assert_eq!(out, report(source));
}

#[test]
fn whitespace_in_character_data_survives_the_merge() {
    let source = "<testsuites><testsuite name=\"w\"><system-out>   </system-out><x><b>a</b> <i>c</i></x></testsuite></testsuites>";
    assert_eq!(merged(&[source]), report(source));
}

#[test]
fn malformed_references_abort_the_merge() {
    for source in ["<testsuite name=\"AT&T\"/>", "<testsuite name=\"a\"><system-out>&foo;</system-out></testsuite>"] {
        let err = merge_to_string([source], &compact()).unwrap_err();
        assert!(matches!(err, MergeError::Parse { .. }), "{source}: {err}");
    }
}

#[test]
fn comments_are_kept_in_place() {
    let out = merged(&[
        r#"<testsuites><!-- shard 1 --><testsuite name="a"/></testsuites>"#,
        r#"<testsuites><!-- shard 2 --><testsuite name="a"/></testsuites>"#,
    ]);
    assert_eq!(
        out,
        report(r#"<testsuites><!-- shard 1 --><testsuite name="a"/><!-- shard 2 --></testsuites>"#)
    );
}

// ---------------------------------------------------------------------------
// Output options and errors
// ---------------------------------------------------------------------------

#[test]
fn default_options_pretty_print() {
    let out = merge_to_string(
        [
            r#"<testsuites><testsuite name="X" tests="2" failures="1"/></testsuites>"#,
            r#"<testsuites><testsuite name="X" tests="3" failures="0"/></testsuites>"#,
        ],
        &WriteOptions::default(),
    )
    .unwrap();
    assert_eq!(
        out,
        report(
            "<testsuites tests=\"5\" failures=\"1\">\n  <testsuite name=\"X\" tests=\"5\" failures=\"1\"/>\n</testsuites>"
        )
    );
}

#[test]
fn declaration_can_be_omitted() {
    let options = WriteOptions {
        declaration: false,
        ..WriteOptions::compact()
    };
    let out = merge_to_string([""], &options).unwrap();
    assert_eq!(out, "<testsuites></testsuites>");
}

#[test]
fn malformed_source_aborts_the_merge() {
    let err = merge_to_string(
        [r#"<testsuite name="ok"/>"#, "<testsuites><testsuite></testsuites>"],
        &compact(),
    )
    .unwrap_err();
    match err {
        MergeError::Parse { source_name, error } => {
            assert_eq!(source_name, "source #2");
            assert_eq!(error.line, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}
