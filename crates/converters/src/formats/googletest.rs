//! GoogleTest XML output.
//!
//! Structurally JUnit already, but disabled and skipped tests are only marked
//! with `status="notrun"` / `result="skipped"` attributes. Those cases get an
//! explicit `<skipped/>` child and the suite counters are recomputed.

use std::path::Path;

use xunit_core::CoreResult;

use crate::converter::FormatConverter;
use crate::validation::{canonical_errors, parse_well_formed, validate_root, ValidationResult};
use crate::xml::XmlElement;

#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleTestConverter;

impl GoogleTestConverter {
    pub const NAME: &'static str = "googletest";
}

impl FormatConverter for GoogleTestConverter {
    fn tool_name(&self) -> &str {
        Self::NAME
    }

    fn validate_input(&self, input: &Path) -> ValidationResult {
        let root = parse_well_formed(input)?;
        validate_root(input, &root, &["testsuites", "testsuite"])?;
        let errors = canonical_errors(input, &root);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn convert(&self, input: &Path, output: &Path) -> CoreResult<()> {
        let mut root = XmlElement::parse_file(input)?;
        normalize(&mut root);
        root.write_file(output)
    }
}

fn normalize(element: &mut XmlElement) {
    if element.name == "testsuite" {
        normalize_suite(element);
    }
    for child in element.children.iter_mut() {
        if child.name == "testsuite" || child.name == "testsuites" {
            normalize(child);
        }
    }
}

fn normalize_suite(suite: &mut XmlElement) {
    let mut tests = 0;
    let mut failures = 0;
    let mut skipped = 0;

    for case in suite.children.iter_mut().filter(|c| c.name == "testcase") {
        tests += 1;
        if is_not_run(case) && !case.has_child("skipped") {
            case.children.push(XmlElement::new("skipped"));
        }
        if case.has_child("skipped") {
            skipped += 1;
        } else if case.has_child("failure") || case.has_child("error") {
            failures += 1;
        }
    }

    if tests > 0 {
        suite.set_attr("tests", tests.to_string());
        suite.set_attr("failures", failures.to_string());
        suite.set_attr("skipped", skipped.to_string());
    }
}

fn is_not_run(case: &XmlElement) -> bool {
    matches!(case.attr("status"), Some("notrun"))
        || matches!(case.attr("result"), Some("skipped") | Some("suppressed"))
}
