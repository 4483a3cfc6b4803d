//! NUnit 2.x `test-results` reports.
//!
//! Every `test-suite` that directly holds test cases becomes one JUnit
//! `testsuite`; nested namespaces and assemblies are flattened.

use std::path::Path;

use xunit_core::CoreResult;

use crate::converter::FormatConverter;
use crate::validation::{parse_well_formed, validate_root, ValidationError, ValidationResult};
use crate::xml::XmlElement;

#[derive(Debug, Clone, Copy, Default)]
pub struct NUnitConverter;

impl NUnitConverter {
    pub const NAME: &'static str = "nunit";
}

impl FormatConverter for NUnitConverter {
    fn tool_name(&self) -> &str {
        Self::NAME
    }

    fn validate_input(&self, input: &Path) -> ValidationResult {
        let root = parse_well_formed(input)?;
        validate_root(input, &root, &["test-results"])?;

        let mut errors = Vec::new();
        if !root.has_child("test-suite") {
            errors.push(ValidationError::new(
                input,
                "<test-results> must contain a <test-suite>",
            ));
        }
        let mut cases = Vec::new();
        collect_cases(&root, &mut cases);
        for case in cases {
            if case.attr("name").is_none() {
                errors.push(ValidationError::new(
                    input,
                    "<test-case> is missing the required 'name' attribute",
                ));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn convert(&self, input: &Path, output: &Path) -> CoreResult<()> {
        let root = XmlElement::parse_file(input)?;
        let mut suites = XmlElement::new("testsuites");
        flatten_suites(&root, &mut suites);
        suites.write_file(output)
    }
}

fn collect_cases<'a>(element: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in &element.children {
        if child.name == "test-case" {
            out.push(child);
        } else {
            collect_cases(child, out);
        }
    }
}

fn flatten_suites(element: &XmlElement, out: &mut XmlElement) {
    for suite in element.children_named("test-suite") {
        if let Some(results) = suite.child("results") {
            let cases: Vec<&XmlElement> = results.children_named("test-case").collect();
            if !cases.is_empty() {
                out.children.push(convert_suite(suite, &cases));
            }
            flatten_suites(results, out);
        }
    }
}

fn convert_suite(suite: &XmlElement, cases: &[&XmlElement]) -> XmlElement {
    let suite_name = suite.attr("name").unwrap_or("");
    let mut converted = XmlElement::new("testsuite").with_attr("name", suite_name);

    let mut failures = 0;
    let mut skipped = 0;
    let mut children = Vec::with_capacity(cases.len());
    for case in cases {
        let (testcase, outcome) = convert_case(suite_name, case);
        match outcome {
            Outcome::Failed => failures += 1,
            Outcome::Skipped => skipped += 1,
            Outcome::Passed => {}
        }
        children.push(testcase);
    }

    converted.set_attr("tests", cases.len().to_string());
    converted.set_attr("failures", failures.to_string());
    converted.set_attr("errors", "0");
    converted.set_attr("skipped", skipped.to_string());
    converted.set_attr("time", suite.attr("time").unwrap_or("0"));
    converted.children = children;
    converted
}

enum Outcome {
    Passed,
    Failed,
    Skipped,
}

fn convert_case(suite_name: &str, case: &XmlElement) -> (XmlElement, Outcome) {
    let full_name = case.attr("name").unwrap_or("");
    let (classname, name) = match full_name.rsplit_once('.') {
        Some((class, method)) => (class, method),
        None => (suite_name, full_name),
    };

    let mut testcase = XmlElement::new("testcase")
        .with_attr("name", name)
        .with_attr("classname", classname)
        .with_attr("time", case.attr("time").unwrap_or("0"));

    let executed = !matches!(case.attr("executed"), Some("False") | Some("false"));
    let result = case.attr("result").unwrap_or("");
    let success = case.attr("success");

    let outcome = if !executed || matches!(result, "Ignored" | "Skipped" | "NotRunnable") {
        let mut skipped = XmlElement::new("skipped");
        if let Some(reason) = message_of(case, "reason") {
            skipped.set_attr("message", reason);
        }
        testcase.children.push(skipped);
        Outcome::Skipped
    } else if matches!(result, "Failure" | "Error") || matches!(success, Some("False") | Some("false")) {
        let failure_node = case.child("failure");
        let message = message_of(case, "failure").unwrap_or_default();
        let trace = failure_node
            .and_then(|f| f.child("stack-trace"))
            .map(|t| t.text_trimmed().to_string())
            .unwrap_or_default();
        let tag = if result == "Error" { "error" } else { "failure" };
        testcase.children.push(
            XmlElement::new(tag)
                .with_attr("message", message)
                .with_text(trace),
        );
        Outcome::Failed
    } else {
        Outcome::Passed
    };

    (testcase, outcome)
}

/// `<case><{container}><message>text</message></{container}></case>`
fn message_of(case: &XmlElement, container: &str) -> Option<String> {
    case.child(container)
        .and_then(|c| c.child("message"))
        .map(|m| m.text_trimmed().to_string())
}
