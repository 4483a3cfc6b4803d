//! Report validation
//!
//! Structural checks for input reports and for the canonical (JUnit) format
//! every converter must produce. Errors are collected, never short-circuited,
//! so the caller can log each one.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::xml::XmlElement;

/// A single validation problem found in a report file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub file: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(file: &Path, message: impl Into<String>) -> Self {
        Self {
            file: file.display().to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// `Ok(())` when valid, otherwise every problem found.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Parse a file, turning any parse failure into a single validation error.
pub fn parse_well_formed(path: &Path) -> Result<XmlElement, Vec<ValidationError>> {
    XmlElement::parse_file(path).map_err(|e| vec![ValidationError::new(path, e.to_string())])
}

/// Well-formedness only; used for formats driven by a user stylesheet.
pub fn validate_well_formed(path: &Path) -> ValidationResult {
    parse_well_formed(path).map(|_| ())
}

/// Expect a given root element name.
pub fn validate_root(path: &Path, root: &XmlElement, expected: &[&str]) -> ValidationResult {
    if expected.iter().any(|name| root.name == *name) {
        return Ok(());
    }
    Err(vec![ValidationError::new(
        path,
        format!(
            "Unexpected root element <{}>, expected one of: {}",
            root.name,
            expected
                .iter()
                .map(|n| format!("<{}>", n))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    )])
}

/// Validate a file against the canonical JUnit report structure.
pub fn validate_canonical(path: &Path) -> ValidationResult {
    let root = parse_well_formed(path)?;
    let errors = canonical_errors(path, &root);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Collect every canonical-structure violation under `root`.
pub fn canonical_errors(path: &Path, root: &XmlElement) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    match root.name.as_str() {
        "testsuites" => {
            for child in &root.children {
                match child.name.as_str() {
                    "testsuite" => check_suite(path, child, &mut errors),
                    "properties" => {}
                    other => errors.push(ValidationError::new(
                        path,
                        format!("Element <{}> is not allowed under <testsuites>", other),
                    )),
                }
            }
        }
        "testsuite" => check_suite(path, root, &mut errors),
        other => errors.push(ValidationError::new(
            path,
            format!(
                "Unexpected root element <{}>, expected <testsuites> or <testsuite>",
                other
            ),
        )),
    }
    errors
}

const SUITE_COUNTERS: [&str; 5] = ["tests", "failures", "errors", "skipped", "disabled"];
const CASE_CHILDREN: [&str; 7] = [
    "failure",
    "error",
    "skipped",
    "system-out",
    "system-err",
    "properties",
    "rerunFailure",
];

fn check_suite(path: &Path, suite: &XmlElement, errors: &mut Vec<ValidationError>) {
    let suite_name = suite.attr("name");
    if suite_name.is_none() {
        errors.push(ValidationError::new(
            path,
            "<testsuite> is missing the required 'name' attribute",
        ));
    }
    let label = suite_name.unwrap_or("?");

    for counter in SUITE_COUNTERS {
        if let Some(value) = suite.attr(counter) {
            if value.trim().parse::<u64>().is_err() {
                errors.push(ValidationError::new(
                    path,
                    format!(
                        "<testsuite name=\"{}\"> attribute '{}' is not a count: '{}'",
                        label, counter, value
                    ),
                ));
            }
        }
    }
    check_time(path, suite, &format!("<testsuite name=\"{}\">", label), errors);

    for child in &suite.children {
        match child.name.as_str() {
            "testcase" => check_case(path, label, child, errors),
            "testsuite" => check_suite(path, child, errors),
            _ => {}
        }
    }
}

fn check_case(path: &Path, suite: &str, case: &XmlElement, errors: &mut Vec<ValidationError>) {
    let Some(name) = case.attr("name") else {
        errors.push(ValidationError::new(
            path,
            format!(
                "<testcase> in suite '{}' is missing the required 'name' attribute",
                suite
            ),
        ));
        return;
    };
    let label = format!("<testcase name=\"{}\">", name);
    check_time(path, case, &label, errors);

    for child in &case.children {
        if !CASE_CHILDREN.contains(&child.name.as_str()) {
            errors.push(ValidationError::new(
                path,
                format!("Element <{}> is not allowed under {}", child.name, label),
            ));
        }
    }
}

fn check_time(path: &Path, element: &XmlElement, label: &str, errors: &mut Vec<ValidationError>) {
    if let Some(time) = element.attr("time") {
        if parse_time(time).is_none() {
            errors.push(ValidationError::new(
                path,
                format!("{} attribute 'time' is not a number: '{}'", label, time),
            ));
        }
    }
}

/// Parse a JUnit `time` attribute; thousands separators are tolerated.
pub fn parse_time(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Some(0.0);
    }
    cleaned.parse::<f64>().ok()
}
