//! Workspace fixtures shared by the integration scenarios.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use xunit_core::{MemorySink, RunContext};
use xunit_pipeline::Run;

pub const PASSING_SUITE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="com.acme.ParserTest" tests="2" failures="0">
  <testcase classname="com.acme.ParserTest" name="parsesEmpty" time="0.01"/>
  <testcase classname="com.acme.ParserTest" name="parsesNested" time="0.02"/>
</testsuite>"#;

pub const MIXED_SUITE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="com.acme.LexerTest" tests="2" failures="1">
  <testcase classname="com.acme.LexerTest" name="lexesNumbers" time="0.01"/>
  <testcase classname="com.acme.LexerTest" name="lexesStrings" time="0.03">
    <failure message="unterminated string">LexerTest.java:42</failure>
  </testcase>
</testsuite>"#;

pub const GTEST_SUITE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites tests="2" failures="0" disabled="1" name="AllTests">
  <testsuite name="MathTest" tests="2" failures="0" disabled="1" time="0.01">
    <testcase name="Adds" status="run" result="completed" time="0" classname="MathTest"/>
    <testcase name="DISABLED_Slow" status="notrun" result="suppressed" time="0" classname="MathTest"/>
  </testsuite>
</testsuites>"#;

pub const PYTEST_SUITE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="pytest" tests="2" failures="1">
    <testcase classname="tests.test_a" name="test_init" time="0.01"/>
    <testcase classname="tests.test_b" name="test_init" time="0.02">
      <failure message="assert 0 == 1">tests/test_b.py:4</failure>
    </testcase>
  </testsuite>
</testsuites>"#;

pub fn write(workspace: &Path, relative: &str, content: &str) {
    let path = workspace.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A run started now, logging into a memory sink.
pub fn run(workspace: &Path, run_id: &str) -> (Run, MemorySink) {
    run_started_at(workspace, run_id, chrono::Utc::now().timestamp_millis())
}

pub fn run_started_at(workspace: &Path, run_id: &str, started_at_ms: i64) -> (Run, MemorySink) {
    let sink = MemorySink::new();
    let context = RunContext::new(run_id, workspace, started_at_ms, Arc::new(sink.clone()))
        .with_var("REPORTS", "reports");
    (Run::new(context), sink)
}

pub fn generated_dirs(workspace: &Path) -> usize {
    match fs::read_dir(workspace.join("generatedJUnitFiles")) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}
