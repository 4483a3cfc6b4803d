//! Pipeline Integration Tests
//!
//! Full executions of `ReportProcessor` through the local node.

use std::sync::Arc;

use tempfile::TempDir;

use xunit_core::{CoreError, Verdict};
use xunit_gates::{Threshold, ThresholdMode};
use xunit_pipeline::{
    CompletedRun, ExecutionNode, LocalNode, NodeHandler, PipelineConfig, ProcessOutcome,
    ReportProcessor, ToolConfig,
};

use super::fixtures::{self, GTEST_SUITE, MIXED_SUITE, PASSING_SUITE, PYTEST_SUITE};

// ============================================================================
// Helper Functions
// ============================================================================

fn junit_workspace() -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    fixtures::write(temp.path(), "reports/TEST-parser.xml", PASSING_SUITE);
    fixtures::write(temp.path(), "reports/TEST-lexer.xml", MIXED_SUITE);
    temp
}

fn node(temp: &TempDir) -> Arc<dyn ExecutionNode> {
    Arc::new(LocalNode::new(NodeHandler::new(temp.path())))
}

fn junit_config() -> PipelineConfig {
    PipelineConfig::new(vec![ToolConfig::new("junit", "$REPORTS/*.xml")])
}

// ============================================================================
// Verdicts
// ============================================================================

#[tokio::test]
async fn test_failure_threshold_fails_the_run() {
    let temp = junit_workspace();
    let config = junit_config().with_threshold(Threshold::failed().with_failure(0.0));
    let processor = ReportProcessor::new(config, node(&temp)).unwrap();
    let (mut run, sink) = fixtures::run(temp.path(), "1");

    let outcome = processor.process(&mut run).await.unwrap();

    assert_eq!(
        outcome,
        ProcessOutcome::Recorded {
            verdict: Verdict::Failure,
            passed: 3,
            failed: 1,
            skipped: 0
        }
    );
    assert_eq!(run.result(), Some(Verdict::Failure));
    assert!(sink.contains("Setting the build status to FAILURE"));

    let aggregate = run.test_result().unwrap();
    let failed = aggregate
        .case("com.acme.LexerTest", "lexesStrings")
        .unwrap();
    assert_eq!(failed.message.as_deref(), Some("unterminated string"));
    assert_eq!(fixtures::generated_dirs(temp.path()), 0);
}

#[tokio::test]
async fn test_clean_reports_succeed() {
    let temp = tempfile::tempdir().unwrap();
    fixtures::write(temp.path(), "reports/TEST-parser.xml", PASSING_SUITE);
    let config = junit_config().with_threshold(Threshold::failed().with_failure(0.0));
    let processor = ReportProcessor::new(config, node(&temp)).unwrap();
    let (mut run, _) = fixtures::run(temp.path(), "1");

    let outcome = processor.process(&mut run).await.unwrap();
    assert!(matches!(
        outcome,
        ProcessOutcome::Recorded {
            verdict: Verdict::Success,
            passed: 2,
            failed: 0,
            ..
        }
    ));
}

#[tokio::test]
async fn test_earlier_failure_is_never_improved() {
    let temp = tempfile::tempdir().unwrap();
    fixtures::write(temp.path(), "reports/TEST-parser.xml", PASSING_SUITE);
    let processor = ReportProcessor::new(junit_config(), node(&temp)).unwrap();
    let (run, _) = fixtures::run(temp.path(), "1");
    let mut run = run.with_result(Verdict::Failure);

    processor.process(&mut run).await.unwrap();
    assert_eq!(run.result(), Some(Verdict::Failure));
}

#[tokio::test]
async fn test_new_failures_are_measured_against_previous_run() {
    let temp = junit_workspace();
    let config = junit_config().with_threshold(Threshold::failed().with_failure_new(0.0));

    // Previous run already had the lexer failure
    let baseline = {
        let (mut earlier, _) = fixtures::run(temp.path(), "1");
        ReportProcessor::new(junit_config(), node(&temp))
            .unwrap()
            .process(&mut earlier)
            .await
            .unwrap();
        CompletedRun {
            run_id: "1".to_string(),
            verdict: earlier.result(),
            test_result: earlier.test_result().cloned(),
        }
    };

    let (run, _) = fixtures::run(temp.path(), "2");
    let mut run = run.with_previous(baseline.clone());
    let processor = ReportProcessor::new(config.clone(), node(&temp)).unwrap();
    processor.process(&mut run).await.unwrap();
    assert_eq!(run.result(), Some(Verdict::Success));

    // A second failing suite is new
    fixtures::write(
        temp.path(),
        "reports/TEST-lexer2.xml",
        &MIXED_SUITE.replace("com.acme.LexerTest", "com.acme.Lexer2Test"),
    );
    let (run, sink) = fixtures::run(temp.path(), "3");
    let mut run = run.with_previous(baseline);
    let processor = ReportProcessor::new(config, node(&temp)).unwrap();
    processor.process(&mut run).await.unwrap();
    assert_eq!(run.result(), Some(Verdict::Failure));
    assert!(sink.contains("The new failed test count (1) exceeds"));
}

#[tokio::test]
async fn test_percent_mode() {
    let temp = junit_workspace();
    let config = junit_config()
        .with_mode(ThresholdMode::Percent)
        .with_threshold(Threshold::failed().with_unstable(20.0).with_failure(50.0));
    let processor = ReportProcessor::new(config, node(&temp)).unwrap();
    let (mut run, _) = fixtures::run(temp.path(), "1");

    processor.process(&mut run).await.unwrap();
    // 1 failure out of 4 cases is 25%
    assert_eq!(run.result(), Some(Verdict::Unstable));
}

// ============================================================================
// Recording
// ============================================================================

#[tokio::test]
async fn test_processing_twice_does_not_double_count() {
    let temp = junit_workspace();
    let (mut run, _) = fixtures::run(temp.path(), "1");

    for _ in 0..2 {
        let processor = ReportProcessor::new(junit_config(), node(&temp)).unwrap();
        processor.process(&mut run).await.unwrap();
    }

    let aggregate = run.test_result().unwrap();
    assert_eq!(aggregate.pass_count(), 3);
    assert_eq!(aggregate.fail_count(), 1);
    assert_eq!(aggregate.total_count(), 4);
}

#[tokio::test]
async fn test_several_formats_in_one_execution() {
    let temp = junit_workspace();
    fixtures::write(temp.path(), "gtest/math.xml", GTEST_SUITE);
    let config = PipelineConfig::new(vec![
        ToolConfig::new("junit", "reports/*.xml"),
        ToolConfig::new("googletest", "gtest/*.xml").with_delete_output_files(false),
    ]);
    let processor = ReportProcessor::new(config, node(&temp)).unwrap();
    let (mut run, _) = fixtures::run(temp.path(), "1");

    let outcome = processor.process(&mut run).await.unwrap();
    assert!(matches!(
        outcome,
        ProcessOutcome::Recorded {
            passed: 4,
            failed: 1,
            skipped: 1,
            ..
        }
    ));

    // googletest kept its reports, so the namespace stays
    let namespace = temp
        .path()
        .join("generatedJUnitFiles")
        .join(processor.namespace());
    assert!(namespace.join("googletest").is_dir());
    assert!(!namespace.join("junit").exists());
}

#[tokio::test]
async fn test_same_method_name_in_two_classes_counts_twice() {
    let temp = tempfile::tempdir().unwrap();
    fixtures::write(temp.path(), "reports/TEST-pytest.xml", PYTEST_SUITE);
    let config = junit_config().with_threshold(Threshold::failed().with_failure(0.0));
    let processor = ReportProcessor::new(config, node(&temp)).unwrap();
    let (mut run, _) = fixtures::run(temp.path(), "1");

    let outcome = processor.process(&mut run).await.unwrap();
    assert_eq!(
        outcome,
        ProcessOutcome::Recorded {
            verdict: Verdict::Failure,
            passed: 1,
            failed: 1,
            skipped: 0
        }
    );
}

#[tokio::test]
async fn test_workspace_path_with_glob_characters() {
    let temp = tempfile::tempdir().unwrap();
    let workspace = temp.path().join("matrix[os=linux]");
    fixtures::write(&workspace, "reports/TEST-parser.xml", PASSING_SUITE);
    let node = Arc::new(LocalNode::new(NodeHandler::new(&workspace)));
    let processor = ReportProcessor::new(junit_config(), node).unwrap();
    let (mut run, _) = fixtures::run(&workspace, "1");

    let outcome = processor.process(&mut run).await.unwrap();
    assert!(matches!(
        outcome,
        ProcessOutcome::Recorded { passed: 2, .. }
    ));
    assert_eq!(fixtures::generated_dirs(&workspace), 0);
}

#[tokio::test]
async fn test_all_tools_skipping_leaves_run_untouched() {
    let temp = tempfile::tempdir().unwrap();
    let config = PipelineConfig::new(vec![
        ToolConfig::new("junit", "missing/*.xml").with_skip_no_test_files(true),
        ToolConfig::new("nunit", ""),
    ]);
    let processor = ReportProcessor::new(config, node(&temp)).unwrap();
    let (run, sink) = fixtures::run(temp.path(), "1");
    let mut run = run.with_result(Verdict::Unstable);

    let outcome = processor.process(&mut run).await.unwrap();
    assert_eq!(outcome, ProcessOutcome::Skipped);
    assert_eq!(run.result(), Some(Verdict::Unstable));
    assert!(run.test_result().is_none());
    assert!(sink.contains("Skipping tests recording."));
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_stale_reports_are_rejected() {
    let temp = junit_workspace();
    let one_hour_later = chrono::Utc::now().timestamp_millis() + 3_600_000;
    let processor = ReportProcessor::new(junit_config(), node(&temp)).unwrap();
    let (mut run, _) = fixtures::run_started_at(temp.path(), "1", one_hour_later);

    let err = processor.process(&mut run).await.unwrap_err();
    assert!(matches!(err.as_core(), Some(CoreError::OutdatedReports(_))));
    assert_eq!(run.result(), None);
}

#[tokio::test]
async fn test_stale_reports_accepted_without_freshness_check() {
    let temp = junit_workspace();
    let one_hour_later = chrono::Utc::now().timestamp_millis() + 3_600_000;
    let config = PipelineConfig::new(vec![
        ToolConfig::new("junit", "reports/*.xml").with_fail_if_not_new(false)
    ]);
    let processor = ReportProcessor::new(config, node(&temp)).unwrap();
    let (mut run, _) = fixtures::run_started_at(temp.path(), "1", one_hour_later);

    processor.process(&mut run).await.unwrap();
    assert_eq!(run.test_result().unwrap().total_count(), 4);
}
