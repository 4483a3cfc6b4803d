//! Run History Integration Tests
//!
//! Consecutive runs recorded through `RunHistory`, the way the CLI drives
//! the pipeline.

use std::sync::Arc;

use xunit_core::{MemorySink, RunContext, Verdict};
use xunit_gates::Threshold;
use xunit_pipeline::{
    LocalNode, NodeHandler, PipelineConfig, ReportProcessor, RunHistory, ToolConfig,
};

use super::fixtures::{self, MIXED_SUITE, PASSING_SUITE};

fn context(workspace: &std::path::Path, run_id: &str) -> RunContext {
    RunContext::new(
        run_id,
        workspace,
        chrono::Utc::now().timestamp_millis(),
        Arc::new(MemorySink::new()),
    )
}

#[tokio::test]
async fn test_previous_completed_run_is_the_baseline() {
    let temp = tempfile::tempdir().unwrap();
    fixtures::write(temp.path(), "reports/TEST-lexer.xml", MIXED_SUITE);
    let history = RunHistory::open(temp.path().join(".history")).unwrap();
    let config = PipelineConfig::new(vec![ToolConfig::new("junit", "reports/*.xml")])
        .with_threshold(Threshold::failed().with_failure_new(0.0));
    let node = Arc::new(LocalNode::new(NodeHandler::new(temp.path())));

    // First run: the failure is new
    let mut first = history.prepare_run(context(temp.path(), "1")).unwrap();
    ReportProcessor::new(config.clone(), node.clone())
        .unwrap()
        .process(&mut first)
        .await
        .unwrap();
    assert_eq!(first.result(), Some(Verdict::Failure));
    history.store_run(&first, true).unwrap();

    // Second run: same failure, nothing new
    let mut second = history.prepare_run(context(temp.path(), "2")).unwrap();
    assert_eq!(second.previous().unwrap().run_id, "1");
    ReportProcessor::new(config, node)
        .unwrap()
        .process(&mut second)
        .await
        .unwrap();
    assert_eq!(second.result(), Some(Verdict::Success));
}

#[tokio::test]
async fn test_steps_of_one_run_accumulate() {
    let temp = tempfile::tempdir().unwrap();
    fixtures::write(temp.path(), "unit/TEST-parser.xml", PASSING_SUITE);
    fixtures::write(temp.path(), "it/TEST-lexer.xml", MIXED_SUITE);
    let history = RunHistory::open(temp.path().join(".history")).unwrap();
    let node = Arc::new(LocalNode::new(NodeHandler::new(temp.path())));

    // Unit step, run left open
    let mut run = history.prepare_run(context(temp.path(), "7")).unwrap();
    let unit = PipelineConfig::new(vec![ToolConfig::new("junit", "unit/*.xml")]);
    ReportProcessor::new(unit, node.clone())
        .unwrap()
        .process(&mut run)
        .await
        .unwrap();
    history.store_run(&run, false).unwrap();

    // Integration step restores and extends the stored aggregate
    let mut run = history.prepare_run(context(temp.path(), "7")).unwrap();
    let it = PipelineConfig::new(vec![ToolConfig::new("junit", "it/*.xml")])
        .with_threshold(Threshold::failed().with_failure(0.0));
    ReportProcessor::new(it, node)
        .unwrap()
        .process(&mut run)
        .await
        .unwrap();
    history.store_run(&run, true).unwrap();

    let stored = history.load("7").unwrap().unwrap();
    assert!(stored.completed);
    assert_eq!(stored.verdict, Some(Verdict::Failure));
    let aggregate = stored.test_result.unwrap();
    assert_eq!(aggregate.pass_count(), 3);
    assert_eq!(aggregate.fail_count(), 1);
    assert!(history.prepare_run(context(temp.path(), "7")).is_err());
}
