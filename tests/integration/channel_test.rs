//! Channel Transport Integration Tests
//!
//! The same pipeline as the local scenarios, with every node request
//! serialized and handled by a worker task.

use std::sync::Arc;

use xunit_core::Verdict;
use xunit_gates::Threshold;
use xunit_pipeline::{ChannelNode, NodeHandler, PipelineConfig, ReportProcessor, ToolConfig};

use super::fixtures::{self, MIXED_SUITE, PASSING_SUITE};

#[tokio::test]
async fn test_pipeline_over_channel_node() {
    let temp = tempfile::tempdir().unwrap();
    fixtures::write(temp.path(), "reports/TEST-parser.xml", PASSING_SUITE);
    fixtures::write(temp.path(), "reports/TEST-lexer.xml", MIXED_SUITE);

    let node = ChannelNode::spawn("agent-1", NodeHandler::new(temp.path()));
    let config = PipelineConfig::new(vec![ToolConfig::new("junit", "reports/*.xml")])
        .with_threshold(Threshold::failed().with_unstable(0.0));
    let processor = ReportProcessor::new(config, Arc::new(node)).unwrap();
    let (mut run, sink) = fixtures::run(temp.path(), "1");

    processor.process(&mut run).await.unwrap();

    assert_eq!(run.result(), Some(Verdict::Unstable));
    assert_eq!(run.test_result().unwrap().fail_count(), 1);
    // Node-side log lines come back with the reply
    assert!(sink.contains("test report file(s) were found"));
    assert_eq!(fixtures::generated_dirs(temp.path()), 0);
}

#[tokio::test]
async fn test_concurrent_executions_use_separate_namespaces() {
    let temp = tempfile::tempdir().unwrap();
    fixtures::write(temp.path(), "reports/TEST-parser.xml", PASSING_SUITE);

    let node = Arc::new(ChannelNode::spawn("agent-1", NodeHandler::new(temp.path())));
    let config = PipelineConfig::new(vec![ToolConfig::new("junit", "reports/*.xml")]);
    let first = ReportProcessor::new(config.clone(), node.clone()).unwrap();
    let second = ReportProcessor::new(config, node).unwrap();
    assert_ne!(first.namespace(), second.namespace());

    let (mut run_a, _) = fixtures::run(temp.path(), "a");
    let (mut run_b, _) = fixtures::run(temp.path(), "b");
    let (a, b) = tokio::join!(first.process(&mut run_a), second.process(&mut run_b));
    a.unwrap();
    b.unwrap();

    assert_eq!(run_a.test_result().unwrap().pass_count(), 2);
    assert_eq!(run_b.test_result().unwrap().pass_count(), 2);
}
