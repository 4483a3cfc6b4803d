//! Generated Report Cleanup
//!
//! Canonical reports live only for one pipeline execution. Each tool that
//! opts in has its output directory removed; when every tool opts in, the
//! namespace directory goes too.

use std::fs;
use std::path::Path;

use xunit_core::{CoreResult, RunLog};

use crate::models::tool::ToolConfig;
use crate::services::node::protocol::NodeRequest;
use crate::services::node::{dispatch, ExecutionNode};
use crate::utils::error::AppResult;
use crate::utils::paths;

/// Node side: remove one tool directory, or the namespace when `tool` is `None`.
///
/// Returns whether the directory existed.
pub fn delete_outputs(workspace: &Path, namespace: &str, tool: Option<&str>) -> CoreResult<bool> {
    let target = match tool {
        Some(tool) => paths::tool_dir(workspace, namespace, tool),
        None => paths::namespace_dir(workspace, namespace),
    };
    if !target.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(&target)?;
    tracing::debug!(path = %target.display(), "generated reports removed");
    Ok(true)
}

/// Coordinator side: apply every tool's deletion flag.
pub async fn clean(
    node: &dyn ExecutionNode,
    log: &RunLog,
    namespace: &str,
    tools: &[ToolConfig],
) -> AppResult<()> {
    let mut keep_namespace = false;
    for tool in tools {
        if !tool.delete_output_files {
            keep_namespace = true;
            continue;
        }
        dispatch(
            node,
            log,
            NodeRequest::DeleteOutputs {
                namespace: namespace.to_string(),
                tool: Some(tool.tool_name().to_string()),
            },
        )
        .await?;
    }

    if !keep_namespace {
        dispatch(
            node,
            log,
            NodeRequest::DeleteOutputs {
                namespace: namespace.to_string(),
                tool: None,
            },
        )
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::node::{LocalNode, NodeHandler};
    use std::sync::Arc;
    use xunit_core::MemorySink;

    fn setup(tools: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for tool in tools {
            let tool_dir = paths::tool_dir(dir.path(), "ns", tool);
            fs::create_dir_all(&tool_dir).unwrap();
            fs::write(tool_dir.join("REPORT-1.xml"), "<testsuite/>").unwrap();
        }
        dir
    }

    fn log() -> RunLog {
        RunLog::new(Arc::new(MemorySink::new()))
    }

    #[test]
    fn test_delete_outputs() {
        let dir = setup(&["junit"]);
        assert!(delete_outputs(dir.path(), "ns", Some("junit")).unwrap());
        assert!(!delete_outputs(dir.path(), "ns", Some("junit")).unwrap());
        assert!(delete_outputs(dir.path(), "ns", None).unwrap());
        assert!(!paths::namespace_dir(dir.path(), "ns").exists());
    }

    #[tokio::test]
    async fn test_all_tools_opted_in_removes_namespace() {
        let dir = setup(&["junit", "nunit"]);
        let node = LocalNode::new(NodeHandler::new(dir.path()));
        let tools = vec![
            ToolConfig::new("junit", "*.xml"),
            ToolConfig::new("nunit", "*.xml"),
        ];

        clean(&node, &log(), "ns", &tools).await.unwrap();
        assert!(!paths::namespace_dir(dir.path(), "ns").exists());
    }

    #[tokio::test]
    async fn test_opted_out_tool_keeps_its_directory_and_namespace() {
        let dir = setup(&["junit", "nunit"]);
        let node = LocalNode::new(NodeHandler::new(dir.path()));
        let tools = vec![
            ToolConfig::new("junit", "*.xml"),
            ToolConfig::new("nunit", "*.xml").with_delete_output_files(false),
        ];

        clean(&node, &log(), "ns", &tools).await.unwrap();
        assert!(!paths::tool_dir(dir.path(), "ns", "junit").exists());
        assert!(paths::tool_dir(dir.path(), "ns", "nunit").exists());
        assert!(paths::namespace_dir(dir.path(), "ns").exists());
    }

    #[tokio::test]
    async fn test_namespace_removed_even_when_children_are_gone() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(paths::namespace_dir(dir.path(), "ns")).unwrap();
        let node = LocalNode::new(NodeHandler::new(dir.path()));

        clean(&node, &log(), "ns", &[ToolConfig::new("junit", "*.xml")])
            .await
            .unwrap();
        assert!(!paths::namespace_dir(dir.path(), "ns").exists());
    }
}
