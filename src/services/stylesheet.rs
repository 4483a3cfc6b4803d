//! Stylesheet Resolution
//!
//! A `custom` tool names its stylesheet by URL, absolute path or
//! workspace-relative path. Locations are tried in this order:
//! 1. URL, downloaded by the coordinator
//! 2. absolute path on the coordinator
//! 3. absolute path on the execution node
//! 4. path relative to the node's workspace
//!
//! Built-in formats may be overridden by `<user_stylesheet_dir>/<tool>.xsl`
//! on the coordinator.

use std::path::{Path, PathBuf};

use xunit_core::{CoreError, RunContext, RunLog};

use crate::models::tool::ToolConfig;
use crate::services::node::protocol::{NodeRequest, NodeResponse};
use crate::services::node::{dispatch, ExecutionNode};
use crate::services::pattern;
use crate::utils::error::{AppError, AppResult};

/// Finds the stylesheet content a tool's conversion should use.
#[derive(Debug, Clone)]
pub struct StylesheetResolver {
    client: reqwest::Client,
    user_stylesheet_dir: Option<PathBuf>,
}

impl StylesheetResolver {
    pub fn new(user_stylesheet_dir: Option<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_stylesheet_dir,
        }
    }

    /// Stylesheet for `tool`, or `None` when the native converter applies.
    pub async fn for_tool(
        &self,
        tool: &ToolConfig,
        node: &dyn ExecutionNode,
        context: &RunContext,
    ) -> AppResult<Option<String>> {
        if tool.is_custom() {
            let raw = tool.custom_xsl.as_deref().unwrap_or_default().trim();
            let location = pattern::expand_macros(raw, context.env())?;
            let content = self.resolve_custom(&location, node, context.log()).await?;
            return Ok(Some(content));
        }
        self.user_stylesheet(tool.tool_name(), context.log())
    }

    /// Resolve a custom stylesheet location to its content.
    pub async fn resolve_custom(
        &self,
        location: &str,
        node: &dyn ExecutionNode,
        log: &RunLog,
    ) -> AppResult<String> {
        if is_url(location) {
            return self.download(location).await;
        }

        let path = Path::new(location);
        if path.is_absolute() {
            if path.is_file() {
                return Ok(tokio::fs::read_to_string(path).await?);
            }
            let request = NodeRequest::ReadFile {
                path: path.to_path_buf(),
            };
            if let Some(content) = read_on_node(node, log, request).await? {
                return Ok(content);
            }
        }

        let request = NodeRequest::ReadWorkspaceFile {
            relative: location.to_string(),
        };
        if let Some(content) = read_on_node(node, log, request).await? {
            return Ok(content);
        }

        Err(CoreError::stylesheet_not_found(format!(
            "The stylesheet '{}' is neither a URL nor a file on the coordinator, the node or in the workspace.",
            location
        ))
        .into())
    }

    /// `<user_stylesheet_dir>/<tool>.xsl`, when present.
    pub fn user_stylesheet(&self, tool_name: &str, log: &RunLog) -> AppResult<Option<String>> {
        let Some(dir) = &self.user_stylesheet_dir else {
            return Ok(None);
        };
        let path = dir.join(format!("{}.xsl", tool_name));
        if !path.is_file() {
            return Ok(None);
        }
        log.info(format!(
            "Using the custom user stylesheet '{}' for the tool '{}'.",
            path.display(),
            tool_name
        ));
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    async fn download(&self, url: &str) -> AppResult<String> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CoreError::stylesheet_not_found(format!(
                "Downloading the stylesheet '{}' returned HTTP {}",
                url,
                response.status().as_u16()
            ))
            .into());
        }
        Ok(response.text().await?)
    }
}

fn is_url(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

async fn read_on_node(
    node: &dyn ExecutionNode,
    log: &RunLog,
    request: NodeRequest,
) -> AppResult<Option<String>> {
    match dispatch(node, log, request).await? {
        NodeResponse::File { content } => Ok(content),
        other => Err(AppError::internal(format!(
            "Unexpected reply to a file read: {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::node::{LocalNode, NodeHandler};
    use std::fs;
    use std::sync::Arc;
    use xunit_core::MemorySink;

    fn context(workspace: &Path) -> (RunContext, MemorySink) {
        let sink = MemorySink::new();
        let context = RunContext::new("1", workspace, 0, Arc::new(sink.clone()))
            .with_var("XSL_DIR", "sheets");
        (context, sink)
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/a.xsl"));
        assert!(is_url("HTTP://example.com/a.xsl"));
        assert!(!is_url("/abs/a.xsl"));
        assert!(!is_url("rel/a.xsl"));
    }

    #[tokio::test]
    async fn test_absolute_path_on_coordinator() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("abs.xsl");
        fs::write(&sheet, "<abs/>").unwrap();
        let node = LocalNode::new(NodeHandler::new(dir.path()));
        let (context, _) = context(dir.path());

        let resolver = StylesheetResolver::new(None);
        let content = resolver
            .resolve_custom(&sheet.to_string_lossy(), &node, context.log())
            .await
            .unwrap();
        assert_eq!(content, "<abs/>");
    }

    #[tokio::test]
    async fn test_workspace_relative_with_macro() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sheets")).unwrap();
        fs::write(dir.path().join("sheets/mine.xsl"), "<mine/>").unwrap();
        let node = LocalNode::new(NodeHandler::new(dir.path()));
        let (context, _) = context(dir.path());

        let tool = ToolConfig::custom("*.xml", "$XSL_DIR/mine.xsl");
        let content = StylesheetResolver::new(None)
            .for_tool(&tool, &node, &context)
            .await
            .unwrap();
        assert_eq!(content.as_deref(), Some("<mine/>"));
    }

    #[tokio::test]
    async fn test_unresolvable_stylesheet() {
        let dir = tempfile::tempdir().unwrap();
        let node = LocalNode::new(NodeHandler::new(dir.path()));
        let (context, _) = context(dir.path());

        let err = StylesheetResolver::new(None)
            .resolve_custom("nowhere.xsl", &node, context.log())
            .await
            .unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::StylesheetNotFound(_))));
    }

    #[tokio::test]
    async fn test_user_stylesheet_override() {
        let dir = tempfile::tempdir().unwrap();
        let xsl_dir = dir.path().join("xsl");
        fs::create_dir_all(&xsl_dir).unwrap();
        fs::write(xsl_dir.join("junit.xsl"), "<override/>").unwrap();
        let node = LocalNode::new(NodeHandler::new(dir.path()));
        let (context, sink) = context(dir.path());
        let resolver = StylesheetResolver::new(Some(xsl_dir));

        let junit = resolver
            .for_tool(&ToolConfig::new("junit", "*.xml"), &node, &context)
            .await
            .unwrap();
        assert_eq!(junit.as_deref(), Some("<override/>"));
        assert!(sink.contains("Using the custom user stylesheet"));

        let nunit = resolver
            .for_tool(&ToolConfig::new("nunit", "*.xml"), &node, &context)
            .await
            .unwrap();
        assert!(nunit.is_none());
    }
}
