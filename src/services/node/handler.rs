//! Node-side request handler
//!
//! Executes a `NodeRequest` against the node's workspace. All work is
//! blocking filesystem work; callers move it off the async runtime.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use xunit_converters::{ConverterRegistry, XsltprocTransformer};
use xunit_core::{CoreError, CoreResult, MemorySink, RunLog};

use crate::services::node::protocol::{NodeEnvelope, NodeFault, NodeRequest, NodeResponse};
use crate::services::{conversion, lifecycle, recorder};

/// Request executor bound to one workspace.
#[derive(Clone)]
pub struct NodeHandler {
    workspace: PathBuf,
    registry: Arc<ConverterRegistry>,
}

impl NodeHandler {
    /// Handler with the built-in converters and the `xsltproc` engine.
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        let registry = ConverterRegistry::with_builtins(Arc::new(XsltprocTransformer::new()));
        Self::with_registry(workspace, Arc::new(registry))
    }

    pub fn with_registry(workspace: impl Into<PathBuf>, registry: Arc<ConverterRegistry>) -> Self {
        Self {
            workspace: workspace.into(),
            registry,
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Run a request, capturing the log lines it writes.
    pub fn handle(&self, request: NodeRequest) -> NodeEnvelope {
        let sink = MemorySink::new();
        let log = RunLog::new(Arc::new(sink.clone()));
        match self.execute(request, &log) {
            Ok(response) => NodeEnvelope::ok(sink.take(), response),
            Err(err) => NodeEnvelope::fault(sink.take(), NodeFault::from(err)),
        }
    }

    /// JSON in, JSON out; used by message-based transports.
    pub fn handle_json(&self, request: &str) -> CoreResult<String> {
        let envelope = match serde_json::from_str::<NodeRequest>(request) {
            Ok(request) => self.handle(request),
            Err(e) => NodeEnvelope::fault(
                Vec::new(),
                NodeFault::from(CoreError::internal(format!("Malformed node request: {}", e))),
            ),
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    fn execute(&self, request: NodeRequest, log: &RunLog) -> CoreResult<NodeResponse> {
        match request {
            NodeRequest::Convert(job) => {
                let processed =
                    conversion::convert_reports(&self.workspace, &job, &self.registry, log)?;
                Ok(NodeResponse::Converted { processed })
            }
            NodeRequest::ParseReports {
                namespace,
                build_time_ms,
                coordinator_now_ms,
            } => {
                let aggregate = recorder::parse_reports(
                    &self.workspace,
                    &namespace,
                    build_time_ms,
                    coordinator_now_ms,
                    log,
                )?;
                Ok(NodeResponse::Parsed { aggregate })
            }
            NodeRequest::ReadFile { path } => {
                let content = if path.is_absolute() {
                    read_if_file(&path)?
                } else {
                    None
                };
                Ok(NodeResponse::File { content })
            }
            NodeRequest::ReadWorkspaceFile { relative } => {
                let content = read_if_file(&self.workspace.join(relative))?;
                Ok(NodeResponse::File { content })
            }
            NodeRequest::DeleteOutputs { namespace, tool } => {
                let existed =
                    lifecycle::delete_outputs(&self.workspace, &namespace, tool.as_deref())?;
                Ok(NodeResponse::Deleted { existed })
            }
        }
    }
}

fn read_if_file(path: &Path) -> CoreResult<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?))
}
