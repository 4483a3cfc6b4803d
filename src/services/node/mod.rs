//! Execution Nodes
//!
//! Conversion, parsing and deletion run on the node holding the workspace.
//! The coordinator talks to a node only through `ExecutionNode::call` with
//! serializable `NodeRequest`s; the node answers with a `NodeEnvelope`
//! carrying its log lines and the outcome.
//!
//! - `LocalNode` - same process, blocking work on the tokio blocking pool
//! - `ChannelNode` - worker task reached through JSON messages over channels

mod channel;
mod handler;
mod local;
pub mod protocol;

pub use channel::ChannelNode;
pub use handler::NodeHandler;
pub use local::LocalNode;
pub use protocol::{
    ConversionJob, FaultKind, NodeEnvelope, NodeFault, NodeRequest, NodeResponse,
};

use async_trait::async_trait;

use xunit_core::{CoreResult, RunLog};

/// A node that can execute pipeline work next to the workspace files.
#[async_trait]
pub trait ExecutionNode: Send + Sync {
    /// Node name for logs.
    fn name(&self) -> &str;

    /// Execute one request. `Err` is a transport failure; failures of the
    /// work itself come back as a fault inside the envelope.
    async fn call(&self, request: NodeRequest) -> CoreResult<NodeEnvelope>;
}

/// Send a request, replay the node's log lines and unwrap the outcome.
pub async fn dispatch(
    node: &dyn ExecutionNode,
    log: &RunLog,
    request: NodeRequest,
) -> CoreResult<NodeResponse> {
    let kind = request.kind();
    tracing::debug!(node = node.name(), request = kind, "dispatching to node");
    let envelope = node.call(request).await?;
    log.replay(&envelope.log);
    envelope.outcome.map_err(|fault| {
        tracing::debug!(
            node = node.name(),
            request = kind,
            fault = ?fault.kind,
            "node reported a fault"
        );
        fault.into_core_error()
    })
}
