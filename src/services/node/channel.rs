//! Message-passing execution node
//!
//! A worker task owns the `NodeHandler`; the coordinator reaches it only
//! through an mpsc queue of JSON requests, each answered on its own oneshot
//! channel. Nothing but serialized data crosses between the two sides.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use xunit_core::{CoreError, CoreResult};

use super::handler::NodeHandler;
use super::protocol::{NodeEnvelope, NodeRequest};
use super::ExecutionNode;

const QUEUE_CAPACITY: usize = 16;

/// One queued request and where to send its reply.
struct NodeCall {
    request: String,
    reply: oneshot::Sender<Result<String, String>>,
}

/// Handle to a node worker task.
#[derive(Clone)]
pub struct ChannelNode {
    name: String,
    sender: mpsc::Sender<NodeCall>,
}

impl ChannelNode {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(name: impl Into<String>, handler: NodeHandler) -> Self {
        let name = name.into();
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(worker_loop(name.clone(), Arc::new(handler), receiver));
        Self { name, sender }
    }
}

/// Requests are executed one at a time, in arrival order.
async fn worker_loop(
    name: String,
    handler: Arc<NodeHandler>,
    mut receiver: mpsc::Receiver<NodeCall>,
) {
    while let Some(call) = receiver.recv().await {
        let handler = Arc::clone(&handler);
        let request = call.request;
        let reply = tokio::task::spawn_blocking(move || handler.handle_json(&request))
            .await
            .map_err(|e| format!("worker task failed: {}", e))
            .and_then(|result| result.map_err(|e| e.to_string()));
        if call.reply.send(reply).is_err() {
            tracing::warn!(node = %name, "caller went away before the reply was sent");
        }
    }
    tracing::debug!(node = %name, "node worker stopped");
}

#[async_trait]
impl ExecutionNode for ChannelNode {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, request: NodeRequest) -> CoreResult<NodeEnvelope> {
        let request = serde_json::to_string(&request)?;
        let (reply, response) = oneshot::channel();
        self.sender
            .send(NodeCall { request, reply })
            .await
            .map_err(|_| CoreError::remote(format!("Node '{}' is not running", self.name)))?;

        let payload = response
            .await
            .map_err(|_| CoreError::remote(format!("Node '{}' dropped the request", self.name)))?
            .map_err(|e| CoreError::remote(format!("Node '{}': {}", self.name, e)))?;
        Ok(serde_json::from_str(&payload)?)
    }
}
