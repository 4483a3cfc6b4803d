//! In-process execution node

use std::sync::Arc;

use async_trait::async_trait;

use xunit_core::{CoreError, CoreResult};

use super::handler::NodeHandler;
use super::protocol::{NodeEnvelope, NodeRequest};
use super::ExecutionNode;

/// Node running in the coordinator's process, for workspaces on local disk.
#[derive(Clone)]
pub struct LocalNode {
    handler: Arc<NodeHandler>,
}

impl LocalNode {
    pub fn new(handler: NodeHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

#[async_trait]
impl ExecutionNode for LocalNode {
    fn name(&self) -> &str {
        "local"
    }

    async fn call(&self, request: NodeRequest) -> CoreResult<NodeEnvelope> {
        let handler = Arc::clone(&self.handler);
        tokio::task::spawn_blocking(move || handler.handle(request))
            .await
            .map_err(|e| CoreError::remote(format!("Local node task failed: {}", e)))
    }
}
