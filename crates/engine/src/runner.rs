//! Single-node execution on behalf of the host.
//!
//! `NodeRunner` is the adapter between the host and its nodes:
//! 1. Looks up the node implementation by `node_type`.
//! 2. Builds an `ExecutionContext` around the injected HTTP and credential
//!    capabilities.
//! 3. Runs the node exactly once; there is no retry.
//! 4. Wraps a node failure in `EngineError::NodeFailed`, keeping the node's
//!    classified error as the source.
//!
//! It also runs credential probes (`test_credentials`).

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, instrument};
use uuid::Uuid;

use nodes::{
    CredentialDescription, CredentialResolver, CredentialType, ExecutableNode, ExecutionContext,
    HttpClient, NodeDescription, NodeError, NodeItem,
};

use crate::{EngineError, NodeDefinition};

// ---------------------------------------------------------------------------
// Registries
// ---------------------------------------------------------------------------

/// Maps node type names to `ExecutableNode` implementations.
pub type NodeRegistry = HashMap<String, Arc<dyn ExecutableNode>>;

/// Maps credential type names to `CredentialType` implementations.
pub type CredentialRegistry = HashMap<String, Arc<dyn CredentialType>>;

// ---------------------------------------------------------------------------
// Output of a completed execution
// ---------------------------------------------------------------------------

/// The result of running one node.
#[derive(Debug)]
pub struct ExecutionResult {
    pub execution_id: Uuid,
    /// Items on the node's single output channel.
    pub items: Vec<NodeItem>,
}

impl ExecutionResult {
    /// The item payloads, without the `{ "json": ... }` envelope.
    pub fn json(&self) -> Vec<&Value> {
        self.items.iter().map(|item| &item.json).collect()
    }
}

// ---------------------------------------------------------------------------
// NodeRunner
// ---------------------------------------------------------------------------

/// Runs registered nodes against shared capabilities.
///
/// Holds no per-execution state; one runner can serve concurrent runs.
pub struct NodeRunner {
    nodes: NodeRegistry,
    credential_types: CredentialRegistry,
    credentials: Arc<dyn CredentialResolver>,
    http: Arc<dyn HttpClient>,
}

impl NodeRunner {
    pub fn new(http: Arc<dyn HttpClient>, credentials: Arc<dyn CredentialResolver>) -> Self {
        Self {
            nodes: HashMap::new(),
            credential_types: HashMap::new(),
            credentials,
            http,
        }
    }

    /// Register a node under the name from its descriptor.
    pub fn register_node(&mut self, node: Arc<dyn ExecutableNode>) -> &mut Self {
        self.nodes.insert(node.description().name.clone(), node);
        self
    }

    /// Register a credential type under the name from its descriptor.
    pub fn register_credential_type(&mut self, credential_type: Arc<dyn CredentialType>) -> &mut Self {
        self.credential_types
            .insert(credential_type.description().name.clone(), credential_type);
        self
    }

    /// Descriptors of every registered node, sorted by name.
    pub fn node_descriptions(&self) -> Vec<&NodeDescription> {
        let mut out: Vec<_> = self.nodes.values().map(|n| n.description()).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Descriptors of every registered credential type, sorted by name.
    pub fn credential_descriptions(&self) -> Vec<&CredentialDescription> {
        let mut out: Vec<_> = self.credential_types.values().map(|c| c.description()).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Run one node once and return its output items.
    ///
    /// # Errors
    /// [`EngineError::UnknownNodeType`] if nothing is registered for the
    /// definition's type, [`EngineError::NodeFailed`] if the node fails.
    #[instrument(skip(self, node, input), fields(node_id = %node.id, node_type = %node.node_type))]
    pub async fn run(
        &self,
        workflow_id: Uuid,
        node: &NodeDefinition,
        input: Vec<NodeItem>,
    ) -> Result<ExecutionResult, EngineError> {
        let node_impl = self
            .nodes
            .get(&node.node_type)
            .ok_or_else(|| EngineError::UnknownNodeType(node.node_type.clone()))?;

        let ctx = ExecutionContext {
            workflow_id,
            execution_id: Uuid::new_v4(),
            parameters: node.parameters.clone(),
            credentials: Arc::clone(&self.credentials),
            http: Arc::clone(&self.http),
        };

        match node_impl.execute(input, &ctx).await {
            Ok(items) => {
                info!("node '{}' succeeded with {} item(s)", node.id, items.len());
                Ok(ExecutionResult {
                    execution_id: ctx.execution_id,
                    items,
                })
            }
            Err(source) => {
                error!("node '{}' failed: {}", node.id, source);
                Err(EngineError::NodeFailed {
                    node_id: node.id.clone(),
                    node_type: node.node_type.clone(),
                    source,
                })
            }
        }
    }

    /// Resolve the stored credentials of `credential_type` and send its probe
    /// request once. Any successful response means the credentials are valid.
    #[instrument(skip(self))]
    pub async fn test_credentials(&self, credential_type: &str) -> Result<(), EngineError> {
        let cred = self
            .credential_types
            .get(credential_type)
            .ok_or_else(|| EngineError::UnknownCredentialType(credential_type.to_owned()))?;

        let failed = |err: NodeError| EngineError::CredentialTestFailed {
            credential_type: credential_type.to_owned(),
            message: err.to_string(),
        };

        let data = self.credentials.resolve(credential_type).await.map_err(failed)?;
        let request = cred.test_request(&data).map_err(failed)?;

        match self.http.request(request).await {
            Ok(_) => {
                info!("credentials '{}' verified", credential_type);
                Ok(())
            }
            Err(err) => {
                error!("credentials '{}' rejected: {}", credential_type, err);
                Err(failed(err.into()))
            }
        }
    }
}
