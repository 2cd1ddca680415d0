//! The contracts every node and credential type must fulfil.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::credentials::{CredentialData, CredentialResolver};
use crate::descriptor::{CredentialDescription, NodeDescription};
use crate::http::{HttpClient, HttpRequest};
use crate::NodeError;

/// One unit of node output, in the host's `{ "json": { ... } }` convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeItem {
    pub json: Value,
}

impl NodeItem {
    pub fn new(json: Value) -> Self {
        Self { json }
    }
}

/// Everything the host supplies to a single node execution.
///
/// Defined here (in the nodes crate) so both the engine and individual node
/// implementations can import it without a circular dependency. Holds no
/// mutable state; concurrent executions each get their own context.
#[derive(Clone)]
pub struct ExecutionContext {
    /// ID of the parent workflow.
    pub workflow_id: uuid::Uuid,
    /// ID of the current execution run.
    pub execution_id: uuid::Uuid,
    /// User-configured node parameters.
    pub parameters: Map<String, Value>,
    /// Resolves credential records by credential-type name.
    pub credentials: Arc<dyn CredentialResolver>,
    /// Issues outbound HTTP calls on the node's behalf.
    pub http: Arc<dyn HttpClient>,
}

impl ExecutionContext {
    /// Read a parameter as text, falling back to the property's declared
    /// default. Non-string values are rendered as JSON; absent values with no
    /// default come back empty.
    pub fn parameter_str(&self, description: &NodeDescription, name: &str) -> String {
        let value = self
            .parameters
            .get(name)
            .or_else(|| description.property(name).map(|p| &p.default));

        match value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("workflow_id", &self.workflow_id)
            .field("execution_id", &self.execution_id)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// The core node trait.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    /// Static descriptor the host uses to list and render the node.
    fn description(&self) -> &NodeDescription;

    /// Run the node once. `input` holds the items produced upstream; the
    /// returned items form the node's single output channel.
    ///
    /// Either every item is returned or the call fails; there are no partial
    /// results.
    async fn execute(
        &self,
        input: Vec<NodeItem>,
        ctx: &ExecutionContext,
    ) -> Result<Vec<NodeItem>, NodeError>;
}

/// A credential type: its form schema plus a connectivity probe.
pub trait CredentialType: Send + Sync {
    fn description(&self) -> &CredentialDescription;

    /// The single request the host issues to check a credential record.
    /// Any successful response means the credentials are valid.
    fn test_request(&self, data: &CredentialData) -> Result<HttpRequest, NodeError>;
}
