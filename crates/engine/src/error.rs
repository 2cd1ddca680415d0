//! Engine-level error types.

use thiserror::Error;

use nodes::NodeError;

/// Errors the host reports for a node run or a credential check.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No node is registered under the requested type name.
    #[error("no node registered for type '{0}'")]
    UnknownNodeType(String),

    /// No credential type is registered under the requested name.
    #[error("no credential type registered as '{0}'")]
    UnknownCredentialType(String),

    /// The node returned its classified error; kept intact as the source.
    #[error("node '{node_id}' ({node_type}) failed: {source}")]
    NodeFailed {
        node_id: String,
        node_type: String,
        #[source]
        source: NodeError,
    },

    /// The credential probe was rejected or could not be sent.
    #[error("credentials '{credential_type}' failed verification: {message}")]
    CredentialTestFailed {
        credential_type: String,
        message: String,
    },
}

impl EngineError {
    /// The node's own error, when the failure came from a node run.
    pub fn node_error(&self) -> Option<&NodeError> {
        match self {
            Self::NodeFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
