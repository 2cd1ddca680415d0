//! `nodes` crate: the node contract, the host capabilities nodes run
//! against, and the built-in node implementations.
//!
//! Every node must implement [`ExecutableNode`]; every credential type must
//! implement [`CredentialType`]. The engine crate dispatches through these
//! trait objects and injects [`HttpClient`] and [`CredentialResolver`].

pub mod credentials;
pub mod descriptor;
pub mod error;
pub mod http;
pub mod mock;
pub mod traits;
pub mod wix;

pub use credentials::{CredentialData, CredentialResolver, StaticCredentials};
pub use descriptor::{CredentialDescription, NodeDescription};
pub use error::{HttpError, NodeError};
pub use http::{HttpClient, HttpClientConfig, HttpMethod, HttpRequest, ReqwestClient};
pub use traits::{CredentialType, ExecutableNode, ExecutionContext, NodeItem};
