//! Wix Site List integration: the `beforceWixApi` credential type and the
//! `beforceWix` node (query / count sites).

pub mod credentials;
pub mod models;
pub mod node;

pub use credentials::{WixCredentialType, WixCredentials};
pub use node::{Operation, Resource, WixSiteNode, NODE_NAME};

use serde::Serialize;
use serde_json::Value;

use crate::NodeError;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://www.wixapis.com";

pub const QUERY_SITES_PATH: &str = "/site-list/v2/sites/query";
pub const COUNT_SITES_PATH: &str = "/site-list/v2/sites/count";

/// Credential-type name shared by the node and the credential descriptor.
pub const CREDENTIAL_NAME: &str = "beforceWixApi";

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

fn to_body<T: Serialize>(body: &T) -> Result<Value, NodeError> {
    serde_json::to_value(body).map_err(|e| NodeError::Upstream(format!("failed to encode request: {e}")))
}
