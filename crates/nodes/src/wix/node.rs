//! The `beforceWix` node: query or count the sites of a Wix account.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::descriptor::{CredentialRequirement, NodeDescription, NodeProperty, PropertyOption};
use crate::http::HttpRequest;
use crate::traits::{ExecutableNode, ExecutionContext, NodeItem};
use crate::NodeError;

use super::credentials::WixCredentials;
use super::models::{CountSitesRequest, QueryResponse, QuerySitesRequest};
use super::{endpoint, to_body, COUNT_SITES_PATH, CREDENTIAL_NAME, DEFAULT_BASE_URL, QUERY_SITES_PATH};

/// Registered type name of the node.
pub const NODE_NAME: &str = "beforceWix";

const ACCEPT: &str = "application/json, text/plain, */*";

/// The `resource` parameter. Sites are the only resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Site,
}

impl FromStr for Resource {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "site" => Ok(Self::Site),
            other => Err(NodeError::UnsupportedResource(other.to_owned())),
        }
    }
}

/// The `operation` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Count,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "count" => Ok(Self::Count),
            other => Err(NodeError::UnsupportedOperation(other.to_owned())),
        }
    }
}

/// Issues exactly one Site List call per execution and reshapes the answer
/// into output items. Stateless; safe to share across concurrent runs.
pub struct WixSiteNode {
    base_url: String,
    description: NodeDescription,
}

impl WixSiteNode {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Send requests to a different host (a proxy or a test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            description: describe(),
        }
    }

    async fn dispatch(
        &self,
        operation: Operation,
        ctx: &ExecutionContext,
    ) -> Result<Vec<NodeItem>, NodeError> {
        let data = ctx.credentials.resolve(CREDENTIAL_NAME).await?;
        let creds = WixCredentials::from_data(&data)?;

        let (path, body) = match operation {
            Operation::Query => (QUERY_SITES_PATH, to_body(&QuerySitesRequest::default())?),
            Operation::Count => (COUNT_SITES_PATH, to_body(&CountSitesRequest::default())?),
        };

        let mut request = HttpRequest::post(endpoint(&self.base_url, path)).json(body);
        request.headers = creds.headers();
        request = request.header("Accept", ACCEPT);

        let response = ctx.http.request(request).await?;

        match operation {
            Operation::Query => {
                let page: QueryResponse = decode(response)?;
                if let Some(next) = page.next_cursor() {
                    debug!(next_cursor = next, "more sites available; only the first page is returned");
                }
                Ok(page
                    .sites
                    .into_iter()
                    .map(|site| NodeItem::new(Value::Object(site)))
                    .collect())
            }
            Operation::Count => {
                if response.get("count").is_none() {
                    return Err(NodeError::Upstream(
                        "unexpected response from Wix: missing field `count`".to_owned(),
                    ));
                }
                Ok(vec![NodeItem::new(response)])
            }
        }
    }
}

impl Default for WixSiteNode {
    fn default() -> Self {
        Self::new()
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, NodeError> {
    serde_json::from_value(body)
        .map_err(|e| NodeError::Upstream(format!("unexpected response from Wix: {e}")))
}

fn describe() -> NodeDescription {
    NodeDescription {
        name: NODE_NAME.to_owned(),
        display_name: "Beforce".to_owned(),
        description: "Manage and retrieve Wix site data through the Beforce platform".to_owned(),
        version: 1,
        group: vec!["transform".to_owned()],
        subtitle: Some(r#"={{ $parameter["operation"] + ": " + $parameter["resource"] }}"#.to_owned()),
        usable_as_tool: true,
        credentials: vec![CredentialRequirement {
            name: CREDENTIAL_NAME.to_owned(),
            required: true,
        }],
        properties: vec![
            NodeProperty::options(
                "Resource",
                "resource",
                "site",
                vec![PropertyOption::new("Site", "site")],
            ),
            NodeProperty::options(
                "Operation",
                "operation",
                Operation::Query.as_str(),
                vec![
                    PropertyOption::new("Query Sites", Operation::Query.as_str())
                        .action("Query sites a site")
                        .description("Retrieve sites from Wix"),
                    PropertyOption::new("Count Sites", Operation::Count.as_str())
                        .action("Count sites a site")
                        .description("Return total number of sites"),
                ],
            )
            .show_when("resource", &["site"]),
        ],
    }
}

#[async_trait]
impl ExecutableNode for WixSiteNode {
    fn description(&self) -> &NodeDescription {
        &self.description
    }

    #[instrument(skip_all, fields(execution_id = %ctx.execution_id))]
    async fn execute(
        &self,
        _input: Vec<NodeItem>,
        ctx: &ExecutionContext,
    ) -> Result<Vec<NodeItem>, NodeError> {
        let resource = ctx.parameter_str(&self.description, "resource");
        let operation = ctx.parameter_str(&self.description, "operation");

        let Resource::Site = resource.parse::<Resource>()?;
        let operation = operation.parse::<Operation>()?;

        match self.dispatch(operation, ctx).await {
            Ok(items) => {
                info!("{} returned {} item(s)", operation, items.len());
                Ok(items)
            }
            Err(err) => {
                warn!("{} failed: {}", operation, err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::{json, Map};

    use crate::credentials::{CredentialData, StaticCredentials};
    use crate::http::HttpMethod;
    use crate::mock::MockHttpClient;
    use crate::HttpError;

    fn site(id: &str, created: &str) -> Value {
        json!({
            "id": id,
            "displayName": format!("Site {id}"),
            "name": id,
            "published": true,
            "premium": false,
            "createdDate": created,
            "updatedDate": created,
            "editorType": "EDITOR",
            "viewUrl": format!("https://example.wixsite.com/{id}")
        })
    }

    fn ctx(params: Value, http: Arc<MockHttpClient>) -> ExecutionContext {
        let credentials = StaticCredentials::new().with(
            CREDENTIAL_NAME,
            CredentialData::new()
                .with("apiKey", "key-123")
                .with("accountId", "acc-456"),
        );
        let parameters: Map<String, Value> = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        ExecutionContext {
            workflow_id: uuid::Uuid::new_v4(),
            execution_id: uuid::Uuid::new_v4(),
            parameters,
            credentials: Arc::new(credentials),
            http,
        }
    }

    #[tokio::test]
    async fn unsupported_resource_issues_no_request() {
        let http = Arc::new(MockHttpClient::responding(json!({ "count": 1 })));
        let ctx = ctx(json!({ "resource": "user", "operation": "query" }), http.clone());

        let err = WixSiteNode::new().execute(vec![], &ctx).await.unwrap_err();

        assert_eq!(err, NodeError::UnsupportedResource("user".into()));
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn unsupported_operation_issues_no_request() {
        let http = Arc::new(MockHttpClient::responding(json!({ "count": 1 })));
        let ctx = ctx(json!({ "resource": "site", "operation": "delete" }), http.clone());

        let err = WixSiteNode::new().execute(vec![], &ctx).await.unwrap_err();

        assert_eq!(err, NodeError::UnsupportedOperation("delete".into()));
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn query_maps_sites_one_to_one_in_order() {
        let s1 = site("a", "2024-01-01T00:00:00Z");
        let s2 = site("b", "2024-03-01T00:00:00Z");
        let http = Arc::new(MockHttpClient::responding(json!({ "sites": [s1.clone(), s2.clone()] })));
        let ctx = ctx(json!({ "resource": "site", "operation": "query" }), http.clone());

        let items = WixSiteNode::new().execute(vec![], &ctx).await.unwrap();

        assert_eq!(items, vec![NodeItem::new(s1), NodeItem::new(s2)]);
        assert_eq!(http.call_count(), 1);
    }

    #[tokio::test]
    async fn query_sends_fixed_single_page_request() {
        let http = Arc::new(MockHttpClient::responding(json!({
            "sites": [site("a", "2024-01-01T00:00:00Z")],
            "metadata": { "count": 1, "cursors": { "next": "cursor-2" } }
        })));
        let ctx = ctx(json!({ "resource": "site", "operation": "query" }), http.clone());

        let items = WixSiteNode::new().execute(vec![], &ctx).await.unwrap();
        assert_eq!(items.len(), 1);

        let requests = http.requests();
        assert_eq!(requests.len(), 1, "next cursor must not be followed");
        let req = &requests[0];
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://www.wixapis.com/site-list/v2/sites/query");
        assert_eq!(req.header_value("Authorization"), Some("key-123"));
        assert_eq!(req.header_value("wix-account-id"), Some("acc-456"));
        assert_eq!(req.header_value("Content-Type"), Some("application/json"));
        assert_eq!(req.header_value("Accept"), Some("application/json, text/plain, */*"));
        assert_eq!(
            req.body,
            Some(json!({
                "query": {
                    "filter": { "editorType": "EDITOR" },
                    "sort": [{ "fieldName": "createdDate", "order": "ASC" }],
                    "cursorPaging": { "limit": 2 }
                }
            }))
        );
    }

    #[tokio::test]
    async fn count_wraps_response_as_single_item() {
        let http = Arc::new(MockHttpClient::responding(json!({ "count": 7 })));
        let ctx = ctx(json!({ "resource": "site", "operation": "count" }), http.clone());

        let items = WixSiteNode::new().execute(vec![], &ctx).await.unwrap();

        assert_eq!(items, vec![NodeItem::new(json!({ "count": 7 }))]);
        let requests = http.requests();
        let req = &requests[0];
        assert_eq!(req.url, "https://www.wixapis.com/site-list/v2/sites/count");
        assert_eq!(req.body, Some(json!({ "filter": { "editorType": "EDITOR" } })));
    }

    #[tokio::test]
    async fn missing_parameters_fall_back_to_defaults() {
        let http = Arc::new(MockHttpClient::responding(json!({ "sites": [] })));
        let ctx = ctx(json!({}), http.clone());

        let items = WixSiteNode::new().execute(vec![], &ctx).await.unwrap();

        assert!(items.is_empty());
        assert!(http.requests()[0].url.ends_with("/sites/query"));
    }

    #[tokio::test]
    async fn upstream_message_is_preserved() {
        let http = Arc::new(MockHttpClient::failing(HttpError::new("timeout")));
        let ctx = ctx(json!({ "resource": "site", "operation": "count" }), http);

        let err = WixSiteNode::new().execute(vec![], &ctx).await.unwrap_err();

        assert_eq!(err, NodeError::Upstream("timeout".into()));
    }

    #[tokio::test]
    async fn messageless_failure_is_unknown() {
        let http = Arc::new(MockHttpClient::failing(HttpError::opaque()));
        let ctx = ctx(json!({ "resource": "site", "operation": "query" }), http);

        let err = WixSiteNode::new().execute(vec![], &ctx).await.unwrap_err();

        assert_eq!(err, NodeError::Unknown);
        assert_eq!(err.to_string(), "Unknown error");
    }

    #[tokio::test]
    async fn malformed_response_is_an_upstream_error() {
        let http = Arc::new(MockHttpClient::responding(json!({ "unexpected": true })));
        let ctx = ctx(json!({ "resource": "site", "operation": "count" }), http);

        let err = WixSiteNode::new().execute(vec![], &ctx).await.unwrap_err();

        assert!(matches!(err, NodeError::Upstream(m) if m.contains("unexpected response")));
    }

    #[tokio::test]
    async fn query_passes_partial_and_null_fields_through() {
        let no_premium = json!({ "id": "a", "name": "a", "published": false });
        let null_view = json!({ "id": "b", "displayName": "B", "viewUrl": null });
        let http = Arc::new(MockHttpClient::responding(json!({
            "sites": [no_premium.clone(), null_view.clone()]
        })));
        let ctx = ctx(json!({ "resource": "site", "operation": "query" }), http);

        let items = WixSiteNode::new().execute(vec![], &ctx).await.unwrap();

        assert_eq!(items, vec![NodeItem::new(no_premium), NodeItem::new(null_view)]);
        assert_eq!(items[1].json.get("viewUrl"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn query_keeps_upstream_key_order() {
        let record: Value =
            serde_json::from_str(r#"{"updatedDate":"2024-02-01","id":"a","name":"a","editorType":"EDITOR"}"#)
                .unwrap();
        let http = Arc::new(MockHttpClient::responding(json!({ "sites": [record] })));
        let ctx = ctx(json!({ "resource": "site", "operation": "query" }), http);

        let items = WixSiteNode::new().execute(vec![], &ctx).await.unwrap();

        let keys: Vec<&str> = items[0]
            .json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["updatedDate", "id", "name", "editorType"]);
    }

    #[tokio::test]
    async fn count_response_is_wrapped_unchanged() {
        let body = json!({ "count": 7, "extra": 1 });
        let http = Arc::new(MockHttpClient::responding(body.clone()));
        let ctx = ctx(json!({ "resource": "site", "operation": "count" }), http);

        let items = WixSiteNode::new().execute(vec![], &ctx).await.unwrap();

        assert_eq!(items, vec![NodeItem::new(body)]);
    }

    #[tokio::test]
    async fn count_accepts_non_integer_values() {
        let body = json!({ "count": 7.0 });
        let http = Arc::new(MockHttpClient::responding(body.clone()));
        let ctx = ctx(json!({ "resource": "site", "operation": "count" }), http);

        let items = WixSiteNode::new().execute(vec![], &ctx).await.unwrap();

        assert_eq!(items, vec![NodeItem::new(body)]);
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_network() {
        let http = Arc::new(MockHttpClient::responding(json!({ "count": 1 })));
        let mut ctx = ctx(json!({ "operation": "count" }), http.clone());
        ctx.credentials = Arc::new(StaticCredentials::new());

        let err = WixSiteNode::new().execute(vec![], &ctx).await.unwrap_err();

        assert!(matches!(err, NodeError::Credentials(_)));
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn repeated_runs_yield_identical_items() {
        let body = json!({ "sites": [site("a", "2024-01-01T00:00:00Z"), site("b", "2024-01-02T00:00:00Z")] });
        let http = Arc::new(MockHttpClient::responding(body));
        let ctx = ctx(json!({ "resource": "site", "operation": "query" }), http.clone());
        let node = WixSiteNode::new();

        let first = node.execute(vec![], &ctx).await.unwrap();
        let second = node.execute(vec![], &ctx).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(http.call_count(), 2);
    }

    #[test]
    fn description_exposes_resource_and_operation() {
        let node = WixSiteNode::new();
        let desc = node.description();

        assert_eq!(desc.name, "beforceWix");
        assert_eq!(desc.credentials[0].name, "beforceWixApi");
        assert_eq!(desc.property("resource").unwrap().default, json!("site"));

        let op = desc.property("operation").unwrap();
        assert_eq!(op.default, json!("query"));
        let values: Vec<&str> = op.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["query", "count"]);
        let actions: Vec<Option<&str>> = op.options.iter().map(|o| o.action.as_deref()).collect();
        assert_eq!(actions, vec![Some("Query sites a site"), Some("Count sites a site")]);
    }
}
