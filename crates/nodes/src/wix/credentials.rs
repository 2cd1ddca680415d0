//! The `beforceWixApi` credential type.

use secrecy::{ExposeSecret, SecretString};

use crate::credentials::CredentialData;
use crate::descriptor::{CredentialDescription, NodeProperty};
use crate::http::HttpRequest;
use crate::traits::CredentialType;
use crate::NodeError;

use super::models::ProbeRequest;
use super::{endpoint, to_body, CREDENTIAL_NAME, DEFAULT_BASE_URL, QUERY_SITES_PATH};

/// Account-level Wix credentials, read-only for one execution.
#[derive(Debug, Clone)]
pub struct WixCredentials {
    pub api_key: SecretString,
    pub account_id: String,
}

impl WixCredentials {
    pub const API_KEY: &'static str = "apiKey";
    pub const ACCOUNT_ID: &'static str = "accountId";

    /// Both fields must be present and non-empty.
    pub fn from_data(data: &CredentialData) -> Result<Self, NodeError> {
        let api_key = data.require(Self::API_KEY)?.clone();
        let account_id = data.require(Self::ACCOUNT_ID)?.expose_secret().to_owned();
        Ok(Self { api_key, account_id })
    }

    /// `Authorization`, `wix-account-id` and a JSON content type.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_owned(), self.api_key.expose_secret().to_owned()),
            ("wix-account-id".to_owned(), self.account_id.clone()),
            ("Content-Type".to_owned(), "application/json".to_owned()),
        ]
    }
}

/// Form schema and connectivity probe for Wix account credentials.
pub struct WixCredentialType {
    base_url: String,
    description: CredentialDescription,
}

impl WixCredentialType {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Probe a different host (a proxy or a test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            description: CredentialDescription {
                name: CREDENTIAL_NAME.to_owned(),
                display_name: "Beforce Wix Account Credentials API".to_owned(),
                documentation_url: Some("https://dev.wix.com/docs/rest".to_owned()),
                properties: vec![
                    NodeProperty::string("API Key", WixCredentials::API_KEY)
                        .password()
                        .required()
                        .description("Account-level API token with high-level permissions"),
                    NodeProperty::string("Account ID", WixCredentials::ACCOUNT_ID)
                        .required()
                        .description("ID of the owning Wix account"),
                ],
            },
        }
    }
}

impl Default for WixCredentialType {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialType for WixCredentialType {
    fn description(&self) -> &CredentialDescription {
        &self.description
    }

    fn test_request(&self, data: &CredentialData) -> Result<HttpRequest, NodeError> {
        let creds = WixCredentials::from_data(data)?;
        let mut request = HttpRequest::post(endpoint(&self.base_url, QUERY_SITES_PATH))
            .json(to_body(&ProbeRequest::default())?);
        request.headers = creds.headers();
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use serde_json::json;

    fn data() -> CredentialData {
        CredentialData::new()
            .with("apiKey", "key-123")
            .with("accountId", "acc-456")
    }

    #[test]
    fn test_request_is_a_one_site_query() {
        let req = WixCredentialType::new().test_request(&data()).unwrap();

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://www.wixapis.com/site-list/v2/sites/query");
        assert_eq!(req.header_value("Authorization"), Some("key-123"));
        assert_eq!(req.header_value("wix-account-id"), Some("acc-456"));
        assert_eq!(req.header_value("Content-Type"), Some("application/json"));
        assert_eq!(req.body, Some(json!({ "cursorPaging": { "limit": 1 } })));
    }

    #[test]
    fn test_request_requires_both_fields() {
        let only_key = CredentialData::new().with("apiKey", "key-123");
        let err = WixCredentialType::new().test_request(&only_key).unwrap_err();
        assert!(matches!(err, NodeError::Credentials(m) if m.contains("accountId")));
    }

    #[test]
    fn description_declares_secret_key_and_plain_account() {
        let cred = WixCredentialType::new();
        let desc = cred.description();

        assert_eq!(desc.name, "beforceWixApi");
        assert_eq!(desc.properties.len(), 2);
        assert!(desc.properties[0].password && desc.properties[0].required);
        assert!(!desc.properties[1].password && desc.properties[1].required);
    }

    #[test]
    fn base_url_override_keeps_path() {
        let req = WixCredentialType::with_base_url("http://127.0.0.1:9000/")
            .test_request(&data())
            .unwrap();
        assert_eq!(req.url, "http://127.0.0.1:9000/site-list/v2/sites/query");
    }
}
