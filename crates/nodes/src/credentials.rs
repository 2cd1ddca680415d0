//! Resolved credential records and the capability that produces them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::NodeError;

/// A decrypted credential record: field name → value.
///
/// Every value is held as a [`SecretString`]; `Debug` prints field names only.
#[derive(Clone, Default)]
pub struct CredentialData {
    fields: BTreeMap<String, SecretString>,
}

impl CredentialData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields
            .insert(field.into(), SecretString::from(value.into()));
    }

    pub fn get(&self, field: &str) -> Option<&SecretString> {
        self.fields.get(field)
    }

    /// The field's value, or [`NodeError::Credentials`] if it is missing or blank.
    pub fn require(&self, field: &str) -> Result<&SecretString, NodeError> {
        match self.fields.get(field) {
            Some(value) if !value.expose_secret().trim().is_empty() => Ok(value),
            Some(_) => Err(NodeError::Credentials(format!("'{field}' is empty"))),
            None => Err(NodeError::Credentials(format!("'{field}' is missing"))),
        }
    }
}

impl fmt::Debug for CredentialData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialData")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Looks up credentials by credential-type name.
///
/// Storage and decryption are the host's business; nodes only see the
/// resolved record.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<CredentialData, NodeError>;
}

/// In-memory resolver, keyed by credential-type name.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    entries: HashMap<String, CredentialData>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, data: CredentialData) -> Self {
        self.entries.insert(name.into(), data);
        self
    }
}

#[async_trait]
impl CredentialResolver for StaticCredentials {
    async fn resolve(&self, name: &str) -> Result<CredentialData, NodeError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| NodeError::Credentials(format!("no credentials stored for '{name}'")))
    }
}
