//! Declarative descriptors a host reads to render and wire up a node.
//!
//! They carry no behaviour; the host serialises them (camelCase JSON) into
//! its editor and credential store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Widget type of a node or credential property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    String,
    Options,
}

/// One entry of an `Options` property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOption {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertyOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            action: None,
            description: None,
        }
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Show a property only while another property holds one of `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCondition {
    pub property: String,
    pub values: Vec<String>,
}

/// A user-facing field on a node or credential form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    pub default: Value,
    #[serde(default)]
    pub required: bool,
    /// Mask input and storage (API keys, tokens).
    #[serde(default)]
    pub password: bool,
    /// Value must be literal, never an expression over incoming data.
    #[serde(default)]
    pub no_data_expression: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_when: Option<DisplayCondition>,
}

impl NodeProperty {
    pub fn string(display_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            name: name.into(),
            kind: PropertyKind::String,
            default: Value::String(String::new()),
            required: false,
            password: false,
            no_data_expression: false,
            description: None,
            options: Vec::new(),
            show_when: None,
        }
    }

    pub fn options(
        display_name: impl Into<String>,
        name: impl Into<String>,
        default: impl Into<String>,
        options: Vec<PropertyOption>,
    ) -> Self {
        Self {
            kind: PropertyKind::Options,
            default: Value::String(default.into()),
            no_data_expression: true,
            options,
            ..Self::string(display_name, name)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn password(mut self) -> Self {
        self.password = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn show_when(mut self, property: impl Into<String>, values: &[&str]) -> Self {
        self.show_when = Some(DisplayCondition {
            property: property.into(),
            values: values.iter().map(|v| (*v).to_owned()).collect(),
        });
        self
    }
}

/// Names a credential type a node needs at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequirement {
    pub name: String,
    pub required: bool,
}

/// Everything the host needs to list, render, and dispatch a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    /// Stable type name the host registers the node under.
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: u32,
    pub group: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub usable_as_tool: bool,
    pub credentials: Vec<CredentialRequirement>,
    pub properties: Vec<NodeProperty>,
}

impl NodeDescription {
    pub fn property(&self, name: &str) -> Option<&NodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Everything the host needs to store and verify one credential type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescription {
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    pub properties: Vec<NodeProperty>,
}
