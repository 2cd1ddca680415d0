//! Wire shapes for the Wix Site List API (`/site-list/v2`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Only classic-editor sites are queried or counted.
pub const EDITOR_TYPE: &str = "EDITOR";

/// Page size of the query operation. Fixed; later pages are never fetched.
pub const QUERY_PAGE_SIZE: u32 = 2;

/// Page size of the credential probe.
pub const PROBE_PAGE_SIZE: u32 = 1;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPaging {
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteFilter {
    pub editor_type: String,
}

impl SiteFilter {
    pub fn editor() -> Self {
        Self {
            editor_type: EDITOR_TYPE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sorting {
    pub field_name: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteQuery {
    pub filter: SiteFilter,
    pub sort: Vec<Sorting>,
    pub cursor_paging: CursorPaging,
}

/// Body of `POST /site-list/v2/sites/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySitesRequest {
    pub query: SiteQuery,
}

impl Default for QuerySitesRequest {
    /// Editor sites, oldest first, one fixed-size page.
    fn default() -> Self {
        Self {
            query: SiteQuery {
                filter: SiteFilter::editor(),
                sort: vec![Sorting {
                    field_name: "createdDate".to_owned(),
                    order: SortOrder::Asc,
                }],
                cursor_paging: CursorPaging {
                    limit: QUERY_PAGE_SIZE,
                },
            },
        }
    }
}

/// Body of `POST /site-list/v2/sites/count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountSitesRequest {
    pub filter: SiteFilter,
}

impl Default for CountSitesRequest {
    fn default() -> Self {
        Self {
            filter: SiteFilter::editor(),
        }
    }
}

/// Body of the credential probe: the cheapest possible query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeRequest {
    pub cursor_paging: CursorPaging,
}

impl Default for ProbeRequest {
    fn default() -> Self {
        Self {
            cursor_paging: CursorPaging {
                limit: PROBE_PAGE_SIZE,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMetadata {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub cursors: Option<Cursors>,
}

/// Answer to a site query.
///
/// Site records stay raw JSON objects: they are handed to the host exactly as
/// Wix sent them (`id`, `displayName`, `name`, `published`, `premium`,
/// `createdDate`, `updatedDate`, `editorType`, optional `viewUrl`, and
/// whatever else the API adds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub sites: Vec<Map<String, Value>>,
    #[serde(default)]
    pub metadata: Option<QueryMetadata>,
}

impl QueryResponse {
    /// Cursor of the page after this one, if Wix reported one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.cursors.as_ref())
            .and_then(|c| c.next.as_deref())
    }
}
