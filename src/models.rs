use serde::{Deserialize, Serialize};

/// A Movie node as returned to callers
///
/// Catalog attributes are opaque to this service and are carried through in
/// `attributes`. `favorite` and `rating` are derived from the caller's
/// relationships at query time and never stored on the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    pub tmdb_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,

    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}
