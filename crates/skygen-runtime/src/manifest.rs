//! Typed-object records
//!
//! The four-field record every builtin call produces. Field order here is
//! the key order of the emitted YAML mapping.

use serde::Serialize;

use crate::value::DocMap;

/// A typed object, shaped like a Kubernetes resource manifest.
///
/// `metadata` and `spec` are object nodes by construction; an absent
/// keyword argument becomes an empty mapping, never a null field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedObject {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: DocMap,
    pub spec: DocMap,
}

impl TypedObject {
    /// Create a record with empty `metadata` and `spec`
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            metadata: DocMap::new(),
            spec: DocMap::new(),
        }
    }
}
