//! Language-neutral document tree
//!
//! Script values are converted into this closed representation before
//! anything is serialized. The variants mirror what the output encoder
//! can express; adding a script value kind means extending the converter
//! match, not a runtime fallthrough.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// String-keyed, insertion-order-preserving object node.
pub type DocMap = IndexMap<String, DocValue>;

/// One node of the converted document tree
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    /// Null scalar
    Null,

    /// Boolean scalar
    Bool(bool),

    /// Integer scalar. Deliberately 32-bit: wider script integers are a
    /// conversion error, never a truncation.
    Int(i32),

    /// IEEE double-precision float
    Float(f64),

    /// String scalar (also carries opaque passthrough values)
    String(String),

    /// Ordered sequence
    Array(Vec<DocValue>),

    /// Ordered, string-keyed mapping
    Object(DocMap),
}

impl DocValue {
    /// Create a string node
    pub fn string(s: impl Into<String>) -> Self {
        DocValue::String(s.into())
    }

    /// Create an array node
    pub fn array(items: Vec<DocValue>) -> Self {
        DocValue::Array(items)
    }

    /// Create an object node
    pub fn object(items: DocMap) -> Self {
        DocValue::Object(items)
    }

    /// Get the type name of this node
    pub fn type_name(&self) -> &'static str {
        match self {
            DocValue::Null => "null",
            DocValue::Bool(_) => "bool",
            DocValue::Int(_) => "int",
            DocValue::Float(_) => "float",
            DocValue::String(_) => "string",
            DocValue::Array(_) => "array",
            DocValue::Object(_) => "object",
        }
    }

    /// Try to get as an object node
    pub fn as_object(&self) -> Option<&DocMap> {
        match self {
            DocValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Try to get as an array node
    pub fn as_array(&self) -> Option<&[DocValue]> {
        match self {
            DocValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for DocValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DocValue::Null => serializer.serialize_none(),
            DocValue::Bool(b) => serializer.serialize_bool(*b),
            DocValue::Int(i) => serializer.serialize_i32(*i),
            DocValue::Float(f) => serializer.serialize_f64(*f),
            DocValue::String(s) => serializer.serialize_str(s),
            DocValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DocValue::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
