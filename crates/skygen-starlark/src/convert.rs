//! Script value conversion
//!
//! Maps dynamically-typed Starlark values into the language-neutral
//! [`DocValue`] tree. Conversion is total and structural: containers
//! convert recursively in their own order, and the first failing node
//! aborts the whole conversion.

use starlark::values::dict::DictRef;
use starlark::values::list::ListRef;
use starlark::values::tuple::TupleRef;
use starlark::values::{UnpackValue, Value};

use skygen_runtime::{DocMap, DocValue, RunError, RunResult};

/// Convert one script value into a document tree node.
pub fn convert(value: Value) -> RunResult<DocValue> {
    if let Some(dict) = DictRef::from_value(value) {
        return Ok(DocValue::Object(convert_dict(&dict)?));
    }
    if let Some(list) = ListRef::from_value(value) {
        return Ok(DocValue::Array(convert_seq(list.iter())?));
    }
    if let Some(tuple) = TupleRef::from_value(value) {
        // Tuples are sequence-shaped; they encode the same way lists do.
        return Ok(DocValue::Array(convert_seq(tuple.iter())?));
    }

    match value.get_type() {
        "int" => match i32::unpack_value(value) {
            Some(i) => Ok(DocValue::Int(i)),
            None => Err(RunError::IntRange(value.to_str())),
        },
        "float" => match f64::unpack_value(value) {
            Some(f) => Ok(DocValue::Float(f)),
            None => Err(RunError::type_error("float", value.get_type())),
        },
        "string" => Ok(DocValue::String(value.to_str())),
        "bool" => Ok(DocValue::Bool(value.to_bool())),
        "NoneType" => Ok(DocValue::Null),
        // Opaque passthrough: anything else is carried by its `str()`
        // rendering.
        _ => Ok(DocValue::String(value.to_str())),
    }
}

/// Convert a dictionary into an ordered object node.
///
/// Keys iterate in the dictionary's own insertion order and are rendered
/// with `str()` semantics, so every key has a string form.
pub fn convert_dict(dict: &DictRef) -> RunResult<DocMap> {
    let mut entries = DocMap::with_capacity(dict.len());
    for (key, value) in dict.iter() {
        entries.insert(key.to_str(), convert(value)?);
    }
    Ok(entries)
}

fn convert_seq<'v>(values: impl Iterator<Item = Value<'v>>) -> RunResult<Vec<DocValue>> {
    values.map(convert).collect()
}
