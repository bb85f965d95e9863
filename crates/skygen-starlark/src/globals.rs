//! Script-facing global namespace
//!
//! Every module (the root included) executes with one extra global: the
//! `output_type` builtin, which builds a typed object from its arguments
//! and emits it as a YAML document.

use std::cell::RefCell;
use std::io::Write;

use starlark::any::ProvidesStaticType;
use starlark::collections::SmallMap;
use starlark::environment::GlobalsBuilder;
use starlark::eval::Evaluator;
use starlark::starlark_module;
use starlark::values::dict::DictRef;
use starlark::values::none::NoneType;
use starlark::values::Value;

use skygen_runtime::{DocMap, Emitter, RunError, RunResult, TypedObject};

use crate::convert::convert_dict;

/// Emission state shared with builtin calls through the evaluator's
/// extra slot.
#[derive(ProvidesStaticType)]
pub struct ManifestSink {
    emitter: RefCell<Emitter<Box<dyn Write>>>,
}

impl ManifestSink {
    /// Create a sink emitting to `out`
    pub fn new(out: impl Write + 'static) -> Self {
        Self {
            emitter: RefCell::new(Emitter::new(Box::new(out))),
        }
    }

    /// Emit one typed object
    pub fn emit(&self, object: &TypedObject) -> RunResult<()> {
        self.emitter.borrow_mut().emit(object)
    }

    /// Number of documents emitted so far
    pub fn emitted(&self) -> usize {
        self.emitter.borrow().emitted()
    }
}

#[starlark_module]
pub fn manifest_globals(builder: &mut GlobalsBuilder) {
    /// Build a typed object and emit it as one YAML document.
    ///
    /// `api_version` and `kind` are required strings; `spec` and
    /// `metadata` are optional dicts and default to empty mappings.
    fn output_type<'v>(
        #[starlark(require = pos)] api_version: &str,
        #[starlark(require = pos)] kind: &str,
        #[starlark(require = named)] spec: Option<Value<'v>>,
        #[starlark(require = named)] metadata: Option<Value<'v>>,
        #[starlark(kwargs)] kwargs: SmallMap<String, Value<'v>>,
        eval: &mut Evaluator<'v, '_>,
    ) -> anyhow::Result<NoneType> {
        // Unrecognized keywords are tolerated so older and newer scripts
        // can pass hints this writer does not understand.
        let _ = kwargs;

        let object = TypedObject {
            api_version: api_version.to_owned(),
            kind: kind.to_owned(),
            metadata: dict_field("metadata", metadata)?,
            spec: dict_field("spec", spec)?,
        };

        manifest_sink(eval)?.emit(&object)?;
        Ok(NoneType)
    }
}

fn dict_field(name: &str, arg: Option<Value>) -> anyhow::Result<DocMap> {
    match arg {
        None => Ok(DocMap::new()),
        Some(value) => {
            let dict = DictRef::from_value(value).ok_or_else(|| {
                RunError::type_error(format!("dict for '{}'", name), value.get_type())
            })?;
            Ok(convert_dict(&dict)?)
        }
    }
}

fn manifest_sink<'a>(eval: &'a Evaluator) -> anyhow::Result<&'a ManifestSink> {
    eval.extra
        .and_then(|extra| extra.downcast_ref::<ManifestSink>())
        .ok_or_else(|| anyhow::anyhow!("manifest sink not installed in evaluator"))
}
