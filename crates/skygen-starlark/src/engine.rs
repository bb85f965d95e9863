//! Starlark engine
//!
//! Implements the runtime's [`ScriptEngine`] boundary on top of the
//! `starlark` crate: parse with the extended dialect, evaluate with the
//! fixed global namespace, freeze the module into a binding set. The
//! loader's hook is adapted to the interpreter's native loader
//! interface, so transitive loads flow back through the module cache.

use std::io::Write;

use starlark::environment::{FrozenModule, Globals, GlobalsBuilder, Module};
use starlark::eval::{Evaluator, FileLoader};
use starlark::syntax::{AstModule, Dialect};

use skygen_runtime::{LoadResolver, RunError, RunResult, ScriptEngine};

use crate::globals::{manifest_globals, ManifestSink};

/// The binding set a module execution exposes to importers.
///
/// Wraps the interpreter's frozen module; cheap to clone, immutable.
#[derive(Clone, Debug)]
pub struct Bindings(pub(crate) FrozenModule);

impl Bindings {
    /// Look up an exported binding and render it with `repr()` semantics.
    pub fn get_repr(&self, name: &str) -> Option<String> {
        self.0.get(name).ok().map(|v| v.value().to_repr())
    }
}

/// Starlark implementation of the script-engine boundary
pub struct StarlarkEngine {
    globals: Globals,
    sink: ManifestSink,
}

impl StarlarkEngine {
    /// Create an engine emitting documents to `out`
    pub fn new(out: impl Write + 'static) -> Self {
        let globals = GlobalsBuilder::standard().with(manifest_globals).build();
        Self {
            globals,
            sink: ManifestSink::new(out),
        }
    }

    /// Create an engine emitting to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Number of documents emitted so far
    pub fn emitted(&self) -> usize {
        self.sink.emitted()
    }

    /// Scripts get the extended dialect: floats, lambdas, and `load`
    /// statements are all allowed.
    fn dialect() -> Dialect {
        Dialect {
            enable_load: true,
            enable_top_level_stmt: true,
            ..Dialect::Extended
        }
    }
}

impl ScriptEngine for StarlarkEngine {
    type Bindings = Bindings;

    fn execute(
        &self,
        name: &str,
        source: &str,
        loads: &dyn LoadResolver<Bindings = Bindings>,
    ) -> RunResult<Bindings> {
        tracing::debug!(module = %name, "evaluating starlark module");

        let ast = AstModule::parse(name, source.to_owned(), &Self::dialect())
            .map_err(|e| RunError::exec(name, e))?;

        let hook = HookLoader { loads };
        let module = Module::new();
        {
            let mut eval = Evaluator::new(&module);
            eval.set_loader(&hook);
            eval.extra = Some(&self.sink);
            eval.eval_module(ast, &self.globals)
                .map_err(|e| RunError::exec(name, e))?;
        }

        let frozen = module.freeze().map_err(|e| RunError::exec(name, e))?;
        Ok(Bindings(frozen))
    }
}

/// Adapts the runtime's load hook to the interpreter's loader interface
struct HookLoader<'a> {
    loads: &'a dyn LoadResolver<Bindings = Bindings>,
}

impl FileLoader for HookLoader<'_> {
    fn load(&self, path: &str) -> anyhow::Result<FrozenModule> {
        let bindings = self.loads.resolve(path)?;
        Ok(bindings.0)
    }
}
