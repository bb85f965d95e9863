//! Embedded-interpreter boundary
//!
//! The sandboxed language runtime is a collaborator behind this seam.
//! The loader drives it through [`ScriptEngine::execute`] and hands it a
//! [`LoadResolver`] so the interpreter can call back for every `load`
//! statement it encounters; nothing else about the interpreter's
//! internals is visible to the core.

use crate::error::RunResult;

/// A sandboxed script interpreter.
pub trait ScriptEngine {
    /// The binding set one module execution exposes to importers.
    type Bindings: Clone;

    /// Execute `source` as the module named `name`, resolving any loads
    /// the script issues through `loads`.
    fn execute(
        &self,
        name: &str,
        source: &str,
        loads: &dyn LoadResolver<Bindings = Self::Bindings>,
    ) -> RunResult<Self::Bindings>;
}

/// The load hook handed to a running module.
pub trait LoadResolver {
    type Bindings;

    /// Resolve a module identifier to its binding set, executing the
    /// module if this run has not seen it yet.
    fn resolve(&self, module: &str) -> RunResult<Self::Bindings>;
}
