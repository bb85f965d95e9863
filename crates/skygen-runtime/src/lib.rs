//! skygen runtime
//!
//! Engine-agnostic core for generating typed-object manifests from
//! sandboxed scripts: the module loader, the language-neutral document
//! tree, the typed-object record, and the YAML emitter. The script
//! interpreter itself sits behind the [`engine::ScriptEngine`] trait.

pub mod emit;
pub mod engine;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod value;

pub use emit::Emitter;
pub use engine::{LoadResolver, ScriptEngine};
pub use error::{RunError, RunResult};
pub use loader::ModuleLoader;
pub use manifest::TypedObject;
pub use value::{DocMap, DocValue};
