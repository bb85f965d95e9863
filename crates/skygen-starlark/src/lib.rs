//! Starlark collaborator for skygen
//!
//! This crate supplies the sandboxed interpreter behind the runtime's
//! engine boundary: the Starlark engine itself, the script value →
//! document tree converter, and the `output_type` builtin installed into
//! every module's globals.

pub mod convert;
pub mod engine;
pub mod globals;

pub use convert::{convert, convert_dict};
pub use engine::{Bindings, StarlarkEngine};
pub use globals::{manifest_globals, ManifestSink};
