//! Module loader
//!
//! Orchestrates execution of a root script and everything it loads.
//! Results are memoized per module identifier for the lifetime of one
//! loader, so each module executes at most once per run, and a module
//! that loads itself while still executing is rejected as a cycle.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::engine::{LoadResolver, ScriptEngine};
use crate::error::{RunError, RunResult};

/// State of one module's cache slot
enum CacheEntry<B> {
    /// Execution started but has not completed; a request in this state
    /// is a cycle.
    Loading,
    Loaded(B),
    Failed(String),
}

/// Module loader scoped to a single root-script execution.
///
/// The cache lives inside the loader value; separate loaders (separate
/// runs) never share state.
pub struct ModuleLoader<'e, E: ScriptEngine> {
    engine: &'e E,
    /// Base path for resolving relative module identifiers
    base_path: PathBuf,
    /// Cache of module results by resolved path
    cache: RefCell<HashMap<String, CacheEntry<E::Bindings>>>,
    /// Identifiers currently executing, outermost first
    stack: RefCell<Vec<String>>,
}

impl<'e, E: ScriptEngine> ModuleLoader<'e, E> {
    /// Create a loader with the given base path for relative loads
    pub fn new(engine: &'e E, base_path: impl AsRef<Path>) -> Self {
        Self {
            engine,
            base_path: base_path.as_ref().to_path_buf(),
            cache: RefCell::new(HashMap::new()),
            stack: RefCell::new(Vec::new()),
        }
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Execute the root script.
    ///
    /// The root runs directly, not through the cache; its nested loads
    /// resolve through this loader like any other module's.
    pub fn run_root(&self, path: impl AsRef<Path>) -> RunResult<E::Bindings> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let source = self.load_source(path)?;

        tracing::debug!(module = %name, "executing root script");
        self.stack.borrow_mut().push(name.clone());
        let result = self.engine.execute(&name, &source, self);
        self.stack.borrow_mut().pop();
        result
    }

    /// Resolve a module identifier to a path.
    ///
    /// Absolute identifiers are taken as-is; relative ones resolve
    /// against the loader's base path.
    pub fn resolve_path(&self, module: &str) -> PathBuf {
        let path = Path::new(module);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Read module source from a path
    pub fn load_source(&self, path: &Path) -> RunResult<String> {
        std::fs::read_to_string(path)
            .map_err(|e| RunError::Io(format!("failed to read '{}': {}", path.display(), e)))
    }

    /// Bindings of an already loaded module, if any.
    ///
    /// Returns `None` for modules this run has not finished loading,
    /// including ones recorded as failed.
    pub fn get_cached(&self, module: &str) -> Option<E::Bindings> {
        let key = self.resolve_path(module).display().to_string();
        match self.cache.borrow().get(&key) {
            Some(CacheEntry::Loaded(bindings)) => Some(bindings.clone()),
            _ => None,
        }
    }

    fn cycle_chain(&self, repeated: &str) -> String {
        let stack = self.stack.borrow();
        let mut chain = stack.join(" -> ");
        if !chain.is_empty() {
            chain.push_str(" -> ");
        }
        chain.push_str(repeated);
        chain
    }
}

impl<E: ScriptEngine> LoadResolver for ModuleLoader<'_, E> {
    type Bindings = E::Bindings;

    fn resolve(&self, module: &str) -> RunResult<E::Bindings> {
        let path = self.resolve_path(module);
        let key = path.display().to_string();

        match self.cache.borrow().get(&key) {
            Some(CacheEntry::Loading) => {
                return Err(RunError::LoadCycle(self.cycle_chain(&key)));
            }
            Some(CacheEntry::Loaded(bindings)) => {
                tracing::debug!(module = %key, "load cache hit");
                return Ok(bindings.clone());
            }
            Some(CacheEntry::Failed(message)) => {
                return Err(RunError::Poisoned {
                    module: key.clone(),
                    message: message.clone(),
                });
            }
            None => {}
        }

        // Placeholder marking "load in progress".
        self.cache
            .borrow_mut()
            .insert(key.clone(), CacheEntry::Loading);
        self.stack.borrow_mut().push(key.clone());

        tracing::debug!(module = %key, "executing module");
        let result = self
            .load_source(&path)
            .and_then(|source| self.engine.execute(&key, &source, self));

        self.stack.borrow_mut().pop();
        let mut cache = self.cache.borrow_mut();
        match result {
            Ok(bindings) => {
                cache.insert(key, CacheEntry::Loaded(bindings.clone()));
                Ok(bindings)
            }
            Err(err) => {
                cache.insert(key, CacheEntry::Failed(err.to_string()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use tempfile::TempDir;

    /// Stub engine driven by a line-oriented directive language:
    /// `load <module>` resolves another module, `fail` aborts execution,
    /// anything else becomes a binding.
    struct StubEngine {
        runs: RefCell<Vec<String>>,
    }

    impl StubEngine {
        fn new() -> Self {
            Self {
                runs: RefCell::new(Vec::new()),
            }
        }

        fn run_count(&self, module_suffix: &str) -> usize {
            self.runs
                .borrow()
                .iter()
                .filter(|name| name.ends_with(module_suffix))
                .count()
        }
    }

    impl ScriptEngine for StubEngine {
        type Bindings = Vec<String>;

        fn execute(
            &self,
            name: &str,
            source: &str,
            loads: &dyn LoadResolver<Bindings = Vec<String>>,
        ) -> RunResult<Vec<String>> {
            self.runs.borrow_mut().push(name.to_string());
            let mut bindings = Vec::new();
            for line in source.lines().map(str::trim).filter(|l| !l.is_empty()) {
                if let Some(target) = line.strip_prefix("load ") {
                    loads.resolve(target)?;
                } else if line == "fail" {
                    return Err(RunError::exec(name, "stub failure"));
                } else {
                    bindings.push(line.to_string());
                }
            }
            Ok(bindings)
        }
    }

    fn write_module(dir: &TempDir, name: &str, source: &str) {
        fs::write(dir.path().join(name), source).unwrap();
    }

    #[test]
    fn loading_twice_executes_once_and_returns_identical_bindings() {
        let dir = TempDir::new().unwrap();
        write_module(&dir, "lib.star", "answer\n");

        let engine = StubEngine::new();
        let loader = ModuleLoader::new(&engine, dir.path());

        let first = loader.resolve("lib.star").unwrap();
        let second = loader.resolve("lib.star").unwrap();

        assert_eq!(first, vec!["answer".to_string()]);
        assert_eq!(first, second);
        assert_eq!(engine.run_count("lib.star"), 1);
    }

    #[test]
    fn direct_self_load_is_a_cycle() {
        let dir = TempDir::new().unwrap();
        write_module(&dir, "a.star", "load a.star\n");

        let engine = StubEngine::new();
        let loader = ModuleLoader::new(&engine, dir.path());

        let err = loader.resolve("a.star").unwrap_err();
        assert!(matches!(err, RunError::LoadCycle(_)));
        assert!(err.to_string().contains("cycle in load graph"));
        assert!(loader.get_cached("a.star").is_none());
    }

    #[test]
    fn transitive_cycle_is_detected_and_nothing_is_marked_loaded() {
        let dir = TempDir::new().unwrap();
        write_module(&dir, "a.star", "load b.star\n");
        write_module(&dir, "b.star", "load a.star\n");

        let engine = StubEngine::new();
        let loader = ModuleLoader::new(&engine, dir.path());

        let err = loader.resolve("a.star").unwrap_err();
        assert!(err.to_string().contains("cycle in load graph"));
        // The reported chain names both participants.
        assert!(err.to_string().contains("a.star"));
        assert!(err.to_string().contains("b.star"));
        assert!(loader.get_cached("a.star").is_none());
        assert!(loader.get_cached("b.star").is_none());
        assert_eq!(engine.run_count("a.star"), 1);
        assert_eq!(engine.run_count("b.star"), 1);
    }

    #[test]
    fn failure_poisons_only_its_own_entry_without_reexecution() {
        let dir = TempDir::new().unwrap();
        write_module(&dir, "bad.star", "fail\n");
        write_module(&dir, "good.star", "fine\n");

        let engine = StubEngine::new();
        let loader = ModuleLoader::new(&engine, dir.path());

        let first = loader.resolve("bad.star").unwrap_err();
        assert!(matches!(first, RunError::Exec { .. }));

        let replay = loader.resolve("bad.star").unwrap_err();
        assert!(matches!(replay, RunError::Poisoned { .. }));
        assert!(replay.to_string().contains("stub failure"));
        assert_eq!(engine.run_count("bad.star"), 1);

        // A sibling module is unaffected.
        assert_eq!(loader.resolve("good.star").unwrap(), vec!["fine".to_string()]);
    }

    #[test]
    fn root_runs_outside_the_cache_and_its_loads_are_memoized() {
        let dir = TempDir::new().unwrap();
        write_module(&dir, "root.star", "load lib.star\nload lib.star\nmain\n");
        write_module(&dir, "lib.star", "helper\n");

        let engine = StubEngine::new();
        let loader = ModuleLoader::new(&engine, dir.path());

        let root_path = dir.path().join("root.star");
        let bindings = loader.run_root(&root_path).unwrap();

        assert_eq!(bindings, vec!["main".to_string()]);
        assert_eq!(engine.run_count("lib.star"), 1);
        assert!(loader.get_cached("lib.star").is_some());
        // The root itself is not a cache entry.
        assert!(loader.get_cached("root.star").is_none());
    }

    #[test]
    fn missing_module_reports_a_read_error() {
        let dir = TempDir::new().unwrap();
        let engine = StubEngine::new();
        let loader = ModuleLoader::new(&engine, dir.path());

        let err = loader.resolve("absent.star").unwrap_err();
        assert!(matches!(err, RunError::Io(_)));
        assert!(err.to_string().contains("absent.star"));
    }

    #[test]
    fn separate_loaders_do_not_share_cache_state() {
        let dir = TempDir::new().unwrap();
        write_module(&dir, "lib.star", "answer\n");

        let engine = StubEngine::new();
        let first = ModuleLoader::new(&engine, dir.path());
        let second = ModuleLoader::new(&engine, dir.path());

        first.resolve("lib.star").unwrap();
        second.resolve("lib.star").unwrap();

        // Each loader executed the module once for itself.
        assert_eq!(engine.run_count("lib.star"), 2);
    }
}
