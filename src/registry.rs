//! Static module registry.
//!
//! Rust cannot import code from a file path at runtime, so discovery is
//! split in two: the filesystem tree supplies *structure* (which handler
//! files exist, where middleware and schema files sit) and this registry
//! supplies the *code*, mapping each convention-relative
//! path to a compiled entry point. A discovered file with no entry here, or
//! with an entry of the wrong kind for its position in the tree, is treated
//! as absent and skipped.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::plugin::{BoxedPlugin, Plugin};

/// What a registered entry point is allowed to act as.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModuleKind {
    Handler,
    Middleware,
}

struct ModuleEntry {
    kind: ModuleKind,
    plugin: BoxedPlugin,
}

/// Entry points for the route tree, keyed by path relative to the load
/// root, with `/` separators on every platform.
///
/// ```rust
/// use rota::{ModuleRegistry, Scope, SetupError};
///
/// async fn users(scope: Scope) -> Result<(), SetupError> { Ok(()) }
/// async fn auth(scope: Scope) -> Result<(), SetupError> { Ok(()) }
///
/// let modules = ModuleRegistry::new()
///     .handler("handlers/api/users/index.rs", users)
///     .middleware("handlers/api/middleware.rs", auth);
/// ```
pub struct ModuleRegistry {
    entries: HashMap<String, ModuleEntry>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Registers the entry point for a handler file. Returns `self` so
    /// registrations chain naturally.
    pub fn handler(self, path: &str, plugin: impl Plugin) -> Self {
        self.add(path, ModuleKind::Handler, Arc::new(plugin))
    }

    /// Registers the entry point for a middleware file.
    pub fn middleware(self, path: &str, plugin: impl Plugin) -> Self {
        self.add(path, ModuleKind::Middleware, Arc::new(plugin))
    }

    fn add(mut self, path: &str, kind: ModuleKind, plugin: BoxedPlugin) -> Self {
        self.entries.insert(path.to_owned(), ModuleEntry { kind, plugin });
        self
    }

    /// Resolves the entry point for a discovered file.
    ///
    /// `None` for unregistered paths and for kind mismatches alike; an
    /// entry that is not the expected shape is absent, not an error.
    pub(crate) fn lookup(&self, root: &Path, absolute: &Path, kind: ModuleKind) -> Option<BoxedPlugin> {
        let key = relative_key(root, absolute)?;
        match self.entries.get(&key) {
            Some(entry) if entry.kind == kind => Some(Arc::clone(&entry.plugin)),
            Some(entry) => {
                debug!(module = %key, expected = ?kind, found = ?entry.kind, "module entry has the wrong kind, skipping");
                None
            }
            None => {
                debug!(module = %key, "no module entry registered, skipping");
                None
            }
        }
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn relative_key(root: &Path, absolute: &Path) -> Option<String> {
    let relative = absolute.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::error::SetupError;
    use crate::scope::Scope;

    async fn noop(_scope: Scope) -> Result<(), SetupError> {
        Ok(())
    }

    #[test]
    fn lookup_is_keyed_relative_to_the_root() {
        let modules = ModuleRegistry::new().handler("api/users/index.rs", noop);
        let root = Path::new("/srv/app/routes");
        let file = root.join("api/users/index.rs");

        assert!(modules.lookup(root, &file, ModuleKind::Handler).is_some());
        assert!(modules.lookup(Path::new("/elsewhere"), &file, ModuleKind::Handler).is_none());
    }

    #[test]
    fn kind_mismatch_is_absence() {
        let modules = ModuleRegistry::new().handler("api/middleware.rs", noop);
        let root = Path::new("/srv/app/routes");
        let file = root.join("api/middleware.rs");

        assert!(modules.lookup(root, &file, ModuleKind::Middleware).is_none());
        assert!(modules.lookup(root, &file, ModuleKind::Handler).is_some());
    }
}
