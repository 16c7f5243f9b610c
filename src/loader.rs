//! Route composition.
//!
//! `Loader` orchestrates the whole convention pass, once, at startup:
//! discover handler files, resolve each one's middleware chain, wire a
//! private scope, invoke the handler's entry point, commit. Handlers are
//! composed one at a time in discovery order; each runs in its own scope,
//! so no middleware, schema default, or half-made registration leaks
//! between them. A setup failure or route conflict aborts the load:
//! the error names the module, and no partially wired table is returned.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::discover::{self, HandlerDescriptor};
use crate::error::Error;
use crate::registry::{ModuleKind, ModuleRegistry};
use crate::resolve;
use crate::router::Router;
use crate::schema;
use crate::scope::Scope;

/// Composes a route table from a directory tree and a module registry.
///
/// ```rust,no_run
/// use rota::{Loader, ModuleRegistry, Scope, SetupError};
///
/// async fn users(scope: Scope) -> Result<(), SetupError> { Ok(()) }
///
/// # async fn load() -> Result<(), rota::Error> {
/// let modules = ModuleRegistry::new().handler("handlers/api/users/index.rs", users);
/// let app = Loader::new("routes", modules).load().await?;
/// # Ok(())
/// # }
/// ```
pub struct Loader {
    root: PathBuf,
    modules: ModuleRegistry,
}

impl Loader {
    /// A loader rooted at `root`. The root is explicit (nothing here
    /// consults the working directory) and the upward middleware walk
    /// never leaves it.
    pub fn new(root: impl Into<PathBuf>, modules: ModuleRegistry) -> Self {
        Self { root: root.into(), modules }
    }

    /// Discovers, composes and commits every handler under the root.
    ///
    /// An absent root or a tree with no handler files yields an empty
    /// router, not an error.
    pub async fn load(self) -> Result<Router, Error> {
        let handlers = discover::discover(&self.root)?;
        let mut router = Router::new();
        for handler in &handlers {
            self.compose(handler, &mut router).await?;
        }
        info!(
            root = %self.root.display(),
            handlers = handlers.len(),
            routes = router.len(),
            schemas = router.schemas().len(),
            "route tree loaded"
        );
        Ok(router)
    }

    /// One handler's pass: discovered → middleware-resolved → scope-wrapped
    /// → invoked → registered. Linear, no rollback.
    async fn compose(&self, handler: &HandlerDescriptor, router: &mut Router) -> Result<(), Error> {
        let Some(entry) = self.modules.lookup(&self.root, &handler.path, ModuleKind::Handler) else {
            // No usable entry point: the file contributes nothing.
            return Ok(());
        };

        let chain = resolve::resolve(&handler.directory, &self.root, &self.modules)?;
        let scope = Scope::new(schema::sibling_schema(&handler.directory));

        for link in &chain {
            debug!(
                handler = %handler.path.display(),
                middleware = %link.path.display(),
                "registering middleware"
            );
            link.plugin
                .setup(scope.clone())
                .await
                .map_err(|e| Error::Setup { module: link.path.clone(), source: e })?;
        }

        entry
            .setup(scope.clone())
            .await
            .map_err(|e| Error::Setup { module: handler.path.clone(), source: e })?;

        for registration in scope.take_routes() {
            router.insert(registration)?;
        }
        Ok(())
    }
}
