//! Per-handler registration scope.
//!
//! Every handler file is loaded inside its own `Scope`: an isolated
//! registration context holding the middleware stack resolved from the
//! directory hierarchy and the schema defaults read from the sibling
//! `schema.json`. Nothing in one scope is visible to a sibling handler's
//! scope. Registrations queue here and commit to the shared route table
//! only after the handler's entry point returns cleanly.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::SetupError;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{self, BoxedMiddleware, Middleware};
use crate::plugin::Plugin;
use crate::schema;

/// The per-route options bag.
///
/// Carries the schema a route declares inline. The loader merges the
/// directory's `schema.json` underneath it before the registration commits.
#[derive(Clone, Debug, Default)]
pub struct RouteOptions {
    pub schema: Option<Value>,
}

impl RouteOptions {
    /// Options with an inline schema.
    pub fn with_schema(schema: Value) -> Self {
        Self { schema: Some(schema) }
    }
}

/// One queued registration: the wrapped handler plus the schema that
/// survived the merge pipeline.
pub(crate) struct RouteRegistration {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) schema: Option<Value>,
    pub(crate) handler: BoxedHandler,
}

struct ScopeInner {
    file_schema: Option<Value>,
    layers: Vec<BoxedMiddleware>,
    routes: Vec<RouteRegistration>,
}

/// An isolated registration context for one handler and its middleware
/// chain.
///
/// `Scope` is a cheap handle; clones share the same context, which is how
/// an `async fn(Scope)` entry point and the loader see each other's work.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<Mutex<ScopeInner>>,
}

impl Scope {
    pub(crate) fn new(file_schema: Option<Value>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScopeInner {
                file_schema,
                layers: Vec::new(),
                routes: Vec::new(),
            })),
        }
    }

    /// Applies a plugin to this scope. Setup errors propagate; a plugin
    /// that fails leaves the scope uncommitted and aborts the load.
    pub async fn register(&self, plugin: impl Plugin) -> Result<(), SetupError> {
        plugin.setup(self.clone()).await
    }

    /// Adds a middleware layer. Every route registered afterwards is
    /// wrapped by it; layers added earlier sit further out.
    pub fn wrap(&self, middleware: impl Middleware) {
        self.lock().layers.push(Arc::new(middleware));
    }

    /// Registers a route.
    ///
    /// This is the merge pipeline stage: the scope's file schema is folded
    /// underneath `options.schema`, the handler is wrapped in the current
    /// middleware stack, and the result queues for commit.
    pub fn route(&self, method: Method, path: impl Into<String>, options: RouteOptions, handler: impl Handler) {
        let mut inner = self.lock();
        let schema = schema::merge(inner.file_schema.as_ref(), options.schema);
        let handler = inner
            .layers
            .iter()
            .rev()
            .fold(handler.into_boxed_handler(), |wrapped, layer| {
                middleware::wrap(Arc::clone(layer), wrapped)
            });
        inner.routes.push(RouteRegistration { method, path: path.into(), schema, handler });
    }

    pub fn get(&self, path: &str, options: RouteOptions, handler: impl Handler) {
        self.route(Method::Get, path, options, handler);
    }

    pub fn post(&self, path: &str, options: RouteOptions, handler: impl Handler) {
        self.route(Method::Post, path, options, handler);
    }

    pub fn put(&self, path: &str, options: RouteOptions, handler: impl Handler) {
        self.route(Method::Put, path, options, handler);
    }

    pub fn patch(&self, path: &str, options: RouteOptions, handler: impl Handler) {
        self.route(Method::Patch, path, options, handler);
    }

    pub fn delete(&self, path: &str, options: RouteOptions, handler: impl Handler) {
        self.route(Method::Delete, path, options, handler);
    }

    pub fn options(&self, path: &str, options: RouteOptions, handler: impl Handler) {
        self.route(Method::Options, path, options, handler);
    }

    pub fn head(&self, path: &str, options: RouteOptions, handler: impl Handler) {
        self.route(Method::Head, path, options, handler);
    }

    pub(crate) fn take_routes(&self) -> Vec<RouteRegistration> {
        std::mem::take(&mut self.lock().routes)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScopeInner> {
        self.inner.lock().expect("scope lock poisoned")
    }
}
