//! Radix-tree route table.
//!
//! One tree per HTTP method, O(path-length) lookup. The loader commits
//! registrations here; afterwards the table is immutable and shared across
//! connection tasks behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use http::StatusCode;
use matchit::Router as MatchitRouter;

use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::schema::SchemaTable;
use crate::scope::RouteRegistration;

/// The loaded route table.
///
/// Built by [`Loader::load`](crate::Loader::load); serve it with
/// [`Server`](crate::Server) or call [`dispatch`](Router::dispatch) directly
/// when embedding.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    schemas: SchemaTable,
    registered: Vec<(Method, String)>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}

impl Router {
    pub(crate) fn new() -> Self {
        Self {
            routes: HashMap::new(),
            schemas: SchemaTable::default(),
            registered: Vec::new(),
        }
    }

    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves
    /// them. Rejects patterns the radix tree cannot hold, including a
    /// second registration of the same method + path pair.
    pub(crate) fn insert(&mut self, registration: RouteRegistration) -> Result<(), Error> {
        let RouteRegistration { method, path, schema, handler } = registration;
        self.routes
            .entry(method)
            .or_default()
            .insert(&path, handler)
            .map_err(|e| Error::Route {
                method,
                path: path.clone(),
                reason: e.to_string(),
            })?;
        if let Some(schema) = schema {
            self.schemas.insert(method, path.clone(), schema);
        }
        self.registered.push((method, path));
        Ok(())
    }

    /// Routes one request through its composed middleware chain and
    /// handler. Unmatched paths resolve to `404 Not Found`.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        match self.lookup(req.method(), req.path()) {
            Some((handler, params)) => {
                req.set_params(params);
                handler.call(req).await
            }
            None => Response::status(StatusCode::NOT_FOUND),
        }
    }

    fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// The merged schema table, keyed by method + path. Inert at request
    /// time; kept for introspection and documentation generation.
    pub fn schemas(&self) -> &SchemaTable {
        &self.schemas
    }

    /// Registered method + path pairs, in commit order.
    pub fn routes(&self) -> impl Iterator<Item = (Method, &str)> {
        self.registered.iter().map(|(m, p)| (*m, p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}
