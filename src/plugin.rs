//! Module entry points.
//!
//! Every file the loader honours, handler or middleware, contributes its
//! code through the same shape: an asynchronous function given the scope it
//! loads into. Handler entries register routes on the scope; middleware
//! entries wrap it. The registry stores both behind this one trait.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::SetupError;
use crate::scope::Scope;

pub(crate) type SetupFuture = Pin<Box<dyn Future<Output = Result<(), SetupError>> + Send + 'static>>;

/// A module entry point.
///
/// Automatically satisfied by any `async fn(Scope) -> Result<(), SetupError>`.
/// The scope is passed by value: it is a cheap handle, and clones address
/// the same underlying registration context.
///
/// ```rust
/// use rota::{Request, Response, RouteOptions, Scope, SetupError};
///
/// async fn users(scope: Scope) -> Result<(), SetupError> {
///     scope.get("/users/{id}", RouteOptions::default(), show);
///     Ok(())
/// }
///
/// async fn show(req: Request) -> Response {
///     Response::text(req.param("id").unwrap_or("unknown").to_owned())
/// }
/// ```
pub trait Plugin: Send + Sync + 'static {
    fn setup(&self, scope: Scope) -> SetupFuture;
}

impl<F, Fut> Plugin for F
where
    F: Fn(Scope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SetupError>> + Send + 'static,
{
    fn setup(&self, scope: Scope) -> SetupFuture {
        Box::pin((self)(scope))
    }
}

pub(crate) type BoxedPlugin = Arc<dyn Plugin>;
