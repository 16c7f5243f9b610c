//! Middleware trait and chain wrapping.
//!
//! A middleware intercepts the request on the way in and the response on the
//! way out: the place for cross-cutting concerns such as tracing spans and
//! authentication-header inspection. Route files never see a
//! middleware directly; the loader resolves the chain from the directory
//! hierarchy and wraps it around each handler at registration time, farthest
//! ancestor outermost.
//!
//! ```rust
//! use rota::{Next, Request, Response};
//!
//! async fn request_id(mut req: Request, next: Next) -> Response {
//!     req.set_context("request-id", "r-1138");
//!     let mut res = next.run(req).await;
//!     res.set_header("x-request-id", "r-1138");
//!     res
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The remainder of a middleware chain, ending in the route handler.
///
/// Call [`run`](Next::run) to forward the request inward. Dropping `Next`
/// without calling it short-circuits the chain; the middleware's own
/// return value becomes the response.
pub struct Next {
    inner: BoxedHandler,
}

impl Next {
    pub(crate) fn new(inner: BoxedHandler) -> Self {
        Self { inner }
    }

    /// Forwards the request to the next layer and resolves to its response.
    pub async fn run(self, req: Request) -> Response {
        self.inner.call(req).await
    }
}

/// Cross-cutting request interception.
///
/// Automatically satisfied by any `async fn(Request, Next) -> impl
/// IntoResponse`; implement it directly on a struct when the middleware
/// carries state.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: Request, next: Next) -> BoxFuture;
}

impl<F, Fut, R> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        let fut = (self)(req, next);
        Box::pin(async move { fut.await.into_response() })
    }
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

/// One middleware layer closed over the rest of the chain.
struct Layer {
    middleware: BoxedMiddleware,
    inner: BoxedHandler,
}

impl ErasedHandler for Layer {
    fn call(&self, req: Request) -> BoxFuture {
        self.middleware.handle(req, Next::new(Arc::clone(&self.inner)))
    }
}

/// Wraps `inner` in `middleware`, producing the composed handler.
pub(crate) fn wrap(middleware: BoxedMiddleware, inner: BoxedHandler) -> BoxedHandler {
    Arc::new(Layer { middleware, inner })
}
