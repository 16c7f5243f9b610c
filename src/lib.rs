//! # rota
//!
//! Convention-over-configuration route loading for Rust HTTP services.
//! Point it at a directory tree; the tree is the route table.
//!
//! ## The conventions
//!
//! | File | Meaning |
//! |---|---|
//! | `api/**/index.*` | A handler file, one endpoint group |
//! | `**/*.spec.*` | A test file, never loaded |
//! | `middleware.*` | Middleware for every handler beneath its directory |
//! | `schema.json` | Schema defaults for the sibling handler's routes |
//! | a directory named `handlers` | Upward middleware search stops here |
//!
//! For each discovered handler, the loader walks parent directories upward
//! collecting at most one middleware per level, stopping at the `handlers`
//! boundary or at the first level with no middleware file, then reversing
//! the chain so the farthest ancestor wraps outermost. The handler's entry
//! point then registers its routes; any `schema.json` next to it is
//! shallow-merged underneath each route's inline schema, inline keys
//! winning.
//!
//! Rust cannot import code from a path at runtime, so entry points come
//! from an explicit [`ModuleRegistry`] keyed by convention-relative path:
//! the tree supplies structure, the registry supplies code.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use rota::{Loader, ModuleRegistry, Request, Response, RouteOptions, Scope, Server, SetupError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rota::Error> {
//!     let modules = ModuleRegistry::new()
//!         .handler("handlers/api/users/index.rs", users);
//!
//!     let app = Loader::new("routes", modules).load().await?;
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! async fn users(scope: Scope) -> Result<(), SetupError> {
//!     scope.get("/users/{id}", RouteOptions::default(), show);
//!     Ok(())
//! }
//!
//! async fn show(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//! ```
//!
//! ## What rota does not do
//!
//! Loading is a one-shot startup pass: blocking filesystem reads, then an
//! immutable table. There is no hot reload, no request-time convention
//! work, and no transport opinion beyond the thin hyper wiring in
//! [`Server`]; TLS, rate limiting and body-size limits belong to the
//! reverse proxy in front of you.

mod discover;
mod error;
mod handler;
mod loader;
mod method;
mod middleware;
mod plugin;
mod registry;
mod request;
mod resolve;
mod response;
mod router;
mod schema;
mod scope;
mod server;

pub use error::{Error, SetupError};
pub use handler::Handler;
pub use loader::Loader;
pub use method::Method;
pub use middleware::{Middleware, Next};
pub use plugin::Plugin;
pub use registry::{ModuleKind, ModuleRegistry};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use schema::SchemaTable;
pub use scope::{RouteOptions, Scope};
pub use server::Server;
