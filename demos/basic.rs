//! Minimal rota example: routes loaded from the convention tree in
//! `demos/routes/`.
//!
//! The tree:
//!
//! ```text
//! demos/routes/handlers/middleware.conf            request_log (outermost)
//! demos/routes/handlers/api/middleware.conf        powered_by
//! demos/routes/handlers/api/users/middleware.conf  caller_context (innermost)
//! demos/routes/handlers/api/users/index.conf       users
//! demos/routes/handlers/api/users/schema.json      tags/summary defaults
//! ```
//!
//! Run from the crate root with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -H 'x-caller: alice' http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"alice"}'

use http::StatusCode;
use serde_json::json;

use rota::{
    Loader, ModuleRegistry, Next, Request, Response, RouteOptions, Scope, Server, SetupError,
};

#[tokio::main]
async fn main() -> Result<(), rota::Error> {
    tracing_subscriber::fmt::init();

    // The tree under demos/routes/ supplies structure; these entries supply
    // the code for each convention path.
    let modules = ModuleRegistry::new()
        .handler("handlers/api/users/index.conf", users)
        .middleware("handlers/middleware.conf", request_log)
        .middleware("handlers/api/middleware.conf", powered_by)
        .middleware("handlers/api/users/middleware.conf", caller_context);

    let app = Loader::new("demos/routes", modules).load().await?;

    for (method, path) in app.routes() {
        tracing::info!(%method, path, "registered");
    }

    Server::bind("0.0.0.0:3000").serve(app).await
}

// handlers/middleware.conf is the farthest ancestor: it wraps outermost and
// sees the request first and the response last.
async fn request_log(scope: Scope) -> Result<(), SetupError> {
    scope.wrap(|req: Request, next: Next| async move {
        let method = req.method();
        let path = req.path().to_owned();
        let started = std::time::Instant::now();

        let res = next.run(req).await;

        tracing::info!(
            %method,
            path,
            status = %res.status_code(),
            elapsed = ?started.elapsed(),
            "request"
        );
        res
    });
    Ok(())
}

// handlers/api/middleware.conf
async fn powered_by(scope: Scope) -> Result<(), SetupError> {
    scope.wrap(|req: Request, next: Next| async move {
        let mut res = next.run(req).await;
        res.set_header("x-powered-by", "rota");
        res
    });
    Ok(())
}

// handlers/api/users/middleware.conf, the nearest ancestor, wraps innermost.
async fn caller_context(scope: Scope) -> Result<(), SetupError> {
    scope.wrap(|mut req: Request, next: Next| async move {
        let caller = req.header("x-caller").unwrap_or("anonymous").to_owned();
        req.set_context("caller", caller);
        next.run(req).await
    });
    Ok(())
}

// handlers/api/users/index.conf; the sibling schema.json contributes
// tags/summary defaults underneath the inline schema below.
async fn users(scope: Scope) -> Result<(), SetupError> {
    scope.get("/users/{id}", RouteOptions::default(), get_user);
    scope.post(
        "/users",
        RouteOptions::with_schema(json!({"body": {"required": ["name"]}})),
        create_user,
    );
    Ok(())
}

async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    let caller = req
        .context("caller")
        .and_then(|v| v.as_str())
        .unwrap_or("anonymous");
    Response::json(format!(r#"{{"id":"{id}","requested_by":"{caller}"}}"#).into_bytes())
}

async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(br#"{"id":"99","name":"new_user"}"#.to_vec())
}
