//! End-to-end loading over the fixture trees in `tests/fixtures/`.
//!
//! Each tree exercises one convention: chain ordering, boundary stops,
//! schema merging, isolation between siblings. Entry points live here;
//! the trees on disk only carry structure.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use rota::{
    Loader, Method, ModuleRegistry, Next, Plugin, Request, Response, RouteOptions, Router, Scope,
    SetupError,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// A middleware entry point that appends `label` to the request's trail
/// context and stamps an `x-mw-<label>` response header on the way out.
fn tag(label: &'static str) -> impl Plugin {
    move |scope: Scope| async move {
        scope.wrap(move |mut req: Request, next: Next| async move {
            let mut trail = req
                .context("trail")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            trail.push(Value::String(label.to_owned()));
            req.set_context("trail", Value::Array(trail));

            let mut res = next.run(req).await;
            res.set_header(format!("x-mw-{label}"), "1");
            res
        });
        Ok::<(), SetupError>(())
    }
}

/// Handler body used across fixtures: echoes the trail left by the chain.
async fn echo_trail(req: Request) -> Response {
    let trail = req.context("trail").cloned().unwrap_or_else(|| json!([]));
    Response::json(serde_json::to_vec(&trail).expect("trail serialises"))
}

async fn trail_of(router: &Router, method: Method, path: &str) -> Vec<String> {
    let res = router.dispatch(Request::new(method, path)).await;
    assert_eq!(res.status_code(), http::StatusCode::OK, "{method} {path}");
    let trail: Vec<String> = serde_json::from_slice(res.body()).expect("trail parses");
    trail
}

#[tokio::test]
async fn chain_wraps_farthest_ancestor_outermost() {
    async fn users(scope: Scope) -> Result<(), SetupError> {
        scope.get("/users", RouteOptions::with_schema(json!({"a": 1})), echo_trail);
        scope.post("/users", RouteOptions::default(), echo_trail);
        Ok(())
    }

    let modules = ModuleRegistry::new()
        .handler("handlers/api/users/index.conf", users)
        .middleware("handlers/api/users/middleware.conf", tag("users"))
        .middleware("handlers/api/middleware.conf", tag("api"))
        .middleware("handlers/middleware.conf", tag("handlers"))
        // Sits above the `handlers` boundary; the walk must never reach it.
        .middleware("middleware.conf", tag("above-boundary"));

    let router = Loader::new(fixture("nested"), modules).load().await.expect("load");

    // Upward discovery order is users, api, handlers; registration order is
    // the reverse, so the farthest ancestor runs first.
    let trail = trail_of(&router, Method::Get, "/users").await;
    assert_eq!(trail, ["handlers", "api", "users"]);

    let res = router.dispatch(Request::new(Method::Get, "/users")).await;
    assert_eq!(res.header("x-mw-users"), Some("1"));
    assert_eq!(res.header("x-mw-above-boundary"), None);
}

#[tokio::test]
async fn schema_file_merges_under_inline_schema() {
    async fn users(scope: Scope) -> Result<(), SetupError> {
        scope.get("/users", RouteOptions::with_schema(json!({"a": 1})), echo_trail);
        scope.post("/users", RouteOptions::default(), echo_trail);
        Ok(())
    }

    let modules = ModuleRegistry::new().handler("handlers/api/users/index.conf", users);
    let router = Loader::new(fixture("nested"), modules).load().await.expect("load");

    // File declares {"a": 2, "b": 3}; inline keys win on collision.
    assert_eq!(
        router.schemas().get(Method::Get, "/users"),
        Some(&json!({"a": 1, "b": 3}))
    );
    // No inline schema: the file contents attach on their own.
    assert_eq!(
        router.schemas().get(Method::Post, "/users"),
        Some(&json!({"a": 2, "b": 3}))
    );
}

#[tokio::test]
async fn boundary_directory_stops_walk_even_without_middleware_file() {
    async fn things(scope: Scope) -> Result<(), SetupError> {
        scope.get("/things", RouteOptions::default(), echo_trail);
        Ok(())
    }

    let modules = ModuleRegistry::new()
        .handler("handlers/api/things/index.conf", things)
        .middleware("handlers/api/things/middleware.conf", tag("things"))
        .middleware("handlers/api/middleware.conf", tag("api"))
        // The `handlers` directory itself has no middleware file; the walk
        // must still stop there and never consult the tree root.
        .middleware("middleware.conf", tag("above-boundary"));

    let router = Loader::new(fixture("boundary_bare"), modules).load().await.expect("load");

    let trail = trail_of(&router, Method::Get, "/things").await;
    assert_eq!(trail, ["api", "things"]);
}

#[tokio::test]
async fn walk_stops_at_first_level_without_middleware_file() {
    async fn deep(scope: Scope) -> Result<(), SetupError> {
        scope.get("/deep", RouteOptions::default(), echo_trail);
        Ok(())
    }

    let modules = ModuleRegistry::new()
        .handler("handlers/api/deep/index.conf", deep)
        // Present on disk one level up, but the handler's own directory has
        // no middleware file, so the walk ends before reaching it.
        .middleware("handlers/api/middleware.conf", tag("api"));

    let router = Loader::new(fixture("gap"), modules).load().await.expect("load");

    let trail = trail_of(&router, Method::Get, "/deep").await;
    assert!(trail.is_empty(), "chain should be empty, got {trail:?}");
}

#[tokio::test]
async fn sibling_handlers_are_isolated() {
    async fn a(scope: Scope) -> Result<(), SetupError> {
        scope.get("/a", RouteOptions::default(), echo_trail);
        Ok(())
    }
    async fn b(scope: Scope) -> Result<(), SetupError> {
        scope.get("/b", RouteOptions::default(), echo_trail);
        Ok(())
    }

    let modules = ModuleRegistry::new()
        .handler("handlers/api/a/index.conf", a)
        .handler("handlers/api/b/index.conf", b)
        .middleware("handlers/api/a/middleware.conf", tag("a"));

    let router = Loader::new(fixture("isolated"), modules).load().await.expect("load");

    assert_eq!(trail_of(&router, Method::Get, "/a").await, ["a"]);
    // b's directory has no middleware file and a's chain must not leak over.
    assert!(trail_of(&router, Method::Get, "/b").await.is_empty());

    let res = router.dispatch(Request::new(Method::Get, "/b")).await;
    assert_eq!(res.header("x-mw-a"), None);
}

#[tokio::test]
async fn wrong_kind_entry_at_middleware_path_is_skipped() {
    async fn w(scope: Scope) -> Result<(), SetupError> {
        scope.get("/w", RouteOptions::default(), echo_trail);
        Ok(())
    }
    async fn not_middleware(scope: Scope) -> Result<(), SetupError> {
        scope.wrap(|mut req: Request, next: Next| async move {
            req.set_context("trail", json!(["should-never-run"]));
            next.run(req).await
        });
        Ok(())
    }

    let modules = ModuleRegistry::new()
        .handler("handlers/api/w/index.conf", w)
        // Registered as a handler entry at a middleware path: wrong shape,
        // treated as absent.
        .handler("handlers/api/w/middleware.conf", not_middleware);

    let router = Loader::new(fixture("wrongkind"), modules).load().await.expect("load");

    assert!(trail_of(&router, Method::Get, "/w").await.is_empty());
}

#[tokio::test]
async fn malformed_schema_file_is_swallowed() {
    async fn broken(scope: Scope) -> Result<(), SetupError> {
        scope.get("/broken", RouteOptions::with_schema(json!({"only": "inline"})), echo_trail);
        Ok(())
    }

    let modules = ModuleRegistry::new().handler("handlers/api/broken/index.conf", broken);
    let router = Loader::new(fixture("badschema"), modules).load().await.expect("load");

    assert_eq!(
        router.schemas().get(Method::Get, "/broken"),
        Some(&json!({"only": "inline"}))
    );

    let res = router.dispatch(Request::new(Method::Get, "/broken")).await;
    assert_eq!(res.status_code(), http::StatusCode::OK);
}

#[tokio::test]
async fn absent_root_loads_zero_routes() {
    let router = Loader::new(fixture("no-such-tree"), ModuleRegistry::new())
        .load()
        .await
        .expect("absent root is not an error");
    assert!(router.is_empty());
}

#[tokio::test]
async fn spec_files_are_excluded_from_discovery() {
    async fn never(_scope: Scope) -> Result<(), SetupError> {
        panic!("spec file must not be loaded");
    }

    let modules = ModuleRegistry::new().handler("handlers/api/index.spec.conf", never);
    let router = Loader::new(fixture("specs_only"), modules).load().await.expect("load");
    assert!(router.is_empty());
}

#[tokio::test]
async fn handler_file_without_entry_contributes_nothing() {
    let router = Loader::new(fixture("unregistered"), ModuleRegistry::new())
        .load()
        .await
        .expect("load");
    assert!(router.is_empty());
}

#[tokio::test]
async fn handlers_can_register_shared_plugins_on_their_scope() {
    async fn shared(scope: Scope) -> Result<(), SetupError> {
        scope.wrap(|mut req: Request, next: Next| async move {
            req.set_context("trail", json!(["shared"]));
            next.run(req).await
        });
        Ok(())
    }
    async fn u(scope: Scope) -> Result<(), SetupError> {
        scope.register(shared).await?;
        scope.get("/u", RouteOptions::default(), echo_trail);
        Ok(())
    }

    let modules = ModuleRegistry::new().handler("handlers/api/u/index.conf", u);
    let router = Loader::new(fixture("unregistered"), modules).load().await.expect("load");

    assert_eq!(trail_of(&router, Method::Get, "/u").await, ["shared"]);
}

#[tokio::test]
async fn duplicate_registration_aborts_the_load() {
    async fn d(scope: Scope) -> Result<(), SetupError> {
        scope.get("/d", RouteOptions::default(), echo_trail);
        scope.get("/d", RouteOptions::default(), echo_trail);
        Ok(())
    }

    let modules = ModuleRegistry::new().handler("handlers/api/d/index.conf", d);
    let err = Loader::new(fixture("dup"), modules).load().await.expect_err("conflict");
    assert!(matches!(err, rota::Error::Route { .. }), "got {err}");
}

#[tokio::test]
async fn failing_entry_point_aborts_the_load_naming_its_module() {
    async fn f(_scope: Scope) -> Result<(), SetupError> {
        Err("pool handshake refused".into())
    }

    let modules = ModuleRegistry::new().handler("handlers/api/f/index.conf", f);
    let err = Loader::new(fixture("failing"), modules).load().await.expect_err("setup failure");

    match err {
        rota::Error::Setup { module, source } => {
            assert!(module.ends_with("handlers/api/f/index.conf"), "{}", module.display());
            assert_eq!(source.to_string(), "pool handshake refused");
        }
        other => panic!("expected setup error, got {other}"),
    }
}

#[tokio::test]
async fn path_parameters_reach_the_handler() {
    async fn users(scope: Scope) -> Result<(), SetupError> {
        scope.get("/users/{id}", RouteOptions::default(), show);
        Ok(())
    }
    async fn show(req: Request) -> Response {
        Response::text(req.param("id").unwrap_or("missing").to_owned())
    }

    let modules = ModuleRegistry::new().handler("handlers/api/users/index.conf", users);
    let router = Loader::new(fixture("nested"), modules).load().await.expect("load");

    let res = router.dispatch(Request::new(Method::Get, "/users/42")).await;
    assert_eq!(res.body(), b"42");

    let res = router.dispatch(Request::new(Method::Get, "/nowhere")).await;
    assert_eq!(res.status_code(), http::StatusCode::NOT_FOUND);
}
