//! Middleware resolution.
//!
//! Each handler inherits the middleware of its ancestor directories. The
//! walk starts at the handler's own directory and climbs one level at a
//! time, collecting at most one `middleware.*` file per level. Two things
//! end it: reaching the hierarchy boundary (a directory literally named
//! `handlers`, checked whether or not that level carried middleware) or a
//! level with no middleware file at all. File presence governs
//! continuation; whether the file's path resolves to a usable registry
//! entry does not.
//!
//! The collected list is nearest-first and gets reversed before
//! registration, so the farthest ancestor wraps outermost and its
//! interception runs first.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::plugin::BoxedPlugin;
use crate::registry::{ModuleKind, ModuleRegistry};

/// Directory name that terminates the upward walk.
pub(crate) const BOUNDARY: &str = "handlers";

/// One resolved link of a middleware chain. The file path is kept so a
/// failing setup can name its module.
pub(crate) struct ResolvedMiddleware {
    pub(crate) path: PathBuf,
    pub(crate) plugin: BoxedPlugin,
}

/// Builds the middleware chain for a handler directory, outermost first.
pub(crate) fn resolve(
    handler_dir: &Path,
    root: &Path,
    modules: &ModuleRegistry,
) -> Result<Vec<ResolvedMiddleware>, Error> {
    let mut chain = Vec::new();
    let mut dir = handler_dir;

    loop {
        let file = middleware_file(dir)?;
        if let Some(path) = &file {
            if let Some(plugin) = modules.lookup(root, path, ModuleKind::Middleware) {
                chain.push(ResolvedMiddleware { path: path.clone(), plugin });
            }
        }

        if dir.file_name().is_some_and(|name| name == BOUNDARY) {
            break;
        }
        if file.is_none() {
            break;
        }
        // The load root is an implicit boundary: ancestry outside the tree
        // handed to the loader is never consulted.
        if dir == root {
            break;
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    chain.reverse();
    Ok(chain)
}

/// First `middleware.*` file in `dir`, in sorted order.
fn middleware_file(dir: &Path) -> Result<Option<PathBuf>, Error> {
    let mut names = Vec::new();
    let reader = fs::read_dir(dir)
        .map_err(|e| Error::Walk { path: dir.to_owned(), source: e })?;
    for entry in reader {
        let entry = entry.map_err(|e| Error::Walk { path: dir.to_owned(), source: e })?;
        let name = entry.file_name();
        if is_middleware_file(&name.to_string_lossy()) && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names.first().map(|name| dir.join(name)))
}

fn is_middleware_file(name: &str) -> bool {
    name.strip_prefix("middleware.").is_some_and(|ext| !ext.is_empty())
}
