//! Handler discovery.
//!
//! A handler file is any `index.*` under an `api/` directory of the load
//! root, minus `*.spec.*` test files. Discovery is a pure read of the tree:
//! each directory's entries are visited in sorted order, depth-first, so the
//! result is deterministic, though nothing downstream may depend on the
//! order, since every handler is composed in isolation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// One discovered handler file. Identity is the absolute path; the
/// directory is kept because middleware resolution and schema loading both
/// start from it.
pub(crate) struct HandlerDescriptor {
    pub(crate) path: PathBuf,
    pub(crate) directory: PathBuf,
}

/// Collects every handler file under `root`.
///
/// An absent root is not an error: there is simply nothing to register.
pub(crate) fn discover(root: &Path) -> Result<Vec<HandlerDescriptor>, Error> {
    let mut found = Vec::new();
    if root.is_dir() {
        walk(root, false, &mut found)?;
    }
    Ok(found)
}

fn walk(dir: &Path, under_api: bool, found: &mut Vec<HandlerDescriptor>) -> Result<(), Error> {
    let mut entries = Vec::new();
    let reader = fs::read_dir(dir)
        .map_err(|e| Error::Walk { path: dir.to_owned(), source: e })?;
    for entry in reader {
        entries.push(entry.map_err(|e| Error::Walk { path: dir.to_owned(), source: e })?);
    }
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, under_api || entry.file_name() == "api", found)?;
        } else if under_api && is_handler_file(&entry.file_name().to_string_lossy()) {
            found.push(HandlerDescriptor { path, directory: dir.to_owned() });
        }
    }
    Ok(())
}

/// `index.*`, excluding the `*.spec.*` test convention.
fn is_handler_file(name: &str) -> bool {
    let Some(ext) = name.strip_prefix("index.") else {
        return false;
    };
    !ext.is_empty() && !name.contains(".spec.")
}
