//! Schema loading and merging.
//!
//! A route directory may carry a `schema.json` next to its handler file.
//! Its contents become the lower-precedence base for every schema the
//! handler declares inline: on a top-level key collision the inline value
//! wins. The merge is shallow: nested objects replace, they never
//! recurse.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::warn;

use crate::method::Method;

/// Name of the optional per-directory schema file.
pub(crate) const SCHEMA_FILE: &str = "schema.json";

/// Merged schemas keyed by method + route path, one table per loaded tree.
///
/// Filled during registration and retained for introspection, such as
/// generating API documentation at startup. The request
/// path never reads it.
#[derive(Clone, Debug, Default)]
pub struct SchemaTable {
    entries: HashMap<(Method, String), Value>,
}

impl SchemaTable {
    pub(crate) fn insert(&mut self, method: Method, path: String, schema: Value) {
        self.entries.insert((method, path), schema);
    }

    /// The merged schema attached to `method` + `path`, if any.
    pub fn get(&self, method: Method, path: &str) -> Option<&Value> {
        self.entries.get(&(method, path.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Method, &str, &Value)> {
        self.entries.iter().map(|((m, p), v)| (*m, p.as_str(), v))
    }
}

/// Loads the `schema.json` sibling of a handler directory.
///
/// Absence is the common case and returns `None` silently. Malformed JSON
/// also returns `None` (the route keeps whatever it declares inline) but
/// is logged, since a file that exists and does not parse is worth a look.
pub(crate) fn sibling_schema(dir: &Path) -> Option<Value> {
    let path = dir.join(SCHEMA_FILE);
    let raw = fs::read(&path).ok()?;
    match serde_json::from_slice(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), "ignoring malformed schema file: {e}");
            None
        }
    }
}

/// Shallow merge of the file schema (base) and the inline schema (override).
///
/// Entered only when at least one side contributes; `None`/`None` attaches
/// nothing. When both sides are objects, inline keys win on collision. An
/// inline non-object replaces the file contents wholesale.
pub(crate) fn merge(file: Option<&Value>, inline: Option<Value>) -> Option<Value> {
    match (file, inline) {
        (None, None) => None,
        (None, Some(inline)) => Some(inline),
        (Some(file), None) => Some(file.clone()),
        (Some(Value::Object(base)), Some(Value::Object(over))) => {
            let mut merged = base.clone();
            for (key, value) in over {
                merged.insert(key, value);
            }
            Some(Value::Object(merged))
        }
        (Some(_), Some(inline)) => Some(inline),
    }
}
