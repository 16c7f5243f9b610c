//! Unified error type.

use std::fmt;
use std::path::PathBuf;

use crate::method::Method;

/// Error type a module entry point may return from its setup function.
///
/// Boxed so route files can use `?` on whatever they touch during setup
/// (I/O, JSON, a pool handshake) without threading a concrete type through
/// the loader.
pub type SetupError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by rota's fallible operations.
///
/// Recoverable conditions never surface here: an absent `schema.json`, a
/// directory level without a middleware file, or an unregistered module path
/// all degrade to safe defaults during loading. `Error` carries the
/// structural failures that must abort bootstrap; serving with a
/// half-wired route set is a silent correctness gap.
#[derive(Debug)]
pub enum Error {
    /// Filesystem fault while walking the route tree.
    Walk {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Socket-level fault while binding or serving.
    Io(std::io::Error),
    /// A handler or middleware entry point failed during setup.
    Setup {
        module: PathBuf,
        source: SetupError,
    },
    /// A registration the route table rejected: bad pattern or a duplicate
    /// method + path pair.
    Route {
        method: Method,
        path: String,
        reason: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walk { path, source } => {
                write!(f, "io error at {}: {source}", path.display())
            }
            Self::Io(source) => write!(f, "io: {source}"),
            Self::Setup { module, source } => {
                write!(f, "module {} failed to set up: {source}", module.display())
            }
            Self::Route { method, path, reason } => {
                write!(f, "cannot register {method} {path}: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Walk { source, .. } => Some(source),
            Self::Io(source) => Some(source),
            Self::Setup { source, .. } => Some(&**source),
            Self::Route { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
