//! Working directory and cache layout.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hic_core::errors::{ErrorInfo, HicError};
use tracing::debug;

/// Environment variable overriding the working directory.
pub const WORKDIR_ENV: &str = "WORKDIR";
/// Name of the cache subdirectory inside the working directory.
pub const CACHE_DIR_NAME: &str = "cache";

/// Project working directory holding the `cache` subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workdir {
    root: PathBuf,
}

impl Workdir {
    /// Uses `root` as the working directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reads the working directory from `WORKDIR`, defaulting to `.`.
    pub fn from_env() -> Self {
        let root = env::var_os(WORKDIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { root }
    }

    /// Returns the working directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `<root>/cache`.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR_NAME)
    }

    /// Creates the cache directory (and its parents) when missing.
    pub fn ensure(&self) -> Result<PathBuf, HicError> {
        let cache = self.cache_dir();
        fs::create_dir_all(&cache)
            .map_err(|err| io_error("hic_config.cache_create", &cache, err))?;
        debug!(path = %cache.display(), "cache directory ready");
        Ok(cache)
    }

    /// Resolves a path relative to the cache directory. Absolute paths are
    /// returned unchanged.
    pub fn resolve_cached(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.cache_dir().join(rel)
    }

    /// Resolves a cache-relative output path and creates its parent directory.
    pub fn prepare_output(&self, rel: impl AsRef<Path>) -> Result<PathBuf, HicError> {
        let path = self.resolve_cached(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| io_error("hic_config.output_dir", parent, err))?;
        }
        Ok(path)
    }
}

impl Default for Workdir {
    fn default() -> Self {
        Self::from_env()
    }
}

pub(crate) fn io_error(code: &str, path: &Path, err: io::Error) -> HicError {
    HicError::Io(
        ErrorInfo::new(code, err.to_string())
            .with_context("path", path.display().to_string())
            .with_context("kind", format!("{:?}", err.kind())),
    )
}
