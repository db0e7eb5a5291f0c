//! Resolution of the executable a run script should `exec`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use svmgr_core::ServiceName;

use crate::error::ServiceError;

pub trait ExecutablePathResolver {
    /// Absolute path of the executable to supervise for `name`.
    fn resolve(&self, name: &ServiceName) -> Result<PathBuf, ServiceError>;
}

/// Always resolves to one explicit path.
#[derive(Debug, Clone)]
pub struct FixedPath(pub PathBuf);

impl ExecutablePathResolver for FixedPath {
    fn resolve(&self, _name: &ServiceName) -> Result<PathBuf, ServiceError> {
        Ok(self.0.clone())
    }
}

/// Looks the service name up on `PATH`, falling back to the running
/// executable when no match is found.
#[derive(Debug, Clone, Default)]
pub struct PathLookup {
    search_path: Option<OsString>,
}

impl PathLookup {
    /// Search the current process `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Search `search_path` instead of the process `PATH`.
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn find_on_path(&self, name: &ServiceName) -> Option<PathBuf> {
        let search_path = self
            .search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))?;

        std::env::split_paths(&search_path)
            .filter(|dir| dir.is_absolute())
            .map(|dir| dir.join(name.as_str()))
            .find(|candidate| is_executable(candidate))
    }
}

impl ExecutablePathResolver for PathLookup {
    fn resolve(&self, name: &ServiceName) -> Result<PathBuf, ServiceError> {
        if let Some(found) = self.find_on_path(name) {
            tracing::debug!(service = %name, path = %found.display(), "resolved executable on PATH");
            return Ok(found);
        }

        std::env::current_exe().map_err(|err| {
            tracing::warn!(service = %name, error = %err, "current executable unavailable");
            ServiceError::ExecutableNotFound {
                name: name.to_string(),
            }
        })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
