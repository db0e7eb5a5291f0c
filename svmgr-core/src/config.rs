//! Configuration for svmgr.
//!
//! Resolution order:
//! 1. An explicit path passed by the caller (must exist).
//! 2. `$SVMGR_CONFIG` (must exist).
//! 3. `/etc/svmgr/config.yaml`, if present.
//! 4. Built-in defaults.
//!
//! `SVMGR_SERVICE_ROOT`, `SVMGR_LOG_DIR` and `SVMGR_SV_BINARY` are applied on
//! top of whatever was loaded.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};

pub const DEFAULT_SERVICE_ROOT: &str = "/etc/service";
pub const DEFAULT_LOG_DIR: &str = "/var/log";
pub const DEFAULT_SV_BINARY: &str = "sv";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/svmgr/config.yaml";

pub const ENV_CONFIG: &str = "SVMGR_CONFIG";
pub const ENV_SERVICE_ROOT: &str = "SVMGR_SERVICE_ROOT";
pub const ENV_LOG_DIR: &str = "SVMGR_LOG_DIR";
pub const ENV_SV_BINARY: &str = "SVMGR_SV_BINARY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Supervisor control-directory root; each service lives in `<root>/<name>`.
    pub service_root: PathBuf,
    /// Directory the run script appends service output to.
    pub log_dir: PathBuf,
    /// Supervisor command-line program.
    pub sv_binary: String,
    /// Optional directory holding a `run.tera` override.
    pub template_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_root: PathBuf::from(DEFAULT_SERVICE_ROOT),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            sv_binary: DEFAULT_SV_BINARY.to_string(),
            template_dir: None,
        }
    }
}

impl Config {
    /// Resolve the configuration from the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CoreError> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// Resolve the configuration using `env` for variable lookups.
    pub fn load_with<F>(explicit: Option<&Path>, env: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => match env(ENV_CONFIG).filter(|v| !v.is_empty()) {
                Some(path) => Self::load_from(Path::new(&path))?,
                None => {
                    let system = Path::new(SYSTEM_CONFIG_PATH);
                    if system.exists() {
                        Self::load_from(system)?
                    } else {
                        Self::default()
                    }
                }
            },
        };
        config.apply_overrides(env);
        Ok(config)
    }

    /// Load and parse a YAML config file. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|source| CoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = env(ENV_SERVICE_ROOT).filter(|v| !v.is_empty()) {
            self.service_root = PathBuf::from(root);
        }
        if let Some(dir) = env(ENV_LOG_DIR).filter(|v| !v.is_empty()) {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(bin) = env(ENV_SV_BINARY).filter(|v| !v.is_empty()) {
            self.sv_binary = bin;
        }
    }
}
