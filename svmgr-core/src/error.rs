//! Error types for svmgr-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration loading and name validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure while reading a config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load: includes the file path.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// The service name cannot be used as a directory and log-file name.
    #[error("invalid service name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// The description would break out of the run script's comment line.
    #[error("invalid service description {description:?}: {reason}")]
    InvalidDescription {
        description: String,
        reason: &'static str,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
