//! Error types for svmgr-service.

use std::path::PathBuf;

use thiserror::Error;

use svmgr_renderer::RenderError;
use svmgr_supervisor::SupervisorError;

/// Why a lifecycle operation was rejected or failed.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("You must have root user privileges. Possibly using 'sudo' command should help")]
    PermissionDenied,

    #[error("{description} already installed")]
    AlreadyInstalled { description: String },

    #[error("{description} is not installed")]
    NotInstalled { description: String },

    #[error("service already running")]
    AlreadyRunning,

    #[error("service already stopped")]
    AlreadyStopped,

    /// The run script could not be stat'ed for a reason other than absence.
    #[error("cannot determine whether {path} exists: {source}")]
    IndeterminateState {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("start failed: {0}")]
    Start(#[source] SupervisorError),

    #[error("stop failed: {0}")]
    Stop(#[source] SupervisorError),

    #[error("run script rendering failed: {0}")]
    Template(#[from] RenderError),

    #[error("no executable found for service {name}")]
    ExecutableNotFound { name: String },
}

/// A failed lifecycle operation: the "failed" message plus its cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ActionError {
    pub message: String,
    #[source]
    pub source: ServiceError,
}

impl ActionError {
    pub fn new(message: impl Into<String>, source: ServiceError) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }

    pub fn kind(&self) -> &ServiceError {
        &self.source
    }
}

/// Convenience constructor for [`ServiceError::Filesystem`].
pub(crate) fn fs_err(path: impl Into<PathBuf>, source: std::io::Error) -> ServiceError {
    ServiceError::Filesystem {
        path: path.into(),
        source,
    }
}
