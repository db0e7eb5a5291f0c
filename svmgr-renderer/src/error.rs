//! Error types for svmgr-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// Why a run script could not be produced.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The embedded template or a `run.tera` override failed to parse or
    /// render (unknown variable, bad syntax).
    #[error("run script template error: {0}")]
    Tera(#[from] tera::Error),

    /// The context could not be turned into template variables.
    #[error("run script context error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A `run.tera` override exists in the configured template directory but
    /// could not be read.
    #[error("failed to read run script override at {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value would be interpolated into the root-run script but contains
    /// characters the shell would split on or interpret.
    #[error("{field} {value:?} cannot be written into a run script: {reason}")]
    UnsafeValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}
