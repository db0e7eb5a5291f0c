//! Template context: serializable rendering payload built from a [`Service`].
//!
//! The embedded template interpolates every field unquoted into a script that
//! runs as root, so [`RunScriptContext::to_tera_context`] refuses values that
//! could break out of their word or line.

use std::path::Path;

use serde::{Deserialize, Serialize};

use svmgr_core::Service;

use crate::error::RenderError;

/// Fields available to the run-script template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunScriptContext {
    /// Service name; also the log-file stem.
    pub name: String,
    pub description: String,
    /// Absolute path of the supervised executable.
    pub path: String,
    /// Full path of the append-mode log file.
    pub log_path: String,
}

impl RunScriptContext {
    /// `log_path` is the service's log file as computed by
    /// `svmgr_supervisor::paths::log_path`.
    pub fn new(service: &Service, executable: &Path, log_path: &Path) -> Self {
        Self {
            name: service.name.to_string(),
            description: service.description.clone(),
            path: executable.display().to_string(),
            log_path: log_path.display().to_string(),
        }
    }

    /// Check that every field can be interpolated into the script as-is.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.description.chars().any(char::is_control) {
            return Err(unsafe_value(
                "description",
                &self.description,
                "contains a control character",
            ));
        }
        check_shell_word("executable path", &self.path)?;
        check_shell_word("log path", &self.log_path)
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        self.validate()?;
        let value = serde_json::to_value(self)?;
        tera::Context::from_value(value).map_err(RenderError::from)
    }
}

/// Characters besides alphanumerics that the shell passes through untouched.
const SHELL_SAFE_PUNCTUATION: &str = "/._-+:@,%=";

fn check_shell_word(field: &'static str, value: &str) -> Result<(), RenderError> {
    if value.is_empty() {
        return Err(unsafe_value(field, value, "is empty"));
    }
    let safe = value
        .chars()
        .all(|c| c.is_alphanumeric() || SHELL_SAFE_PUNCTUATION.contains(c));
    if safe {
        Ok(())
    } else {
        Err(unsafe_value(
            field,
            value,
            "contains whitespace or shell metacharacters",
        ))
    }
}

fn unsafe_value(field: &'static str, value: &str, reason: &'static str) -> RenderError {
    RenderError::UnsafeValue {
        field,
        value: value.to_string(),
        reason,
    }
}
