//! Domain types for a supervised service.
//!
//! A [`Service`] is built per invocation and owns no persistent state; the
//! run script on disk and the supervisor's runtime are the only durable state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A validated service name.
///
/// The name doubles as the control-directory name and the log-file stem, and
/// is interpolated into the generated shell script, so it must be a single
/// plain path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("name is empty")
        } else if name == "." || name == ".." {
            Some("name is a relative directory reference")
        } else if name.contains('/') {
            Some("name contains '/'")
        } else if name.contains('\0') {
            Some("name contains a NUL byte")
        } else if name.chars().any(char::is_whitespace) {
            Some("name contains whitespace")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CoreError::InvalidName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ServiceName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ServiceName {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ServiceName> for String {
    fn from(name: ServiceName) -> Self {
        name.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// The unit being installed and controlled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub name: ServiceName,
    /// Human-readable label used in action and status messages.
    pub description: String,
}

impl Service {
    /// The description is written into the run script's header comment, so
    /// it must stay on one line.
    pub fn new(name: ServiceName, description: impl Into<String>) -> Result<Self, CoreError> {
        let description = description.into();
        if description.chars().any(char::is_control) {
            return Err(CoreError::InvalidDescription {
                description,
                reason: "description contains a control character",
            });
        }
        Ok(Self { name, description })
    }

    /// Service whose description is its own name.
    pub fn named(name: ServiceName) -> Self {
        let description = name.to_string();
        Self { name, description }
    }
}

// ---------------------------------------------------------------------------
// ServiceState
// ---------------------------------------------------------------------------

/// Running state as reported by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ServiceState {
    Running { pid: Option<u32> },
    Stopped,
}

impl ServiceState {
    pub fn is_running(&self) -> bool {
        matches!(self, ServiceState::Running { .. })
    }

    pub fn pid(&self) -> Option<u32> {
        match self {
            ServiceState::Running { pid } => *pid,
            ServiceState::Stopped => None,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceState::Running { pid: Some(pid) } => write!(f, "running (pid {pid})"),
            ServiceState::Running { pid: None } => f.write_str("running"),
            ServiceState::Stopped => f.write_str("stopped"),
        }
    }
}
