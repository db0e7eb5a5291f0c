//! Enumeration of every service installed under the service root.

use std::fs;
use std::io::ErrorKind;

use serde::Serialize;

use svmgr_core::{Config, ServiceName, ServiceState};
use svmgr_supervisor::{paths::RUN_SCRIPT, ProcessSupervisor};

use crate::error::{fs_err, ServiceError};
use crate::privilege::PrivilegeChecker;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEntry {
    pub name: ServiceName,
    #[serde(flatten)]
    pub state: ServiceState,
}

/// Installed services (directories holding a `run` file), sorted by name.
///
/// A missing service root yields an empty list. Directory names that are not
/// valid service names are skipped.
pub fn list_services(
    config: &Config,
    privileges: &dyn PrivilegeChecker,
    supervisor: &dyn ProcessSupervisor,
) -> Result<Vec<ServiceEntry>, ServiceError> {
    if !privileges.has_privileges() {
        return Err(ServiceError::PermissionDenied);
    }

    let root = &config.service_root;
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(fs_err(root, err)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| fs_err(root, e))?;
        let path = entry.path();
        if !path.join(RUN_SCRIPT).is_file() {
            continue;
        }
        let Some(raw) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        match ServiceName::new(raw) {
            Ok(name) => names.push(name),
            Err(err) => tracing::debug!(path = %path.display(), error = %err, "skipping directory"),
        }
    }
    names.sort();

    Ok(names
        .into_iter()
        .map(|name| {
            let state = supervisor.state(&name);
            ServiceEntry { name, state }
        })
        .collect())
}
