use std::path::{Path, PathBuf};

use svmgr_core::ServiceName;

/// File name of the script the supervisor executes.
pub const RUN_SCRIPT: &str = "run";
pub const LOG_EXTENSION: &str = "log";

/// Control directory for `name`: `<service_root>/<name>`.
pub fn service_path(service_root: &Path, name: &ServiceName) -> PathBuf {
    service_root.join(name.as_str())
}

pub fn run_script_path(service_root: &Path, name: &ServiceName) -> PathBuf {
    service_path(service_root, name).join(RUN_SCRIPT)
}

/// Append-mode output log written by the run script.
pub fn log_path(log_dir: &Path, name: &ServiceName) -> PathBuf {
    log_dir.join(format!("{name}.{LOG_EXTENSION}"))
}
