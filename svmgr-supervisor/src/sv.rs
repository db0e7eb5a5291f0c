use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use svmgr_core::{Config, ServiceName, ServiceState};

use crate::error::SupervisorError;
use crate::status::parse_status;

/// The supervisor operations the lifecycle depends on.
pub trait ProcessSupervisor {
    /// Raw output of the status query for `name`.
    fn status(&self, name: &ServiceName) -> Result<String, SupervisorError>;

    fn start(&self, name: &ServiceName) -> Result<(), SupervisorError>;

    fn stop(&self, name: &ServiceName) -> Result<(), SupervisorError>;

    /// Running check. A failed status query reads as [`ServiceState::Stopped`].
    fn state(&self, name: &ServiceName) -> ServiceState {
        match self.status(name) {
            Ok(output) => parse_status(&output),
            Err(err) => {
                tracing::debug!(service = %name, error = %err, "status query failed; treating as stopped");
                ServiceState::Stopped
            }
        }
    }
}

/// Environment variable `sv` resolves bare service names against.
pub const SVDIR_ENV: &str = "SVDIR";

/// [`ProcessSupervisor`] backed by the runit `sv` command.
///
/// Every invocation exports `SVDIR=<service_root>` so `sv` controls the same
/// control directory the run script was installed into.
#[derive(Debug, Clone)]
pub struct SvCommand {
    program: String,
    service_root: PathBuf,
}

impl SvCommand {
    pub fn new(program: impl Into<String>, service_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            service_root: service_root.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sv_binary.clone(), config.service_root.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn service_root(&self) -> &Path {
        &self.service_root
    }

    fn run(&self, subcommand: &str, name: &ServiceName) -> Result<Output, SupervisorError> {
        tracing::debug!(
            program = %self.program,
            svdir = %self.service_root.display(),
            subcommand,
            service = %name,
            "invoking supervisor"
        );
        let output = Command::new(&self.program)
            .env(SVDIR_ENV, &self.service_root)
            .arg(subcommand)
            .arg(name.as_str())
            .output()
            .map_err(|source| SupervisorError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Err(SupervisorError::Command {
            command: format!("{} {} {}", self.program, subcommand, name),
            status: output.status.to_string(),
            output: format!("{stdout} {stderr}").trim().to_string(),
        })
    }
}

impl Default for SvCommand {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ProcessSupervisor for SvCommand {
    fn status(&self, name: &ServiceName) -> Result<String, SupervisorError> {
        let output = self.run("status", name)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn start(&self, name: &ServiceName) -> Result<(), SupervisorError> {
        self.run("start", name).map(|_| ())
    }

    fn stop(&self, name: &ServiceName) -> Result<(), SupervisorError> {
        self.run("stop", name).map(|_| ())
    }
}
