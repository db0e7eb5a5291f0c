//! The service lifecycle state machine.
//!
//! | operation | gates                                   | effect                         |
//! |-----------|-----------------------------------------|--------------------------------|
//! | install   | privileged, not installed               | mkdir, write `run`, chmod 0755 |
//! | remove    | privileged, installed                   | `sv stop`, rm -r control dir   |
//! | start     | privileged, installed, not running      | `sv start`                     |
//! | stop      | privileged, installed, running          | `sv stop`                      |
//! | status    | privileged, installed                   | `sv status`                    |
//!
//! Nothing is rolled back: a failure after the control directory was created
//! leaves it in place for the operator to inspect.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use svmgr_core::{Config, Service, ServiceState};
use svmgr_renderer::{RunScriptContext, RunScriptRenderer};
use svmgr_supervisor::{paths, ProcessSupervisor};

use crate::error::{fs_err, ActionError, ServiceError};
use crate::messages::{Action, Messages};
use crate::privilege::PrivilegeChecker;
use crate::resolver::ExecutablePathResolver;

const SERVICE_DIR_MODE: u32 = 0o755;
const RUN_SCRIPT_MODE: u32 = 0o755;

/// Drives install/remove/start/stop/status for one [`Service`].
///
/// Built per invocation; holds no state beyond its collaborators.
pub struct ServiceManager<'a> {
    service: Service,
    config: &'a Config,
    privileges: &'a dyn PrivilegeChecker,
    resolver: &'a dyn ExecutablePathResolver,
    supervisor: &'a dyn ProcessSupervisor,
    messages: Messages,
}

impl<'a> ServiceManager<'a> {
    pub fn new(
        service: Service,
        config: &'a Config,
        privileges: &'a dyn PrivilegeChecker,
        resolver: &'a dyn ExecutablePathResolver,
        supervisor: &'a dyn ProcessSupervisor,
    ) -> Self {
        Self {
            service,
            config,
            privileges,
            resolver,
            supervisor,
            messages: Messages::default(),
        }
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn service_path(&self) -> PathBuf {
        paths::service_path(&self.config.service_root, &self.service.name)
    }

    pub fn run_script_path(&self) -> PathBuf {
        paths::run_script_path(&self.config.service_root, &self.service.name)
    }

    pub fn log_path(&self) -> PathBuf {
        paths::log_path(&self.config.log_dir, &self.service.name)
    }

    // -----------------------------------------------------------------------
    // State queries
    // -----------------------------------------------------------------------

    /// Whether the run script exists.
    ///
    /// Errors other than "not found" are reported as
    /// [`ServiceError::IndeterminateState`] rather than read as absent.
    pub fn is_installed(&self) -> Result<bool, ServiceError> {
        let run = self.run_script_path();
        match fs::metadata(&run) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ServiceError::IndeterminateState { path: run, source }),
        }
    }

    /// Whether the supervisor reports the service in its `run` state.
    pub fn is_running(&self) -> bool {
        self.running_state().is_running()
    }

    fn running_state(&self) -> ServiceState {
        self.supervisor.state(&self.service.name)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    pub fn install(&self) -> Result<String, ActionError> {
        self.finish(Action::Install, self.try_install())
    }

    pub fn remove(&self) -> Result<String, ActionError> {
        self.finish(Action::Remove, self.try_remove())
    }

    pub fn start(&self) -> Result<String, ActionError> {
        self.finish(Action::Start, self.try_start())
    }

    pub fn stop(&self) -> Result<String, ActionError> {
        self.finish(Action::Stop, self.try_stop())
    }

    /// Human-readable status line.
    ///
    /// Without privileges the error message is empty; when not installed it
    /// is the "could not be determined" text.
    pub fn status(&self) -> Result<String, ActionError> {
        match self.state() {
            Ok(state) => Ok(self.messages.status_text(state)),
            Err(err @ ServiceError::PermissionDenied) => Err(ActionError::new("", err)),
            Err(err) => Err(ActionError::new(self.messages.status_unknown.clone(), err)),
        }
    }

    /// Structured counterpart of [`status`](Self::status).
    pub fn state(&self) -> Result<ServiceState, ServiceError> {
        self.require_privileges()?;
        self.require_installed()?;
        Ok(self.running_state())
    }

    fn try_install(&self) -> Result<(), ServiceError> {
        self.require_privileges()?;
        if self.is_installed()? {
            return Err(ServiceError::AlreadyInstalled {
                description: self.service.description.clone(),
            });
        }

        let dir = self.service_path();
        create_service_dir(&dir)?;

        // Render before touching `run` so a failure never leaves an empty script.
        let executable = self.resolver.resolve(&self.service.name)?;
        let ctx = RunScriptContext::new(&self.service, &executable, &self.log_path());
        let script = RunScriptRenderer::new(self.config.template_dir.as_deref())?.render(&ctx)?;

        let run = self.run_script_path();
        fs::write(&run, script).map_err(|e| fs_err(&run, e))?;
        set_mode(&run, RUN_SCRIPT_MODE)?;

        tracing::info!(
            service = %self.service.name,
            run_script = %run.display(),
            executable = %executable.display(),
            "run script installed"
        );
        Ok(())
    }

    fn try_remove(&self) -> Result<(), ServiceError> {
        self.require_privileges()?;
        self.require_installed()?;

        // Issued even if the service is already down; a failure aborts removal.
        self.supervisor
            .stop(&self.service.name)
            .map_err(ServiceError::Stop)?;

        let dir = self.service_path();
        fs::remove_dir_all(&dir).map_err(|e| fs_err(&dir, e))?;
        tracing::info!(service = %self.service.name, dir = %dir.display(), "control directory removed");
        Ok(())
    }

    fn try_start(&self) -> Result<(), ServiceError> {
        self.require_privileges()?;
        self.require_installed()?;
        if self.is_running() {
            return Err(ServiceError::AlreadyRunning);
        }
        self.supervisor
            .start(&self.service.name)
            .map_err(ServiceError::Start)
    }

    fn try_stop(&self) -> Result<(), ServiceError> {
        self.require_privileges()?;
        self.require_installed()?;
        if !self.is_running() {
            return Err(ServiceError::AlreadyStopped);
        }
        self.supervisor
            .stop(&self.service.name)
            .map_err(ServiceError::Stop)
    }

    // -----------------------------------------------------------------------
    // Gates
    // -----------------------------------------------------------------------

    fn require_privileges(&self) -> Result<(), ServiceError> {
        if self.privileges.has_privileges() {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied)
        }
    }

    fn require_installed(&self) -> Result<(), ServiceError> {
        if self.is_installed()? {
            Ok(())
        } else {
            Err(ServiceError::NotInstalled {
                description: self.service.description.clone(),
            })
        }
    }

    fn finish(&self, action: Action, outcome: Result<(), ServiceError>) -> Result<String, ActionError> {
        let description = &self.service.description;
        match outcome {
            Ok(()) => {
                tracing::info!(service = %self.service.name, action = action.verb(), "succeeded");
                Ok(self.messages.succeeded(action, description))
            }
            Err(err) => {
                tracing::warn!(service = %self.service.name, action = action.verb(), error = %err, "failed");
                Err(ActionError::new(self.messages.failed(action, description), err))
            }
        }
    }
}

#[cfg(unix)]
fn create_service_dir(dir: &Path) -> Result<(), ServiceError> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(SERVICE_DIR_MODE)
        .create(dir)
        .map_err(|e| fs_err(dir, e))
}

#[cfg(not(unix))]
fn create_service_dir(dir: &Path) -> Result<(), ServiceError> {
    fs::create_dir_all(dir).map_err(|e| fs_err(dir, e))
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), ServiceError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| fs_err(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), ServiceError> {
    Ok(())
}
