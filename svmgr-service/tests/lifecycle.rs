//! Lifecycle tests against a temp service root and a scripted supervisor.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use assert_fs::prelude::*;
use predicates::prelude::*;
use rstest::rstest;

use svmgr_core::{Config, Service, ServiceName, ServiceState};
use svmgr_renderer::RenderError;
use svmgr_service::{
    ExecutablePathResolver, FixedPath, ServiceError, ServiceManager, StaticPrivileges,
};
use svmgr_supervisor::{ProcessSupervisor, SupervisorError};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Supervisor double: status output per service, `None` meaning the status
/// command itself fails. `start`/`stop` flip the recorded output.
#[derive(Default)]
struct MockSupervisor {
    statuses: RefCell<HashMap<String, String>>,
    fail_start: bool,
    fail_stop: bool,
    calls: RefCell<Vec<String>>,
}

impl MockSupervisor {
    fn set_status(&self, name: &str, output: &str) {
        self.statuses
            .borrow_mut()
            .insert(name.to_string(), output.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn failure(command: String) -> SupervisorError {
        SupervisorError::Command {
            command,
            status: "exit status: 1".to_string(),
            output: "fail: unable to control".to_string(),
        }
    }
}

impl ProcessSupervisor for MockSupervisor {
    fn status(&self, name: &ServiceName) -> Result<String, SupervisorError> {
        self.calls.borrow_mut().push(format!("status {name}"));
        self.statuses
            .borrow()
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| Self::failure(format!("sv status {name}")))
    }

    fn start(&self, name: &ServiceName) -> Result<(), SupervisorError> {
        self.calls.borrow_mut().push(format!("start {name}"));
        if self.fail_start {
            return Err(Self::failure(format!("sv start {name}")));
        }
        self.set_status(name.as_str(), &format!("run: {name}: (pid 4242) 0s"));
        Ok(())
    }

    fn stop(&self, name: &ServiceName) -> Result<(), SupervisorError> {
        self.calls.borrow_mut().push(format!("stop {name}"));
        if self.fail_stop {
            return Err(Self::failure(format!("sv stop {name}")));
        }
        self.set_status(name.as_str(), &format!("down: {name}: 0s, normally up"));
        Ok(())
    }
}

struct FailingResolver;

impl ExecutablePathResolver for FailingResolver {
    fn resolve(&self, name: &ServiceName) -> Result<PathBuf, ServiceError> {
        Err(ServiceError::ExecutableNotFound {
            name: name.to_string(),
        })
    }
}

struct Harness {
    root: assert_fs::TempDir,
    config: Config,
    privileges: StaticPrivileges,
    resolver: FixedPath,
    supervisor: MockSupervisor,
}

impl Harness {
    fn new() -> Self {
        let root = assert_fs::TempDir::new().expect("tempdir");
        let config = Config {
            service_root: root.path().join("service"),
            ..Config::default()
        };
        Self {
            root,
            config,
            privileges: StaticPrivileges(true),
            resolver: FixedPath(PathBuf::from("/usr/bin/foo")),
            supervisor: MockSupervisor::default(),
        }
    }

    fn unprivileged() -> Self {
        Self {
            privileges: StaticPrivileges(false),
            ..Self::new()
        }
    }

    fn manager(&self) -> ServiceManager<'_> {
        ServiceManager::new(
            foo(),
            &self.config,
            &self.privileges,
            &self.resolver,
            &self.supervisor,
        )
    }

    fn run_script(&self) -> PathBuf {
        self.config.service_root.join("foo").join("run")
    }
}

fn foo() -> Service {
    Service::new(ServiceName::new("foo").expect("name"), "Foo daemon").expect("service")
}

const GOLDEN: &str = "#!/bin/bash\n#Foo daemon\n\nexec /usr/bin/foo >>/var/log/foo.log 2>&1\n";

// ---------------------------------------------------------------------------
// 1. Install / remove
// ---------------------------------------------------------------------------

#[test]
fn install_then_remove_toggles_installed_state() {
    let h = Harness::new();
    let manager = h.manager();
    assert!(!manager.is_installed().expect("installed check"));

    let msg = manager.install().expect("install");
    assert_eq!(msg, "Install Foo daemon:\t\t\t\t\t[  OK  ]");
    assert!(manager.is_installed().expect("installed check"));

    let msg = manager.remove().expect("remove");
    assert!(msg.starts_with("Removing Foo daemon:"), "got: {msg}");
    assert!(!manager.is_installed().expect("installed check"));
    assert!(!h.config.service_root.join("foo").exists());
}

#[test]
fn install_writes_golden_run_script() {
    let h = Harness::new();
    h.manager().install().expect("install");

    let script = fs::read_to_string(h.run_script()).expect("read run");
    assert_eq!(script, GOLDEN);
}

#[cfg(unix)]
#[test]
fn install_sets_executable_modes() {
    use std::os::unix::fs::PermissionsExt;

    let h = Harness::new();
    h.manager().install().expect("install");

    let run_mode = fs::metadata(h.run_script()).expect("stat").permissions().mode();
    assert_eq!(run_mode & 0o777, 0o755);
    let dir_mode = fs::metadata(h.config.service_root.join("foo"))
        .expect("stat")
        .permissions()
        .mode();
    assert_eq!(dir_mode & 0o022, 0, "control dir must not be group/other writable");
}

#[test]
fn install_does_not_reload_the_supervisor() {
    let h = Harness::new();
    h.manager().install().expect("install");
    assert!(h.supervisor.calls().is_empty(), "got: {:?}", h.supervisor.calls());
}

#[test]
fn second_install_is_rejected_and_leaves_script_untouched() {
    let h = Harness::new();
    let manager = h.manager();
    manager.install().expect("install");
    fs::write(h.run_script(), "#!/bin/sh\nexec custom\n").expect("edit run");

    let err = manager.install().unwrap_err();
    assert!(
        matches!(err.kind(), ServiceError::AlreadyInstalled { .. }),
        "got: {:?}",
        err.kind()
    );
    assert_eq!(err.message, "Install Foo daemon:\t\t\t\t\t[FAILED]");
    assert_eq!(err.source.to_string(), "Foo daemon already installed");
    assert_eq!(
        fs::read_to_string(h.run_script()).expect("read"),
        "#!/bin/sh\nexec custom\n"
    );
}

#[test]
fn resolver_failure_leaves_directory_but_no_script() {
    let h = Harness::new();
    let manager = ServiceManager::new(
        foo(),
        &h.config,
        &h.privileges,
        &FailingResolver,
        &h.supervisor,
    );

    let err = manager.install().unwrap_err();
    assert!(matches!(err.kind(), ServiceError::ExecutableNotFound { .. }));
    h.root.child("service/foo").assert(predicate::path::is_dir());
    h.root.child("service/foo/run").assert(predicate::path::missing());
}

#[test]
fn executable_path_with_space_is_refused_before_writing_run() {
    let mut h = Harness::new();
    h.resolver = FixedPath(PathBuf::from("/opt/my app/foo"));

    let err = h.manager().install().unwrap_err();
    assert!(err.message.starts_with("Install Foo daemon:"), "got: {}", err.message);
    assert!(
        matches!(err.kind(), ServiceError::Template(RenderError::UnsafeValue { .. })),
        "got: {:?}",
        err.kind()
    );
    h.root.child("service/foo/run").assert(predicate::path::missing());
}

#[test]
fn run_script_logs_to_the_managers_log_path() {
    let mut h = Harness::new();
    h.config.log_dir = PathBuf::from("/srv/logs");
    let manager = h.manager();
    manager.install().expect("install");

    let script = fs::read_to_string(h.run_script()).expect("read run");
    let redirect = format!(">>{} 2>&1\n", manager.log_path().display());
    assert!(script.ends_with(&redirect), "got: {script}");
    assert_eq!(manager.log_path(), PathBuf::from("/srv/logs/foo.log"));
}

#[test]
fn template_override_from_config_is_used() {
    let mut h = Harness::new();
    let templates = h.root.child("templates");
    templates
        .child("run.tera")
        .write_str("#!/bin/sh\nexec {{ path }}\n")
        .expect("write template");
    h.config.template_dir = Some(templates.path().to_path_buf());

    h.manager().install().expect("install");
    assert_eq!(
        fs::read_to_string(h.run_script()).expect("read"),
        "#!/bin/sh\nexec /usr/bin/foo\n"
    );
}

#[test]
fn remove_stops_even_when_already_stopped() {
    let h = Harness::new();
    let manager = h.manager();
    manager.install().expect("install");
    h.supervisor.set_status("foo", "down: foo: 5s, normally up");

    manager.remove().expect("remove");
    assert_eq!(h.supervisor.calls(), vec!["stop foo".to_string()]);
}

#[test]
fn failing_stop_aborts_remove() {
    let mut h = Harness::new();
    h.supervisor.fail_stop = true;
    let manager = h.manager();
    manager.install().expect("install");

    let err = manager.remove().unwrap_err();
    assert!(matches!(err.kind(), ServiceError::Stop(_)), "got: {:?}", err.kind());
    assert!(err.message.starts_with("Removing Foo daemon:"));
    assert!(manager.is_installed().expect("installed check"));
}

#[test]
fn remove_requires_installation() {
    let h = Harness::new();
    let err = h.manager().remove().unwrap_err();
    assert!(matches!(err.kind(), ServiceError::NotInstalled { .. }));
    assert_eq!(err.source.to_string(), "Foo daemon is not installed");
    assert!(h.supervisor.calls().is_empty());
}

// ---------------------------------------------------------------------------
// 2. Start / stop
// ---------------------------------------------------------------------------

#[test]
fn start_requires_installation() {
    let h = Harness::new();
    let err = h.manager().start().unwrap_err();
    assert!(matches!(err.kind(), ServiceError::NotInstalled { .. }));
    assert_eq!(err.message, "Starting Foo daemon:\t\t\t\t\t[FAILED]");
}

#[test]
fn start_on_running_service_is_rejected() {
    let h = Harness::new();
    let manager = h.manager();
    manager.install().expect("install");
    h.supervisor.set_status("foo", "run: foo: (pid 10) 3s");

    let err = manager.start().unwrap_err();
    assert!(matches!(err.kind(), ServiceError::AlreadyRunning));
    assert!(!h.supervisor.calls().contains(&"start foo".to_string()));
}

#[test]
fn start_then_stop_round_trip() {
    let h = Harness::new();
    let manager = h.manager();
    manager.install().expect("install");
    h.supervisor.set_status("foo", "down: foo: 1s, normally up");

    let msg = manager.start().expect("start");
    assert_eq!(msg, "Starting Foo daemon:\t\t\t\t\t[  OK  ]");
    assert!(manager.is_running());

    let msg = manager.stop().expect("stop");
    assert_eq!(msg, "Stopping Foo daemon:\t\t\t\t\t[  OK  ]");
    assert!(!manager.is_running());
}

#[test]
fn start_when_status_command_fails_treats_service_as_stopped() {
    let h = Harness::new();
    let manager = h.manager();
    manager.install().expect("install");

    manager.start().expect("start");
    assert_eq!(
        h.supervisor.calls(),
        vec!["status foo".to_string(), "start foo".to_string()]
    );
}

#[test]
fn failing_start_is_a_start_error() {
    let mut h = Harness::new();
    h.supervisor.fail_start = true;
    let manager = h.manager();
    manager.install().expect("install");

    let err = manager.start().unwrap_err();
    assert!(matches!(err.kind(), ServiceError::Start(_)), "got: {:?}", err.kind());
}

#[rstest]
#[case(Some("down: foo: 9s, normally up"))]
#[case(None)]
fn stop_on_stopped_service_is_rejected(#[case] status: Option<&str>) {
    let h = Harness::new();
    let manager = h.manager();
    manager.install().expect("install");
    if let Some(output) = status {
        h.supervisor.set_status("foo", output);
    }

    let err = manager.stop().unwrap_err();
    assert!(matches!(err.kind(), ServiceError::AlreadyStopped));
    assert!(!h.supervisor.calls().contains(&"stop foo".to_string()));
}

// ---------------------------------------------------------------------------
// 3. Status
// ---------------------------------------------------------------------------

#[rstest]
#[case(Some("run: foo: (pid 1234) 10s"), "Service (pid  1234) is running...")]
#[case(Some("run: foo: 10s"), "Service is running...")]
#[case(Some("down: foo: 10s, normally up"), "Service is stoped")]
#[case(None, "Service is stoped")]
fn status_text_follows_supervisor_output(#[case] output: Option<&str>, #[case] expected: &str) {
    let h = Harness::new();
    let manager = h.manager();
    manager.install().expect("install");
    if let Some(output) = output {
        h.supervisor.set_status("foo", output);
    }

    assert_eq!(manager.status().expect("status"), expected);
}

#[test]
fn status_of_missing_service_cannot_be_determined() {
    let h = Harness::new();
    let err = h.manager().status().unwrap_err();
    assert_eq!(err.message, "Status could not be determined");
    assert!(matches!(err.kind(), ServiceError::NotInstalled { .. }));
}

#[test]
fn state_reports_structured_pid() {
    let h = Harness::new();
    let manager = h.manager();
    manager.install().expect("install");
    h.supervisor.set_status("foo", "run: foo: (pid 77) 1s");

    assert_eq!(
        manager.state().expect("state"),
        ServiceState::Running { pid: Some(77) }
    );
}

// ---------------------------------------------------------------------------
// 4. Privilege gating and indeterminate state
// ---------------------------------------------------------------------------

#[test]
fn every_operation_requires_privileges_without_side_effects() {
    let h = Harness::unprivileged();
    let manager = h.manager();

    let results = [
        manager.install(),
        manager.remove(),
        manager.start(),
        manager.stop(),
        manager.status(),
    ];
    for result in results {
        let err = result.unwrap_err();
        assert!(
            matches!(err.kind(), ServiceError::PermissionDenied),
            "got: {:?}",
            err.kind()
        );
    }

    assert!(manager.status().unwrap_err().message.is_empty());
    assert!(h.supervisor.calls().is_empty());
    h.root.child("service").assert(predicate::path::missing());
}

#[test]
fn unreadable_control_path_is_indeterminate_not_absent() {
    let h = Harness::new();
    // A regular file where the control directory should be makes stat(run)
    // fail with ENOTDIR, which must not read as "not installed".
    h.root.child("service").create_dir_all().expect("mkdir");
    h.root.child("service/foo").write_str("not a directory").expect("write");

    let manager = h.manager();
    assert!(matches!(
        manager.is_installed(),
        Err(ServiceError::IndeterminateState { .. })
    ));

    let err = manager.install().unwrap_err();
    assert!(matches!(err.kind(), ServiceError::IndeterminateState { .. }));
    h.root
        .child("service/foo")
        .assert("not a directory");
}
