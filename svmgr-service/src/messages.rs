//! Fixed strings used to format lifecycle results.
//!
//! Every action message is `<label><token>`, e.g.
//! `"Install Foo daemon:\t\t\t\t\t[  OK  ]"`.

use svmgr_core::ServiceState;

/// The mutating lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Remove,
    Start,
    Stop,
}

impl Action {
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Install => "Install",
            Action::Remove => "Removing",
            Action::Start => "Starting",
            Action::Stop => "Stopping",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub success: String,
    pub failed: String,
    /// `{pid}` is replaced with the supervisor-reported pid.
    pub running_with_pid: String,
    pub running: String,
    pub stopped: String,
    /// Status message when the service is not installed.
    pub status_unknown: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            success: "\t\t\t\t\t[  OK  ]".to_string(),
            failed: "\t\t\t\t\t[FAILED]".to_string(),
            running_with_pid: "Service (pid  {pid}) is running...".to_string(),
            running: "Service is running...".to_string(),
            stopped: "Service is stoped".to_string(),
            status_unknown: "Status could not be determined".to_string(),
        }
    }
}

impl Messages {
    pub fn label(&self, action: Action, description: &str) -> String {
        format!("{} {}:", action.verb(), description)
    }

    pub fn succeeded(&self, action: Action, description: &str) -> String {
        self.label(action, description) + &self.success
    }

    pub fn failed(&self, action: Action, description: &str) -> String {
        self.label(action, description) + &self.failed
    }

    pub fn status_text(&self, state: ServiceState) -> String {
        match state {
            ServiceState::Running { pid: Some(pid) } => {
                self.running_with_pid.replace("{pid}", &pid.to_string())
            }
            ServiceState::Running { pid: None } => self.running.clone(),
            ServiceState::Stopped => self.stopped.clone(),
        }
    }
}
