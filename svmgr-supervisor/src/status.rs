//! Parsing of `sv status` output.
//!
//! `sv status` prints one line per service, optionally followed by the state
//! of its log service after a `;`:
//!
//! ```text
//! run: foo: (pid 1234) 10s; run: log: (pid 1230) 10s
//! down: foo: 3s, normally up; run: log: (pid 1230) 10s
//! ```
//!
//! Only the segment before the first `;` describes the service itself.

use once_cell::sync::Lazy;
use regex::Regex;

use svmgr_core::ServiceState;

/// State marker for a running service.
pub const RUN_MARKER: &str = "run: ";

static PID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"pid (\d+)").expect("pid pattern is valid"));

/// Classify raw `sv status` output.
pub fn parse_status(output: &str) -> ServiceState {
    let main = output
        .trim_start()
        .split(';')
        .next()
        .unwrap_or_default();

    if !main.starts_with(RUN_MARKER) {
        return ServiceState::Stopped;
    }

    let pid = PID_RE
        .captures(main)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    ServiceState::Running { pid }
}
