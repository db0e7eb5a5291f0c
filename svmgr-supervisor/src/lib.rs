//! runit supervisor adapter: `sv` subprocess calls, status parsing, and the
//! control-directory layout.

mod error;
pub mod paths;
pub mod status;
pub mod sv;

pub use error::SupervisorError;
pub use status::parse_status;
pub use sv::{ProcessSupervisor, SvCommand};
