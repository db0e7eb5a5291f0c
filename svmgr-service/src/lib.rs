//! # svmgr-service
//!
//! Lifecycle driver for a single runit-supervised service.
//!
//! [`ServiceManager`] gates every operation on privileges and on the
//! installed/running state, then either touches the control directory or
//! issues an `sv` command through a [`ProcessSupervisor`].
//!
//! [`ProcessSupervisor`]: svmgr_supervisor::ProcessSupervisor

pub mod error;
pub mod listing;
pub mod manager;
pub mod messages;
pub mod privilege;
pub mod resolver;

pub use error::{ActionError, ServiceError};
pub use listing::{list_services, ServiceEntry};
pub use manager::ServiceManager;
pub use messages::{Action, Messages};
pub use privilege::{PrivilegeChecker, RootPrivileges, StaticPrivileges};
pub use resolver::{ExecutablePathResolver, FixedPath, PathLookup};
