//! svmgr core library: domain types, configuration, errors.
//!
//! - [`types`]: service name newtype, [`Service`], [`ServiceState`]
//! - [`config`]: YAML configuration with environment overrides
//! - [`error`]: [`CoreError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::CoreError;
pub use types::{Service, ServiceName, ServiceState};
