//! # svmgr-renderer
//!
//! Tera-based rendering of supervisor run scripts.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use svmgr_core::{Service, ServiceName};
//! use svmgr_renderer::{render_run_script, RunScriptContext};
//!
//! fn preview(name: ServiceName) {
//!     let log_path = Path::new("/var/log").join(format!("{name}.log"));
//!     let service = Service::named(name);
//!     let ctx = RunScriptContext::new(&service, Path::new("/usr/bin/foo"), &log_path);
//!     if let Ok(script) = render_run_script(&ctx) {
//!         print!("{script}");
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::RunScriptContext;
pub use engine::{render_run_script, RunScriptRenderer, RUN_TEMPLATE_NAME};
pub use error::RenderError;
