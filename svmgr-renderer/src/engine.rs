//! Tera rendering engine for run scripts.
//!
//! The embedded template produces:
//!
//! ```text
//! #!/bin/bash
//! #<description>
//!
//! exec <path> >><log_path> 2>&1
//! ```
//!
//! A `run.tera` file in a user template directory replaces the embedded one.

use std::path::Path;

use tera::Tera;

use crate::context::RunScriptContext;
use crate::error::RenderError;

/// Name under which the run-script template is registered.
pub const RUN_TEMPLATE_NAME: &str = "run.tera";

const RUN_TEMPLATE: &str = include_str!("templates/run.tera");

fn read_err(path: &Path, source: std::io::Error) -> RenderError {
    RenderError::TemplateRead {
        path: path.to_path_buf(),
        source,
    }
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut source = RUN_TEMPLATE.to_string();
    if let Some(dir) = user_template_dir {
        let candidate = dir.join(RUN_TEMPLATE_NAME);
        if candidate.is_file() {
            source = std::fs::read_to_string(&candidate).map_err(|e| read_err(&candidate, e))?;
        }
    }

    let mut tera = Tera::default();
    // Shell scripts are never HTML-escaped.
    tera.autoescape_on(vec![]);
    tera.add_raw_template(RUN_TEMPLATE_NAME, &source)?;
    Ok(tera)
}

/// Renderer holding a parsed run-script template.
///
/// Build once with [`RunScriptRenderer::new`] and reuse across services.
pub struct RunScriptRenderer {
    tera: Tera,
}

impl RunScriptRenderer {
    /// Parse the embedded template, or the `run.tera` override found in
    /// `user_template_dir`.
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(Self {
            tera: build_tera(user_template_dir)?,
        })
    }

    pub fn render(&self, ctx: &RunScriptContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(RUN_TEMPLATE_NAME, &tera_ctx)?)
    }
}

/// Render a run script with the embedded template. Pure: no filesystem access.
pub fn render_run_script(ctx: &RunScriptContext) -> Result<String, RenderError> {
    RunScriptRenderer::new(None)?.render(ctx)
}
