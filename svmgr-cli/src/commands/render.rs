//! `svmgr render`: preview the run script without touching the filesystem.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use svmgr_core::Config;
use svmgr_renderer::{RunScriptContext, RunScriptRenderer};
use svmgr_supervisor::paths;

use crate::ServiceArgs;

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Executable the run script should exec.
    #[arg(long)]
    pub exec: PathBuf,
}

impl RenderArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let renderer = RunScriptRenderer::new(config.template_dir.as_deref())
            .context("failed to load run script template")?;
        let service = self.service.service()?;
        let log_path = paths::log_path(&config.log_dir, &service.name);
        let ctx = RunScriptContext::new(&service, &self.exec, &log_path);
        let script = renderer.render(&ctx).context("failed to render run script")?;
        print!("{script}");
        Ok(())
    }
}
