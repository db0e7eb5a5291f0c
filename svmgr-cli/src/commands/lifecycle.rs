//! `svmgr install|remove|start|stop|status`: thin wrappers over
//! [`ServiceManager`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use svmgr_core::Config;
use svmgr_service::{
    ActionError, ExecutablePathResolver, FixedPath, PathLookup, RootPrivileges, ServiceError,
    ServiceManager,
};
use svmgr_supervisor::SvCommand;

use crate::ServiceArgs;

#[derive(Args, Debug)]
pub struct InstallArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Executable to supervise (defaults to a PATH lookup of the name).
    #[arg(long)]
    pub exec: Option<PathBuf>,
}

impl InstallArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let supervisor = SvCommand::from_config(config);
        let resolver: Box<dyn ExecutablePathResolver> = match self.exec {
            Some(path) => Box::new(FixedPath(absolute(path)?)),
            None => Box::new(PathLookup::new()),
        };
        let manager = ServiceManager::new(
            self.service.service()?,
            config,
            &RootPrivileges,
            resolver.as_ref(),
            &supervisor,
        );
        report(manager.install())
    }
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusJson {
    name: String,
    installed: bool,
    running: bool,
    pid: Option<u32>,
}

impl StatusArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let supervisor = SvCommand::from_config(config);
        let resolver = PathLookup::new();
        let manager = ServiceManager::new(
            self.service.service()?,
            config,
            &RootPrivileges,
            &resolver,
            &supervisor,
        );

        if !self.json {
            return match manager.status() {
                Ok(text) => {
                    println!("{text}");
                    Ok(())
                }
                Err(err) => fail(err),
            };
        }

        let name = self.service.name.to_string();
        let payload = match manager.state() {
            Ok(state) => StatusJson {
                name,
                installed: true,
                running: state.is_running(),
                pid: state.pid(),
            },
            Err(ServiceError::NotInstalled { .. }) => StatusJson {
                name,
                installed: false,
                running: false,
                pid: None,
            },
            Err(err) => return Err(err).context("failed to query service status"),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("failed to render status JSON")?
        );
        Ok(())
    }
}

pub fn remove(config: &Config, args: &ServiceArgs) -> Result<()> {
    with_manager(config, args, |m| m.remove())
}

pub fn start(config: &Config, args: &ServiceArgs) -> Result<()> {
    with_manager(config, args, |m| m.start())
}

pub fn stop(config: &Config, args: &ServiceArgs) -> Result<()> {
    with_manager(config, args, |m| m.stop())
}

fn with_manager<F>(config: &Config, args: &ServiceArgs, op: F) -> Result<()>
where
    F: FnOnce(&ServiceManager<'_>) -> Result<String, ActionError>,
{
    let supervisor = SvCommand::from_config(config);
    let resolver = PathLookup::new();
    let manager = ServiceManager::new(
        args.service()?,
        config,
        &RootPrivileges,
        &resolver,
        &supervisor,
    );
    report(op(&manager))
}

fn report(outcome: Result<String, ActionError>) -> Result<()> {
    match outcome {
        Ok(message) => {
            println!("{}", message.green());
            Ok(())
        }
        Err(err) => fail(err),
    }
}

fn fail(err: ActionError) -> Result<()> {
    if !err.message.is_empty() {
        eprintln!("{}", err.message.red());
    }
    Err(anyhow::Error::new(err.source))
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("could not determine current directory")?;
    Ok(cwd.join(path))
}
