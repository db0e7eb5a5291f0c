//! svmgr: install and control a runit-supervised service.
//!
//! # Usage
//!
//! ```text
//! svmgr install <name> [--description <text>] [--exec <path>]
//! svmgr remove|start|stop <name> [--description <text>]
//! svmgr status <name> [--description <text>] [--json]
//! svmgr list [--json]
//! svmgr render <name> [--description <text>] --exec <path>
//! svmgr logs <name> [--lines N]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use commands::{
    lifecycle::{InstallArgs, StatusArgs},
    list::ListArgs,
    logs::LogsArgs,
    render::RenderArgs,
};
use svmgr_core::{Config, Service, ServiceName};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "svmgr",
    version,
    about = "Install and control a service supervised by runit",
    long_about = None,
)]
struct Cli {
    /// Config file (defaults to $SVMGR_CONFIG, then /etc/svmgr/config.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the run script into the service's control directory.
    Install(InstallArgs),

    /// Stop the service and delete its control directory.
    Remove(ServiceArgs),

    /// Ask the supervisor to start the service.
    Start(ServiceArgs),

    /// Ask the supervisor to stop the service.
    Stop(ServiceArgs),

    /// Report whether the service is running.
    Status(StatusArgs),

    /// List every installed service with its state.
    List(ListArgs),

    /// Print the run script that install would write.
    Render(RenderArgs),

    /// Print the tail of the service's output log.
    Logs(LogsArgs),
}

// ---------------------------------------------------------------------------
// Shared service arguments
// ---------------------------------------------------------------------------

/// Identifies the service an operation acts on.
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Service name; also the control-directory and log-file name.
    pub name: ServiceName,

    /// Label used in messages and the run-script header (defaults to the name).
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

impl ServiceArgs {
    pub fn service(&self) -> Result<Service> {
        match &self.description {
            Some(description) => Service::new(self.name.clone(), description.clone())
                .context("invalid --description"),
            None => Ok(Service::named(self.name.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(
        service_root = %config.service_root.display(),
        log_dir = %config.log_dir.display(),
        sv = %config.sv_binary,
        "configuration loaded"
    );
    match cli.command {
        Commands::Install(args) => args.run(&config),
        Commands::Remove(args) => commands::lifecycle::remove(&config, &args),
        Commands::Start(args) => commands::lifecycle::start(&config, &args),
        Commands::Stop(args) => commands::lifecycle::stop(&config, &args),
        Commands::Status(args) => args.run(&config),
        Commands::List(args) => args.run(&config),
        Commands::Render(args) => args.run(&config),
        Commands::Logs(args) => args.run(&config),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
