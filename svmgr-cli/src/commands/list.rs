//! `svmgr list`: every installed service with its supervisor state.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use svmgr_core::Config;
use svmgr_service::{list_services, RootPrivileges, ServiceEntry};
use svmgr_supervisor::SvCommand;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "service")]
    name: String,
    #[tabled(rename = "state")]
    state: String,
    #[tabled(rename = "pid")]
    pid: String,
}

impl ListArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let supervisor = SvCommand::from_config(config);
        let entries = list_services(config, &RootPrivileges, &supervisor)
            .with_context(|| format!("failed to list services in {}", config.service_root.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&entries).context("failed to render list JSON")?
            );
            return Ok(());
        }

        if entries.is_empty() {
            println!("no services installed in {}", config.service_root.display());
            return Ok(());
        }

        let running = entries.iter().filter(|e| e.state.is_running()).count();
        print_table(&entries);
        println!("{}", format!("{running}/{} running", entries.len()).bold());
        Ok(())
    }
}

fn print_table(entries: &[ServiceEntry]) {
    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| Row {
            name: entry.name.to_string(),
            state: if entry.state.is_running() {
                "running".to_string()
            } else {
                "stopped".to_string()
            },
            pid: entry
                .state
                .pid()
                .map(|pid| pid.to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
