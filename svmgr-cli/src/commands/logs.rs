//! `svmgr logs`: tail of the output log the run script appends to.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use svmgr_core::{Config, ServiceName};
use svmgr_supervisor::paths::log_path;

#[derive(Args, Debug)]
pub struct LogsArgs {
    pub name: ServiceName,

    /// Number of trailing lines to show.
    #[arg(long, default_value_t = 100)]
    pub lines: usize,
}

impl LogsArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let path = log_path(&config.log_dir, &self.name);
        print_tail(&path, self.lines).with_context(|| format!("failed to read log for {}", self.name))
    }
}

fn print_tail(path: &Path, lines: usize) -> Result<()> {
    if !path.exists() {
        println!("log file not found: {}", path.display());
        return Ok(());
    }

    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = BufReader::new(file);

    // The supervised program writes arbitrary bytes; show them lossily.
    let mut tail = VecDeque::<String>::with_capacity(lines);
    for line in reader.split(b'\n') {
        let mut line = line.with_context(|| format!("read {}", path.display()))?;
        if lines == 0 {
            continue;
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if tail.len() == lines {
            tail.pop_front();
        }
        tail.push_back(String::from_utf8_lossy(&line).into_owned());
    }

    println!("==> {} <==", path.display());
    for line in tail {
        println!("{line}");
    }
    Ok(())
}
