use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

/// Append-only step log under `~/.shipit/logs`, one file per day. Console
/// output stays on stdout; this records what ran for later inspection.
pub struct StepLog {
    path: PathBuf,
}

impl StepLog {
    pub fn open() -> Result<Self> {
        let dir = log_dir()?;
        let filename = format!("ship-{}.log", Local::now().format("%Y-%m-%d"));
        Ok(Self {
            path: dir.join(filename),
        })
    }

    pub fn step(&self, branch: &str, step: &str, detail: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open log file: {}", self.path.display()))?;
        let timestamp = Local::now().format("%H:%M:%S");
        if detail.is_empty() {
            writeln!(file, "{timestamp} {branch} {step}")?;
        } else {
            writeln!(file, "{timestamp} {branch} {step}: {detail}")?;
        }
        Ok(())
    }
}

fn log_dir() -> Result<PathBuf> {
    let dir = crate::shipit_io::user_shipit_dir()?.join("logs");
    crate::shipit_io::ensure_dir(&dir)
        .with_context(|| format!("failed to create log dir: {}", dir.display()))?;
    Ok(dir)
}
