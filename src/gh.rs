use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::logging::StepLog;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrInfo {
    pub number: u64,
    pub state: String,
    pub url: String,
    pub merged_at: Option<String>,
}

impl PrInfo {
    pub fn is_open(&self) -> bool {
        self.state == "OPEN"
    }

    pub fn is_merged(&self) -> bool {
        self.state == "MERGED"
    }
}

/// Execute a gh command and return stdout.
fn gh(cwd: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("gh")
        .args(args)
        .current_dir(cwd)
        .output()
        .context("failed to execute gh (is the GitHub CLI installed?)")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("gh {} failed: {}", args.join(" "), stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub fn ensure_authenticated(cwd: &Path) -> Result<()> {
    gh(cwd, &["auth", "status"])
        .map(|_| ())
        .context("gh is not authenticated (run `gh auth login`)")
}

/// Create a PR for the current branch and return its URL.
pub fn create_pr(cwd: &Path, title: &str, body: &str, base: &str, draft: bool) -> Result<String> {
    let mut args = vec![
        "pr", "create", "--title", title, "--body", body, "--base", base,
    ];
    if draft {
        args.push("--draft");
    }
    let output = gh(cwd, &args)?;

    // gh prints the PR URL as the last line of stdout
    output
        .lines()
        .last()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .ok_or_else(|| anyhow!("gh pr create returned no URL"))
}

pub fn view_pr(cwd: &Path, branch: Option<&str>) -> Result<PrInfo> {
    let mut args = vec!["pr", "view"];
    if let Some(branch) = branch {
        args.push(branch);
    }
    args.extend(["--json", "number,state,url,mergedAt"]);
    let output = gh(cwd, &args)?;
    parse_pr_info(&output)
}

fn parse_pr_info(json: &str) -> Result<PrInfo> {
    serde_json::from_str(json).context("failed to parse gh pr view output")
}

/// Poll until the PR for `branch` leaves the OPEN state. Returns the merged
/// PR, or fails if it was closed without merging.
pub fn wait_for_merge(
    cwd: &Path,
    branch: &str,
    interval: Duration,
    log: &StepLog,
) -> Result<PrInfo> {
    let pr = view_pr(cwd, Some(branch))?;
    if !pr.is_open() {
        return finish(pr);
    }

    println!(
        "Waiting for PR #{} to merge (polling every {}s)...",
        pr.number,
        interval.as_secs().max(1)
    );

    loop {
        thread::sleep(interval.max(Duration::from_secs(1)));
        let pr = view_pr(cwd, Some(branch))?;
        log.step(branch, "poll", &pr.state)?;
        if !pr.is_open() {
            return finish(pr);
        }
    }
}

fn finish(pr: PrInfo) -> Result<PrInfo> {
    if pr.is_merged() {
        Ok(pr)
    } else {
        Err(anyhow!(
            "PR #{} was {} without merging: {}",
            pr.number,
            pr.state.to_lowercase(),
            pr.url
        ))
    }
}
