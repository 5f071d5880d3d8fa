use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::config;
use crate::gh;
use crate::git;
use crate::logging::StepLog;
use crate::prompts;
use crate::slug;

pub fn run_ship(
    message: Option<String>,
    base: Option<String>,
    draft: bool,
    watch: bool,
    yes: bool,
    unique: bool,
) -> Result<()> {
    let git_root = git::git_root()?;
    let cfg = config::load(&git_root)?;
    let log = StepLog::open()?;

    if !git::is_dirty(&git_root)? {
        return Err(anyhow!("nothing to ship: working tree is clean"));
    }

    let message = match message {
        Some(message) => message,
        None => prompts::prompt_commit_message()?,
    };

    let base = match base.or_else(|| cfg.base_branch.clone()) {
        Some(base) => base,
        None => git::base_branch(&git_root)?,
    };

    let mut branch = slug::generate_branch_name(&message);
    if unique {
        branch = slug::with_unique_suffix(&branch);
    }

    if !yes {
        let prompt = format!("Create branch '{branch}' and open a PR against '{base}'?");
        if !prompts::confirm(&prompt)? {
            println!("Aborted");
            return Ok(());
        }
    }

    gh::ensure_authenticated(&git_root)?;

    git::create_branch(&git_root, &branch)?;
    log.step(&branch, "branch", "created")?;
    println!("Created branch {branch}");

    git::commit_all(&git_root, &message)?;
    log.step(&branch, "commit", &message)?;

    git::push_upstream(&git_root, &branch)?;
    log.step(&branch, "push", "origin")?;
    println!("Pushed {branch} to origin");

    let url = gh::create_pr(&git_root, &message, "", &base, draft || cfg.draft)?;
    log.step(&branch, "pr", &url)?;
    println!("Opened PR: {url}");

    if watch {
        let interval = Duration::from_secs(cfg.poll_interval_secs);
        let pr = gh::wait_for_merge(&git_root, &branch, interval, &log)?;
        log.step(&branch, "merged", &pr.url)?;
        println!("PR #{} merged", pr.number);
        cleanup_after_merge(&git_root, &base, &branch)?;
    }

    Ok(())
}

fn cleanup_after_merge(git_root: &Path, base: &str, branch: &str) -> Result<()> {
    git::checkout(git_root, base)?;
    git::pull(git_root)?;
    git::delete_branch(git_root, branch)?;
    println!("Back on {base}, deleted {branch}");
    Ok(())
}

pub fn run_watch(branch: Option<String>, interval: Option<u64>) -> Result<()> {
    let git_root = git::git_root()?;
    let cfg = config::load(&git_root)?;
    let log = StepLog::open()?;

    let branch = match branch {
        Some(branch) => branch,
        None => git::current_branch(&git_root)?,
    };
    let interval = Duration::from_secs(interval.unwrap_or(cfg.poll_interval_secs));

    let pr = gh::wait_for_merge(&git_root, &branch, interval, &log)?;
    log.step(&branch, "merged", pr.merged_at.as_deref().unwrap_or(&pr.url))?;
    println!("PR #{} merged: {}", pr.number, pr.url);
    Ok(())
}
