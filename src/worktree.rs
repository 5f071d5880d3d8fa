use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::config;
use crate::git::{self, Worktree};
use crate::prompts::{self, CodingAgent};
use crate::slug;

const WORKTREE_FALLBACK: &str = "worktree";

pub fn run_new(
    description: Option<String>,
    agent: Option<CodingAgent>,
    no_agent: bool,
    unique: bool,
) -> Result<()> {
    let git_root = git::git_root()?;
    let repo_root = git::repo_root()?;
    let cfg = config::load(&git_root)?;

    let description = match description {
        Some(description) => description,
        None => prompts::prompt_description()?,
    };

    let mut name = slug::timestamped_name(&description, WORKTREE_FALLBACK);
    if unique {
        name = slug::with_unique_suffix(&name);
    }

    let worktree_path = repo_root.join(&cfg.worktrees_dir).join(&name);

    if !worktree_path.exists() {
        let parent = worktree_path
            .parent()
            .ok_or_else(|| anyhow!("worktree path has no parent"))?;
        crate::shipit_io::ensure_dir(parent).context("failed to create worktrees dir")?;

        git::worktree_add(&git_root, &worktree_path, &name)?;
        println!("Created worktree: {}", worktree_path.display());
    } else {
        println!("Using existing worktree: {}", worktree_path.display());
    }

    if no_agent {
        println!("{}", worktree_path.display());
        return Ok(());
    }

    if std::env::var("TMUX").unwrap_or_default().is_empty() {
        return Err(anyhow!("must be running inside tmux (or use --no-agent)"));
    }

    let agent = match agent {
        Some(agent) => agent,
        None => {
            let default = CodingAgent::from_name(&cfg.agent).unwrap_or(CodingAgent::Claude);
            prompts::prompt_coding_agent(default)?
        }
    };

    launch_in_tmux(&name, &worktree_path, agent, &description)
}

fn launch_in_tmux(
    window: &str,
    worktree_path: &Path,
    agent: CodingAgent,
    description: &str,
) -> Result<()> {
    let status = Command::new("tmux")
        .args(["new-window", "-n", window, "-c"])
        .arg(worktree_path)
        .status()
        .context("failed to create tmux window")?;
    if !status.success() {
        return Err(anyhow!("failed to create tmux window"));
    }

    thread::sleep(Duration::from_millis(300));

    let prompt =
        format!("{description}. Ask clarifying questions first if needed.");
    let cmd = match agent {
        CodingAgent::Claude => format!("claude --dangerously-skip-permissions '{prompt}'"),
        CodingAgent::Codex => format!("codex --yolo '{prompt}'"),
        CodingAgent::Opencode => format!("opencode --prompt '{prompt}'"),
    };

    let status = Command::new("tmux")
        .args(["send-keys", "-t", window])
        .arg(&cmd)
        .arg("Enter")
        .status()
        .with_context(|| format!("failed to launch {}", agent.as_str()))?;
    if !status.success() {
        return Err(anyhow!("failed to launch {}", agent.as_str()));
    }

    println!("Launched {} in tmux window '{window}'", agent.as_str());
    Ok(())
}

pub fn run_list() -> Result<()> {
    let git_root = git::git_root()?;
    let repo_root = git::repo_root()?;
    let cfg = config::load(&git_root)?;
    let worktrees_dir = repo_root.join(&cfg.worktrees_dir);

    let worktrees = git::worktree_list(&git_root)?;
    let managed: Vec<&Worktree> = worktrees
        .iter()
        .filter(|worktree| worktree.path.starts_with(&worktrees_dir))
        .collect();

    if managed.is_empty() {
        println!("No worktrees under {}", worktrees_dir.display());
        return Ok(());
    }

    for worktree in managed {
        let branch = worktree.branch.as_deref().unwrap_or("(detached)");
        println!("{branch}  {}", worktree.path.display());
    }
    Ok(())
}

pub fn run_rm(name: &str, force: bool) -> Result<()> {
    let git_root = git::git_root()?;
    let repo_root = git::repo_root()?;
    let cfg = config::load(&git_root)?;
    let worktrees_dir = repo_root.join(&cfg.worktrees_dir);

    let worktrees = git::worktree_list(&git_root)?;
    let managed: Vec<&Worktree> = worktrees
        .iter()
        .filter(|worktree| worktree.path.starts_with(&worktrees_dir))
        .collect();

    let target = find_worktree(&managed, name)
        .ok_or_else(|| anyhow!("worktree not found under {}: {name}", worktrees_dir.display()))?
        .clone();

    git::worktree_remove(&git_root, &target.path, force)
        .context("failed to remove worktree (pass --force to discard local changes)")?;
    println!("Removed worktree: {}", target.path.display());

    if let Some(branch) = &target.branch {
        git::delete_branch(&git_root, branch)?;
        println!("Deleted branch {branch}");
    }
    Ok(())
}

fn find_worktree<'a>(worktrees: &[&'a Worktree], name: &str) -> Option<&'a Worktree> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }

    worktrees
        .iter()
        .find(|worktree| {
            worktree.branch.as_deref() == Some(trimmed)
                || worktree.path.file_name().and_then(|n| n.to_str()) == Some(trimmed)
        })
        .copied()
}
