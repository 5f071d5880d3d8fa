use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};

/// Execute a git command and return trimmed stdout.
fn git(cwd: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .context("failed to execute git")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub fn git_root() -> Result<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .context("failed to run git rev-parse")?;
    if !output.status.success() {
        return Err(anyhow!("not in a git repository"));
    }
    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(PathBuf::from(root))
}

/// Root of the main checkout, worktree-aware: resolves through the common
/// git dir so worktrees of the same repo agree on it.
pub fn repo_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let mut root = git(&cwd, &["rev-parse", "--path-format=absolute", "--git-common-dir"])?;
    if root.ends_with(".git") {
        root = root.trim_end_matches(".git").to_string();
        root = root.trim_end_matches('/').to_string();
    }
    Ok(PathBuf::from(root))
}

pub fn current_branch(cwd: &Path) -> Result<String> {
    git(cwd, &["rev-parse", "--abbrev-ref", "HEAD"])
}

pub fn is_dirty(cwd: &Path) -> Result<bool> {
    let status = git(cwd, &["status", "--porcelain"])?;
    Ok(!status.is_empty())
}

pub fn create_branch(cwd: &Path, name: &str) -> Result<()> {
    git(cwd, &["checkout", "-b", name])?;
    Ok(())
}

pub fn checkout(cwd: &Path, name: &str) -> Result<()> {
    git(cwd, &["checkout", name])?;
    Ok(())
}

pub fn commit_all(cwd: &Path, message: &str) -> Result<()> {
    git(cwd, &["add", "-A"])?;
    git(cwd, &["commit", "-m", message])?;
    Ok(())
}

pub fn push_upstream(cwd: &Path, branch: &str) -> Result<()> {
    git(cwd, &["push", "-u", "origin", branch])?;
    Ok(())
}

pub fn pull(cwd: &Path) -> Result<()> {
    git(cwd, &["pull"])?;
    Ok(())
}

pub fn delete_branch(cwd: &Path, name: &str) -> Result<()> {
    git(cwd, &["branch", "-D", name])?;
    Ok(())
}

/// Base branch for PRs: origin/HEAD when set, otherwise whichever of
/// main/master exists locally.
pub fn base_branch(cwd: &Path) -> Result<String> {
    if let Ok(head) = git(cwd, &["symbolic-ref", "--short", "refs/remotes/origin/HEAD"]) {
        if let Some(name) = head.strip_prefix("origin/") {
            return Ok(name.to_string());
        }
    }

    for candidate in ["main", "master"] {
        let git_ref = format!("refs/heads/{candidate}");
        if git(cwd, &["rev-parse", "--verify", "--quiet", &git_ref]).is_ok() {
            return Ok(candidate.to_string());
        }
    }

    Err(anyhow!(
        "could not determine base branch (set base_branch in .shipit/config.toml)"
    ))
}

#[derive(Debug, Clone)]
pub struct Worktree {
    pub path: PathBuf,
    pub head: String,
    pub branch: Option<String>,
}

pub fn worktree_add(cwd: &Path, path: &Path, branch: &str) -> Result<()> {
    let output = Command::new("git")
        .arg("worktree")
        .arg("add")
        .arg("-b")
        .arg(branch)
        .arg(path)
        .current_dir(cwd)
        .output()
        .context("failed to create worktree")?;

    if !output.status.success() {
        return Err(anyhow!(
            "failed to create worktree: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(())
}

pub fn worktree_remove(cwd: &Path, path: &Path, force: bool) -> Result<()> {
    let path_str = path.to_string_lossy();
    let mut args = vec!["worktree", "remove"];
    if force {
        args.push("--force");
    }
    args.push(&path_str);
    git(cwd, &args)?;
    Ok(())
}

pub fn worktree_list(cwd: &Path) -> Result<Vec<Worktree>> {
    let output = git(cwd, &["worktree", "list", "--porcelain"])?;
    Ok(parse_worktree_list(&output))
}

fn parse_worktree_list(output: &str) -> Vec<Worktree> {
    fn flush(
        worktrees: &mut Vec<Worktree>,
        path: &mut Option<PathBuf>,
        head: &mut String,
        branch: &mut Option<String>,
    ) {
        if let Some(path) = path.take() {
            worktrees.push(Worktree {
                path,
                head: std::mem::take(head),
                branch: branch.take(),
            });
        }
    }

    let mut worktrees = Vec::new();
    let mut path: Option<PathBuf> = None;
    let mut head = String::new();
    let mut branch: Option<String> = None;

    for line in output.lines() {
        let line = line.trim_end();
        if let Some(rest) = line.strip_prefix("worktree ") {
            flush(&mut worktrees, &mut path, &mut head, &mut branch);
            path = Some(PathBuf::from(rest));
        } else if let Some(rest) = line.strip_prefix("HEAD ") {
            head = rest.to_string();
        } else if let Some(rest) = line.strip_prefix("branch ") {
            branch = Some(
                rest.strip_prefix("refs/heads/")
                    .unwrap_or(rest)
                    .to_string(),
            );
        }
        // blank, "detached", and "bare" lines carry nothing we keep
    }
    flush(&mut worktrees, &mut path, &mut head, &mut branch);

    worktrees
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_worktree_list_reads_blocks() {
        let output = "worktree /repo\n\
                      HEAD 1111111111111111111111111111111111111111\n\
                      branch refs/heads/main\n\
                      \n\
                      worktree /repo/worktrees/2026jan12-16-43-fix-bug\n\
                      HEAD 2222222222222222222222222222222222222222\n\
                      branch refs/heads/2026jan12-16-43-fix-bug\n";

        let worktrees = parse_worktree_list(output);
        assert_eq!(worktrees.len(), 2);
        assert_eq!(worktrees[0].path, PathBuf::from("/repo"));
        assert_eq!(worktrees[0].branch.as_deref(), Some("main"));
        assert_eq!(
            worktrees[1].branch.as_deref(),
            Some("2026jan12-16-43-fix-bug")
        );
        assert!(worktrees[1].head.starts_with("22"));
    }

    #[test]
    fn parse_worktree_list_handles_detached() {
        let output = "worktree /repo\n\
                      HEAD 1111111111111111111111111111111111111111\n\
                      detached\n";

        let worktrees = parse_worktree_list(output);
        assert_eq!(worktrees.len(), 1);
        assert_eq!(worktrees[0].branch, None);
    }

    #[test]
    fn parse_worktree_list_handles_empty_output() {
        assert!(parse_worktree_list("").is_empty());
    }
}
