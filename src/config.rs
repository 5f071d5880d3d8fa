use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base branch for PRs. Detected from origin/HEAD when unset.
    pub base_branch: Option<String>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_agent")]
    pub agent: String,
    #[serde(default = "default_worktrees_dir")]
    pub worktrees_dir: String,
    #[serde(default)]
    pub draft: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_branch: None,
            poll_interval_secs: default_poll_interval(),
            agent: default_agent(),
            worktrees_dir: default_worktrees_dir(),
            draft: false,
        }
    }
}

fn default_poll_interval() -> u64 {
    30
}

fn default_agent() -> String {
    "claude".to_string()
}

fn default_worktrees_dir() -> String {
    "worktrees".to_string()
}

const CONFIG_TEMPLATE: &str = r#"# shipit configuration
# Repo-level: .shipit/config.toml, user-level: ~/.shipit/config.toml

# Base branch for PRs (detected from origin/HEAD when unset)
# base_branch = "main"

# Seconds between merge polls for `shipit ship --watch` and `shipit pr watch`
poll_interval_secs = 30

# Default coding agent for `shipit worktree new` (claude, codex, opencode)
agent = "claude"

# Directory for parallel-development worktrees, relative to the repo root
worktrees_dir = "worktrees"

# Open PRs as drafts
draft = false
"#;

/// Load config from `.shipit/config.toml` at the repo root, then
/// `~/.shipit/config.toml`, then built-in defaults. A missing file is not
/// an error.
pub fn load(git_root: &Path) -> Result<Config> {
    for path in candidate_paths(git_root) {
        if path.exists() {
            return parse_file(&path);
        }
    }
    Ok(Config::default())
}

fn candidate_paths(git_root: &Path) -> Vec<PathBuf> {
    let mut paths = vec![crate::shipit_io::repo_shipit_dir(git_root).join("config.toml")];
    if let Ok(user_dir) = crate::shipit_io::user_shipit_dir() {
        paths.push(user_dir.join("config.toml"));
    }
    paths
}

fn parse_file(path: &Path) -> Result<Config> {
    let text = crate::shipit_io::read_to_string(path)?;
    toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn write_template(git_root: &Path) -> Result<PathBuf> {
    let path = crate::shipit_io::repo_shipit_dir(git_root).join("config.toml");
    if path.exists() {
        anyhow::bail!("config already exists: {}", path.display());
    }
    crate::shipit_io::write_string(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn defaults_apply_to_empty_config() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.base_branch, None);
        assert_eq!(cfg.poll_interval_secs, 30);
        assert_eq!(cfg.agent, "claude");
        assert_eq!(cfg.worktrees_dir, "worktrees");
        assert!(!cfg.draft);
    }

    #[test]
    fn partial_config_overrides_defaults() {
        let cfg: Config = toml::from_str("base_branch = \"develop\"\ndraft = true\n").unwrap();
        assert_eq!(cfg.base_branch.as_deref(), Some("develop"));
        assert!(cfg.draft);
        assert_eq!(cfg.poll_interval_secs, 30);
    }

    #[test]
    fn load_prefers_repo_config() {
        let dir = tempdir().unwrap();
        let git_root = dir.path();
        let path = crate::shipit_io::repo_shipit_dir(git_root).join("config.toml");
        crate::shipit_io::write_string(&path, "poll_interval_secs = 5\n").unwrap();

        let cfg = load(git_root).unwrap();
        assert_eq!(cfg.poll_interval_secs, 5);
    }

    #[test]
    fn template_parses_and_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let git_root = dir.path();

        let path = write_template(git_root).unwrap();
        let cfg = parse_file(&path).unwrap();
        assert_eq!(cfg.agent, "claude");

        assert!(write_template(git_root).is_err());
    }
}
