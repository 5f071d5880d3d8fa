use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub fn repo_shipit_dir(git_root: &Path) -> PathBuf {
    git_root.join(".shipit")
}

pub fn user_shipit_dir_from(home_dir: &Path) -> PathBuf {
    home_dir.join(".shipit")
}

pub fn user_shipit_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().context("Could not find home directory")?;
    Ok(user_shipit_dir_from(&home_dir))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

pub fn write_string(path: &Path, content: impl AsRef<str>) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    std::fs::write(path, content.as_ref().as_bytes())
        .with_context(|| format!("failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn repo_dir_is_under_git_root() {
        let dir = tempdir().unwrap();
        let git_root = dir.path();

        assert_eq!(repo_shipit_dir(git_root), git_root.join(".shipit"));
    }

    #[test]
    fn user_dir_is_under_home_dir() {
        let dir = tempdir().unwrap();
        let home = dir.path();

        assert_eq!(user_shipit_dir_from(home), home.join(".shipit"));
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn write_and_read_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("file.txt");

        write_string(&path, "hello\n").unwrap();
        let content = read_to_string(&path).unwrap();
        assert_eq!(content, "hello\n");
    }
}
