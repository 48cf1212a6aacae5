use crate::error::RebrandError;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// A history-preserving move provided by a version control tool.
pub trait VcsMover: Debug {
    /// Move `from` to `to`. An error means the caller should fall back to a
    /// plain filesystem rename.
    fn mv(&self, from: &Path, to: &Path) -> Result<(), RebrandError>;

    /// Short name used in log messages.
    fn name(&self) -> &'static str;
}

/// `git mv`, run from the tree root.
#[derive(Debug, Clone)]
pub struct GitMover {
    root: PathBuf,
}

impl GitMover {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl VcsMover for GitMover {
    fn mv(&self, from: &Path, to: &Path) -> Result<(), RebrandError> {
        let output = Command::new("git")
            .arg("mv")
            .arg(from)
            .arg(to)
            .current_dir(&self.root)
            .output()
            .map_err(|e| RebrandError::Vcs(format!("failed to run git: {e}")))?;

        check_output("git mv", &output)
    }

    fn name(&self) -> &'static str {
        "git"
    }
}

/// Stage every change in the working tree with `git add -A`.
pub fn stage_all(root: &Path) -> Result<(), RebrandError> {
    let output = Command::new("git")
        .args(["add", "-A"])
        .current_dir(root)
        .output()
        .map_err(|e| RebrandError::Vcs(format!("failed to run git: {e}")))?;

    check_output("git add -A", &output)
}

fn check_output(what: &str, output: &Output) -> Result<(), RebrandError> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    debug!("{} failed: {}", what, stderr.trim());
    Err(RebrandError::Vcs(format!(
        "{what} exited with {}: {}",
        output.status,
        stderr.trim()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_git_mv_outside_repository_fails_without_touching_files() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("qwen.ts");
        let to = temp_dir.path().join("fora.ts");
        fs::write(&from, "x").unwrap();

        let mover = GitMover::new(temp_dir.path());
        // Either git is missing or the directory is not a repository
        assert!(mover.mv(&from, &to).is_err());
        assert!(from.exists());
        assert!(!to.exists());
    }

    #[test]
    fn test_stage_all_outside_repository_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            stage_all(temp_dir.path()),
            Err(RebrandError::Vcs(_))
        ));
    }
}
