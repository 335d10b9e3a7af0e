//! System git backend - zero dependencies, maximum performance
//!
//! Uses git plumbing commands for all operations. Optimized for:
//! - Safe subprocess execution (isolated environment)
//! - One subprocess call per query, batched where the caller allows
//! - Zero-copy parsing where possible

use crate::core::error::{ConfigError, GitError, ScopeError, ScopeResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> ScopeResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ScopeError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ScopeError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Resolve a reference to a commit SHA
  ///
  /// Failure here means the comparison itself is impossible (unknown ref,
  /// shallow history) and is surfaced as a configuration error, never masked.
  pub fn rev_parse(&self, reference: &str) -> ScopeResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--verify", &format!("{}^{{commit}}", reference)])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      return Err(ScopeError::Config(ConfigError::UnresolvableRef {
        reference: reference.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> ScopeResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "HEAD"])
      .output()
      .context("Failed to get HEAD commit")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ScopeError::Git(GitError::CommandFailed {
        command: "git rev-parse HEAD".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Get current branch name
  pub fn current_branch(&self) -> ScopeResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--abbrev-ref", "HEAD"])
      .output()
      .context("Failed to get current branch")?;

    if !output.status.success() {
      return Ok("HEAD".to_string()); // Detached HEAD
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Subject line of the HEAD commit
  pub fn head_subject(&self) -> ScopeResult<String> {
    let output = self
      .git_cmd()
      .args(["log", "-1", "--format=%s"])
      .output()
      .context("Failed to get HEAD subject")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ScopeError::Git(GitError::CommandFailed {
        command: "git log -1".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Raw `git diff --name-status` output between a reference and the work tree
  ///
  /// A failed diff is a fatal configuration error: an invalid or unreachable
  /// reference must not degrade into "no changes".
  pub fn diff_name_status(&self, reference: &str) -> ScopeResult<String> {
    let output = self
      .git_cmd()
      .args(["diff", "--name-status", reference])
      .output()
      .context("Failed to execute git diff")?;

    if !output.status.success() {
      return Err(ScopeError::Config(ConfigError::UnresolvableRef {
        reference: reference.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Last commit at or before `until_ref` that touched `path`
  ///
  /// Used to anchor deleted artifacts to the history where they still exist.
  pub fn last_commit_touching(&self, until_ref: &str, path: &Path) -> ScopeResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["rev-list", "-1", until_ref, "--"])
      .arg(path)
      .output()
      .context("Failed to run git rev-list")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ScopeError::Git(GitError::CommandFailed {
        command: "git rev-list".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(if sha.is_empty() { None } else { Some(sha) })
  }

  /// Number of uncommitted work-tree entries (`git status --porcelain`)
  pub fn dirty_entries(&self) -> ScopeResult<usize> {
    let output = self
      .git_cmd()
      .args(["status", "--porcelain"])
      .output()
      .context("Failed to get work tree status")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ScopeError::Git(GitError::CommandFailed {
        command: "git status --porcelain".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count(),
    )
  }

  /// Most recent tag reachable from HEAD, if any
  pub fn latest_tag(&self) -> ScopeResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["describe", "--tags", "--abbrev=0"])
      .output()
      .context("Failed to run git describe")?;

    if !output.status.success() {
      // No tags yet
      return Ok(None);
    }

    let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(if tag.is_empty() { None } else { Some(tag) })
  }

  /// SHA a tag points at, if the tag exists
  pub fn tag_sha(&self, tag: &str) -> ScopeResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--verify", "--quiet", &format!("refs/tags/{}^{{commit}}", tag)])
      .output()
      .context("Failed to resolve tag")?;

    if !output.status.success() {
      return Ok(None);
    }

    Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
  }

  /// Create a tag pointing at a commit
  pub fn create_tag(&self, tag: &str, sha: &str, force: bool) -> ScopeResult<()> {
    let mut cmd = self.git_cmd();
    cmd.arg("tag");
    if force {
      cmd.arg("-f");
    }
    cmd.arg(tag).arg(sha);

    let output = cmd.output().context("Failed to create tag")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ScopeError::Git(GitError::CommandFailed {
        command: format!("git tag {}", tag),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Delete a tag
  pub fn delete_tag(&self, tag: &str) -> ScopeResult<()> {
    let output = self
      .git_cmd()
      .args(["tag", "-d", tag])
      .output()
      .context("Failed to delete tag")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ScopeError::Git(GitError::CommandFailed {
        command: format!("git tag -d {}", tag),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    // Set working directory
    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}
