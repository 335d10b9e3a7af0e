//! Narrow client interface over git tag refs and the GitHub release API
//!
//! The publish ladder only ever talks to these five operations, so the whole
//! retry/fallback behavior stays testable without a network or a repository.

use crate::core::error::{GitError, ScopeError, ScopeResult, ResultExt};
use crate::core::vcs::SystemGit;
use std::process::Command;

/// Everything needed to publish one release
#[derive(Debug, Clone)]
pub struct ReleasePayload {
  /// Tag name, e.g. `v1.4.0`
  pub tag: String,

  /// Release title
  pub title: String,

  /// Release notes body
  pub notes: String,

  /// Commit the tag must point at
  pub target_sha: String,
}

/// External service surface for release publishing
pub trait ReleaseClient {
  /// SHA the tag ref points at, if the ref exists
  fn get_ref(&self, tag: &str) -> ScopeResult<Option<String>>;

  /// Create the tag ref (fails if it already exists)
  fn create_ref(&self, tag: &str, sha: &str) -> ScopeResult<()>;

  /// Delete the tag ref and any release attached to it
  fn delete_ref(&self, tag: &str) -> ScopeResult<()>;

  /// Force-move an existing tag ref to a new SHA
  fn update_ref(&self, tag: &str, sha: &str) -> ScopeResult<()>;

  /// Create the release object for an existing tag
  fn create_release(&self, payload: &ReleasePayload) -> ScopeResult<()>;
}

/// Production client: system git for tag refs, `gh` CLI for release objects
pub struct GhClient<'a> {
  git: &'a SystemGit,
}

impl<'a> GhClient<'a> {
  pub fn new(git: &'a SystemGit) -> Self {
    Self { git }
  }

  fn gh_cmd(&self) -> Command {
    let mut cmd = Command::new("gh");
    cmd.current_dir(self.git.work_tree());
    cmd
  }
}

impl ReleaseClient for GhClient<'_> {
  fn get_ref(&self, tag: &str) -> ScopeResult<Option<String>> {
    self.git.tag_sha(tag)
  }

  fn create_ref(&self, tag: &str, sha: &str) -> ScopeResult<()> {
    self.git.create_tag(tag, sha, false)
  }

  fn delete_ref(&self, tag: &str) -> ScopeResult<()> {
    // Drop the release first so the recreate does not collide with it.
    // A missing release is fine; a missing gh binary is not.
    let output = self
      .gh_cmd()
      .args(["release", "delete", tag, "--yes"])
      .output()
      .context("Failed to execute gh release delete")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if !stderr.contains("release not found") && !stderr.contains("Not Found") {
        return Err(ScopeError::Git(GitError::CommandFailed {
          command: format!("gh release delete {}", tag),
          stderr: stderr.to_string(),
        }));
      }
    }

    self.git.delete_tag(tag)
  }

  fn update_ref(&self, tag: &str, sha: &str) -> ScopeResult<()> {
    self.git.create_tag(tag, sha, true)
  }

  fn create_release(&self, payload: &ReleasePayload) -> ScopeResult<()> {
    let output = self
      .gh_cmd()
      .args([
        "release",
        "create",
        &payload.tag,
        "--target",
        &payload.target_sha,
        "--title",
        &payload.title,
        "--notes",
        &payload.notes,
      ])
      .output()
      .context("Failed to execute gh release create")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ScopeError::Git(GitError::CommandFailed {
        command: format!("gh release create {}", payload.tag),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }
}
