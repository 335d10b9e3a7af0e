//! Reference resolution: which ref do we diff against?
//!
//! Policy, in priority order:
//! 1. An explicit `--comparison-ref` override always wins.
//! 2. Pull-request events diff against `origin/<base-branch>`.
//! 3. Push events diff against `HEAD~1`.
//! 4. Manual dispatch has nothing to compare: empty reference, no diff,
//!    every discovered unit reported as unchanged.
//!
//! An unresolvable chosen reference is fatal. The usual culprit is a shallow
//! clone, and silently returning an empty diff would mask it.

use crate::core::config::EventContext;
use crate::core::error::ScopeResult;
use crate::core::vcs::SystemGit;

/// A resolved comparison reference
#[derive(Debug, Clone)]
pub struct ResolvedRef {
  /// Symbolic name used in diff commands and echoed in the matrix
  /// (empty: no comparison requested)
  pub name: String,

  /// Commit SHA the name resolves to (None only when `name` is empty)
  pub commit_sha: Option<String>,
}

impl ResolvedRef {
  pub fn none() -> Self {
    Self {
      name: String::new(),
      commit_sha: None,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_empty()
  }
}

/// Resolve the comparison reference for this invocation
pub fn resolve_comparison_ref(
  git: &SystemGit,
  ctx: &EventContext,
  override_ref: &str,
) -> ScopeResult<ResolvedRef> {
  if !override_ref.is_empty() {
    let sha = git.rev_parse(override_ref)?;
    return Ok(ResolvedRef {
      name: override_ref.to_string(),
      commit_sha: Some(sha),
    });
  }

  if ctx.is_dispatch() {
    return Ok(ResolvedRef::none());
  }

  let name = if ctx.is_pull_request() {
    format!("origin/{}", ctx.base_ref)
  } else {
    "HEAD~1".to_string()
  };

  let sha = git.rev_parse(&name)?;
  Ok(ResolvedRef {
    name,
    commit_sha: Some(sha),
  })
}
