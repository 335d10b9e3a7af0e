//! Version bump selection from commit messages and branch names
//!
//! Markers in the HEAD commit subject (`#major`, `#minor`, `#patch`,
//! `#none`) always win; branch-name prefixes are the fallback; the default
//! is a patch bump.

use serde::{Deserialize, Serialize};

/// Version bump type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
  /// Major version bump (breaking changes)
  Major,
  /// Minor version bump (new features)
  Minor,
  /// Patch version bump (bug fixes)
  Patch,
  /// No bump (explicitly suppressed)
  None,
}

impl VersionBump {
  /// Apply bump to a semver version
  pub fn apply(&self, version: &semver::Version) -> semver::Version {
    match self {
      VersionBump::Major => semver::Version::new(version.major + 1, 0, 0),
      VersionBump::Minor => semver::Version::new(version.major, version.minor + 1, 0),
      VersionBump::Patch => semver::Version::new(version.major, version.minor, version.patch + 1),
      VersionBump::None => version.clone(),
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      VersionBump::Major => "major",
      VersionBump::Minor => "minor",
      VersionBump::Patch => "patch",
      VersionBump::None => "none",
    }
  }
}

/// Explicit marker in a commit message, if any
pub fn bump_from_message(message: &str) -> Option<VersionBump> {
  let lower = message.to_lowercase();

  // First marker wins; scan in severity order so "#major ... #patch" is major
  if lower.contains("#major") {
    Some(VersionBump::Major)
  } else if lower.contains("#minor") {
    Some(VersionBump::Minor)
  } else if lower.contains("#patch") {
    Some(VersionBump::Patch)
  } else if lower.contains("#none") {
    Some(VersionBump::None)
  } else {
    None
  }
}

/// Bump implied by a branch naming convention, if any
pub fn bump_from_branch(branch: &str) -> Option<VersionBump> {
  let lower = branch.to_lowercase();

  if lower.starts_with("major/") {
    Some(VersionBump::Major)
  } else if lower.starts_with("feature/") || lower.starts_with("feat/") {
    Some(VersionBump::Minor)
  } else if lower.starts_with("fix/") || lower.starts_with("hotfix/") || lower.starts_with("bugfix/") {
    Some(VersionBump::Patch)
  } else {
    None
  }
}

/// Full policy: message marker > branch prefix > patch
pub fn detect_bump(message: &str, branch: &str) -> VersionBump {
  bump_from_message(message)
    .or_else(|| bump_from_branch(branch))
    .unwrap_or(VersionBump::Patch)
}
