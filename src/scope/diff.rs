//! Diff collection: one `git diff --name-status` against the comparison ref,
//! parsed into [`ChangeRecord`]s deduplicated by path.
//!
//! Renames carry their similarity score (`R100` is a pure rename, anything
//! lower means the content changed too). Deleted paths are anchored to the
//! last commit that still contained them, one `rev-list` query per path.

use crate::core::error::ScopeResult;
use crate::core::vcs::{ChangeRecord, ChangeStatus, SystemGit};
use crate::scope::refs::ResolvedRef;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Collect change records between the comparison reference and the work tree
///
/// An empty reference means "no comparison requested" and yields no records;
/// discovery then reports every unit as unchanged.
pub fn collect_changes(git: &SystemGit, comparison: &ResolvedRef) -> ScopeResult<Vec<ChangeRecord>> {
  if comparison.is_empty() {
    return Ok(Vec::new());
  }

  let raw = git.diff_name_status(&comparison.name)?;
  let mut records = parse_name_status(&raw);

  for record in &mut records {
    if record.is_deleted() {
      record.commit_sha = git
        .last_commit_touching(&comparison.name, &record.path)?
        .or_else(|| comparison.commit_sha.clone());
    }
  }

  Ok(records)
}

/// Parse `git diff --name-status` output
///
/// Lines are tab-separated: `<status>\t<path>` or `<R|C><score>\t<old>\t<new>`.
/// Unknown status letters are skipped; duplicate paths keep the first record.
pub fn parse_name_status(raw: &str) -> Vec<ChangeRecord> {
  let mut records = Vec::new();
  let mut seen: HashSet<PathBuf> = HashSet::new();

  for line in raw.lines() {
    if line.is_empty() {
      continue;
    }

    let mut parts = line.split('\t');
    let Some(status) = parts.next() else { continue };
    let Some(first_path) = parts.next() else { continue };

    let record = match status.chars().next() {
      Some('A') => change(first_path, ChangeStatus::Added),
      Some('M') | Some('T') => change(first_path, ChangeStatus::Modified),
      Some('D') => change(first_path, ChangeStatus::Deleted),
      Some('C') => {
        // Copies introduce a new path; the source is untouched
        let Some(new_path) = parts.next() else { continue };
        change(new_path, ChangeStatus::Added)
      }
      Some('R') => {
        let Some(new_path) = parts.next() else { continue };
        let content_changed = similarity_score(status).map(|s| s < 100).unwrap_or(true);
        ChangeRecord {
          path: PathBuf::from(new_path),
          status: ChangeStatus::Renamed { content_changed },
          old_path: Some(PathBuf::from(first_path)),
          commit_sha: None,
        }
      }
      _ => continue,
    };

    if seen.insert(record.path.clone()) {
      records.push(record);
    }
  }

  records
}

fn change(path: &str, status: ChangeStatus) -> ChangeRecord {
  ChangeRecord {
    path: PathBuf::from(path),
    status,
    old_path: None,
    commit_sha: None,
  }
}

/// Extract the similarity score from an `R085`-style status field
fn similarity_score(status: &str) -> Option<u32> {
  status[1..].parse().ok()
}

/// Nearest ancestor of `path` (the file's directory included) that satisfies
/// the predicate. Shared by change attribution and deletion grouping.
pub fn nearest_ancestor<F>(path: &Path, is_match: F) -> Option<PathBuf>
where
  F: Fn(&Path) -> bool,
{
  let mut dir = path.parent();
  while let Some(d) = dir {
    if is_match(d) {
      return Some(d.to_path_buf());
    }
    if d.as_os_str().is_empty() {
      break;
    }
    dir = d.parent();
  }
  None
}
