//! Unit discovery: walk the tree for app/container boundaries and attribute
//! change records to them.
//!
//! A directory qualifies as a unit when it directly contains a Dockerfile
//! (`Dockerfile` or `Dockerfile.<suffix>`) and/or an app descriptor
//! (`app.yaml`/`app.yml`). Source-only directories are never units, no matter
//! how much they churn.
//!
//! Include/exclude filters are literal substring containment, not globs.
//! Exclude is evaluated after include and wins on overlap.

use crate::core::vcs::ChangeRecord;
use crate::scope::diff::nearest_ancestor;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Substring-based path filter (include first, exclude wins)
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
  pub include: String,
  pub exclude: String,
}

impl PathFilter {
  pub fn new(include: impl Into<String>, exclude: impl Into<String>) -> Self {
    Self {
      include: include.into(),
      exclude: exclude.into(),
    }
  }

  /// Check whether a serialized path passes the filter
  pub fn matches(&self, path: &str) -> bool {
    if !self.include.is_empty() && !path.contains(&self.include) {
      return false;
    }
    if !self.exclude.is_empty() && path.contains(&self.exclude) {
      return false;
    }
    true
  }
}

/// Marker files found directly inside one unit directory
#[derive(Debug, Clone, Default)]
pub struct UnitEvidence {
  /// `app.yaml`/`app.yml`, repo-relative
  pub descriptor: Option<PathBuf>,

  /// Dockerfiles, repo-relative, sorted by filename
  pub dockerfiles: Vec<PathBuf>,
}

/// Result of the tree walk plus change attribution
#[derive(Debug, Default)]
pub struct Discovery {
  /// Every unit directory surviving the filter, keyed by repo-relative path
  /// (the repository root is the empty path). BTreeMap keeps output stable.
  pub units: BTreeMap<PathBuf, UnitEvidence>,

  /// Unit paths containing at least one counting change
  pub changed_units: BTreeSet<PathBuf>,

  /// Dockerfile paths (repo-relative) that changed, for per-container updates
  pub changed_dockerfiles: BTreeSet<PathBuf>,
}

pub fn is_descriptor(filename: &str) -> bool {
  filename == "app.yaml" || filename == "app.yml"
}

pub fn is_dockerfile(filename: &str) -> bool {
  filename == "Dockerfile" || filename.starts_with("Dockerfile.")
}

/// Walk the repository and build the filtered unit inventory
pub fn discover_units(root: &Path, filter: &PathFilter) -> Discovery {
  let mut units: BTreeMap<PathBuf, UnitEvidence> = BTreeMap::new();

  // The walker respects .gitignore; .git itself is excluded via override
  // so hidden unit directories still qualify.
  let mut override_builder = OverrideBuilder::new(root);
  override_builder.add("!.git/").ok();
  let overrides = override_builder
    .build()
    .unwrap_or_else(|_| OverrideBuilder::new(root).build().expect("empty override set"));

  for result in WalkBuilder::new(root)
    .hidden(false)
    .git_ignore(true)
    .overrides(overrides)
    .build()
  {
    let entry = match result {
      Ok(e) => e,
      Err(err) => {
        eprintln!("Warning: failed to read directory entry: {}", err);
        continue;
      }
    };

    if !entry.path().is_file() {
      continue;
    }

    let Ok(relative) = entry.path().strip_prefix(root) else {
      continue;
    };
    let Some(filename) = relative.file_name().and_then(|n| n.to_str()) else {
      continue;
    };

    let folder = relative.parent().unwrap_or(Path::new("")).to_path_buf();

    if is_descriptor(filename) {
      units.entry(folder).or_default().descriptor = Some(relative.to_path_buf());
    } else if is_dockerfile(filename) {
      units.entry(folder).or_default().dockerfiles.push(relative.to_path_buf());
    }
  }

  // Filter on the unit directory path, then fix ordering inside each unit
  units.retain(|folder, _| filter.matches(&crate::utils::path_to_key(folder)));
  for evidence in units.values_mut() {
    evidence.dockerfiles.sort();
  }

  Discovery {
    units,
    changed_units: BTreeSet::new(),
    changed_dockerfiles: BTreeSet::new(),
  }
}

impl Discovery {
  /// Attribute change records to units.
  ///
  /// A Dockerfile change directly inside a unit updates only the matching
  /// container; any other counting change marks the whole unit (app entry and
  /// every container). Records are attributed to the nearest ancestor unit.
  pub fn attribute_changes(&mut self, records: &[ChangeRecord]) {
    for record in records {
      if !record.marks_unit_changed() {
        continue;
      }

      let Some(unit) = nearest_ancestor(&record.path, |d| self.units.contains_key(d)) else {
        continue;
      };

      let filename = record.path.file_name().and_then(|n| n.to_str()).unwrap_or("");
      let directly_in_unit = record.path.parent().unwrap_or(Path::new("")) == unit.as_path();

      if is_dockerfile(filename) && directly_in_unit {
        if !record.is_deleted() {
          self.changed_dockerfiles.insert(record.path.clone());
        }
        // A deleted Dockerfile has no live container left to update;
        // it surfaces through the deleted set instead.
      } else {
        self.changed_units.insert(unit);
      }
    }
  }

  pub fn unit_changed(&self, folder: &Path) -> bool {
    self.changed_units.contains(folder)
  }

  pub fn dockerfile_changed(&self, dockerfile: &Path) -> bool {
    self.changed_dockerfiles.contains(dockerfile)
  }
}

/// Marker-file deletions grouped per unit directory, feeding the deleted sets
#[derive(Debug, Default)]
pub struct DeletionGroups {
  /// folder -> deleted descriptor paths with their historical SHA
  pub descriptors: BTreeMap<PathBuf, Vec<(PathBuf, String)>>,

  /// folder -> deleted Dockerfile paths with their historical SHA
  pub dockerfiles: BTreeMap<PathBuf, Vec<(PathBuf, String)>>,
}

/// Group deleted marker files (descriptors, Dockerfiles) by their folder
///
/// Only records for vanished Dockerfiles/descriptors produce cleanup entries;
/// a deleted source file is unit churn, not an artifact removal. The filter
/// applies to the deleted file path itself.
pub fn group_deletions(records: &[ChangeRecord], filter: &PathFilter, fallback_sha: &str) -> DeletionGroups {
  let mut groups = DeletionGroups::default();

  for record in records {
    if !record.is_deleted() {
      continue;
    }
    if !filter.matches(&crate::utils::path_to_key(&record.path)) {
      continue;
    }

    let Some(filename) = record.path.file_name().and_then(|n| n.to_str()) else {
      continue;
    };
    let folder = record.path.parent().unwrap_or(Path::new("")).to_path_buf();
    let sha = record
      .commit_sha
      .clone()
      .unwrap_or_else(|| fallback_sha.to_string());

    if is_descriptor(filename) {
      groups
        .descriptors
        .entry(folder)
        .or_default()
        .push((record.path.clone(), sha));
    } else if is_dockerfile(filename) {
      groups
        .dockerfiles
        .entry(folder)
        .or_default()
        .push((record.path.clone(), sha));
    }
  }

  for paths in groups.descriptors.values_mut() {
    paths.sort();
  }
  for paths in groups.dockerfiles.values_mut() {
    paths.sort();
  }

  groups
}
