//! Matrix assembly: the nested `apps`/`containers` output consumed by CI
//! orchestration.
//!
//! Ordering is deterministic (lexicographic by path, then container name) so
//! identical inputs serialize byte-identically run after run.

use crate::scope::discover::{DeletionGroups, Discovery};
use crate::scope::metadata::{self, DockerfileInfo, UnitMetadata};
use crate::utils::path_to_key;
use serde::Serialize;
use std::path::Path;

/// Structured Dockerfile reference inside container entries
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DockerfileRef {
  pub path: String,
  pub filename: String,
  pub suffix: String,
}

impl DockerfileRef {
  fn from_info(info: &DockerfileInfo) -> Self {
    Self {
      path: path_to_key(&info.path),
      filename: info.filename.clone(),
      suffix: info.suffix.clone(),
    }
  }
}

/// One app unit (requires a descriptor)
#[derive(Debug, Clone, Serialize)]
pub struct AppEntry {
  pub path: String,
  pub app_name: String,
  pub app_config: String,
}

/// One buildable container (one per Dockerfile in a unit)
#[derive(Debug, Clone, Serialize)]
pub struct ContainerEntry {
  pub path: String,
  pub context: String,
  pub app_name: String,
  pub container_name: String,
  pub dockerfile: DockerfileRef,
}

/// A removed app, anchored to the last commit where it existed
#[derive(Debug, Clone, Serialize)]
pub struct DeletedApp {
  pub path: String,
  pub app_name: String,
  pub app_config: String,
  pub commit_sha: String,
}

/// A removed container, anchored to the last commit where it existed
#[derive(Debug, Clone, Serialize)]
pub struct DeletedContainer {
  pub path: String,
  pub context: String,
  pub app_name: String,
  pub container_name: String,
  pub dockerfile: DockerfileRef,
  pub commit_sha: String,
}

/// `updated`/`all`/`deleted` views plus summary flags
#[derive(Debug, Serialize)]
pub struct MatrixSection<T, D> {
  pub updated: Vec<T>,
  pub all: Vec<T>,
  pub deleted: Vec<D>,
  pub has_updates: bool,
  pub has_deletions: bool,
}

impl<T, D> MatrixSection<T, D> {
  fn new(updated: Vec<T>, all: Vec<T>, deleted: Vec<D>) -> Self {
    let has_updates = !updated.is_empty();
    let has_deletions = !deleted.is_empty();
    Self {
      updated,
      all,
      deleted,
      has_updates,
      has_deletions,
    }
  }
}

/// The full analysis result
#[derive(Debug, Serialize)]
pub struct Matrix {
  pub apps: MatrixSection<AppEntry, DeletedApp>,
  pub containers: MatrixSection<ContainerEntry, DeletedContainer>,
  #[serde(rename = "ref")]
  pub comparison_ref: String,
}

/// Assemble the matrix from resolved units, change attribution and deletions
pub fn build_matrix(
  units: &[UnitMetadata],
  discovery: &Discovery,
  deletions: &DeletionGroups,
  comparison_ref: &str,
) -> Matrix {
  let mut all_apps = Vec::new();
  let mut updated_apps = Vec::new();
  let mut all_containers = Vec::new();
  let mut updated_containers = Vec::new();

  for unit in units {
    let unit_changed = discovery.unit_changed(&unit.folder);

    // App entries exist only for units carrying a descriptor
    if let Some(app_config) = &unit.app_config {
      let app = AppEntry {
        path: path_to_key(&unit.folder),
        app_name: unit.app_name.clone(),
        app_config: path_to_key(app_config),
      };
      if unit_changed {
        updated_apps.push(app.clone());
      }
      all_apps.push(app);
    }

    for dockerfile in &unit.dockerfiles {
      let container = ContainerEntry {
        path: path_to_key(&unit.folder),
        context: dockerfile.context.clone(),
        app_name: unit.app_name.clone(),
        container_name: unit.container_name(dockerfile),
        dockerfile: DockerfileRef::from_info(dockerfile),
      };
      if unit_changed || discovery.dockerfile_changed(&dockerfile.path) {
        updated_containers.push(container.clone());
      }
      all_containers.push(container);
    }
  }

  let (deleted_apps, deleted_containers) = build_deleted(deletions);

  sort_apps(&mut all_apps);
  sort_apps(&mut updated_apps);
  sort_containers(&mut all_containers);
  sort_containers(&mut updated_containers);

  Matrix {
    apps: MatrixSection::new(updated_apps, all_apps, deleted_apps),
    containers: MatrixSection::new(updated_containers, all_containers, deleted_containers),
    comparison_ref: comparison_ref.to_string(),
  }
}

fn build_deleted(deletions: &DeletionGroups) -> (Vec<DeletedApp>, Vec<DeletedContainer>) {
  let mut deleted_apps = Vec::new();
  let mut deleted_containers = Vec::new();

  for (folder, descriptors) in &deletions.descriptors {
    let app_name = deleted_unit_name(folder);
    for (descriptor_path, commit_sha) in descriptors {
      deleted_apps.push(DeletedApp {
        path: path_to_key(folder),
        app_name: app_name.clone(),
        app_config: path_to_key(descriptor_path),
        commit_sha: commit_sha.clone(),
      });
    }
  }

  for (folder, dockerfiles) in &deletions.dockerfiles {
    let app_name = deleted_unit_name(folder);
    for (dockerfile_path, commit_sha) in dockerfiles {
      let filename = dockerfile_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Dockerfile")
        .to_string();
      let suffix = metadata::dockerfile_suffix(&filename);
      let container_name = if suffix.is_empty() {
        app_name.clone()
      } else {
        metadata::normalize_name(&format!("{}-{}", app_name, &suffix[1..]))
      };

      deleted_containers.push(DeletedContainer {
        path: path_to_key(folder),
        context: path_to_key(folder),
        app_name: app_name.clone(),
        container_name,
        dockerfile: DockerfileRef {
          path: path_to_key(dockerfile_path),
          filename,
          suffix,
        },
        commit_sha: commit_sha.clone(),
      });
    }
  }

  deleted_apps.sort_by(|a, b| (&a.path, &a.app_config).cmp(&(&b.path, &b.app_config)));
  deleted_containers.sort_by(|a, b| (&a.path, &a.dockerfile.path).cmp(&(&b.path, &b.dockerfile.path)));

  (deleted_apps, deleted_containers)
}

/// Name for a unit whose marker files are gone from the work tree:
/// the (normalized) folder name is all that is left to go on
fn deleted_unit_name(folder: &Path) -> String {
  let raw = folder.file_name().and_then(|n| n.to_str()).unwrap_or("root");
  metadata::normalize_name(raw)
}

fn sort_apps(apps: &mut [AppEntry]) {
  apps.sort_by(|a, b| a.path.cmp(&b.path));
}

fn sort_containers(containers: &mut [ContainerEntry]) {
  containers.sort_by(|a, b| (&a.path, &a.container_name).cmp(&(&b.path, &b.container_name)));
}
