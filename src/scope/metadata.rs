//! Per-unit metadata resolution: app names, container names, build contexts.
//!
//! A malformed descriptor downgrades that one unit to folder-name defaults
//! with a stderr warning; it never aborts the run.

use crate::scope::discover::UnitEvidence;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// How many leading lines of a Dockerfile are scanned for directives
const DIRECTIVE_SCAN_LINES: usize = 10;

/// App descriptor (`app.yaml`/`app.yml`); only `name` is load-bearing
#[derive(Debug, Deserialize)]
struct AppDescriptor {
  name: Option<String>,
}

/// One Dockerfile inside a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerfileInfo {
  /// Repo-relative path
  pub path: PathBuf,

  /// File name (`Dockerfile`, `Dockerfile.auth`)
  pub filename: String,

  /// Qualifier including the dot (`.auth`), empty for the bare `Dockerfile`
  pub suffix: String,

  /// Build context directory (the unit path unless a `# @context:`
  /// directive overrides it)
  pub context: String,
}

/// Resolved metadata for one unit directory
#[derive(Debug, Clone)]
pub struct UnitMetadata {
  /// Repo-relative unit directory (empty for the repository root)
  pub folder: PathBuf,

  pub app_name: String,

  /// Descriptor path when one exists
  pub app_config: Option<PathBuf>,

  pub dockerfiles: Vec<DockerfileInfo>,
}

/// Resolve metadata for a unit from its marker files
pub fn resolve_unit(root: &Path, folder: &Path, evidence: &UnitEvidence) -> UnitMetadata {
  let app_name = evidence
    .descriptor
    .as_deref()
    .and_then(|descriptor| descriptor_name(root, descriptor))
    .unwrap_or_else(|| fallback_name(root, folder));

  let dockerfiles = evidence
    .dockerfiles
    .iter()
    .map(|path| {
      let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Dockerfile")
        .to_string();
      let suffix = dockerfile_suffix(&filename);
      let context = dockerfile_context(root, path).unwrap_or_else(|| crate::utils::path_to_key(folder));

      DockerfileInfo {
        path: path.clone(),
        filename,
        suffix,
        context,
      }
    })
    .collect();

  UnitMetadata {
    folder: folder.to_path_buf(),
    app_name,
    app_config: evidence.descriptor.clone(),
    dockerfiles,
  }
}

impl UnitMetadata {
  /// Container name for one of this unit's Dockerfiles
  pub fn container_name(&self, dockerfile: &DockerfileInfo) -> String {
    let name = if dockerfile.suffix.is_empty() {
      self.app_name.clone()
    } else {
      format!("{}-{}", self.app_name, &dockerfile.suffix[1..])
    };
    normalize_name(&name)
  }
}

/// `name` field from a descriptor file; None (with a warning) when the file
/// is unreadable or malformed
fn descriptor_name(root: &Path, descriptor: &Path) -> Option<String> {
  let full_path = root.join(descriptor);
  let content = match std::fs::read_to_string(&full_path) {
    Ok(content) => content,
    Err(err) => {
      eprintln!("Warning: failed to read {}: {}", full_path.display(), err);
      return None;
    }
  };

  match parse_descriptor(&content) {
    Ok(name) => name,
    Err(err) => {
      eprintln!("Warning: failed to parse {}: {}", full_path.display(), err);
      None
    }
  }
}

/// Parse descriptor content for its `name` field
pub fn parse_descriptor(content: &str) -> Result<Option<String>, serde_yaml::Error> {
  let descriptor: AppDescriptor = serde_yaml::from_str(content)?;
  Ok(descriptor.name.filter(|n| !n.is_empty()))
}

/// Folder-name fallback; the repository root takes the root directory's name
fn fallback_name(root: &Path, folder: &Path) -> String {
  let raw = if folder.as_os_str().is_empty() || folder == Path::new(".") {
    root.file_name().and_then(|n| n.to_str()).unwrap_or("root")
  } else {
    folder.file_name().and_then(|n| n.to_str()).unwrap_or("unit")
  };
  normalize_name(raw)
}

/// Suffix of a Dockerfile name, dot included (`Dockerfile.auth` -> `.auth`)
pub fn dockerfile_suffix(filename: &str) -> String {
  match filename.strip_prefix("Dockerfile.") {
    Some(rest) if !rest.is_empty() => format!(".{}", rest),
    _ => String::new(),
  }
}

/// Normalize a name for container registries / cloud resources:
/// lowercase, `[a-z0-9-]` only, runs of dashes collapsed, dashes trimmed
pub fn normalize_name(name: &str) -> String {
  let mut out = String::with_capacity(name.len());
  let mut last_dash = false;

  for c in name.chars() {
    let c = c.to_ascii_lowercase();
    if c.is_ascii_lowercase() || c.is_ascii_digit() {
      out.push(c);
      last_dash = false;
    } else if !last_dash {
      out.push('-');
      last_dash = true;
    }
  }

  out.trim_matches('-').to_string()
}

/// Context override from a Dockerfile's leading comment lines
///
/// Only the `# @context: <path>` directive is load-bearing; everything else
/// in the Dockerfile is opaque to the analyzer.
fn dockerfile_context(root: &Path, dockerfile: &Path) -> Option<String> {
  let file = File::open(root.join(dockerfile)).ok()?;
  let reader = BufReader::new(file);

  for line in reader.lines().take(DIRECTIVE_SCAN_LINES) {
    let line = line.ok()?;
    if let Some(context) = parse_context_directive(&line) {
      return Some(context);
    }
  }

  None
}

/// Parse one line for the context directive
pub fn parse_context_directive(line: &str) -> Option<String> {
  let trimmed = line.trim();
  let rest = trimmed.strip_prefix("# @context:")?;
  let value = rest.trim();
  if value.is_empty() { None } else { Some(value.to_string()) }
}
