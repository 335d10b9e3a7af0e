//! Utility functions for cross-platform path handling

use std::path::Path;

/// Convert a repo-relative path to its serialized form (always forward slashes)
///
/// Git and the matrix consumers expect paths with forward slashes, even on
/// Windows. An empty path (the repository root) serializes as ".".
pub fn path_to_key(path: &Path) -> String {
  if path.as_os_str().is_empty() || path == Path::new(".") {
    return ".".to_string();
  }

  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}
