//! Analyzer configuration and CI event context
//!
//! Each analyzer run is a pure function of (tree, reference, filters); all of
//! that input arrives through these explicit structs. Environment variables are
//! read exactly once, at the CLI boundary, and never consulted again.

use crate::core::error::{ConfigError, ScopeError, ScopeResult};
use std::env;
use std::path::PathBuf;

/// Parameters for one analyzer invocation
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
  /// Repository root to scan
  pub root_path: PathBuf,

  /// Keep only unit paths containing this substring (empty: keep all)
  pub include_pattern: String,

  /// Drop unit paths containing this substring; wins over include (empty: drop none)
  pub exclude_pattern: String,

  /// Explicit comparison reference, overriding event-based resolution
  pub comparison_ref: String,

  /// Bypass all git invocations (repo-less testing)
  pub mock_git: bool,
}

impl AnalyzerConfig {
  pub fn new(
    root_path: PathBuf,
    include_pattern: String,
    exclude_pattern: String,
    comparison_ref: String,
    mock_git: bool,
  ) -> Self {
    // Resolve the root so root-level units can borrow the directory's name
    let root_path = root_path.canonicalize().unwrap_or(root_path);
    Self {
      root_path,
      include_pattern: normalize_include_pattern(include_pattern),
      exclude_pattern,
      comparison_ref,
      mock_git,
    }
  }
}

/// Include patterns `/`, `.` and `./` all mean "the whole repo"
fn normalize_include_pattern(pattern: String) -> String {
  match pattern.as_str() {
    "/" | "." | "./" => String::new(),
    _ => pattern,
  }
}

/// CI event context driving automatic reference resolution
///
/// Captured from `GITHUB_EVENT_NAME` / `GITHUB_BASE_REF` once at startup.
/// A missing event name counts as a push; only a manual dispatch produces
/// the empty comparison reference.
#[derive(Debug, Clone)]
pub struct EventContext {
  pub event_name: String,
  pub base_ref: String,
}

impl EventContext {
  /// Read the event context from the process environment
  pub fn from_env() -> Self {
    Self {
      event_name: env::var("GITHUB_EVENT_NAME").unwrap_or_else(|_| "push".to_string()),
      base_ref: env::var("GITHUB_BASE_REF").unwrap_or_else(|_| "main".to_string()),
    }
  }

  pub fn is_pull_request(&self) -> bool {
    self.event_name == "pull_request"
  }

  pub fn is_dispatch(&self) -> bool {
    self.event_name == "workflow_dispatch"
  }
}

/// How analysis results are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  /// `key=value` lines for a CI orchestrator (`$GITHUB_OUTPUT` when set)
  Github,
  /// Pretty JSON on stdout
  Json,
}

impl OutputFormat {
  pub fn from_str(s: &str) -> ScopeResult<Self> {
    match s.to_lowercase().as_str() {
      "github" => Ok(Self::Github),
      "json" => Ok(Self::Json),
      _ => Err(ScopeError::Config(ConfigError::UnknownFormat { format: s.to_string() })),
    }
  }
}
