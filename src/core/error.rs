//! Error types for build-scope with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages to users. Fatal errors print one actionable diagnostic;
//! per-unit metadata problems never reach this type (they degrade to warnings).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for build-scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (bad flags, unresolvable reference, missing files)
  User = 1,
  /// System error (git, I/O)
  System = 2,
  /// Validation failure (release preconditions)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for build-scope
#[derive(Debug)]
pub enum ScopeError {
  /// Configuration errors (the comparison itself is impossible)
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Validation errors (release preconditions)
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ScopeError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ScopeError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ScopeError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ScopeError::Message { message, context, help } => ScopeError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ScopeError::Config(_) => ExitCode::User,
      ScopeError::Git(_) => ExitCode::System,
      ScopeError::Validation(_) => ExitCode::Validation,
      ScopeError::Io(_) => ExitCode::System,
      ScopeError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ScopeError::Config(e) => e.help_message(),
      ScopeError::Git(e) => e.help_message(),
      ScopeError::Validation(e) => e.help_message(),
      ScopeError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ScopeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ScopeError::Config(e) => write!(f, "{}", e),
      ScopeError::Git(e) => write!(f, "{}", e),
      ScopeError::Validation(e) => write!(f, "{}", e),
      ScopeError::Io(e) => write!(f, "I/O error: {}", e),
      ScopeError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ScopeError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ScopeError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ScopeError {
  fn from(err: io::Error) -> Self {
    ScopeError::Io(err)
  }
}

impl From<String> for ScopeError {
  fn from(msg: String) -> Self {
    ScopeError::message(msg)
  }
}

impl From<&str> for ScopeError {
  fn from(msg: &str) -> Self {
    ScopeError::message(msg)
  }
}

impl From<serde_json::Error> for ScopeError {
  fn from(err: serde_json::Error) -> Self {
    ScopeError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for ScopeError {
  fn from(err: semver::Error) -> Self {
    ScopeError::message(format!("Version parse error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ScopeError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ScopeError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration-related errors: the requested comparison is impossible
#[derive(Debug)]
pub enum ConfigError {
  /// The chosen comparison reference cannot be resolved (shallow clone,
  /// missing remote branch, bad override)
  UnresolvableRef { reference: String, stderr: String },

  /// Output format string not recognized
  UnknownFormat { format: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::UnresolvableRef { .. } => Some(
        "Full history is required to diff against this reference. Shallow clones mask it: \
         use `fetch-depth: 0` in actions/checkout, or pass --comparison-ref with a reachable ref."
          .to_string(),
      ),
      ConfigError::UnknownFormat { .. } => Some("Valid formats: github, json".to_string()),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::UnresolvableRef { reference, stderr } => {
        write!(f, "Comparison reference '{}' cannot be resolved", reference)?;
        if !stderr.trim().is_empty() {
          write!(f, "\n{}", stderr.trim())?;
        }
        Ok(())
      }
      ConfigError::UnknownFormat { format } => {
        write!(f, "Unknown output format '{}'", format)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Run inside a git checkout or pass --root-path, and use --mock-git for repo-less testing: {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// Work tree has uncommitted changes
  DirtyWorkTree { entries: usize },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::DirtyWorkTree { .. } => {
        Some("Commit or stash your changes, or pass --allow-dirty to tag anyway.".to_string())
      }
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::DirtyWorkTree { entries } => {
        write!(f, "Work tree has {} uncommitted change(s)", entries)
      }
    }
  }
}

/// Result type alias for build-scope
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ScopeResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ScopeResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ScopeError>,
{
  fn context(self, ctx: impl Into<String>) -> ScopeResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ScopeResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ScopeError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
