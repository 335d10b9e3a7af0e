//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A test repository with git history and app/container units
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestRepo {
  /// Create a new test repository with main as default branch
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    Ok(Self { _root: root, path })
  }

  /// Create a bare directory tree without git (for --mock-git tests)
  pub fn without_git() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Add a unit directory with an optional descriptor and any Dockerfiles
  pub fn add_unit(&self, unit_path: &str, descriptor: Option<(&str, &str)>, dockerfiles: &[&str]) -> Result<()> {
    let dir = self.path.join(unit_path);
    std::fs::create_dir_all(&dir)?;

    if let Some((filename, app_name)) = descriptor {
      std::fs::write(dir.join(filename), format!("name: {}\ntype: service\n", app_name))?;
    }

    for dockerfile in dockerfiles {
      std::fs::write(dir.join(dockerfile), "FROM alpine:3.20\n")?;
    }

    Ok(())
  }

  /// Write a file (creating parent directories)
  pub fn write_file(&self, rel_path: &str, content: &str) -> Result<()> {
    let file_path = self.path.join(rel_path);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
  }

  /// Delete a file
  pub fn delete_file(&self, rel_path: &str) -> Result<()> {
    std::fs::remove_file(self.path.join(rel_path))?;
    Ok(())
  }

  /// Commit current changes, returning the commit SHA
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "-A"])?;
    git(&self.path, &["commit", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create and check out a branch
  pub fn checkout_new_branch(&self, name: &str) -> Result<()> {
    git(&self.path, &["checkout", "-b", name])?;
    Ok(())
  }

  /// List local tags
  pub fn tags(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["tag", "--list"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the build-scope binary without asserting on the exit status
///
/// The ambient CI environment is stripped so tests fully control the event
/// context through `envs`.
pub fn run_scope_unchecked(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_build-scope");

  let mut cmd = Command::new(bin);
  cmd
    .current_dir(cwd)
    .env_remove("GITHUB_EVENT_NAME")
    .env_remove("GITHUB_BASE_REF")
    .env_remove("GITHUB_OUTPUT")
    .args(args);

  for (key, value) in envs {
    cmd.env(key, value);
  }

  cmd.output().context("Failed to run build-scope")
}

/// Run the build-scope binary, failing the test on a non-zero exit
pub fn run_scope(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let output = run_scope_unchecked(cwd, args, envs)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "build-scope command failed: build-scope {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run `analyze --output-format json` and parse the matrix
pub fn analyze_json(cwd: &Path, extra_args: &[&str], envs: &[(&str, &str)]) -> Result<serde_json::Value> {
  let mut args = vec!["analyze", "--output-format", "json"];
  args.extend_from_slice(extra_args);

  let output = run_scope(cwd, &args, envs)?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  serde_json::from_str(&stdout).context("analyze did not emit valid JSON")
}
