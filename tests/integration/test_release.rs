//! Integration tests for `build-scope release`

use crate::helpers::{TestRepo, git, run_scope, run_scope_unchecked};
use anyhow::Result;

#[test]
fn test_plan_defaults_to_patch() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("README.md", "# demo\n")?;
  repo.commit("Plain commit, no markers")?;

  let output = run_scope(&repo.path, &["release", "plan", "--json"], &[])?;
  let plan: serde_json::Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout))?;

  assert_eq!(plan["bump"], "patch");
  assert_eq!(plan["current_version"], "0.0.0");
  assert_eq!(plan["proposed_version"], "0.0.1");

  Ok(())
}

#[test]
fn test_plan_branch_prefix_picks_minor() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("README.md", "# demo\n")?;
  repo.commit("Initial")?;

  repo.checkout_new_branch("feature/search")?;
  repo.write_file("src/search.rs", "pub fn search() {}\n")?;
  repo.commit("Add search")?;

  let output = run_scope(&repo.path, &["release", "plan", "--json"], &[])?;
  let plan: serde_json::Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout))?;

  assert_eq!(plan["branch"], "feature/search");
  assert_eq!(plan["bump"], "minor");
  assert_eq!(plan["proposed_version"], "0.1.0");

  Ok(())
}

#[test]
fn test_plan_message_marker_beats_branch() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("README.md", "# demo\n")?;
  repo.commit("Initial")?;

  repo.checkout_new_branch("fix/api")?;
  repo.write_file("src/api.rs", "pub fn api() {}\n")?;
  repo.commit("Rework everything #major")?;

  let output = run_scope(&repo.path, &["release", "plan", "--json"], &[])?;
  let plan: serde_json::Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout))?;

  assert_eq!(plan["bump"], "major");
  assert_eq!(plan["proposed_version"], "1.0.0");

  Ok(())
}

#[test]
fn test_plan_continues_from_latest_tag() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("README.md", "# demo\n")?;
  repo.commit("Initial")?;
  git(&repo.path, &["tag", "v1.4.2"])?;

  repo.write_file("README.md", "# demo v2\n")?;
  repo.commit("Docs tweak")?;

  let output = run_scope(&repo.path, &["release", "plan", "--json"], &[])?;
  let plan: serde_json::Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout))?;

  assert_eq!(plan["current_version"], "1.4.2");
  assert_eq!(plan["proposed_version"], "1.4.3");

  Ok(())
}

#[test]
fn test_apply_dry_run_creates_nothing() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("README.md", "# demo\n")?;
  repo.commit("Initial")?;

  let output = run_scope(&repo.path, &["release", "apply", "--dry-run"], &[])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Dry-run"), "expected dry-run notice: {}", stdout);
  assert!(repo.tags()?.is_empty(), "dry-run must not create tags");

  Ok(())
}

#[test]
fn test_apply_none_marker_releases_nothing() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("README.md", "# demo\n")?;
  repo.commit("Docs only #none")?;

  let output = run_scope(&repo.path, &["release", "apply"], &[])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("nothing to release"), "unexpected output: {}", stdout);
  assert!(repo.tags()?.is_empty());

  Ok(())
}

#[test]
fn test_apply_refuses_dirty_work_tree() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("README.md", "# demo\n")?;
  repo.commit("Initial")?;

  repo.write_file("README.md", "# demo, uncommitted\n")?;

  let output = run_scope_unchecked(&repo.path, &["release", "apply"], &[])?;

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("uncommitted"), "unexpected stderr: {}", stderr);
  assert!(repo.tags()?.is_empty());

  Ok(())
}
