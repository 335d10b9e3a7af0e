//! `build-scope release` - Tag and publish releases
//!
//! Plan: pick a semver bump from the HEAD commit subject / branch name and
//! show the proposed version. Apply: walk the publish ladder (create,
//! recreate, force-update) against git tags and the GitHub release API.

use crate::core::error::{ScopeError, ScopeResult, ValidationError};
use crate::core::vcs::SystemGit;
use crate::release::{GhClient, ReleasePayload, VersionBump, detect_bump, publish};
use serde_json::json;
use std::env;

/// Everything `release plan` computes; `release apply` executes it
struct Plan {
  branch: String,
  subject: String,
  bump: VersionBump,
  current: semver::Version,
  next: semver::Version,
  head_sha: String,
}

fn build_plan(git: &SystemGit) -> ScopeResult<Plan> {
  let branch = git.current_branch()?;
  let subject = git.head_subject()?;
  let bump = detect_bump(&subject, &branch);

  let current = match git.latest_tag()? {
    Some(tag) => semver::Version::parse(tag.trim_start_matches('v')).map_err(|e| {
      ScopeError::with_help(
        format!("Latest tag '{}' is not semver: {}", tag, e),
        "Tag releases as vMAJOR.MINOR.PATCH so the next version can be computed.",
      )
    })?,
    None => semver::Version::new(0, 0, 0),
  };

  let next = bump.apply(&current);
  let head_sha = git.head_commit()?;

  Ok(Plan {
    branch,
    subject,
    bump,
    current,
    next,
    head_sha,
  })
}

/// Run the release plan command
pub fn run_release_plan(json: bool) -> ScopeResult<()> {
  let git = SystemGit::open(&env::current_dir()?)?;
  let plan = build_plan(&git)?;

  if json {
    let output = json!({
        "branch": plan.branch,
        "subject": plan.subject,
        "bump": plan.bump.as_str(),
        "current_version": plan.current.to_string(),
        "proposed_version": plan.next.to_string(),
        "target_sha": plan.head_sha,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    return Ok(());
  }

  println!("📋 Release Plan");
  println!();
  println!("  Branch:   {}", plan.branch);
  println!("  Subject:  {}", plan.subject);
  println!("  Current:  {}", plan.current);

  if plan.bump == VersionBump::None {
    println!("  Status:   bump suppressed (#none)");
  } else {
    println!("  Proposed: {} ({})", plan.next, plan.bump.as_str());
    println!();
    println!("To release:");
    println!("  build-scope release apply");
  }

  Ok(())
}

/// Run the release apply command
pub fn run_release_apply(dry_run: bool, allow_dirty: bool) -> ScopeResult<()> {
  let git = SystemGit::open(&env::current_dir()?)?;
  let plan = build_plan(&git)?;

  if plan.bump == VersionBump::None {
    println!("⚠️  Bump suppressed by #none marker; nothing to release");
    println!("   Current version: {}", plan.current);
    return Ok(());
  }

  if !allow_dirty {
    let entries = git.dirty_entries()?;
    if entries > 0 {
      return Err(ScopeError::Validation(ValidationError::DirtyWorkTree { entries }));
    }
  }

  let tag = format!("v{}", plan.next);
  let payload = ReleasePayload {
    tag: tag.clone(),
    title: tag.clone(),
    notes: format!(
      "{}\n\nReleased {}",
      plan.subject,
      chrono::Utc::now().format("%Y-%m-%d")
    ),
    target_sha: plan.head_sha.clone(),
  };

  println!("📦 Release {}", tag);
  println!();
  println!("  Current:  {}", plan.current);
  println!("  Proposed: {} ({})", plan.next, plan.bump.as_str());
  println!("  Target:   {}", plan.head_sha);
  println!();

  if dry_run {
    println!("🔍 Dry-run mode (no tag or release created)");
    return Ok(());
  }

  let client = GhClient::new(&git);
  let outcome = publish(&client, &payload)?;

  println!("✅ Release {} {}", tag, outcome);
  println!();
  println!("Next steps:");
  println!("  git push origin {}", tag);

  Ok(())
}
