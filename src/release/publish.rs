//! The publish ladder: create, recreate, or force-update a release tag
//!
//! One explicit state machine instead of nested fallback handlers:
//!
//! 1. Tag absent                -> create ref + release      -> `Created`
//! 2. Tag present               -> delete ref, then as (1)   -> `Recreated`
//! 3. Deletion refused          -> force-move the ref        -> `ForceUpdated`
//!
//! Anything else propagates as the single failure outcome.

use crate::core::error::ScopeResult;
use crate::release::client::{ReleaseClient, ReleasePayload};
use serde::Serialize;
use std::fmt;

/// Terminal outcomes of a publish attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublishOutcome {
  /// Tag did not exist; ref and release created fresh
  Created,
  /// Tag existed; ref and release deleted and recreated
  Recreated,
  /// Tag existed and could not be deleted; ref force-moved, no release rewrite
  ForceUpdated,
}

impl fmt::Display for PublishOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      PublishOutcome::Created => "created",
      PublishOutcome::Recreated => "recreated",
      PublishOutcome::ForceUpdated => "force-updated",
    };
    write!(f, "{}", s)
  }
}

/// Publish a release tag, walking the ladder as far as needed
pub fn publish(client: &dyn ReleaseClient, payload: &ReleasePayload) -> ScopeResult<PublishOutcome> {
  match client.get_ref(&payload.tag)? {
    None => {
      client.create_ref(&payload.tag, &payload.target_sha)?;
      client.create_release(payload)?;
      Ok(PublishOutcome::Created)
    }
    Some(_) => match client.delete_ref(&payload.tag) {
      Ok(()) => {
        client.create_ref(&payload.tag, &payload.target_sha)?;
        client.create_release(payload)?;
        Ok(PublishOutcome::Recreated)
      }
      Err(_) => {
        client.update_ref(&payload.tag, &payload.target_sha)?;
        Ok(PublishOutcome::ForceUpdated)
      }
    },
  }
}
