//! Release tagging: bump selection and the tag/release publish ladder
//!
//! - **bump**: semver bump level from commit-message markers / branch prefixes
//! - **client**: narrow interface over git tag refs and the GitHub release API
//! - **publish**: the create -> recreate -> force-update state machine

pub mod bump;
pub mod client;
pub mod publish;

pub use bump::{VersionBump, detect_bump};
pub use client::{GhClient, ReleaseClient, ReleasePayload};
pub use publish::{PublishOutcome, publish};
