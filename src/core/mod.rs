//! Core building blocks for build-scope operations
//!
//! - **config**: Per-invocation analyzer configuration and CI event context
//! - **error**: Comprehensive error types with contextual help messages
//! - **vcs**: Git operations abstraction (SystemGit)

pub mod config;
pub mod error;
pub mod vcs;
