//! CLI commands for build-scope
//!
//! - **analyze**: diff the work tree against the comparison reference and
//!   emit the app/container build matrix
//! - **release**: plan and publish release tags

pub mod analyze;
pub mod release;

pub use analyze::run_analyze;
pub use release::{run_release_apply, run_release_plan};
