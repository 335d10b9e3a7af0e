//! The build-scope analysis pipeline
//!
//! Five stages, strictly left to right, no state beyond the invocation:
//!
//! - **refs**: resolve the comparison reference from event context / override
//! - **diff**: collect change records between the reference and the work tree
//! - **discover**: walk the tree for unit candidates, attribute changes
//! - **metadata**: resolve app names, container names and build contexts
//! - **matrix**: assemble the deterministic `apps`/`containers` output

pub mod diff;
pub mod discover;
pub mod matrix;
pub mod metadata;
pub mod refs;

use crate::core::config::{AnalyzerConfig, EventContext};
use crate::core::error::ScopeResult;
use crate::core::vcs::{ChangeRecord, SystemGit};
use discover::PathFilter;
use matrix::Matrix;
use refs::ResolvedRef;

/// One analysis run over a repository tree
pub struct Analyzer {
  config: AnalyzerConfig,
  event: EventContext,
  git: Option<SystemGit>,
}

impl Analyzer {
  /// Build an analyzer; opens the repository unless `--mock-git` is set
  pub fn new(config: AnalyzerConfig, event: EventContext) -> ScopeResult<Self> {
    let git = if config.mock_git {
      None
    } else {
      Some(SystemGit::open(&config.root_path)?)
    };

    Ok(Self { config, event, git })
  }

  /// Run the full pipeline and produce the matrix
  pub fn analyze(&self) -> ScopeResult<Matrix> {
    let (comparison, records) = match &self.git {
      Some(git) => {
        let comparison = refs::resolve_comparison_ref(git, &self.event, &self.config.comparison_ref)?;
        let records = diff::collect_changes(git, &comparison)?;
        (comparison, records)
      }
      // Mock mode: nothing to compare, nothing changed, full inventory only
      None => (ResolvedRef::none(), Vec::<ChangeRecord>::new()),
    };

    let filter = PathFilter::new(&self.config.include_pattern, &self.config.exclude_pattern);

    let mut discovery = discover::discover_units(&self.config.root_path, &filter);
    discovery.attribute_changes(&records);

    let fallback_sha = comparison.commit_sha.clone().unwrap_or_default();
    let deletions = discover::group_deletions(&records, &filter, &fallback_sha);

    let units: Vec<_> = discovery
      .units
      .iter()
      .map(|(folder, evidence)| metadata::resolve_unit(&self.config.root_path, folder, evidence))
      .collect();

    Ok(matrix::build_matrix(&units, &discovery, &deletions, &comparison.name))
  }
}
