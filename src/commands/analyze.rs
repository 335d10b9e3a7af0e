//! `build-scope analyze` - Produce the build matrix for the current diff
//!
//! Resolves the comparison reference from the CI event context (or an explicit
//! override), diffs the work tree against it, groups changed files into
//! app/container units and emits the matrix for downstream parallel jobs.

use crate::core::config::{AnalyzerConfig, EventContext, OutputFormat};
use crate::core::error::{ScopeResult, ResultExt};
use crate::scope::Analyzer;
use crate::scope::matrix::Matrix;
use std::io::Write;
use std::path::PathBuf;

/// Run the analyze command
pub fn run_analyze(
  root_path: PathBuf,
  include_pattern: String,
  exclude_pattern: String,
  comparison_ref: String,
  output_format: String,
  mock_git: bool,
) -> ScopeResult<()> {
  let format = OutputFormat::from_str(&output_format)?;

  let config = AnalyzerConfig::new(root_path, include_pattern, exclude_pattern, comparison_ref, mock_git);
  let event = EventContext::from_env();

  let analyzer = Analyzer::new(config, event)?;
  let matrix = analyzer.analyze()?;

  emit(&matrix, format)
}

/// Write the matrix in the requested format
fn emit(matrix: &Matrix, format: OutputFormat) -> ScopeResult<()> {
  match format {
    OutputFormat::Json => {
      println!("{}", serde_json::to_string_pretty(matrix)?);
    }
    OutputFormat::Github => {
      let lines = format!(
        "matrix={}\nref={}\n",
        serde_json::to_string(matrix)?,
        matrix.comparison_ref
      );

      // GitHub Actions reads step outputs from the file named by
      // $GITHUB_OUTPUT; anywhere else the lines go to stdout.
      match std::env::var("GITHUB_OUTPUT") {
        Ok(output_path) if !output_path.is_empty() => {
          let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&output_path)
            .with_context(|| format!("Failed to open GITHUB_OUTPUT file {}", output_path))?;
          file
            .write_all(lines.as_bytes())
            .context("Failed to write GITHUB_OUTPUT")?;
        }
        _ => {
          print!("{}", lines);
        }
      }
    }
  }

  Ok(())
}
