mod commands;
mod core;
mod release;
mod scope;
mod utils;

use clap::{Parser, Subcommand};
use crate::core::error::{ScopeError, print_error};
use std::path::PathBuf;

/// Analyze git changes into app/container build matrices for CI pipelines
#[derive(Parser)]
#[command(name = "build-scope")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct ScopeCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Analyze the diff against the comparison ref and emit the build matrix
  Analyze {
    /// Repository root to scan
    #[arg(long, default_value = ".")]
    root_path: PathBuf,

    /// Keep only unit paths containing this substring (literal, not a glob)
    #[arg(long, default_value = "")]
    include_pattern: String,

    /// Drop unit paths containing this substring; wins over --include-pattern
    #[arg(long, default_value = "")]
    exclude_pattern: String,

    /// Explicit git ref to compare against (overrides event-based detection)
    #[arg(long, visible_alias = "ref", default_value = "")]
    comparison_ref: String,

    /// Output format: github (key=value lines) or json
    #[arg(long, default_value = "github")]
    output_format: String,

    /// Bypass git entirely; emit an empty-change matrix (repo-less testing)
    #[arg(long)]
    mock_git: bool,
  },

  /// Release tagging driven by commit message / branch name conventions
  #[command(subcommand)]
  Release(ReleaseCommands),
}

#[derive(Subcommand)]
enum ReleaseCommands {
  /// Show the proposed version bump for HEAD
  Plan {
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Create (or recreate, or force-update) the release tag for HEAD
  Apply {
    /// Show what would happen without making changes
    #[arg(long)]
    dry_run: bool,

    /// Tag even with uncommitted changes in the work tree
    #[arg(long)]
    allow_dirty: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = ScopeCli::parse();

  let result = match cli.command {
    Commands::Analyze {
      root_path,
      include_pattern,
      exclude_pattern,
      comparison_ref,
      output_format,
      mock_git,
    } => commands::run_analyze(
      root_path,
      include_pattern,
      exclude_pattern,
      comparison_ref,
      output_format,
      mock_git,
    ),

    Commands::Release(release_cmd) => match release_cmd {
      ReleaseCommands::Plan { json } => commands::run_release_plan(json),
      ReleaseCommands::Apply { dry_run, allow_dirty } => commands::run_release_apply(dry_run, allow_dirty),
    },
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ScopeError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
