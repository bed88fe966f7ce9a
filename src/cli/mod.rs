//! CLI argument parsing for listings.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.
//!
//! Stage flags keep their underscore spelling (`--input_artifact`,
//! `--min_price`) so existing pipeline definitions keep working.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Listings: cleaning and data-quality validation for the NYC rental listings pipeline.
///
/// Each stage reads and writes versioned artifacts in a local store and
/// records its run history under the store's `runs/` directory.
#[derive(Parser, Debug)]
#[command(name = "listings")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ./listings.yaml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Artifact store root; overrides `store_root` from the config.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for listings.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clean a raw listings artifact.
    ///
    /// Drops price outliers and rows outside New York City, normalizes
    /// `last_review`, and publishes the result as a new artifact.
    Clean(CleanArgs),

    /// Run the data-quality check suite.
    ///
    /// Compares a candidate artifact against a reference artifact.
    /// Exits with code 2 when any check fails.
    Validate(ValidateArgs),

    /// Artifact store commands.
    ///
    /// Publish, list, inspect, check and alias artifacts.
    Artifact(ArtifactCommand),
}

/// Arguments for the `clean` command.
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Raw dataset artifact (`name:version` or `name:alias`).
    #[arg(long = "input_artifact")]
    pub input_artifact: String,

    /// Name for the cleaned artifact; also its file name.
    #[arg(long = "output_artifact")]
    pub output_artifact: String,

    /// Type recorded on the cleaned artifact.
    #[arg(long = "output_type")]
    pub output_type: String,

    /// Description recorded on the cleaned artifact.
    #[arg(long = "output_description")]
    pub output_description: String,

    /// Minimum price (inclusive).
    #[arg(long = "min_price", allow_negative_numbers = true)]
    pub min_price: f64,

    /// Maximum price (inclusive).
    #[arg(long = "max_price", allow_negative_numbers = true)]
    pub max_price: f64,

    /// Project the run is recorded under (default from config).
    #[arg(long = "wandb_project")]
    pub project: Option<String>,

    /// Entity owning the project (default from config).
    #[arg(long = "wandb_entity")]
    pub entity: Option<String>,
}

/// Arguments for the `validate` command.
///
/// Every option defaults to the `validation` section of the config.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Candidate dataset artifact.
    #[arg(long)]
    pub csv: Option<String>,

    /// Reference dataset artifact.
    #[arg(long = "ref")]
    pub reference: Option<String>,

    /// Significance level for the per-group KS test.
    #[arg(long = "kl_threshold")]
    pub kl_threshold: Option<f64>,

    /// Minimum price (inclusive).
    #[arg(long = "min_price", allow_negative_numbers = true)]
    pub min_price: Option<f64>,

    /// Maximum price (inclusive).
    #[arg(long = "max_price", allow_negative_numbers = true)]
    pub max_price: Option<f64>,

    /// Exclusive lower bound on the row count.
    #[arg(long = "min_rows")]
    pub min_rows: Option<usize>,

    /// Exclusive upper bound on the row count.
    #[arg(long = "max_rows")]
    pub max_rows: Option<usize>,

    /// Handling of groups absent from the reference (fail, skip).
    #[arg(long)]
    pub missing_groups: Option<String>,

    /// Stop at the first failing check.
    #[arg(long)]
    pub fail_fast: bool,

    /// Also write the full results as JSON to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Project the run is recorded under (default from config).
    #[arg(long = "wandb_project")]
    pub project: Option<String>,
}

/// Artifact subcommand wrapper.
#[derive(Parser, Debug)]
pub struct ArtifactCommand {
    #[command(subcommand)]
    pub action: ArtifactAction,
}

/// Available artifact actions.
#[derive(Subcommand, Debug)]
pub enum ArtifactAction {
    /// Publish a local file as a new artifact version.
    ///
    /// Publishing content identical to the latest version returns that
    /// version instead of creating a new one.
    Put(ArtifactPutArgs),

    /// List artifact versions.
    List(ArtifactListArgs),

    /// Show the manifest of one artifact version.
    Show(ArtifactRefArgs),

    /// Download an artifact and verify it holds exactly one CSV file.
    Check(ArtifactRefArgs),

    /// Point an alias at an artifact version.
    Alias(ArtifactAliasArgs),
}

/// Arguments for `artifact put`.
#[derive(Parser, Debug)]
pub struct ArtifactPutArgs {
    /// File to publish.
    pub file: PathBuf,

    /// Artifact name (default: the file name).
    #[arg(long)]
    pub name: Option<String>,

    /// Artifact type, e.g. `raw_data`.
    #[arg(long = "type")]
    pub artifact_type: String,

    /// Free-text description.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Extra aliases to attach (repeatable).
    #[arg(long)]
    pub alias: Vec<String>,
}

/// Arguments for `artifact list`.
#[derive(Parser, Debug)]
pub struct ArtifactListArgs {
    /// Only list artifacts whose name matches this glob.
    #[arg(long)]
    pub filter: Option<String>,
}

/// Arguments naming a single artifact.
#[derive(Parser, Debug)]
pub struct ArtifactRefArgs {
    /// Artifact reference (`name`, `name:vN` or `name:alias`).
    pub reference: String,
}

/// Arguments for `artifact alias`.
#[derive(Parser, Debug)]
pub struct ArtifactAliasArgs {
    /// Artifact reference to alias.
    pub reference: String,

    /// Alias name, e.g. `reference`.
    pub alias: String,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
