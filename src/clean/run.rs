//! Cleaning stage driver: fetch input, clean, publish output.

use super::{CleanConfig, clean_dataset};
use crate::artifact::{ArtifactDraft, ArtifactManifest};
use crate::context::RunContext;
use crate::dataset::{read_csv, write_csv};
use crate::error::Result;
use serde_json::json;
use tracing::info;

/// Run the cleaning stage inside `ctx`.
///
/// The cleaned CSV is written into the run directory under the output artifact
/// name and published with the configured type and description.
pub fn run_cleaning(ctx: &mut RunContext, config: &CleanConfig) -> Result<ArtifactManifest> {
    ctx.update_config(config)?;

    let input_path = ctx.use_artifact(&config.input_artifact.to_string())?;
    info!(path = %input_path.display(), "loading raw listings");
    let raw = read_csv(&input_path)?;

    let (cleaned, summary) = clean_dataset(&raw, &config.params)?;
    info!(
        input_rows = summary.input_rows,
        dropped_price = summary.dropped_price,
        dropped_location = summary.dropped_location,
        unparsed_reviews = summary.unparsed_reviews,
        output_rows = summary.output_rows,
        "cleaned listings"
    );

    let output_path = ctx.run_dir().join(&config.output_artifact);
    write_csv(&cleaned, &output_path)?;

    let draft = ArtifactDraft::new(
        &config.output_artifact,
        &config.output_type,
        &config.output_description,
    )
    .with_file(&output_path)
    .with_metadata("rows", json!(summary.output_rows))
    .with_metadata("summary", json!(summary))
    .with_metadata("input", json!(config.input_artifact.to_string()));

    ctx.log_artifact(&draft)
}
