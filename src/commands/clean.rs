//! Implementation of the `listings clean` command.

use super::CommandEnv;
use crate::clean::{CleanConfig, run_cleaning};
use crate::cli::CleanArgs;
use crate::context::{RunContext, RunSettings};
use crate::error::Result;
use tracing::error;

pub const CLEANING_GROUP: &str = "cleaning";
pub const CLEANING_JOB: &str = "basic_cleaning";

/// Execute the `listings clean` command.
///
/// # Exit Codes
///
/// - 0: Cleaned artifact published
/// - 1: Invalid arguments or config
/// - 3: Input artifact missing or store failure
/// - 4: Malformed CSV or missing required columns
pub fn cmd_clean(env: &CommandEnv, args: CleanArgs) -> Result<()> {
    let config = CleanConfig::new(
        &args.input_artifact,
        &args.output_artifact,
        &args.output_type,
        &args.output_description,
        args.min_price,
        args.max_price,
    )?;

    let settings = RunSettings::new(
        args.project.unwrap_or_else(|| env.config.project.clone()),
        CLEANING_GROUP,
        CLEANING_JOB,
    )
    .with_entity(args.entity.or_else(|| env.config.entity.clone()));

    let mut ctx = RunContext::init(Box::new(env.store()), settings)?;

    match run_cleaning(&mut ctx, &config) {
        Ok(manifest) => {
            let rows = manifest
                .metadata
                .get("rows")
                .and_then(|v| v.as_u64())
                .unwrap_or_default();
            ctx.finish(true)?;
            println!("Published {} ({} rows)", manifest.reference(), rows);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "cleaning failed");
            if let Err(finish_err) = ctx.finish(false) {
                error!(error = %finish_err, "failed to close run");
            }
            Err(e)
        }
    }
}
