//! Implementation of the `listings validate` command.
//!
//! # Steps
//!
//! 1. Merge CLI overrides onto the config's validation defaults
//! 2. Open a run and record the effective parameters
//! 3. Fetch and load the candidate and reference datasets
//! 4. Run the check suite and log each result to the run
//! 5. Print the summary table (and optionally write the JSON report)

use super::CommandEnv;
use crate::artifact::ArtifactRef;
use crate::cli::ValidateArgs;
use crate::config::{MissingGroupPolicy, ValidationSettings};
use crate::context::{RunContext, RunSettings};
use crate::dataset::read_csv;
use crate::error::{PipelineError, Result};
use crate::validate::{SuiteReport, ValidationParams, ValidationReport, failure_summary, render_text, run_suite};
use serde_json::json;
use std::path::Path;
use tracing::{error, info};

pub const DATA_CHECK_GROUP: &str = "data_check";
pub const DATA_CHECK_JOB: &str = "data_tests";

/// Execute the `listings validate` command.
///
/// # Exit Codes
///
/// - 0: All checks passed
/// - 1: Invalid arguments or config
/// - 2: One or more checks failed
/// - 3: Candidate or reference artifact missing
/// - 4: Candidate or reference CSV unreadable
pub fn cmd_validate(env: &CommandEnv, args: ValidateArgs) -> Result<()> {
    let settings = merge_settings(&env.config.validation, &args)?;
    let params = ValidationParams::from_settings(&settings)?;
    ArtifactRef::parse(&settings.csv)?;
    ArtifactRef::parse(&settings.reference)?;

    let project = args.project.unwrap_or_else(|| env.config.project.clone());
    let run_settings = RunSettings::new(project, DATA_CHECK_GROUP, DATA_CHECK_JOB)
        .with_entity(env.config.entity.clone());
    let mut ctx = RunContext::init(Box::new(env.store()), run_settings)?;

    let report = match execute(&mut ctx, &settings, &params, args.report.as_deref()) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "validation run aborted");
            if let Err(finish_err) = ctx.finish(false) {
                error!(error = %finish_err, "failed to close run");
            }
            return Err(e);
        }
    };

    ctx.finish(report.passed)?;
    print!("{}", render_text(&report));

    if report.passed {
        Ok(())
    } else {
        let failed = report.failures().count();
        Err(PipelineError::ValidationError(format!(
            "{} check(s) failed: {}",
            failed,
            failure_summary(&report)
        )))
    }
}

fn execute(
    ctx: &mut RunContext,
    settings: &ValidationSettings,
    params: &ValidationParams,
    report_path: Option<&Path>,
) -> Result<SuiteReport> {
    ctx.update_config(&json!({
        "csv": settings.csv,
        "ref": settings.reference,
        "params": params,
    }))?;

    let candidate_path = ctx.use_artifact(&settings.csv)?;
    let reference_path = ctx.use_artifact(&settings.reference)?;
    let candidate = read_csv(&candidate_path)?;
    let reference = read_csv(&reference_path)?;
    info!(
        candidate_rows = candidate.len(),
        reference_rows = reference.len(),
        "datasets loaded"
    );

    let report = run_suite(&candidate, &reference, params);
    for check in &report.checks {
        ctx.log_check(check)?;
    }

    if let Some(path) = report_path {
        ValidationReport::new(&settings.csv, &settings.reference, params, &report).write(path)?;
        info!(path = %path.display(), "wrote validation report");
    }

    Ok(report)
}

/// Apply CLI overrides to the configured defaults.
fn merge_settings(base: &ValidationSettings, args: &ValidateArgs) -> Result<ValidationSettings> {
    let mut settings = base.clone();

    if let Some(csv) = &args.csv {
        settings.csv = csv.clone();
    }
    if let Some(reference) = &args.reference {
        settings.reference = reference.clone();
    }
    if let Some(v) = args.kl_threshold {
        settings.kl_threshold = v;
    }
    if let Some(v) = args.min_price {
        settings.min_price = v;
    }
    if let Some(v) = args.max_price {
        settings.max_price = v;
    }
    if let Some(v) = args.min_rows {
        settings.min_rows = v;
    }
    if let Some(v) = args.max_rows {
        settings.max_rows = v;
    }
    if let Some(policy) = &args.missing_groups {
        settings.missing_group_policy = MissingGroupPolicy::from_str(policy).ok_or_else(|| {
            PipelineError::UserError(format!(
                "invalid --missing-groups '{}': expected 'fail' or 'skip'",
                policy
            ))
        })?;
    }
    settings.fail_fast |= args.fail_fast;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dataset::write_csv_to;
    use crate::events::{EventAction, read_events};
    use crate::exit_codes;
    use crate::test_support::{create_test_store, publish_file, sample_dataset};
    use std::fs;

    fn args(csv: &str, reference: &str) -> ValidateArgs {
        ValidateArgs {
            csv: Some(csv.to_string()),
            reference: Some(reference.to_string()),
            kl_threshold: None,
            min_price: None,
            max_price: None,
            min_rows: Some(50),
            max_rows: None,
            missing_groups: None,
            fail_fast: false,
            report: None,
            project: None,
        }
    }

    fn csv_text(rows: usize, price_shift: f64) -> String {
        let mut buffer = Vec::new();
        write_csv_to(&sample_dataset(rows, price_shift), &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn env_for(store: &crate::artifact::FsArtifactStore) -> CommandEnv {
        CommandEnv {
            config: Config::default(),
            store_root: store.root().to_path_buf(),
        }
    }

    fn run_dirs(store: &crate::artifact::FsArtifactStore) -> Vec<std::path::PathBuf> {
        fs::read_dir(store.root().join("runs"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }

    #[test]
    fn test_merge_settings_overrides() {
        let mut a = args("c.csv:v2", "c.csv:v1");
        a.kl_threshold = Some(0.05);
        a.missing_groups = Some("skip".to_string());
        a.fail_fast = true;

        let merged = merge_settings(&ValidationSettings::default(), &a).unwrap();

        assert_eq!(merged.csv, "c.csv:v2");
        assert_eq!(merged.reference, "c.csv:v1");
        assert_eq!(merged.kl_threshold, 0.05);
        assert_eq!(merged.min_rows, 50);
        assert_eq!(merged.max_price, 350.0);
        assert_eq!(merged.missing_group_policy, MissingGroupPolicy::Skip);
        assert!(merged.fail_fast);
    }

    #[test]
    fn test_merge_settings_rejects_unknown_policy() {
        let mut a = args("c.csv", "c.csv");
        a.missing_groups = Some("ignore".to_string());

        let err = merge_settings(&ValidationSettings::default(), &a).unwrap_err();
        assert!(err.to_string().contains("--missing-groups"));
    }

    #[test]
    fn test_cmd_validate_passes_and_logs_checks() {
        let (temp, store) = create_test_store();
        let content = csv_text(100, 0.0);
        publish_file(&store, temp.path(), "clean_sample.csv", "clean_sample", &content);
        let report_path = temp.path().join("report.json");
        let mut a = args("clean_sample.csv:latest", "clean_sample.csv:v1");
        a.report = Some(report_path.clone());

        cmd_validate(&env_for(&store), a).unwrap();

        let runs = run_dirs(&store);
        assert_eq!(runs.len(), 1);
        let events = read_events(&runs[0]).unwrap();
        let checks = events
            .iter()
            .filter(|e| e.action == EventAction::CheckCompleted)
            .count();
        assert_eq!(checks, 6);
        let finished = events.last().unwrap();
        assert_eq!(finished.details["success"], json!(true));
        assert!(report_path.exists());
    }

    #[test]
    fn test_cmd_validate_failure_is_validation_error() {
        let (temp, store) = create_test_store();
        publish_file(&store, temp.path(), "clean_sample.csv", "clean_sample", &csv_text(100, 0.0));
        publish_file(&store, temp.path(), "clean_sample.csv", "clean_sample", &csv_text(100, 120.0));

        let err = cmd_validate(
            &env_for(&store),
            args("clean_sample.csv:v2", "clean_sample.csv:v1"),
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::ValidationError(_)));
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
        assert!(err.to_string().contains("similar_neigh_distrib"));
    }

    #[test]
    fn test_cmd_validate_missing_reference_is_artifact_error() {
        let (temp, store) = create_test_store();
        publish_file(&store, temp.path(), "clean_sample.csv", "clean_sample", &csv_text(100, 0.0));

        let err = cmd_validate(
            &env_for(&store),
            args("clean_sample.csv:latest", "clean_sample.csv:reference"),
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::ArtifactError(_)));
        let events = read_events(&run_dirs(&store)[0]).unwrap();
        assert_eq!(events.last().unwrap().details["success"], json!(false));
    }

    #[test]
    fn test_cmd_validate_bad_reference_syntax_is_user_error() {
        let (_temp, store) = create_test_store();

        let err = cmd_validate(&env_for(&store), args("clean sample", "x.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::UserError(_)));
    }
}
