//! Human-readable and JSON renderings of a suite run.

use super::params::ValidationParams;
use super::suite::{CheckStatus, SuiteReport};
use crate::error::{PipelineError, Result};
use crate::fs::atomic_write_file;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Persisted form of a validation run.
#[derive(Debug, Serialize)]
pub struct ValidationReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub candidate: String,
    pub reference: String,
    pub params: &'a ValidationParams,
    #[serde(flatten)]
    pub suite: &'a SuiteReport,
}

impl<'a> ValidationReport<'a> {
    pub fn new(
        candidate: impl Into<String>,
        reference: impl Into<String>,
        params: &'a ValidationParams,
        suite: &'a SuiteReport,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            candidate: candidate.into(),
            reference: reference.into(),
            params,
            suite,
        }
    }

    /// Write the report as pretty JSON, atomically.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            PipelineError::UserError(format!("failed to serialize validation report: {}", e))
        })?;
        atomic_write_file(path, &(json + "\n")).map_err(|e| {
            PipelineError::UserError(format!(
                "failed to write validation report '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Render the suite as a fixed-width text table.
pub fn render_text(report: &SuiteReport) -> String {
    let width = report
        .checks
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for check in &report.checks {
        out.push_str(&format!("{}  {:width$}", check.status, check.name, width = width));
        if let Some(message) = &check.message {
            out.push_str("  ");
            out.push_str(message);
        }
        out.push('\n');

        for group in &check.groups {
            out.push_str(&format!("      {:<14} {}", group.group, group.status));
            match (group.statistic, group.p_value) {
                (Some(d), Some(p)) => out.push_str(&format!(
                    "  D={:.4} p={:.4} (n={}, m={})",
                    d, p, group.candidate_rows, group.reference_rows
                )),
                _ => {
                    if let Some(message) = &group.message {
                        out.push_str("  ");
                        out.push_str(message);
                    }
                }
            }
            out.push('\n');
        }
    }

    let (passed, failed, skipped) = report.counts();
    let verdict = if report.passed { "PASSED" } else { "FAILED" };
    out.push_str(&format!(
        "\nValidation {}: {} passed, {} failed, {} skipped\n",
        verdict, passed, failed, skipped
    ));
    out
}

/// Short one-line list of failing check names.
pub fn failure_summary(report: &SuiteReport) -> String {
    report
        .checks
        .iter()
        .filter(|c| c.status == CheckStatus::Fail)
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
