//! Check results and the ordered suite runner.

use super::checks;
use super::ks::KsMethod;
use super::params::ValidationParams;
use crate::dataset::Dataset;
use serde::Serialize;
use tracing::{debug, info};

/// Status of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skip,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "PASS"),
            CheckStatus::Fail => write!(f, "FAIL"),
            CheckStatus::Skip => write!(f, "SKIP"),
        }
    }
}

/// Per-group outcome of the distribution check.
#[derive(Debug, Clone, Serialize)]
pub struct GroupComparison {
    pub group: String,
    pub status: CheckStatus,
    pub candidate_rows: usize,
    pub reference_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<KsMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of a single validation check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupComparison>,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Pass,
            message: None,
            groups: Vec::new(),
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Fail,
            message: Some(message.into()),
            groups: Vec::new(),
        }
    }

    pub fn skip(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Skip,
            message: Some(message.into()),
            groups: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_groups(mut self, groups: Vec<GroupComparison>) -> Self {
        self.groups = groups;
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, CheckStatus::Pass | CheckStatus::Skip)
    }
}

/// The checks of the suite, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    ColumnNames,
    NeighborhoodNames,
    ProperBoundaries,
    SimilarNeighDistrib,
    RowCount,
    PriceRange,
}

impl CheckKind {
    pub const ALL: [CheckKind; 6] = [
        CheckKind::ColumnNames,
        CheckKind::NeighborhoodNames,
        CheckKind::ProperBoundaries,
        CheckKind::SimilarNeighDistrib,
        CheckKind::RowCount,
        CheckKind::PriceRange,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::ColumnNames => "column_names",
            CheckKind::NeighborhoodNames => "neighborhood_names",
            CheckKind::ProperBoundaries => "proper_boundaries",
            CheckKind::SimilarNeighDistrib => "similar_neigh_distrib",
            CheckKind::RowCount => "row_count",
            CheckKind::PriceRange => "price_range",
        }
    }

    pub fn run(
        &self,
        candidate: &Dataset,
        reference: &Dataset,
        params: &ValidationParams,
    ) -> CheckResult {
        match self {
            CheckKind::ColumnNames => checks::column_names(candidate),
            CheckKind::NeighborhoodNames => checks::neighborhood_names(candidate),
            CheckKind::ProperBoundaries => checks::proper_boundaries(candidate),
            CheckKind::SimilarNeighDistrib => {
                checks::similar_neigh_distrib(candidate, reference, params)
            }
            CheckKind::RowCount => checks::row_count(candidate, params),
            CheckKind::PriceRange => checks::price_range(candidate, params),
        }
    }
}

/// Outcome of a suite run, one result per check in suite order.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub passed: bool,
    pub checks: Vec<CheckResult>,
}

impl SuiteReport {
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| c.status == CheckStatus::Fail)
    }

    /// Counts of (passed, failed, skipped) checks.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.checks
            .iter()
            .fold((0, 0, 0), |(p, f, s), check| match check.status {
                CheckStatus::Pass => (p + 1, f, s),
                CheckStatus::Fail => (p, f + 1, s),
                CheckStatus::Skip => (p, f, s + 1),
            })
    }
}

/// Run every check against `candidate` (and `reference` where needed).
///
/// With `params.fail_fast` the run stops at the first failure and the remaining
/// checks are reported as skipped; otherwise all checks run.
pub fn run_suite(candidate: &Dataset, reference: &Dataset, params: &ValidationParams) -> SuiteReport {
    let mut results = Vec::with_capacity(CheckKind::ALL.len());
    let mut stopped_at: Option<&'static str> = None;

    for kind in CheckKind::ALL {
        if let Some(failed) = stopped_at {
            results.push(CheckResult::skip(
                kind.name(),
                format!("not run (fail-fast after '{}')", failed),
            ));
            continue;
        }

        let result = kind.run(candidate, reference, params);
        debug!(check = kind.name(), status = %result.status, "check completed");

        if params.fail_fast && result.status == CheckStatus::Fail {
            stopped_at = Some(kind.name());
        }
        results.push(result);
    }

    let passed = results.iter().all(CheckResult::is_success);
    let report = SuiteReport {
        passed,
        checks: results,
    };
    let (p, f, s) = report.counts();
    info!(passed = p, failed = f, skipped = s, "validation suite finished");
    report
}
