//! Data-quality validation for listings datasets.
//!
//! Checks run as an ordered suite over a candidate dataset and, for the
//! distribution check, a trusted reference dataset:
//! - Schema: exact column names and order
//! - Domain: the five neighbourhood groups, no more, no fewer
//! - Geography: longitude/latitude inside the New York City box
//! - Distribution: per-group KS test of prices against the reference
//! - Size and price range
//!
//! A failing check is data, not an error. Only loading problems surface as
//! `PipelineError`s.

pub mod checks;
pub mod ks;
mod params;
mod report;
mod suite;


pub use ks::{KsError, KsMethod, KsOutcome, kolmogorov_sf, ks_2samp};
pub use params::ValidationParams;
pub use report::{ValidationReport, failure_summary, render_text};
pub use suite::{CheckKind, CheckResult, CheckStatus, GroupComparison, SuiteReport, run_suite};
