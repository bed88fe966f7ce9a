//! Configuration types and defaults.
//!
//! This module defines enums and default value functions used by the
//! Config struct.

use serde::{Deserialize, Serialize};

/// Handling of a neighbourhood group present in the candidate dataset but
/// absent from the reference dataset during the distribution check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingGroupPolicy {
    /// The group fails the similarity check (default).
    #[default]
    Fail,
    /// The group is reported as skipped and does not affect the outcome.
    Skip,
}

impl MissingGroupPolicy {
    /// Parse a policy from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fail" => Some(Self::Fail),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

impl std::fmt::Display for MissingGroupPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingGroupPolicy::Fail => write!(f, "fail"),
            MissingGroupPolicy::Skip => write!(f, "skip"),
        }
    }
}

// Default value functions for serde
pub(crate) fn default_store_root() -> String {
    ".artifacts".to_string()
}
pub(crate) fn default_project() -> String {
    "nyc_airbnb".to_string()
}
pub(crate) fn default_candidate() -> String {
    "clean_sample.csv:latest".to_string()
}
pub(crate) fn default_reference() -> String {
    "clean_sample.csv:reference".to_string()
}
pub(crate) fn default_kl_threshold() -> f64 {
    0.2
}
pub(crate) fn default_min_price() -> f64 {
    10.0
}
pub(crate) fn default_max_price() -> f64 {
    350.0
}
pub(crate) fn default_min_rows() -> usize {
    15_000
}
pub(crate) fn default_max_rows() -> usize {
    1_000_000
}
