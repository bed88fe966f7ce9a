//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for the listings pipeline.
///
/// This struct represents the contents of `listings.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Tracking settings
    // =========================================================================
    /// Root directory of the local artifact store (default: ".artifacts").
    #[serde(default = "default_store_root")]
    pub store_root: String,

    /// Project that runs are grouped under (default: "nyc_airbnb").
    #[serde(default = "default_project")]
    pub project: String,

    /// Team or user owning the project. Informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,

    // =========================================================================
    // Validation settings
    // =========================================================================
    /// Defaults for `listings validate`; CLI flags override each field.
    #[serde(default)]
    pub validation: ValidationSettings,
}

/// Validation-stage defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Candidate artifact reference.
    #[serde(default = "default_candidate")]
    pub csv: String,

    /// Reference artifact reference.
    #[serde(default = "default_reference")]
    pub reference: String,

    /// Significance level for the per-group KS test.
    #[serde(default = "default_kl_threshold")]
    pub kl_threshold: f64,

    /// Lower bound (inclusive) for listing prices.
    #[serde(default = "default_min_price")]
    pub min_price: f64,

    /// Upper bound (inclusive) for listing prices.
    #[serde(default = "default_max_price")]
    pub max_price: f64,

    /// Exclusive lower bound on row count.
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,

    /// Exclusive upper bound on row count.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// What to do with a candidate group that the reference lacks.
    #[serde(default)]
    pub missing_group_policy: MissingGroupPolicy,

    /// Stop at the first failing check instead of running the whole suite.
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_root: default_store_root(),
            project: default_project(),
            entity: None,
            validation: ValidationSettings::default(),
        }
    }
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            csv: default_candidate(),
            reference: default_reference(),
            kl_threshold: default_kl_threshold(),
            min_price: default_min_price(),
            max_price: default_max_price(),
            min_rows: default_min_rows(),
            max_rows: default_max_rows(),
            missing_group_policy: MissingGroupPolicy::default(),
            fail_fast: false,
        }
    }
}
