//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::artifact::ArtifactRef;
use crate::error::{PipelineError, Result};
use std::path::Path;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "listings.yaml";

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(PipelineError::UserError)` - Read/parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config for a CLI invocation.
    ///
    /// An explicitly requested file must exist. Without one, `listings.yaml`
    /// is used when present and built-in defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                PipelineError::UserError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            PipelineError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `store_root` and `project` must be non-empty
    /// - `validation.csv` and `validation.reference` must be artifact references
    /// - `validation.kl_threshold` must lie strictly between 0 and 1
    /// - `validation.min_price` must not exceed `validation.max_price`
    /// - `validation.min_rows` must be below `validation.max_rows`
    pub fn validate(&self) -> Result<()> {
        if self.store_root.trim().is_empty() {
            return Err(invalid("store_root must be non-empty"));
        }

        if self.project.trim().is_empty() {
            return Err(invalid("project must be non-empty"));
        }

        let v = &self.validation;

        for (field, value) in [("validation.csv", &v.csv), ("validation.reference", &v.reference)] {
            ArtifactRef::parse(value).map_err(|e| invalid(&format!("{}: {}", field, e)))?;
        }

        if !(v.kl_threshold > 0.0 && v.kl_threshold < 1.0) {
            return Err(invalid(&format!(
                "validation.kl_threshold must be between 0 and 1 (found {})",
                v.kl_threshold
            )));
        }

        if !v.min_price.is_finite() || !v.max_price.is_finite() || v.min_price > v.max_price {
            return Err(invalid(&format!(
                "validation.min_price ({}) must not exceed validation.max_price ({})",
                v.min_price, v.max_price
            )));
        }

        if v.min_rows >= v.max_rows {
            return Err(invalid(&format!(
                "validation.min_rows ({}) must be less than validation.max_rows ({})",
                v.min_rows, v.max_rows
            )));
        }

        Ok(())
    }
}

fn invalid(detail: &str) -> PipelineError {
    PipelineError::UserError(format!("config validation failed: {}", detail))
}
