//! Typed, validated threshold parameters for the check suite.

use crate::config::{MissingGroupPolicy, ValidationSettings};
use crate::dataset::schema::Bounds;
use crate::error::{PipelineError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationParams {
    /// Significance level: a group fails when `p_value <= kl_threshold`.
    pub kl_threshold: f64,
    pub price: Bounds,
    /// Exclusive row-count bounds.
    pub min_rows: usize,
    pub max_rows: usize,
    pub missing_group_policy: MissingGroupPolicy,
    pub fail_fast: bool,
}

impl ValidationParams {
    pub fn new(
        kl_threshold: f64,
        min_price: f64,
        max_price: f64,
        min_rows: usize,
        max_rows: usize,
    ) -> Result<Self> {
        if !(kl_threshold > 0.0 && kl_threshold < 1.0) {
            return Err(PipelineError::UserError(format!(
                "kl_threshold must be between 0 and 1 (got {})",
                kl_threshold
            )));
        }
        if !min_price.is_finite() || !max_price.is_finite() || min_price > max_price {
            return Err(PipelineError::UserError(format!(
                "min_price ({}) must not exceed max_price ({})",
                min_price, max_price
            )));
        }
        if min_rows >= max_rows {
            return Err(PipelineError::UserError(format!(
                "min_rows ({}) must be less than max_rows ({})",
                min_rows, max_rows
            )));
        }

        Ok(Self {
            kl_threshold,
            price: Bounds::new(min_price, max_price),
            min_rows,
            max_rows,
            missing_group_policy: MissingGroupPolicy::default(),
            fail_fast: false,
        })
    }

    pub fn from_settings(settings: &ValidationSettings) -> Result<Self> {
        Ok(Self::new(
            settings.kl_threshold,
            settings.min_price,
            settings.max_price,
            settings.min_rows,
            settings.max_rows,
        )?
        .with_missing_group_policy(settings.missing_group_policy)
        .with_fail_fast(settings.fail_fast))
    }

    pub fn with_missing_group_policy(mut self, policy: MissingGroupPolicy) -> Self {
        self.missing_group_policy = policy;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

impl Default for ValidationParams {
    fn default() -> Self {
        Self {
            kl_threshold: 0.2,
            price: Bounds::new(10.0, 350.0),
            min_rows: 15_000,
            max_rows: 1_000_000,
            missing_group_policy: MissingGroupPolicy::default(),
            fail_fast: false,
        }
    }
}
