//! Cleaning stage.
//!
//! Drops price outliers and listings outside the New York City bounding box,
//! and normalizes `last_review` into a uniform date/time rendering. The
//! transformation is a pure function of the input table and the bounds, so
//! repeated runs over the same input produce identical output.

mod last_review;
mod run;


use crate::artifact::{ArtifactRef, validate_artifact_name};
use crate::dataset::Dataset;
use crate::dataset::schema::{
    Bounds, LAST_REVIEW, LATITUDE, LATITUDE_BOUNDS, LONGITUDE, LONGITUDE_BOUNDS, PRICE,
};
use crate::error::{PipelineError, Result};
use serde::Serialize;

pub use last_review::{parse_review_date, render_review_dates};
pub use run::run_cleaning;

/// Row filter bounds for the cleaning stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CleanParams {
    pub price: Bounds,
    pub longitude: Bounds,
    pub latitude: Bounds,
}

impl CleanParams {
    /// Price interval from the caller; geographic bounds are fixed.
    pub fn new(min_price: f64, max_price: f64) -> Result<Self> {
        if !min_price.is_finite() || !max_price.is_finite() {
            return Err(PipelineError::UserError(format!(
                "price bounds must be finite numbers (got {} and {})",
                min_price, max_price
            )));
        }
        if min_price > max_price {
            return Err(PipelineError::UserError(format!(
                "--min_price ({}) must not exceed --max_price ({})",
                min_price, max_price
            )));
        }

        Ok(Self {
            price: Bounds::new(min_price, max_price),
            longitude: LONGITUDE_BOUNDS,
            latitude: LATITUDE_BOUNDS,
        })
    }
}

/// Typed configuration of one cleaning run.
#[derive(Debug, Clone, Serialize)]
pub struct CleanConfig {
    /// Raw dataset to clean.
    #[serde(serialize_with = "serialize_display")]
    pub input_artifact: ArtifactRef,
    /// Name of the published output; also the CSV file name.
    pub output_artifact: String,
    /// Artifact type recorded on the output.
    pub output_type: String,
    /// Free-text description recorded on the output.
    pub output_description: String,
    pub params: CleanParams,
}

impl CleanConfig {
    /// Validate raw options into a cleaning configuration.
    pub fn new(
        input_artifact: &str,
        output_artifact: &str,
        output_type: &str,
        output_description: &str,
        min_price: f64,
        max_price: f64,
    ) -> Result<Self> {
        let input_artifact = ArtifactRef::parse(input_artifact)?;
        validate_artifact_name(output_artifact)?;

        if output_type.trim().is_empty() {
            return Err(PipelineError::UserError(
                "--output_type must be non-empty".to_string(),
            ));
        }

        Ok(Self {
            input_artifact,
            output_artifact: output_artifact.to_string(),
            output_type: output_type.trim().to_string(),
            output_description: output_description.to_string(),
            params: CleanParams::new(min_price, max_price)?,
        })
    }
}

fn serialize_display<S, T>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: std::fmt::Display,
{
    serializer.collect_str(value)
}

/// Row accounting for one cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    pub input_rows: usize,
    pub dropped_price: usize,
    pub dropped_location: usize,
    pub output_rows: usize,
    pub unparsed_reviews: usize,
}

/// Filter and normalize a raw listings table.
///
/// Keeps a row iff price, longitude and latitude all lie inside their closed
/// intervals. A missing or non-numeric value in any of those columns drops the
/// row. `last_review` values that cannot be parsed become empty cells.
///
/// # Errors
///
/// `DataError` when `price`, `longitude`, `latitude` or `last_review` is absent.
pub fn clean_dataset(raw: &Dataset, params: &CleanParams) -> Result<(Dataset, CleanSummary)> {
    let price = raw.numeric_column(PRICE)?;
    let longitude = raw.numeric_column(LONGITUDE)?;
    let latitude = raw.numeric_column(LATITUDE)?;
    raw.require_column(LAST_REVIEW)?;

    let mut summary = CleanSummary {
        input_rows: raw.len(),
        ..Default::default()
    };

    let keep: Vec<bool> = (0..raw.len())
        .map(|i| {
            if !params.price.contains(price[i]) {
                summary.dropped_price += 1;
                false
            } else if !params.longitude.contains(longitude[i])
                || !params.latitude.contains(latitude[i])
            {
                summary.dropped_location += 1;
                false
            } else {
                true
            }
        })
        .collect();

    let mut cleaned = raw.clone();
    cleaned.retain(|i, _| keep[i]);

    let parsed: Vec<_> = cleaned
        .text_column(LAST_REVIEW)?
        .iter()
        .map(|cell| {
            let value = parse_review_date(cell);
            if value.is_none() && !cell.trim().is_empty() {
                summary.unparsed_reviews += 1;
            }
            value
        })
        .collect();
    let mut rendered = render_review_dates(&parsed).into_iter();
    cleaned.map_column(LAST_REVIEW, |_| rendered.next().unwrap_or_default())?;

    summary.output_rows = cleaned.len();
    Ok((cleaned, summary))
}
