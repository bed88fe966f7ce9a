//! The individual data checks.
//!
//! Each check is a pure function of its inputs and always returns a
//! [`CheckResult`]. A column the check needs but cannot find is a failed check,
//! not an error, so one broken column never hides the other results.

use super::ks::ks_2samp;
use super::params::ValidationParams;
use super::suite::{CheckResult, CheckStatus, GroupComparison};
use crate::config::MissingGroupPolicy;
use crate::dataset::Dataset;
use crate::dataset::schema::{
    Bounds, EXPECTED_COLUMNS, EXPECTED_GROUPS, LATITUDE, LATITUDE_BOUNDS, LONGITUDE,
    LONGITUDE_BOUNDS, NEIGHBOURHOOD_GROUP, PRICE,
};
use std::collections::HashMap;
use tracing::{debug, warn};

const COLUMN_NAMES: &str = "column_names";
const NEIGHBORHOOD_NAMES: &str = "neighborhood_names";
const PROPER_BOUNDARIES: &str = "proper_boundaries";
const SIMILAR_NEIGH_DISTRIB: &str = "similar_neigh_distrib";
const ROW_COUNT: &str = "row_count";
const PRICE_RANGE: &str = "price_range";

/// Header must equal the expected 16 columns, in order.
pub fn column_names(candidate: &Dataset) -> CheckResult {
    match describe_schema_mismatch(candidate.columns()) {
        None => CheckResult::pass(COLUMN_NAMES)
            .with_message(format!("{} columns as expected", EXPECTED_COLUMNS.len())),
        Some(detail) => CheckResult::fail(COLUMN_NAMES, detail),
    }
}

fn describe_schema_mismatch(actual: &[String]) -> Option<String> {
    for (pos, expected) in EXPECTED_COLUMNS.iter().enumerate() {
        let position = pos + 1;
        let Some(found) = actual.get(pos) else {
            return Some(format!(
                "missing column '{}' (expected at position {})",
                expected, position
            ));
        };
        if found == expected {
            continue;
        }

        let found_known = EXPECTED_COLUMNS.contains(&found.as_str());
        let expected_present = actual.iter().any(|c| c == expected);
        return Some(match (found_known, expected_present) {
            (true, true) => format!(
                "columns out of order at position {}: expected '{}', found '{}'",
                position, expected, found
            ),
            (true, false) => format!(
                "missing column '{}' (expected at position {})",
                expected, position
            ),
            (false, true) => format!(
                "unexpected column '{}' at position {}",
                found, position
            ),
            (false, false) => format!(
                "column '{}' at position {} is named '{}'",
                expected, position, found
            ),
        });
    }

    actual.get(EXPECTED_COLUMNS.len()).map(|extra| {
        format!(
            "unexpected column '{}' at position {}",
            extra,
            EXPECTED_COLUMNS.len() + 1
        )
    })
}

/// Distinct neighbourhood groups must be exactly the five boroughs.
pub fn neighborhood_names(candidate: &Dataset) -> CheckResult {
    let distinct = match candidate.distinct(NEIGHBOURHOOD_GROUP) {
        Ok(distinct) => distinct,
        Err(_) => return missing_column(NEIGHBORHOOD_NAMES, NEIGHBOURHOOD_GROUP),
    };

    let missing: Vec<&str> = EXPECTED_GROUPS
        .iter()
        .copied()
        .filter(|group| !distinct.contains(group))
        .collect();
    let unexpected: Vec<&str> = distinct
        .iter()
        .copied()
        .filter(|group| !EXPECTED_GROUPS.contains(group))
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        return CheckResult::pass(NEIGHBORHOOD_NAMES)
            .with_message(format!("all {} groups present", EXPECTED_GROUPS.len()));
    }

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing groups: {}", quote_list(&missing)));
    }
    if !unexpected.is_empty() {
        parts.push(format!("unexpected groups: {}", quote_list(&unexpected)));
    }
    CheckResult::fail(NEIGHBORHOOD_NAMES, parts.join("; "))
}

/// Every row must lie inside the longitude and latitude bounds.
pub fn proper_boundaries(candidate: &Dataset) -> CheckResult {
    let Ok(longitude) = candidate.numeric_column(LONGITUDE) else {
        return missing_column(PROPER_BOUNDARIES, LONGITUDE);
    };
    let Ok(latitude) = candidate.numeric_column(LATITUDE) else {
        return missing_column(PROPER_BOUNDARIES, LATITUDE);
    };

    let mut violations = 0usize;
    let mut first: Option<String> = None;
    for (row, (lon, lat)) in longitude.iter().zip(&latitude).enumerate() {
        let offending = [
            (LONGITUDE, *lon, LONGITUDE_BOUNDS),
            (LATITUDE, *lat, LATITUDE_BOUNDS),
        ]
        .into_iter()
        .find(|(_, value, bounds)| !bounds.contains(*value));

        if let Some((column, value, bounds)) = offending {
            violations += 1;
            first.get_or_insert_with(|| describe_violation(row, column, value, bounds));
        }
    }

    match first {
        None => CheckResult::pass(PROPER_BOUNDARIES)
            .with_message(format!("{} rows inside bounds", candidate.len())),
        Some(first) => CheckResult::fail(
            PROPER_BOUNDARIES,
            format!(
                "{} of {} rows outside bounds; first: {}",
                violations,
                candidate.len(),
                first
            ),
        ),
    }
}

/// Per-group KS test of candidate prices against reference prices.
pub fn similar_neigh_distrib(
    candidate: &Dataset,
    reference: &Dataset,
    params: &ValidationParams,
) -> CheckResult {
    let candidate_groups = match prices_by_group(candidate) {
        Ok(groups) => groups,
        Err(column) => return missing_column(SIMILAR_NEIGH_DISTRIB, column),
    };
    let reference_groups = match prices_by_group(reference) {
        Ok(groups) => groups,
        Err(column) => {
            return CheckResult::fail(
                SIMILAR_NEIGH_DISTRIB,
                format!("reference dataset has no '{}' column", column),
            );
        }
    };

    let reference_index: HashMap<&str, &Vec<f64>> = reference_groups
        .iter()
        .map(|(group, prices)| (*group, prices))
        .collect();

    let mut comparisons = Vec::new();
    for (group, sample) in &candidate_groups {
        let reference_sample = reference_index.get(group).copied();
        let comparison = compare_group(group, sample, reference_sample, params);
        debug!(
            group = *group,
            status = %comparison.status,
            p_value = comparison.p_value,
            "group compared"
        );
        comparisons.push(comparison);
    }

    for (group, prices) in &reference_groups {
        if candidate_groups.iter().any(|(g, _)| g == group) {
            continue;
        }
        warn!(group = *group, "group present only in reference; skipped");
        comparisons.push(GroupComparison {
            group: group.to_string(),
            status: CheckStatus::Skip,
            candidate_rows: 0,
            reference_rows: prices.len(),
            statistic: None,
            p_value: None,
            method: None,
            message: Some("absent from candidate".to_string()),
        });
    }

    let failed: Vec<String> = comparisons
        .iter()
        .filter(|c| c.status == CheckStatus::Fail)
        .map(|c| match c.p_value {
            Some(p) => format!("{} (p={:.4} <= {})", c.group, p, params.kl_threshold),
            None => format!(
                "{} ({})",
                c.group,
                c.message.as_deref().unwrap_or("not comparable")
            ),
        })
        .collect();
    let compared = comparisons
        .iter()
        .filter(|c| c.status == CheckStatus::Pass)
        .count();

    let result = if failed.is_empty() {
        CheckResult::pass(SIMILAR_NEIGH_DISTRIB).with_message(format!(
            "{} groups match the reference (p > {})",
            compared, params.kl_threshold
        ))
    } else {
        CheckResult::fail(
            SIMILAR_NEIGH_DISTRIB,
            format!("distribution differs for {}", failed.join(", ")),
        )
    };
    result.with_groups(comparisons)
}

fn compare_group(
    group: &str,
    sample: &[f64],
    reference: Option<&Vec<f64>>,
    params: &ValidationParams,
) -> GroupComparison {
    let mut comparison = GroupComparison {
        group: group.to_string(),
        status: CheckStatus::Skip,
        candidate_rows: sample.len(),
        reference_rows: reference.map_or(0, Vec::len),
        statistic: None,
        p_value: None,
        method: None,
        message: None,
    };

    let Some(reference) = reference else {
        comparison.message = Some("absent from reference".to_string());
        comparison.status = match params.missing_group_policy {
            MissingGroupPolicy::Fail => CheckStatus::Fail,
            MissingGroupPolicy::Skip => {
                warn!(group, "group absent from reference; skipped");
                CheckStatus::Skip
            }
        };
        return comparison;
    };

    match ks_2samp(sample, reference) {
        Ok(outcome) => {
            comparison.statistic = Some(outcome.statistic);
            comparison.p_value = Some(outcome.p_value);
            comparison.method = Some(outcome.method);
            comparison.status = if outcome.p_value <= params.kl_threshold {
                CheckStatus::Fail
            } else {
                CheckStatus::Pass
            };
        }
        Err(e) => {
            comparison.message = Some(format!("no priced rows to compare: {}", e));
            comparison.status = match params.missing_group_policy {
                MissingGroupPolicy::Fail => CheckStatus::Fail,
                MissingGroupPolicy::Skip => CheckStatus::Skip,
            };
        }
    }
    comparison
}

/// Non-null prices per neighbourhood group, groups in first-seen order.
/// On a missing column, returns the column's name.
fn prices_by_group(data: &Dataset) -> Result<Vec<(&str, Vec<f64>)>, &'static str> {
    let groups = data
        .text_column(NEIGHBOURHOOD_GROUP)
        .map_err(|_| NEIGHBOURHOOD_GROUP)?;
    let prices = data.numeric_column(PRICE).map_err(|_| PRICE)?;

    let mut by_group: Vec<(&str, Vec<f64>)> = Vec::new();
    for (group, price) in groups.into_iter().zip(prices) {
        let slot = match by_group.iter().position(|(g, _)| *g == group) {
            Some(i) => i,
            None => {
                by_group.push((group, Vec::new()));
                by_group.len() - 1
            }
        };
        if let Some(price) = price {
            by_group[slot].1.push(price);
        }
    }
    Ok(by_group)
}

/// Row count must lie strictly between `min_rows` and `max_rows`.
pub fn row_count(candidate: &Dataset, params: &ValidationParams) -> CheckResult {
    let rows = candidate.len();
    let message = format!(
        "{} rows (expected strictly between {} and {})",
        rows, params.min_rows, params.max_rows
    );
    if rows > params.min_rows && rows < params.max_rows {
        CheckResult::pass(ROW_COUNT).with_message(message)
    } else {
        CheckResult::fail(ROW_COUNT, message)
    }
}

/// Every price must lie inside `[min_price, max_price]`.
pub fn price_range(candidate: &Dataset, params: &ValidationParams) -> CheckResult {
    let Ok(prices) = candidate.numeric_column(PRICE) else {
        return missing_column(PRICE_RANGE, PRICE);
    };

    let mut violations = prices
        .iter()
        .enumerate()
        .filter(|(_, price)| !params.price.contains(**price));

    match violations.next() {
        None => CheckResult::pass(PRICE_RANGE)
            .with_message(format!("all prices in {}", params.price)),
        Some((row, price)) => {
            let count = 1 + violations.count();
            CheckResult::fail(
                PRICE_RANGE,
                format!(
                    "{} of {} rows outside price range; first: {}",
                    count,
                    candidate.len(),
                    describe_violation(row, PRICE, *price, params.price)
                ),
            )
        }
    }
}

fn describe_violation(row: usize, column: &str, value: Option<f64>, bounds: Bounds) -> String {
    match value {
        Some(v) => format!("row {} has {} {} outside {}", row + 1, column, v, bounds),
        None => format!("row {} has no numeric {}", row + 1, column),
    }
}

fn missing_column(check: &str, column: &str) -> CheckResult {
    CheckResult::fail(check, format!("required column '{}' is missing", column))
}

fn quote_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("'{}'", item))
        .collect::<Vec<_>>()
        .join(", ")
}
