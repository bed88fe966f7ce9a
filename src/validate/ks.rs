//! Two-sample Kolmogorov-Smirnov test.
//!
//! The statistic is tracked as an integer gap `|i*m - j*n|` between the two
//! scaled empirical CDFs, so ties and the exact p-value computation share the
//! same lattice. Small problems get the exact two-sided p-value; large ones
//! fall back to the limiting Kolmogorov distribution.

use serde::Serialize;
use std::f64::consts::PI;
use thiserror::Error;

/// Largest `n * m` for which the exact p-value is computed.
pub const EXACT_MAX_CELLS: u64 = 1_000_000;

#[derive(Debug, Error, PartialEq)]
pub enum KsError {
    #[error("{0} sample is empty")]
    EmptySample(&'static str),

    #[error("{0} sample contains NaN")]
    NotANumber(&'static str),
}

/// How the p-value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KsMethod {
    Exact,
    Asymptotic,
}

impl std::fmt::Display for KsMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KsMethod::Exact => write!(f, "exact"),
            KsMethod::Asymptotic => write!(f, "asymptotic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KsOutcome {
    /// `D = sup |F_a(x) - F_b(x)|`.
    pub statistic: f64,
    pub p_value: f64,
    pub method: KsMethod,
}

/// Two-sided two-sample KS test of `a` against `b`.
pub fn ks_2samp(a: &[f64], b: &[f64]) -> Result<KsOutcome, KsError> {
    let a = sorted_sample(a, "first")?;
    let b = sorted_sample(b, "second")?;
    let (n, m) = (a.len() as u64, b.len() as u64);

    let gap = max_gap(&a, &b);
    let statistic = gap as f64 / (n * m) as f64;

    let outcome = if n * m <= EXACT_MAX_CELLS {
        KsOutcome {
            statistic,
            p_value: exact_p_value(n, m, gap),
            method: KsMethod::Exact,
        }
    } else {
        let (nf, mf) = (n as f64, m as f64);
        let lambda = (nf * mf / (nf + mf)).sqrt() * statistic;
        KsOutcome {
            statistic,
            p_value: kolmogorov_sf(lambda),
            method: KsMethod::Asymptotic,
        }
    };

    Ok(outcome)
}

fn sorted_sample(sample: &[f64], which: &'static str) -> Result<Vec<f64>, KsError> {
    if sample.is_empty() {
        return Err(KsError::EmptySample(which));
    }
    if sample.iter().any(|v| v.is_nan()) {
        return Err(KsError::NotANumber(which));
    }
    let mut sorted = sample.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    Ok(sorted)
}

/// Largest `|i*m - j*n|` over the merged sample, stepping past ties in both.
fn max_gap(a: &[f64], b: &[f64]) -> u64 {
    let (n, m) = (a.len(), b.len());
    let (mut i, mut j) = (0usize, 0usize);
    let mut gap = 0u64;

    while i < n && j < m {
        let x = a[i].min(b[j]);
        while i < n && a[i] <= x {
            i += 1;
        }
        while j < m && b[j] <= x {
            j += 1;
        }
        gap = gap.max(((i * m) as i64 - (j * n) as i64).unsigned_abs());
    }

    gap
}

/// `P(D >= observed)` by counting monotone lattice paths from `(0, 0)` to
/// `(n, m)` that stay strictly inside `|i*m - j*n| < gap`.
///
/// Path counts are kept normalized by `C(i + j, i)` so the recurrence never
/// overflows.
fn exact_p_value(n: u64, m: u64, gap: u64) -> f64 {
    if gap == 0 {
        return 1.0;
    }

    let inside = |i: u64, j: u64| (i * m).abs_diff(j * n) < gap;
    let width = m as usize + 1;
    let mut row = vec![0.0f64; width];

    row[0] = 1.0;
    for j in 1..=m {
        row[j as usize] = if inside(0, j) { row[j as usize - 1] } else { 0.0 };
    }

    for i in 1..=n {
        row[0] = if inside(i, 0) { row[0] } else { 0.0 };
        for j in 1..=m {
            let ju = j as usize;
            row[ju] = if inside(i, j) {
                (row[ju] * i as f64 + row[ju - 1] * j as f64) / (i + j) as f64
            } else {
                0.0
            };
        }
    }

    (1.0 - row[m as usize]).clamp(0.0, 1.0)
}

/// Survival function of the Kolmogorov distribution, `P(K > x)`.
pub fn kolmogorov_sf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }

    let p = if x < 1.18 {
        // Jacobi theta form converges fast for small x.
        let w = (2.0 * PI).sqrt() / x;
        let factor = -PI * PI / (8.0 * x * x);
        let cdf: f64 = (1..=8)
            .map(|k| {
                let odd = (2 * k - 1) as f64;
                (odd * odd * factor).exp()
            })
            .sum::<f64>()
            * w;
        1.0 - cdf
    } else {
        let mut sum = 0.0;
        for k in 1..=100 {
            let kf = k as f64;
            let term = (-2.0 * kf * kf * x * x).exp();
            sum += if k % 2 == 1 { term } else { -term };
            if term < 1e-16 {
                break;
            }
        }
        2.0 * sum
    };

    p.clamp(0.0, 1.0)
}
