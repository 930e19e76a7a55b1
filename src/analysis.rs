//! Post-processing of sweep results.
//!
//! The main question answered here is how closely the designated plant follows demand volatility.
//! Demand is split into consecutive bins, the spread of demand within each bin is compared with the
//! plant's production in the same bin and the two are correlated.
use crate::series::{ScenarioID, ScenarioMap};
use crate::sweep::SweepResults;
use crate::units::{Dimensionless, MoneyPerPower};
use anyhow::{Result, ensure};
use itertools::Itertools;

/// Generate `steps` evenly spaced penetration factors from 0 to 1 inclusive
pub fn alpha_grid(steps: usize) -> Result<Vec<Dimensionless>> {
    ensure!(
        steps >= 2,
        "At least two steps are needed to span 0 to 1 (got {steps})"
    );

    let last = (steps - 1) as f64;
    Ok((0..steps).map(|i| Dimensionless(i as f64 / last)).collect())
}

/// Split `values` into consecutive bins of `window` values, dropping any partial bin at the end
fn bins(values: &[f64], window: usize) -> impl Iterator<Item = &[f64]> {
    assert!(window > 0, "Bin width must be positive");
    values.chunks_exact(window)
}

/// Sample standard deviation (n-1 denominator), or NaN for fewer than two values
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    (sum_sq / (n - 1.0)).sqrt()
}

/// Standard deviation of each bin
pub fn binned_std(values: &[f64], window: usize) -> Vec<f64> {
    bins(values, window).map(sample_std).collect()
}

/// Sum of each bin
pub fn binned_sum(values: &[f64], window: usize) -> Vec<f64> {
    bins(values, window).map(|bin| bin.iter().sum()).collect()
}

/// Pearson correlation coefficient of two series, truncated to the shorter length.
///
/// Returns NaN if fewer than two pairs remain or either series has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let len = xs.len().min(ys.len());
    if len < 2 {
        return f64::NAN;
    }

    let (xs, ys) = (&xs[..len], &ys[..len]);
    let n = len as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    cov / (var_x * var_y).sqrt()
}

/// Correlation between demand volatility and the designated plant's production for one
/// combination
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationRecord {
    /// The slack penalty
    pub lambda: MoneyPerPower,
    /// The renewable penetration factor
    pub alpha: Dimensionless,
    /// The demand scenario
    pub scenario_id: ScenarioID,
    /// Pearson correlation coefficient (NaN if undefined)
    pub correlation: f64,
}

/// Correlate binned demand volatility with the designated plant's binned production.
///
/// Records are ordered by λ, then α, then scenario. Combinations without a trajectory get a NaN
/// correlation.
pub fn correlation_table(
    scenarios: &ScenarioMap,
    results: &SweepResults,
    window: usize,
) -> Vec<CorrelationRecord> {
    let volatility: Vec<_> = scenarios
        .values()
        .map(|demand| {
            let values = demand.values().iter().map(|value| value.value()).collect_vec();
            binned_std(&values, window)
        })
        .collect();

    let Some(first) = results.values().next() else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for (lambda_idx, &lambda) in first.lambdas().iter().enumerate() {
        for (alpha_idx, &alpha) in first.alphas().iter().enumerate() {
            for ((scenario_id, grid), volatility) in results.iter().zip(&volatility) {
                let trajectory = grid
                    .get(lambda_idx, alpha_idx)
                    .and_then(|record| record.trajectory());
                let correlation = trajectory.map_or(f64::NAN, |trajectory| {
                    let values = trajectory.iter().map(|value| value.value()).collect_vec();
                    pearson(volatility, &binned_sum(&values, window))
                });

                records.push(CorrelationRecord {
                    lambda,
                    alpha,
                    scenario_id: scenario_id.clone(),
                    correlation,
                });
            }
        }
    }

    records
}
