//! Small descriptive-statistics helpers.
//!
//! All functions return `None` when the statistic is undefined for the
//! input (empty slice, or fewer than two values for a sample deviation).

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Quantile with linear interpolation between closest ranks.
///
/// `q` is clamped to `[0, 1]`. The position of the quantile in the sorted
/// data is `q × (n − 1)`; fractional positions interpolate between the two
/// neighbouring values.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile_sorted(&sorted, q))
}

/// [`quantile`] over data that is already sorted ascending and non-empty.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
    }
}

/// Median (the 0.5 quantile).
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Sample standard deviation (divides by `n − 1`).
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Mean of `values` weighted by `weights`.
///
/// Pairs are zipped; `None` when the weights sum to zero.
pub fn weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (weighted, total) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(weighted, total), (value, weight)| {
            (weighted + value * weight, total + weight)
        });
    if total == 0.0 {
        None
    } else {
        Some(weighted / total)
    }
}
