//! Quality measures for photometric-redshift estimates.
//!
//! All measures work on the normalized residual
//! `(z_phot - z_spec) / (1 + z_spec)`,
//! which is the convention of the photometric-redshift literature:
//! an absolute error of 0.1 is severe at `z = 0.1`
//! and unremarkable at `z = 3`.
use crate::common::utils;


/// A galaxy is a catastrophic outlier when its normalized residual
/// exceeds this threshold in absolute value.
pub const OUTLIER_THRESHOLD: f64 = 0.15;

/// Scales the median absolute deviation to the standard deviation
/// of a normal distribution.
const NMAD_SCALE: f64 = 1.48;


fn check_lengths(predictions: &[f64], target: &[f64]) {
    assert_eq!(
        predictions.len(),
        target.len(),
        "Prediction and target slices have different lengths",
    );
    assert!(!target.is_empty(), "Cannot evaluate metrics on no galaxies");
}


/// The fraction of catastrophic outliers:
/// galaxies with `|z_phot - z_spec| > 0.15 * (1 + z_spec)`.
#[inline]
pub fn outlier_rate(predictions: &[f64], target: &[f64]) -> f64 {
    check_lengths(predictions, target);

    let n_outlier = predictions.iter()
        .zip(target)
        .filter(|(p, y)| {
            (*p - *y).abs() > OUTLIER_THRESHOLD * (1.0 + *y)
        })
        .count();

    n_outlier as f64 / target.len() as f64
}


/// The normalized median absolute deviation of the residuals,
/// `1.48 * median(|z_phot - z_spec| / (1 + z_spec))`.
/// A robust spread estimate: catastrophic outliers barely move it.
#[inline]
pub fn nmad(predictions: &[f64], target: &[f64]) -> f64 {
    check_lengths(predictions, target);

    let normalized = predictions.iter()
        .zip(target)
        .map(|(p, y)| (p - y).abs() / (1.0 + y))
        .collect::<Vec<_>>();

    NMAD_SCALE * utils::median(&normalized)
}


/// Root mean squared error of the raw residuals.
#[inline]
pub fn rmse(predictions: &[f64], target: &[f64]) -> f64 {
    check_lengths(predictions, target);

    let mean_squared = predictions.iter()
        .zip(target)
        .map(|(p, y)| (p - y).powi(2))
        .sum::<f64>() / target.len() as f64;

    mean_squared.sqrt()
}


/// Mean of the normalized residuals. Zero means no systematic shift.
#[inline]
pub fn bias(predictions: &[f64], target: &[f64]) -> f64 {
    check_lengths(predictions, target);

    predictions.iter()
        .zip(target)
        .map(|(p, y)| (p - y) / (1.0 + y))
        .sum::<f64>() / target.len() as f64
}
