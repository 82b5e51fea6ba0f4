//! Empirical convergence rates from sequences of error samples.
//!
//! Given samples $(h_i, E_i)$ with strictly decreasing $h_i$, the pairwise rate between two
//! consecutive refinements is
//!
//! $$ r_i = \frac{\ln(E_i / E_{i-1})}{\ln(h_i / h_{i-1})}. $$
//!
//! No smoothing is applied. [`least_squares_rate`] offers the slope of a log-log regression line
//! through all samples as an alternative estimate.
use crate::error::ConvergenceError;
use crate::runner::ErrorSample;
use serde::{Deserialize, Serialize};

/// Selects which error column of an [`ErrorSample`] a rate is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorNorm {
    L2,
    Infinity,
}

impl ErrorNorm {
    pub fn error(&self, sample: &ErrorSample) -> f64 {
        match self {
            Self::L2 => sample.l2_error,
            Self::Infinity => sample.inf_error,
        }
    }
}

/// Configuration of rate estimation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// Minimum number of refinement levels before [`asymptotic_rate`] reports a rate.
    pub min_trustworthy_levels: usize,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            min_trustworthy_levels: 3,
        }
    }
}

/// Checks that all samples have finite, positive mesh sizes and errors, and that the mesh sizes
/// strictly decrease. Returns the `(h, E)` pairs.
fn validated_points(samples: &[ErrorSample], norm: ErrorNorm) -> Result<Vec<(f64, f64)>, ConvergenceError> {
    let mut points = Vec::with_capacity(samples.len());
    for (index, sample) in samples.iter().enumerate() {
        let h = sample.h;
        let error = norm.error(sample);
        let is_valid = |value: f64| value.is_finite() && value > 0.0;
        if !is_valid(h) || !is_valid(error) {
            return Err(ConvergenceError::DegenerateSample { index, h, error });
        }
        if let Some(&(h_prev, _)) = points.last() {
            if h >= h_prev {
                return Err(ConvergenceError::UnorderedSampleSequence { index });
            }
        }
        points.push((h, error));
    }
    Ok(points)
}

/// Pairwise convergence rates between consecutive samples.
///
/// The result has `samples.len() - 1` entries, or none if there are fewer than two samples.
///
/// # Errors
///
/// - [`ConvergenceError::DegenerateSample`] if any mesh size or selected error is zero, negative
///   or not finite.
/// - [`ConvergenceError::UnorderedSampleSequence`] if the mesh sizes do not strictly decrease.
pub fn estimate_rates(samples: &[ErrorSample], norm: ErrorNorm) -> Result<Vec<f64>, ConvergenceError> {
    let points = validated_points(samples, norm)?;
    Ok(points
        .windows(2)
        .map(|pair| {
            let (h_prev, e_prev) = pair[0];
            let (h, e) = pair[1];
            (e / e_prev).ln() / (h / h_prev).ln()
        })
        .collect())
}

/// The slope of the least-squares line through the points $(\ln h_i, \ln E_i)$.
///
/// Returns [`ConvergenceError::InsufficientRefinementLevels`] for fewer than two samples, and
/// otherwise fails in the same cases as [`estimate_rates`].
pub fn least_squares_rate(samples: &[ErrorSample], norm: ErrorNorm) -> Result<f64, ConvergenceError> {
    let points = validated_points(samples, norm)?;
    if points.len() < 2 {
        return Err(ConvergenceError::InsufficientRefinementLevels {
            available: points.len(),
            required: 2,
        });
    }

    let n = points.len() as f64;
    let (log_h, log_e): (Vec<f64>, Vec<f64>) = points.iter().map(|&(h, e)| (h.ln(), e.ln())).unzip();
    let mean_h = log_h.iter().sum::<f64>() / n;
    let mean_e = log_e.iter().sum::<f64>() / n;
    let covariance: f64 = log_h
        .iter()
        .zip(&log_e)
        .map(|(x, y)| (x - mean_h) * (y - mean_e))
        .sum();
    let variance: f64 = log_h.iter().map(|x| (x - mean_h).powi(2)).sum();
    Ok(covariance / variance)
}

/// The rate between the two finest samples, provided there are enough refinement levels to trust
/// it.
pub fn asymptotic_rate(samples: &[ErrorSample], norm: ErrorNorm, config: &RateConfig) -> Result<f64, ConvergenceError> {
    let required = config.min_trustworthy_levels.max(2);
    if samples.len() < required {
        return Err(ConvergenceError::InsufficientRefinementLevels {
            available: samples.len(),
            required,
        });
    }
    let rates = estimate_rates(samples, norm)?;
    rates
        .last()
        .copied()
        .ok_or(ConvergenceError::InsufficientRefinementLevels {
            available: samples.len(),
            required,
        })
}
