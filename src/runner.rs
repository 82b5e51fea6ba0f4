//! Convergence experiments: solve on a sequence of meshes and record the errors.
use crate::error::ConvergenceError;
use crate::norm::{compute_inf_error, compute_l2_error, DEFAULT_DEGREE_RAISE};
use crate::oracle::{SolutionPair, SolverConfig, SolverOracle};
use crate::rate::{estimate_rates, ErrorNorm};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Errors measured for one resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSample {
    /// Number of subdivisions per axis.
    pub resolution: usize,
    /// Mesh size `1 / resolution`.
    pub h: f64,
    pub l2_error: f64,
    pub inf_error: f64,
}

/// Configuration of an [`ExperimentRunner`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Degree raise of the common space used for the L2 error.
    pub degree_raise: usize,
    /// Configuration handed to every oracle invocation.
    pub solver: SolverConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            degree_raise: DEFAULT_DEGREE_RAISE,
            solver: SolverConfig::default(),
        }
    }
}

/// Runs a solver oracle over a sequence of resolutions and measures the discretization errors.
#[derive(Debug, Clone)]
pub struct ExperimentRunner<O> {
    oracle: O,
    config: ExperimentConfig,
}

impl<O: SolverOracle> ExperimentRunner<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            config: ExperimentConfig::default(),
        }
    }

    pub fn with_config(self, config: ExperimentConfig) -> Self {
        Self { config, ..self }
    }

    pub fn with_degree_raise(mut self, degree_raise: usize) -> Self {
        self.config.degree_raise = degree_raise;
        self
    }

    pub fn with_solver_config(mut self, solver: SolverConfig) -> Self {
        self.config.solver = solver;
        self
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Solves and measures the errors for every resolution, in the given order.
    ///
    /// Resolutions are conventionally given in increasing order, which makes the resulting mesh
    /// sizes decrease as required by [`estimate_rates`]. The first failure aborts the run.
    pub fn run(&self, resolutions: &[usize], degree: usize) -> Result<Vec<ErrorSample>, ConvergenceError> {
        resolutions
            .iter()
            .map(|&resolution| self.run_single(resolution, degree))
            .collect()
    }

    fn run_single(&self, resolution: usize, degree: usize) -> Result<ErrorSample, ConvergenceError> {
        if resolution == 0 {
            return Err(ConvergenceError::InvalidResolution { resolution });
        }

        debug!("Invoking solver oracle for N = {}, degree {}", resolution, degree);
        let SolutionPair { approx, exact } = self
            .oracle
            .solve(resolution, degree, &self.config.solver)
            .map_err(|source| ConvergenceError::SolverOracleFailure {
                resolution,
                degree,
                source,
            })?;

        let h = 1.0 / resolution as f64;
        let l2_error = compute_l2_error(&approx, &exact, self.config.degree_raise)?;
        let inf_error = compute_inf_error(&approx, &exact)?;
        info!(
            "N = {:>4}, P{}: h = {:.4e}, L2 error = {:.4e}, inf error = {:.4e}",
            resolution, degree, h, l2_error, inf_error
        );

        Ok(ErrorSample {
            resolution,
            h,
            l2_error,
            inf_error,
        })
    }

    /// Runs the experiment for each degree and computes the pairwise rates.
    pub fn study(&self, resolutions: &[usize], degrees: &[usize]) -> Result<Vec<ConvergenceSummary>, ConvergenceError> {
        degrees
            .iter()
            .map(|&degree| {
                let samples = self.run(resolutions, degree)?;
                ConvergenceSummary::from_samples(degree, samples)
            })
            .collect()
    }
}

/// Errors and pairwise rates of one polynomial degree over a sequence of resolutions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceSummary {
    pub degree: usize,
    pub samples: Vec<ErrorSample>,
    pub l2_rates: Vec<f64>,
    pub inf_rates: Vec<f64>,
}

impl ConvergenceSummary {
    pub fn from_samples(degree: usize, samples: Vec<ErrorSample>) -> Result<Self, ConvergenceError> {
        let l2_rates = estimate_rates(&samples, ErrorNorm::L2)?;
        let inf_rates = estimate_rates(&samples, ErrorNorm::Infinity)?;
        Ok(Self {
            degree,
            samples,
            l2_rates,
            inf_rates,
        })
    }
}

impl Display for ConvergenceSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Polynomial degree {}", self.degree)?;
        writeln!(
            f,
            "{:>6} {:>12} {:>12} {:>8} {:>12} {:>8}",
            "N", "h", "L2 error", "rate", "inf error", "rate"
        )?;
        for (i, sample) in self.samples.iter().enumerate() {
            let rate = |rates: &[f64]| {
                i.checked_sub(1)
                    .and_then(|j| rates.get(j))
                    .map(|r| format!("{:.2}", r))
                    .unwrap_or_else(|| "-".to_string())
            };
            writeln!(
                f,
                "{:>6} {:>12.4e} {:>12.4e} {:>8} {:>12.4e} {:>8}",
                sample.resolution,
                sample.h,
                sample.l2_error,
                rate(&self.l2_rates),
                sample.inf_error,
                rate(&self.inf_rates)
            )?;
        }
        Ok(())
    }
}
