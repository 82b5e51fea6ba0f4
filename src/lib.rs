//! Convergence rate studies for finite element discretizations, based on the method of
//! manufactured solutions.
//!
//! An [`ExperimentRunner`](runner::ExperimentRunner) asks a [`SolverOracle`](oracle::SolverOracle)
//! for discrete solutions on a sequence of uniformly refined meshes, measures their $L^2$ and
//! nodal infinity errors against the exact solution with the [`norm`] module and records the
//! results as [`ErrorSample`](runner::ErrorSample)s. The [`rate`] module turns the samples into
//! empirical convergence rates.
//!
//! ```no_run
//! use mms_convergence::expr::Expr;
//! use mms_convergence::poisson::PoissonMmsOracle;
//! use mms_convergence::rate::{estimate_rates, ErrorNorm};
//! use mms_convergence::runner::ExperimentRunner;
//! use std::f64::consts::PI;
//!
//! let u = (PI * Expr::x()).sin() * (PI * Expr::y()).sin();
//! let runner = ExperimentRunner::new(PoissonMmsOracle::new(u));
//! let samples = runner.run(&[4, 8, 16, 32], 1)?;
//! let rates = estimate_rates(&samples, ErrorNorm::L2)?;
//! # Ok::<(), mms_convergence::error::ConvergenceError>(())
//! ```

pub mod comm;
pub mod error;
pub mod exact;
pub mod expr;
pub mod lagrange;
pub mod mesh;
pub mod norm;
pub mod oracle;
pub mod poisson;
pub mod quadrature;
pub mod rate;
pub mod runner;
pub mod space;

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;

pub use error::ConvergenceError;
