//! Convergence study for the Poisson problem with the manufactured solution
//! `u = sin(πx) sin(πy)` on the unit square.
//!
//! Usage: `mms_convergence [config.json]`, where the optional file holds an `ExperimentConfig`.
//! Errors, rates and the configuration used are written to `data/demos/mms_convergence.json`.
use eyre::WrapErr;
use log::info;
use mms_convergence::expr::Expr;
use mms_convergence::poisson::PoissonMmsOracle;
use mms_convergence::rate::{asymptotic_rate, least_squares_rate, ErrorNorm, RateConfig};
use mms_convergence::runner::{ConvergenceSummary, ExperimentConfig, ExperimentRunner};
use serde::Serialize;
use std::f64::consts::PI;
use std::fs::{create_dir_all, File};
use std::path::PathBuf;

const RESOLUTIONS: [usize; 4] = [4, 8, 16, 32];
const DEGREES: [usize; 2] = [1, 2];

#[derive(Serialize)]
struct StudyOutput<'a> {
    config: &'a ExperimentConfig,
    manufactured_solution: String,
    summaries: &'a [ConvergenceSummary],
}

fn load_config() -> eyre::Result<ExperimentConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).wrap_err_with(|| format!("failed to open config file {}", path))?;
            let config = serde_json::from_reader(file).wrap_err("failed to parse experiment config")?;
            info!("Loaded experiment config from {}", path);
            Ok(config)
        }
        None => Ok(ExperimentConfig::default()),
    }
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt::init();

    let config = load_config()?;
    let u = (PI * Expr::x()).sin() * (PI * Expr::y()).sin();
    info!("Manufactured solution u = {}", u);

    let runner = ExperimentRunner::new(PoissonMmsOracle::new(u.clone())).with_config(config);
    let summaries = runner.study(&RESOLUTIONS, &DEGREES)?;

    let rate_config = RateConfig::default();
    for summary in &summaries {
        println!("{}", summary);
        let asymptotic = asymptotic_rate(&summary.samples, ErrorNorm::L2, &rate_config)?;
        let fitted = least_squares_rate(&summary.samples, ErrorNorm::L2)?;
        println!(
            "Asymptotic L2 rate: {:.3} (expected {}), least-squares fit: {:.3}\n",
            asymptotic,
            summary.degree + 1,
            fitted
        );
    }

    let output_path = PathBuf::from("data/demos/mms_convergence.json");
    if let Some(parent) = output_path.parent() {
        create_dir_all(parent)?;
    }
    let output = StudyOutput {
        config: runner.config(),
        manufactured_solution: u.to_string(),
        summaries: &summaries,
    };
    serde_json::to_writer_pretty(File::create(&output_path)?, &output)?;
    info!("Wrote convergence summary to {}", output_path.display());

    Ok(())
}
