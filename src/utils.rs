// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use config::Strategy;
use engine::{Evaluation, Recommendation};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use simplelog::{Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use std::{fmt::Display, path::Path};

pub(crate) fn init_logger(verbosity: u64) -> Result<(), Error> {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    TermLogger::init(level, LogConfig::default(), TerminalMode::Mixed)?;
    Ok(())
}

/// Run `job` while a spinner with `msg` ticks on the terminal
pub(crate) fn with_spinner<T, F>(msg: &str, job: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]"));
    spinner.set_message(msg);
    spinner.enable_steady_tick(100);

    let result = job();
    match &result {
        Ok(_) => spinner.finish_with_message(&format!("{}, done", msg)),
        Err(_) => spinner.abandon_with_message(&format!("{}, failed", msg)),
    }

    result
}

/// Write a `Model,RMSE,MAE` row per evaluated strategy
pub(crate) fn write_report(
    path: impl AsRef<Path>,
    results: &[(Strategy, Evaluation)],
) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record(&["Model", "RMSE", "MAE"])?;

    for (strategy, evaluation) in results {
        writer.write_record(&[
            strategy.to_string(),
            evaluation.rmse.to_string(),
            evaluation.mae.to_string(),
        ])?;
    }

    writer.flush()?;
    log::info!("Evaluation report written to {}", path.as_ref().display());

    Ok(())
}

pub(crate) fn log_comparison(results: &[(Strategy, Evaluation)]) {
    log::info!("Model Comparison:");
    log::info!("{:<15} {:>8} {:>8} {:>8}", "Model", "RMSE", "MAE", "Count");
    for (strategy, evaluation) in results {
        log::info!(
            "{:<15} {:>8.4} {:>8.4} {:>8}",
            strategy.to_string(),
            evaluation.rmse,
            evaluation.mae,
            evaluation.count
        );
    }

    let best = results.iter().min_by(|(_, a), (_, b)| {
        a.rmse
            .partial_cmp(&b.rmse)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    if let Some((strategy, _)) = best {
        log::info!("Best model by RMSE: {}", strategy);
    }
}

pub(crate) fn log_recommendations<I: Display>(
    title: impl Display,
    recommendations: &[Recommendation<I>],
) {
    log::info!("{}:", title);

    if recommendations.is_empty() {
        log::info!("  Nothing to recommend");
    }

    for recommendation in recommendations {
        log::info!("  Item {}: {:.2}", recommendation.item, recommendation.score);
    }
}

/// Pick a user with a seeded generator, so a run can be reproduced
pub(crate) fn sample_user<U>(users: &[U], seed: u64) -> Option<&U> {
    let mut rng = StdRng::seed_from_u64(seed);
    users.choose(&mut rng)
}
