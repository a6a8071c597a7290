// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

mod utils;

use anyhow::Error;
use clap::{value_t, App, AppSettings, Arg, ArgMatches, SubCommand};
use config::{Config, Strategy};
use controller::{train_test_split, users_means, Controller, InteractionMatrix};
use engine::Engine;
use movie_lens_csv::{write_means, MovieLensCsvController};
use std::path::Path;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn app() -> App<'static, 'static> {
    App::new("cf-recommend")
        .version(VERSION)
        .about("Neighborhood collaborative filtering over explicit ratings")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .default_value("config.toml")
                .help("Configuration file"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Increase logging verbosity"),
        )
        .arg(
            Arg::with_name("neighbors")
                .short("k")
                .long("neighbors")
                .value_name("K")
                .help("Override the neighbor count"),
        )
        .arg(
            Arg::with_name("strategy")
                .short("s")
                .long("strategy")
                .value_name("STRATEGY")
                .possible_values(&["user-based", "item-based", "user", "item"])
                .help("Override the strategy"),
        )
        .arg(
            Arg::with_name("count")
                .short("n")
                .long("count")
                .value_name("N")
                .help("Override how many items are recommended"),
        )
        .subcommand(
            SubCommand::with_name("evaluate")
                .about("Split the ratings, fit both strategies and compare them")
                .arg(
                    Arg::with_name("report")
                        .long("report")
                        .value_name("FILE")
                        .help("Write the comparison as csv"),
                )
                .arg(
                    Arg::with_name("all")
                        .long("all")
                        .help("Evaluate the whole test set, ignoring max_test_triples"),
                )
                .arg(
                    Arg::with_name("save-means")
                        .long("save-means")
                        .value_name("FILE")
                        .help("Write the users means of the full matrix as csv"),
                ),
        )
        .subcommand(
            SubCommand::with_name("recommend")
                .about("Recommend unrated items for a user")
                .arg(Arg::with_name("USER").required(true)),
        )
        .subcommand(
            SubCommand::with_name("predict")
                .about("Predict the rating of a user for an item")
                .arg(Arg::with_name("USER").required(true))
                .arg(Arg::with_name("ITEM").required(true)),
        )
}

fn load_config(matches: &ArgMatches) -> Result<Config, Error> {
    let path = matches.value_of("config").unwrap_or("config.toml");

    let mut config = if matches.occurrences_of("config") == 0 && !Path::new(path).exists() {
        log::warn!("No configuration found at {}, using defaults", path);
        Config::default()
    } else {
        log::debug!("Loading configuration from {}", path);
        Config::load(path)?
    };

    if matches.is_present("neighbors") {
        config.engine.neighbor_count = value_t!(matches, "neighbors", usize)?;
    }

    if let Some(strategy) = matches.value_of("strategy") {
        config.engine.strategy = strategy.parse()?;
    }

    if matches.is_present("count") {
        config.engine.recommendation_count = value_t!(matches, "count", usize)?;
    }

    config.validate()?;
    Ok(config)
}

fn evaluate<C>(controller: &C, config: &Config, matches: &ArgMatches) -> Result<(), Error>
where
    C: Controller<UserId = String, ItemId = String>,
{
    let matrix = controller.interaction_matrix()?;
    let means = controller.users_means()?;
    let ratings = controller.ratings()?;

    if let Some(path) = matches.value_of("save-means") {
        write_means(path, &users_means(&matrix), matrix.users())?;
        log::info!("Users means written to {}", path);
    }

    let evaluation = &config.evaluation;
    let (train, test) = train_test_split(&ratings, evaluation.train_fraction, evaluation.seed)?;
    log::info!("Training data: {} ratings", train.len());
    log::info!("Test data: {} ratings", test.len());

    let known: Vec<_> = train
        .into_iter()
        .filter(|triple| {
            matrix.contains_user(&triple.user) && matrix.contains_item(&triple.item)
        })
        .collect();

    let train_matrix =
        InteractionMatrix::from_triples(matrix.users().to_vec(), matrix.items().to_vec(), &known)?;

    let test = match evaluation.max_test_triples {
        Some(max) if !matches.is_present("all") => &test[..max.min(test.len())],
        _ => &test[..],
    };

    let mut engines = Vec::new();
    let mut results = Vec::new();

    for strategy in &[Strategy::UserBased, Strategy::ItemBased] {
        let mut engine_config = config.engine.clone();
        engine_config.strategy = *strategy;

        let engine = utils::with_spinner(&format!("Training {}", strategy), || {
            Engine::fit(&train_matrix, means.clone(), &engine_config)
        })?;

        log::info!("Evaluating {}:", strategy);
        let result = utils::with_spinner(&format!("Evaluating {}", strategy), || {
            engine.evaluate(test)
        })?;

        results.push((*strategy, result));
        engines.push(engine);
    }

    utils::log_comparison(&results);

    if let Some(report) = matches.value_of("report") {
        utils::write_report(report, &results)?;
    }

    if let Some(user) = utils::sample_user(matrix.users(), evaluation.seed) {
        log::info!("Sample recommendations for user {}", user);
        for engine in &engines {
            utils::log_recommendations(engine.strategy(), &engine.recommend(user));
        }
    }

    Ok(())
}

fn recommend<C>(controller: &C, config: &Config, matches: &ArgMatches) -> Result<(), Error>
where
    C: Controller<UserId = String, ItemId = String>,
{
    let user = value_t!(matches, "USER", String)?;

    let matrix = controller.interaction_matrix()?;
    let engine = Engine::fit(&matrix, controller.users_means()?, &config.engine)?;

    match matrix.user_ratings(&user) {
        Some(rated) => log::info!("User {} has rated {} items", user, rated.len()),
        None => log::warn!("User {} is not in the interaction matrix", user),
    }

    utils::log_recommendations(
        format!("{} recommendations for user {}", engine.strategy(), user),
        &engine.recommend(&user),
    );

    Ok(())
}

fn predict<C>(controller: &C, config: &Config, matches: &ArgMatches) -> Result<(), Error>
where
    C: Controller<UserId = String, ItemId = String>,
{
    let user = value_t!(matches, "USER", String)?;
    let item = value_t!(matches, "ITEM", String)?;

    let matrix = controller.interaction_matrix()?;
    let engine = Engine::fit(&matrix, controller.users_means()?, &config.engine)?;

    if let Some(actual) = matrix.rating(&user, &item) {
        log::info!("User {} already rated item {} with {}", user, item, actual);
    }

    log::info!(
        "{} predicts {:.2} for user {} on item {}",
        engine.strategy(),
        engine.predict(&user, &item),
        user,
        item
    );

    Ok(())
}

fn main() -> Result<(), Error> {
    let matches = app().get_matches();
    utils::init_logger(matches.occurrences_of("verbose"))?;

    let config = load_config(&matches)?;
    let controller = MovieLensCsvController::from_config(&config.data);

    match matches.subcommand() {
        ("evaluate", Some(sub)) => evaluate(&controller, &config, sub),
        ("recommend", Some(sub)) => recommend(&controller, &config, sub),
        ("predict", Some(sub)) => predict(&controller, &config, sub),
        _ => Ok(()),
    }
}
