// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use config::EngineConfig;
use controller::{InteractionMatrix, Triple};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::{Axis, ItemBased, Predictor, SimilarityMatrix, UserBased};
use rand::{thread_rng, Rng};

fn generate_matrix(users: u32, items: u32, density: f64) -> InteractionMatrix<u32, u32> {
    let mut rng = thread_rng();

    let mut triples = Vec::new();
    for user in 0..users {
        for item in 0..items {
            if rng.gen_bool(density) {
                let rating: f64 = rng.gen_range(1., 5.);
                triples.push(Triple::new(user, item, rating.round()));
            }
        }
    }

    // Keys are unique and every rating is on the scale
    InteractionMatrix::from_triples((0..users).collect(), (0..items).collect(), &triples)
        .expect("generated matrix is valid")
}

fn similarity_users_500(c: &mut Criterion) {
    let matrix = generate_matrix(500, 200, 0.1);

    c.bench_function("user similarity 500", |bench| {
        bench.iter(|| SimilarityMatrix::fit(black_box(&matrix), Axis::Users, false))
    });

    c.bench_function("user similarity 500 (parallel)", |bench| {
        bench.iter(|| SimilarityMatrix::fit(black_box(&matrix), Axis::Users, true))
    });
}

fn similarity_items_500(c: &mut Criterion) {
    let matrix = generate_matrix(200, 500, 0.1);

    c.bench_function("item similarity 500", |bench| {
        bench.iter(|| SimilarityMatrix::fit(black_box(&matrix), Axis::Items, false))
    });

    c.bench_function("item similarity 500 (parallel)", |bench| {
        bench.iter(|| SimilarityMatrix::fit(black_box(&matrix), Axis::Items, true))
    });
}

fn recommend_200(c: &mut Criterion) {
    let matrix = generate_matrix(200, 200, 0.1);
    let config = EngineConfig {
        neighbor_count: 20,
        parallel: false,
        ..Default::default()
    };

    let user_based = UserBased::fit(&matrix, None, &config).expect("valid config");
    let item_based = ItemBased::fit(&matrix, &config).expect("valid config");

    c.bench_function("user-based recommend 200", |bench| {
        bench.iter(|| user_based.recommend(black_box(&0), 10))
    });

    c.bench_function("item-based recommend 200", |bench| {
        bench.iter(|| item_based.recommend(black_box(&0), 10))
    });
}

criterion_group! {
    name = similarity;
    config = Criterion::default().sample_size(10);
    targets = similarity_users_500, similarity_items_500
}

criterion_group!(recommendation, recommend_200);

criterion_main!(similarity, recommendation);
