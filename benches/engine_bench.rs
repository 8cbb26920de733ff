//! Benchmarks for the game engine and the Q-learning update.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kinarow::agent::{Agent, QAgent, QConfig, RandomAgent};
use kinarow::game::{GameConfig, GameEngine};
use kinarow::training::{Trainer, TrainerConfig};

fn random_game_benchmark(c: &mut Criterion) {
    let engine = GameEngine::new(GameConfig::new(2, 6, 7, 4)).unwrap();
    let agents = vec![RandomAgent::new(Some(1)), RandomAgent::new(Some(2))];
    let mut trainer = Trainer::new(TrainerConfig::quick(1), engine, agents).unwrap();

    c.bench_function("random_game_6x7_k4", |b| {
        b.iter(|| black_box(trainer.play_episode().unwrap()))
    });
}

fn q_update_benchmark(c: &mut Criterion) {
    let mut engine = GameEngine::new(GameConfig::new(2, 4, 4, 4)).unwrap();
    let mut agent = QAgent::new(4, 4, QConfig::for_episodes(1000).with_seed(42)).unwrap();

    // a short fixed line of play to update along
    let mut states = vec![engine.reset()];
    for index in [0, 5, 10, 15, 1, 6] {
        states.push(engine.action(index).unwrap().state);
    }

    c.bench_function("q_update_burst_4x4", |b| {
        b.iter(|| {
            for (action, pair) in [0, 5, 10, 15, 1, 6].iter().zip(states.windows(2)) {
                agent.fit(&pair[0], &pair[1], *action, black_box(-1.0));
            }
        })
    });
}

fn self_play_benchmark(c: &mut Criterion) {
    c.bench_function("q_self_play_3x3_100_episodes", |b| {
        b.iter(|| {
            let engine = GameEngine::new(GameConfig::tic_tac_toe()).unwrap();
            let agents = (0..2)
                .map(|seed| QAgent::new(3, 3, QConfig::for_episodes(100).with_seed(seed)).unwrap())
                .collect();
            let mut trainer = Trainer::new(TrainerConfig::quick(100), engine, agents).unwrap();
            trainer.train().unwrap().episodes
        })
    });
}

criterion_group!(
    benches,
    random_game_benchmark,
    q_update_benchmark,
    self_play_benchmark
);
criterion_main!(benches);
