//! Saving and restoring learned tables.

use std::fs;

use kinarow::agent::{Agent, QAgent, QConfig, QTable};
use kinarow::game::{GameConfig, GameEngine};
use kinarow::training::{checkpoint_path, Trainer, TrainerConfig};
use kinarow::{AgentSpec, Error};
use tempfile::TempDir;

fn trained_agents(episodes: u64) -> Vec<QAgent> {
    let engine = GameEngine::new(GameConfig::tic_tac_toe()).unwrap();
    let agents = (0..2)
        .map(|seed| QAgent::new(3, 3, QConfig::for_episodes(episodes).with_seed(seed)).unwrap())
        .collect();
    let mut trainer = Trainer::new(TrainerConfig::quick(episodes), engine, agents).unwrap();
    trainer.train().unwrap();
    trainer.into_agents()
}

#[test]
fn test_save_and_load_preserves_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("player0.json");

    let agent = &trained_agents(200)[0];
    agent.save(&path).unwrap();
    assert!(!dir.path().join("player0.json.tmp").exists());

    let restored = QAgent::load(&path, 3, 3, QConfig::greedy()).unwrap();
    assert_eq!(restored.table().len(), agent.table().len());

    for entry in agent.table().export().entries {
        let values = restored.table().get(&entry.state).unwrap();
        for (a, b) in values.iter().zip(&entry.values) {
            assert!(a == b || (a - b).abs() <= f64::EPSILON * a.abs().max(1.0));
        }
    }
}

#[test]
fn test_restored_agent_plays_like_saved_one() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.json");
    let agents = trained_agents(300);
    agents[0].save(&path).unwrap();

    let mut trained = QAgent::with_table(agents[0].table().clone(), QConfig::greedy()).unwrap();
    let mut restored = QAgent::load(&path, 3, 3, QConfig::greedy()).unwrap();

    for entry in agents[0].table().export().entries {
        assert_eq!(
            trained.greedy_action(&entry.state),
            restored.greedy_action(&entry.state)
        );
    }
}

#[test]
fn test_load_rejects_other_board() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.json");
    trained_agents(50)[1].save(&path).unwrap();

    let err = QAgent::load(&path, 4, 4, QConfig::greedy()).unwrap_err();
    assert!(matches!(err, Error::IncompatibleShape { .. }));
}

#[test]
fn test_load_rejects_tampered_entry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.json");
    fs::write(
        &path,
        r#"{"version":1,"rows":2,"cols":2,"entries":[{"state":[-1,-1,-1,-1],"values":[0.1,0.2,0.3]}]}"#,
    )
    .unwrap();

    assert!(matches!(
        QTable::load(&path, 2, 2),
        Err(Error::IncompatibleShape { .. })
    ));
}

#[test]
fn test_load_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.json");
    fs::write(&path, "not json").unwrap();
    assert!(matches!(QTable::load(&path, 3, 3), Err(Error::Json(_))));
}

#[test]
fn test_checkpoints_written_during_training() {
    let dir = TempDir::new().unwrap();
    let config = TrainerConfig {
        episodes: 100,
        report_interval: 0,
        board_dump_interval: 0,
        checkpoint_interval: 50,
        checkpoint_dir: Some(dir.path().join("dumps")),
    };
    let game = GameConfig::new(2, 4, 4, 4);
    let engine = GameEngine::new(game.clone()).unwrap();
    let agents = (0..2)
        .map(|seed| QAgent::new(4, 4, QConfig::for_episodes(100).with_seed(seed)).unwrap())
        .collect::<Vec<_>>();

    let mut trainer = Trainer::new(config, engine, agents).unwrap();
    trainer.train().unwrap();

    for player in 0..2 {
        let path = checkpoint_path(&dir.path().join("dumps"), player, &game);
        assert!(path.ends_with(format!("Player{}-2-4x4-4-last.json", player)));
        let table = QTable::load(&path, 4, 4).unwrap();
        assert_eq!(table.len(), trainer.agents()[player].table().len());
    }
}

#[test]
fn test_build_rejects_table_with_extra_players() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("three-players.json");
    // a 3x3 state holding a piece of player 2
    fs::write(
        &path,
        r#"{"version":1,"rows":3,"cols":3,"entries":[{"state":[0,1,2,-1,-1,-1,-1,-1,-1],"values":[0.1,0.1,0.1,0.1,0.1,0.1,0.1,0.1,0.1]}]}"#,
    )
    .unwrap();

    let spec = AgentSpec::Q {
        load: Some(path.clone()),
        explore: false,
    };
    let q = QConfig::greedy();
    assert!(matches!(
        spec.build(0, &GameConfig::tic_tac_toe(), &q, 100),
        Err(Error::IncompatibleShape { .. })
    ));
    assert!(spec
        .build(0, &GameConfig::tic_tac_toe().with_players(3), &q, 100)
        .is_ok());
}
