use quest_dqn::{
    agent::{DqnAgent, EpsilonSchedule},
    config::{StagedConfig, TrainerConfig},
    replay_buffer::{ReplayBuffer, Transition},
    simulator::{Action, Item, Location, Simulator, Skill, INVENTORY_CAPACITY, OBSERVATION_SIZE},
    trainer::{staged::StagedTrainer, Trainer, TrainerPhase},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

#[test]
fn test_end_to_end_training() {
    // Hand-rolled loop over the public pieces, mirroring what Trainer does
    let mut rng = StdRng::seed_from_u64(2024);
    let mut sim = Simulator::new(100);
    let mut agent = DqnAgent::new(
        OBSERVATION_SIZE,
        32,
        Action::COUNT,
        EpsilonSchedule {
            start: 1.0,
            end: 0.1,
            decay: 0.99,
        },
        0.99,
        0.001,
        &mut rng,
    )
    .unwrap();
    let mut buffer = ReplayBuffer::new(1000).unwrap();

    let mut obs = sim.reset();
    let mut losses = Vec::new();
    for step in 1..=300 {
        let action = agent.act(obs.view(), &mut rng).unwrap();
        let result = sim.step(action, &mut rng);
        buffer.add(Transition {
            state: obs,
            action,
            reward: result.reward,
            next_state: result.observation.clone(),
            done: result.done,
        });
        obs = result.observation;

        if step % 4 == 0 {
            if let Some(loss) = agent.learn_from(&buffer, 32, &mut rng).unwrap() {
                assert!(loss.is_finite());
                losses.push(loss);
            }
        }
        if step % 50 == 0 {
            agent.sync_target().unwrap();
        }
        agent.decay_epsilon();
        if result.done {
            obs = sim.reset();
        }
    }

    assert_eq!(buffer.len(), 300);
    assert!(!losses.is_empty());
    assert!(agent.epsilon < 0.1 + 1e-6);
}

#[test]
fn test_mining_scenario() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut sim = Simulator::new(1000);
    sim.step(Action::WalkToMining, &mut rng);
    assert!(sim.state().is_at(Location::Mining));

    for _ in 0..50 {
        sim.step(Action::TrainMining, &mut rng);
    }
    let state = sim.state();
    assert!(state.level(Skill::Mining) >= 1);
    assert!(state.inventory.count(Item::Ore) <= INVENTORY_CAPACITY);
}

#[test]
fn test_unmet_quest_scenario() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut sim = Simulator::new(1000);
    sim.step(Action::Idle, &mut rng);
    let index = sim.state().quest_index;

    let result = sim.step(Action::DoQuest, &mut rng);
    assert_eq!(result.reward, 0.0);
    assert_eq!(sim.state().quest_index, index);
}

#[test]
fn test_zero_budget_scenario() {
    let config = TrainerConfig {
        total_steps: 0,
        seed: Some(1),
        ..TrainerConfig::default()
    };
    let mut trainer = Trainer::new(config).unwrap();
    assert_eq!(trainer.phase(), TrainerPhase::Terminal);

    let report = trainer.run().unwrap();
    assert_eq!(report.steps, 0);
    assert_eq!(report.updates, 0);
    assert!(trainer.buffer().is_empty());
}

#[test]
fn test_trained_model_loads_into_fresh_agent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("best_model.bin");
    let config = TrainerConfig {
        total_steps: 300,
        episode_length: 100,
        hidden_size: 24,
        log_interval: 100,
        seed: Some(5),
        model_path: Some(path.clone()),
        ..TrainerConfig::default()
    };
    let mut trainer = Trainer::new(config).unwrap();
    let report = trainer.run().unwrap();
    assert_eq!(report.episodes, 3);

    let mut rng = StdRng::seed_from_u64(0);
    let mut agent = DqnAgent::new(
        OBSERVATION_SIZE,
        24,
        Action::COUNT,
        EpsilonSchedule::fixed(0.0),
        0.99,
        0.001,
        &mut rng,
    )
    .unwrap();
    agent.load(&path).unwrap();

    let obs = Simulator::new(100).reset();
    let expected = trainer.agent_mut().greedy_action(obs.view()).unwrap();
    assert_eq!(agent.greedy_action(obs.view()).unwrap(), expected);
}

#[test]
fn test_wrong_hidden_size_fails_to_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.bin");
    let mut rng = StdRng::seed_from_u64(0);

    let small = DqnAgent::new(OBSERVATION_SIZE, 8, Action::COUNT, EpsilonSchedule::fixed(0.1), 0.99, 0.01, &mut rng)
        .unwrap();
    small.save(&path).unwrap();

    let mut big = DqnAgent::new(OBSERVATION_SIZE, 16, Action::COUNT, EpsilonSchedule::fixed(0.1), 0.99, 0.01, &mut rng)
        .unwrap();
    assert!(big.load(&path).is_err());
}

#[test]
fn test_staged_run_from_json_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("staged.json");
    let checkpoints = dir.path().join("checkpoints");
    let json = format!(
        r#"{{ "stage_steps": 30, "stage_count": 2, "hidden_size": 16, "batch_size": 8, "seed": 11, "checkpoint_dir": {:?} }}"#,
        checkpoints.to_string_lossy()
    );
    std::fs::write(&config_path, json).unwrap();

    let config = StagedConfig::from_json_file(&config_path).unwrap();
    let mut trainer = StagedTrainer::new(config).unwrap();
    let outcomes = trainer.run_all().unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(checkpoints.join("stage_1_step_30.bin").exists());
    assert!(checkpoints.join("stage_2_step_60.bin").exists());
}
