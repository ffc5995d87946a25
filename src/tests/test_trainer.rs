use tempfile::tempdir;

use crate::config::{StagedConfig, TrainerConfig};
use crate::error::QuestError;
use crate::trainer::staged::{Stage, StagedTrainer};
use crate::trainer::{Trainer, TrainerPhase};

fn small_config(total_steps: usize) -> TrainerConfig {
    TrainerConfig {
        total_steps,
        episode_length: 50,
        hidden_size: 16,
        buffer_capacity: 500,
        batch_size: 8,
        target_update: 20,
        train_freq: 4,
        log_interval: 100,
        seed: Some(42),
        ..TrainerConfig::default()
    }
}

fn small_staged(dir: &std::path::Path) -> StagedConfig {
    StagedConfig {
        stage_steps: 40,
        stage_count: 3,
        episode_length: 1000,
        hidden_size: 16,
        buffer_capacity: 200,
        batch_size: 8,
        target_update: 20,
        log_interval: 20,
        seed: Some(3),
        checkpoint_dir: dir.to_path_buf(),
        ..StagedConfig::default()
    }
}

#[test]
fn test_zero_budget_is_terminal() {
    let mut trainer = Trainer::new(small_config(0)).unwrap();
    assert_eq!(trainer.phase(), TrainerPhase::Terminal);

    let report = trainer.run().unwrap();
    assert_eq!(report.steps, 0);
    assert_eq!(report.updates, 0);
    assert_eq!(report.episodes, 0);
    assert!(trainer.buffer().is_empty());
}

#[test]
fn test_invalid_config_rejected() {
    let config = TrainerConfig {
        batch_size: 0,
        ..small_config(10)
    };
    assert!(matches!(
        Trainer::new(config),
        Err(QuestError::InvalidParameter { .. })
    ));
}

#[test]
fn test_warming_then_training() {
    let mut trainer = Trainer::new(small_config(100)).unwrap();
    assert_eq!(trainer.phase(), TrainerPhase::Warming);

    for _ in 0..7 {
        trainer.step().unwrap();
    }
    assert_eq!(trainer.phase(), TrainerPhase::Warming);
    assert_eq!(trainer.agent().train_steps, 0);

    trainer.step().unwrap();
    assert_eq!(trainer.phase(), TrainerPhase::Training);
    // Step 8 is a multiple of train_freq with a full batch available
    assert_eq!(trainer.agent().train_steps, 1);
}

#[test]
fn test_update_cadence() {
    let mut trainer = Trainer::new(small_config(200)).unwrap();
    let report = trainer.run().unwrap();

    assert_eq!(report.steps, 200);
    assert_eq!(trainer.buffer().len(), 200);
    // Updates at steps 8, 12, ..., 200
    assert_eq!(report.updates, (200 - 8) / 4 + 1);
    assert_eq!(report.episodes, 4);
    assert_eq!(trainer.phase(), TrainerPhase::Terminal);
}

#[test]
fn test_target_synced_on_schedule() {
    let mut trainer = Trainer::new(small_config(100)).unwrap();
    for _ in 0..20 {
        trainer.step().unwrap();
    }
    let agent = trainer.agent();
    for (q, t) in agent.q_network.layers().iter().zip(agent.target_network.layers()) {
        assert_eq!(q.weights, t.weights);
    }

    // One more update at step 24 moves the online network away from the target
    for _ in 0..4 {
        trainer.step().unwrap();
    }
    let agent = trainer.agent();
    assert_ne!(agent.q_network.layers()[2].weights, agent.target_network.layers()[2].weights);
}

#[test]
fn test_epsilon_decays_per_step() {
    let mut trainer = Trainer::new(small_config(10)).unwrap();
    trainer.run().unwrap();
    let expected = 0.999_f32.powi(10);
    assert!((trainer.epsilon() - expected).abs() < 1e-5);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let mut a = Trainer::new(small_config(120)).unwrap();
    let mut b = Trainer::new(small_config(120)).unwrap();
    let report_a = a.run().unwrap();
    let report_b = b.run().unwrap();

    assert_eq!(report_a, report_b);
    assert_eq!(
        a.agent().q_network.layers()[0].weights,
        b.agent().q_network.layers()[0].weights
    );
}

#[test]
fn test_run_saves_model() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("best_model.bin");
    let config = TrainerConfig {
        model_path: Some(path.clone()),
        ..small_config(30)
    };
    let mut trainer = Trainer::new(config).unwrap();
    trainer.run().unwrap();
    assert!(path.exists());
}

#[test]
fn test_stage_ranges() {
    let dir = tempdir().unwrap();
    let trainer = StagedTrainer::new(small_staged(dir.path())).unwrap();

    let stage = trainer.stage(2).unwrap();
    assert_eq!(stage, Stage { index: 2, start: 40, end: 80 });
    assert_eq!(stage.steps(), 40);
    assert_eq!(
        stage.checkpoint_path(dir.path()),
        dir.path().join("stage_2_step_80.bin")
    );
    assert!(trainer.stage(0).is_err());
    assert!(trainer.stage(4).is_err());
}

#[test]
fn test_default_stage_checkpoint_name() {
    let config = StagedConfig::default();
    let stage = Stage {
        index: 3,
        start: 20_000,
        end: 30_000,
    };
    assert_eq!(
        stage.checkpoint_path(&config.checkpoint_dir),
        std::path::PathBuf::from("staged_models/stage_3_step_30000.bin")
    );
}

#[test]
fn test_train_stage_writes_checkpoint() {
    let dir = tempdir().unwrap();
    let checkpoint_dir = dir.path().join("nested");
    let mut config = small_staged(dir.path());
    config.checkpoint_dir = checkpoint_dir.clone();
    let mut trainer = StagedTrainer::new(config).unwrap();

    let outcome = trainer.run_single(1).unwrap();
    assert_eq!(outcome.steps, 40);
    assert_eq!(outcome.checkpoint, checkpoint_dir.join("stage_1_step_40.bin"));
    assert!(outcome.checkpoint.exists());
    assert_eq!(trainer.total_steps(), 40);
}

#[test]
fn test_later_stage_fast_forwards() {
    let dir = tempdir().unwrap();
    let mut trainer = StagedTrainer::new(small_staged(dir.path())).unwrap();

    // No stage 2 checkpoint exists, so stage 3 starts from fresh weights
    let outcome = trainer.run_single(3).unwrap();
    assert_eq!(outcome.steps, 40);
    assert_eq!(trainer.simulator().state().steps, 120);
    assert!(dir.path().join("stage_3_step_120.bin").exists());
}

#[test]
fn test_single_stage_resumes_from_previous() {
    let dir = tempdir().unwrap();
    let mut first = StagedTrainer::new(small_staged(dir.path())).unwrap();
    let outcome = first.run_single(1).unwrap();

    let mut config = small_staged(dir.path());
    config.seed = Some(99);
    let mut second = StagedTrainer::new(config).unwrap();
    second.load_stage(&outcome.checkpoint).unwrap();

    let agent = second.agent();
    for (a, b) in first.agent().q_network.layers().iter().zip(agent.q_network.layers()) {
        assert_eq!(a.weights, b.weights);
    }
    for (q, t) in agent.q_network.layers().iter().zip(agent.target_network.layers()) {
        assert_eq!(q.weights, t.weights);
    }

    assert_eq!(second.run_single(2).unwrap().steps, 40);
}

#[test]
fn test_run_all_visits_every_stage() {
    let dir = tempdir().unwrap();
    let mut trainer = StagedTrainer::new(small_staged(dir.path())).unwrap();
    let outcomes = trainer.run_all().unwrap();

    assert_eq!(outcomes.len(), 3);
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.stage.index, i + 1);
        assert!(outcome.checkpoint.exists());
    }
    assert_eq!(trainer.total_steps(), 120);
    assert!(trainer.best_quest() >= 1);
}
